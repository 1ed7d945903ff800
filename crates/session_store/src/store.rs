use tracing::{debug, warn};

use crate::error::StoreError;
use crate::keys;
use crate::kv::{get_json, set_json, KeyValueStore};
use crate::schema::{Message, Role, Session, DEFAULT_SESSION_TITLE, MAX_TITLE_CHARS};

/// Multi-session store over an injected key-value port.
///
/// Every operation is read-modify-write against the port; nothing is cached
/// between calls. Mutations persist the whole collection. Single logical
/// writer assumed.
pub struct SessionStore {
    kv: Box<dyn KeyValueStore>,
}

impl SessionStore {
    #[must_use]
    pub fn new(kv: Box<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Persisted collection, in stored order. Absent or malformed data
    /// degrades to an empty collection.
    #[must_use]
    pub fn load_all(&self) -> Vec<Session> {
        get_json(self.kv.as_ref(), keys::SESSIONS, Vec::new())
    }

    /// Normalize a possibly-partial record into a well-formed session.
    /// Idempotent: a well-formed session passes through unchanged.
    #[must_use]
    pub fn ensure_shape(&self, candidate: Session) -> Session {
        normalize_session(candidate, current_epoch_ms())
    }

    /// Fresh session with a new id and current stamps. Not persisted.
    #[must_use]
    pub fn create_new_session(&self, title: Option<&str>) -> Session {
        Session::new(
            new_id(),
            normalize_title(title.unwrap_or("")),
            current_epoch_ms(),
        )
    }

    /// Replace the entry with a matching id, or prepend when absent, then
    /// persist the whole collection. The store never re-sorts on read;
    /// most-recently-created-first ordering is a side effect of prepending.
    pub fn upsert_session(&mut self, session: Session) -> Result<Session, StoreError> {
        let session = self.ensure_shape(session);
        let mut sessions = self.load_all();
        match sessions.iter_mut().find(|existing| existing.id == session.id) {
            Some(existing) => *existing = session.clone(),
            None => sessions.insert(0, session.clone()),
        }
        self.persist(&sessions)?;
        Ok(session)
    }

    /// Remove a session. When it was the active one, the pointer moves to the
    /// new first element, or clears when none remain.
    pub fn delete_one(&mut self, id: &str) -> Result<(), StoreError> {
        let mut sessions = self.load_all();
        sessions.retain(|session| session.id != id);
        self.persist(&sessions)?;

        if self.active_session_id().as_deref() == Some(id) {
            match sessions.first() {
                Some(first) => self.set_active(&first.id)?,
                None => self.clear_active()?,
            }
        }
        Ok(())
    }

    /// Clear the collection and the active pointer unconditionally.
    pub fn delete_all_sessions(&mut self) -> Result<(), StoreError> {
        debug!("clearing all sessions");
        self.kv.remove(keys::SESSIONS)?;
        self.kv.remove(keys::ACTIVE_SESSION)?;
        Ok(())
    }

    #[must_use]
    pub fn get_by_id(&self, id: &str) -> Option<Session> {
        self.load_all().into_iter().find(|session| session.id == id)
    }

    /// Normalize and truncate the title, bump `updated_at`, persist. Unknown
    /// ids return `Ok(None)`.
    pub fn rename(&mut self, id: &str, new_title: &str) -> Result<Option<Session>, StoreError> {
        let Some(mut session) = self.get_by_id(id) else {
            return Ok(None);
        };
        session.title = normalize_title(new_title);
        session.updated_at = current_epoch_ms();
        self.upsert_session(session).map(Some)
    }

    /// Append a message and bump `updated_at`. Unknown session ids return
    /// `Ok(None)`.
    pub fn add_message(
        &mut self,
        session_id: &str,
        role: Role,
        text: &str,
        ts: Option<i64>,
    ) -> Result<Option<Session>, StoreError> {
        let Some(mut session) = self.get_by_id(session_id) else {
            warn!(%session_id, "message for unknown session dropped");
            return Ok(None);
        };
        let now = current_epoch_ms();
        session
            .messages
            .push(Message::new(new_id(), role, text, ts.unwrap_or(now)));
        session.updated_at = now;
        self.upsert_session(session).map(Some)
    }

    #[must_use]
    pub fn active_session_id(&self) -> Option<String> {
        self.kv
            .get_string(keys::ACTIVE_SESSION)
            .filter(|id| !id.trim().is_empty())
    }

    pub fn set_active(&mut self, id: &str) -> Result<(), StoreError> {
        self.kv.set_string(keys::ACTIVE_SESSION, id)
    }

    pub fn clear_active(&mut self) -> Result<(), StoreError> {
        self.kv.remove(keys::ACTIVE_SESSION)
    }

    /// Self-healing invariant, run at startup and after destructive
    /// operations: an empty collection gets a default session, a missing or
    /// dangling pointer is repointed to the first element. Returns the active
    /// session. Afterwards the store is never observed with zero sessions or
    /// a dangling pointer.
    pub fn ensure_at_least_one_session(&mut self) -> Result<Session, StoreError> {
        let sessions = self.load_all();
        let Some(first) = sessions.first() else {
            let session = self.create_new_session(None);
            let session = self.upsert_session(session)?;
            self.set_active(&session.id)?;
            debug!(id = %session.id, "created default session");
            return Ok(session);
        };

        if let Some(id) = self.active_session_id() {
            if let Some(session) = sessions.iter().find(|session| session.id == id) {
                return Ok(session.clone());
            }
            warn!(%id, "active pointer dangling, repointing to first session");
        }

        let first = first.clone();
        self.set_active(&first.id)?;
        Ok(first)
    }

    fn persist(&mut self, sessions: &[Session]) -> Result<(), StoreError> {
        debug!(count = sessions.len(), "persisting session collection");
        set_json(self.kv.as_mut(), keys::SESSIONS, &sessions)
    }
}

pub(crate) fn normalize_session(mut session: Session, now: i64) -> Session {
    if session.id.trim().is_empty() {
        session.id = new_id();
    }
    session.title = normalize_title(&session.title);
    if session.created_at <= 0 {
        session.created_at = now;
    }
    if session.updated_at < session.created_at {
        session.updated_at = session.created_at;
    }
    session.messages = session
        .messages
        .into_iter()
        .map(|message| normalize_message(message, now))
        .collect();
    session
}

pub(crate) fn normalize_message(mut message: Message, now: i64) -> Message {
    if message.id.trim().is_empty() {
        message.id = new_id();
    }
    if message.ts <= 0 {
        message.ts = now;
    }
    message
}

pub(crate) fn normalize_title(title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return DEFAULT_SESSION_TITLE.to_string();
    }
    // The cut can land after interior whitespace; normalized titles never end
    // in any, so re-normalizing leaves them unchanged. Never empty: the first
    // char survives the trim.
    let truncated: String = trimmed.chars().take(MAX_TITLE_CHARS).collect();
    truncated.trim_end().to_string()
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub(crate) fn current_epoch_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::{normalize_message, normalize_session, normalize_title};
    use crate::schema::{Message, Role, Session, DEFAULT_SESSION_TITLE};

    #[test]
    fn normalize_title_defaults_and_truncates() {
        assert_eq!(normalize_title("  "), DEFAULT_SESSION_TITLE);
        assert_eq!(normalize_title(" kept "), "kept");

        let truncated = normalize_title(&"é".repeat(200));
        assert_eq!(truncated.chars().count(), 80);
    }

    #[test]
    fn truncation_never_leaves_trailing_whitespace() {
        // Char 80 of this title is a space, so the cut lands right after it.
        let boundary = format!("{} overflow", "a".repeat(79));

        let normalized = normalize_title(&boundary);
        assert_eq!(normalized, "a".repeat(79));
        assert_eq!(normalize_title(&normalized), normalized);
    }

    #[test]
    fn normalize_session_is_idempotent() {
        let candidate = Session {
            id: String::new(),
            title: "  ".to_string(),
            created_at: 0,
            updated_at: -5,
            messages: vec![Message::new("", Role::User, "hi", 0)],
        };

        let once = normalize_session(candidate, 1_000);
        let twice = normalize_session(once.clone(), 2_000);
        assert_eq!(once, twice);
        assert!(!once.id.is_empty());
        assert_eq!(once.created_at, 1_000);
        assert_eq!(once.updated_at, 1_000);
        assert_eq!(once.title, DEFAULT_SESSION_TITLE);

        let boundary = Session {
            title: format!("{} overflow", "a".repeat(79)),
            ..once
        };
        let truncated = normalize_session(boundary, 3_000);
        let truncated_again = normalize_session(truncated.clone(), 4_000);
        assert_eq!(truncated, truncated_again);
        assert_eq!(truncated.title, "a".repeat(79));
    }

    #[test]
    fn normalize_message_fills_id_and_timestamp() {
        let message = normalize_message(Message::new("", Role::Assistant, "hi", 0), 42);
        assert!(!message.id.is_empty());
        assert_eq!(message.ts, 42);

        let kept = normalize_message(Message::new("m-1", Role::User, "hi", 7), 42);
        assert_eq!(kept.id, "m-1");
        assert_eq!(kept.ts, 7);
    }
}
