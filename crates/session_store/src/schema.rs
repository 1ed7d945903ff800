use serde::{Deserialize, Serialize};

/// Title given to sessions created without one.
pub const DEFAULT_SESSION_TITLE: &str = "New chat";

/// Titles are truncated to this many characters on rename.
pub const MAX_TITLE_CHARS: usize = 80;

/// Author of a message. Unknown or missing persisted roles degrade to `User`.
///
/// `User` stays the last variant; `#[serde(other)]` is only accepted there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Assistant,
    #[default]
    #[serde(other)]
    User,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One persisted conversation thread.
///
/// Persisted field names keep the original camelCase stamps
/// (`createdAt`/`updatedAt`). Every field tolerates absence; unknown fields
/// are ignored. [`SessionStore::ensure_shape`](crate::SessionStore::ensure_shape)
/// repairs whatever deserialization let through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Session {
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            created_at,
            updated_at: created_at,
            messages: Vec::new(),
        }
    }
}

/// One message within a session. Timestamps are epoch milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub ts: i64,
}

impl Message {
    #[must_use]
    pub fn new(id: impl Into<String>, role: Role, text: impl Into<String>, ts: i64) -> Self {
        Self {
            id: id.into(),
            role,
            text: text.into(),
            ts,
        }
    }
}
