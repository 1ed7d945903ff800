//! Rolling memory window.
//!
//! The window defines the system's effective conversation memory: messages
//! outside it stay persisted but are invisible to the next generation call.

use crate::schema::{Role, Session};

/// Default number of trailing messages forwarded upstream.
pub const DEFAULT_MEMORY_WINDOW: usize = 20;

/// Role and text only. Ids and timestamps never leave the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowMessage {
    pub role: Role,
    pub text: String,
}

/// Last `limit` messages in chronological order; all of them when the session
/// holds fewer. Pure and total.
#[must_use]
pub fn select_window(session: &Session, limit: usize) -> Vec<WindowMessage> {
    let messages = &session.messages;
    let start = messages.len().saturating_sub(limit);
    messages[start..]
        .iter()
        .map(|message| WindowMessage {
            role: message.role,
            text: message.text.clone(),
        })
        .collect()
}
