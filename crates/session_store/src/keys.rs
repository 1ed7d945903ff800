//! Storage keys used across the client. All persisted state lives under these
//! four keys in the key-value port.

/// Persisted session collection (JSON array of sessions).
pub const SESSIONS: &str = "sessions";

/// Active-session pointer (plain session id string).
pub const ACTIVE_SESSION: &str = "active-session";

/// Generation credential (plain string).
pub const API_KEY: &str = "gemini-api-key";

/// Generation settings (JSON object).
pub const GENERATION_SETTINGS: &str = "generation-settings";
