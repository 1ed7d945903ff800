//! Transport-only Generative Language API client primitives.
//!
//! This crate owns request building, response text extraction, and error
//! classification for `generateContent` calls. It holds no conversation
//! state and performs exactly one attempt per request; retry is the
//! caller's decision, made by resubmission.

pub mod client;
pub mod config;
pub mod error;
pub mod payload;
pub mod response;
pub mod url;

pub use client::{GeminiClient, GenerationReply};
pub use config::{GeminiConfig, DEFAULT_GEMINI_MODEL};
pub use error::GeminiApiError;
pub use payload::{ChatTurn, GenerateContentRequest, GenerationSettings, TurnRole};
pub use response::extract_text;
pub use url::{generate_content_url, DEFAULT_GEMINI_BASE_URL};
