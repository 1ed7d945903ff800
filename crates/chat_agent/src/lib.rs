//! Terminal chat agent wired over the palaver core crates.
//!
//! The binary reads its environment once at startup:
//!
//! - `PALAVER_HOME` - directory for persisted sessions and settings
//!   (defaults to `.palaver` under the working directory)
//! - `PALAVER_MODEL` - model id override
//! - `PALAVER_BASE_URL` - endpoint base URL override, useful against a
//!   local stub server
//! - `NO_COLOR` - disable ANSI styling in transcript output
//!
//! The API key is never read from the environment; it is stored with the
//! `/key` command and persists alongside the other settings.
//!
//! Turn contract: one chat turn is user message persisted, window selected,
//! backend called, reply persisted. `App` takes `&mut self` for the whole
//! turn, so concurrent turns cannot interleave. A failed turn keeps the user
//! message; retry is resubmission.

pub mod app;
pub mod backend;
pub mod commands;
pub mod config;
pub mod settings;
pub mod transcript;

pub use app::{App, AppError, CommandOutcome, TurnOutcome};
pub use backend::GenerationBackend;
pub use commands::{parse_slash_command, SlashCommand};
pub use settings::{SettingsStore, StoredSettings};
