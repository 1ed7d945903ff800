use std::path::PathBuf;
use std::time::Duration;

use gemini_api::{ChatTurn, GeminiApiError, TurnRole};
use session_store::{
    export_document, select_window, Role, Session, SessionStore, StoreError, WindowMessage,
    DEFAULT_MEMORY_WINDOW,
};
use thiserror::Error;
use tracing::info;

use crate::backend::GenerationBackend;
use crate::commands::SlashCommand;
use crate::settings::SettingsStore;
use crate::transcript::{format_elapsed, format_session_list};

/// Shown in place of an assistant reply that came back empty. Placeholder
/// substitution is this layer's job; the adapter reports what it extracted.
pub const EMPTY_REPLY_PLACEHOLDER: &str = "(empty response)";

pub const HELP_TEXT: &str = "\
Commands:
  /help             show this help
  /new [title]      start a new session and switch to it
  /sessions         list sessions
  /switch <n>       switch to session n from /sessions
  /rename <title>   rename the active session
  /delete           delete the active session
  /clear-all        delete every session
  /export [path]    write the active session as a JSON document
  /key <value>      store the API key
  /testkey          probe the stored API key
  /settings         show generation settings
  /temp <x>         set temperature (0.0-1.0)
  /tokens <n>       set max output tokens (64-2048)
  /quit             exit";

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Generation(#[from] GeminiApiError),

    /// The active session vanished between two store operations of one turn.
    /// Only reachable when another process clears the backing files mid-turn.
    #[error("active session disappeared mid-turn")]
    ActiveSessionMissing,

    #[error("could not encode export document: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("could not write export to {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result of one completed chat turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub session_id: String,
    pub reply: String,
    pub elapsed: Duration,
}

/// What the REPL should do after a slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Text(String),
    Quit,
}

/// Orchestrator: owns the stores and the generation backend, and serializes
/// every mutation through `&mut self`. A second send while one is in flight
/// is rejected by construction, never queued.
pub struct App {
    sessions: SessionStore,
    settings: SettingsStore,
    backend: Box<dyn GenerationBackend>,
}

impl App {
    pub fn new(
        sessions: SessionStore,
        settings: SettingsStore,
        backend: Box<dyn GenerationBackend>,
    ) -> Self {
        Self {
            sessions,
            settings,
            backend,
        }
    }

    /// Self-heal the store and return the active session. Run at startup and
    /// after destructive commands.
    pub fn startup(&mut self) -> Result<Session, AppError> {
        Ok(self.sessions.ensure_at_least_one_session()?)
    }

    pub fn session_store(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn session_store_mut(&mut self) -> &mut SessionStore {
        &mut self.sessions
    }

    pub fn settings_store(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn settings_store_mut(&mut self) -> &mut SettingsStore {
        &mut self.settings
    }

    /// One full chat turn: persist the user message, select the memory
    /// window, call the backend, persist the (possibly substituted) reply.
    pub async fn send_message(&mut self, text: &str) -> Result<TurnOutcome, AppError> {
        let session = self.sessions.ensure_at_least_one_session()?;
        let settings = self.settings.resolved();

        let session = self
            .sessions
            .add_message(&session.id, Role::User, text, None)?
            .ok_or(AppError::ActiveSessionMissing)?;

        let window = select_window(&session, DEFAULT_MEMORY_WINDOW);
        let turns = window_to_turns(&window);
        info!(session_id = %session.id, turns = turns.len(), "dispatching generation turn");

        let reply = self.backend.generate(&turns, &settings).await?;

        let reply_text = if reply.text.is_empty() {
            EMPTY_REPLY_PLACEHOLDER.to_string()
        } else {
            reply.text
        };
        let session = self
            .sessions
            .add_message(&session.id, Role::Assistant, &reply_text, None)?
            .ok_or(AppError::ActiveSessionMissing)?;

        Ok(TurnOutcome {
            session_id: session.id,
            reply: reply_text,
            elapsed: reply.elapsed,
        })
    }

    pub async fn handle_command(
        &mut self,
        command: SlashCommand,
    ) -> Result<CommandOutcome, AppError> {
        match command {
            SlashCommand::Help => Ok(text(HELP_TEXT)),
            SlashCommand::New(title) => {
                let session = self.sessions.create_new_session(title.as_deref());
                let session = self.sessions.upsert_session(session)?;
                self.sessions.set_active(&session.id)?;
                Ok(text(format!("Started \"{}\"", session.title)))
            }
            SlashCommand::Sessions => {
                let sessions = self.sessions.load_all();
                if sessions.is_empty() {
                    return Ok(text("No sessions yet"));
                }
                let active = self.sessions.active_session_id();
                Ok(text(format_session_list(&sessions, active.as_deref())))
            }
            SlashCommand::Switch(argument) => {
                let sessions = self.sessions.load_all();
                let selected = argument
                    .parse::<usize>()
                    .ok()
                    .filter(|number| (1..=sessions.len()).contains(number));
                let Some(number) = selected else {
                    return Ok(text(format!(
                        "Usage: /switch <1-{}>",
                        sessions.len().max(1)
                    )));
                };
                let session = &sessions[number - 1];
                self.sessions.set_active(&session.id)?;
                Ok(text(format!("Switched to \"{}\"", session.title)))
            }
            SlashCommand::Rename(title) => {
                if title.is_empty() {
                    return Ok(text("Usage: /rename <title>"));
                }
                let session = self.sessions.ensure_at_least_one_session()?;
                let renamed = self
                    .sessions
                    .rename(&session.id, &title)?
                    .ok_or(AppError::ActiveSessionMissing)?;
                Ok(text(format!("Renamed to \"{}\"", renamed.title)))
            }
            SlashCommand::Delete => {
                let session = self.sessions.ensure_at_least_one_session()?;
                self.sessions.delete_one(&session.id)?;
                let next = self.sessions.ensure_at_least_one_session()?;
                Ok(text(format!(
                    "Deleted \"{}\", now on \"{}\"",
                    session.title, next.title
                )))
            }
            SlashCommand::ClearAll => {
                self.sessions.delete_all_sessions()?;
                let next = self.sessions.ensure_at_least_one_session()?;
                Ok(text(format!(
                    "Cleared all sessions, started \"{}\"",
                    next.title
                )))
            }
            SlashCommand::Export(path) => {
                let session = self.sessions.ensure_at_least_one_session()?;
                let path = path
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(export_file_name(&session)));
                let document = export_document(&session)?;
                let json = serde_json::to_string_pretty(&document)?;
                std::fs::write(&path, json).map_err(|source| AppError::Export {
                    path: path.clone(),
                    source,
                })?;
                Ok(text(format!(
                    "Exported \"{}\" to {}",
                    session.title,
                    path.display()
                )))
            }
            SlashCommand::Key(value) => {
                if value.is_empty() {
                    return Ok(text("Usage: /key <api-key>"));
                }
                self.settings.set_api_key(&value)?;
                Ok(text("API key saved"))
            }
            SlashCommand::TestKey => {
                let Some(api_key) = self.settings.api_key() else {
                    return Err(AppError::Generation(GeminiApiError::MissingApiKey));
                };
                let reply = self.backend.test_key(&api_key).await?;
                Ok(text(format!("Key OK ({})", format_elapsed(reply.elapsed))))
            }
            SlashCommand::Settings => {
                let stored = self.settings.generation();
                let key_state = if self.settings.api_key().is_some() {
                    "set"
                } else {
                    "not set"
                };
                Ok(text(format!(
                    "temperature {} | max tokens {} | API key {key_state}",
                    stored.temperature, stored.max_tokens
                )))
            }
            SlashCommand::Temp(argument) => {
                let Some(value) = argument.parse::<f64>().ok().filter(|v| v.is_finite()) else {
                    return Ok(text("Usage: /temp <0.0-1.0>"));
                };
                let settings = self.settings.set_temperature(value)?;
                Ok(text(format!("Temperature set to {}", settings.temperature)))
            }
            SlashCommand::Tokens(argument) => {
                let Some(value) = argument.parse::<u32>().ok() else {
                    return Ok(text("Usage: /tokens <64-2048>"));
                };
                let settings = self.settings.set_max_tokens(value)?;
                Ok(text(format!("Max tokens set to {}", settings.max_tokens)))
            }
            SlashCommand::Quit => Ok(CommandOutcome::Quit),
            SlashCommand::Unknown(command) => Ok(text(format!("Unknown command: {command}"))),
        }
    }
}

fn text(value: impl Into<String>) -> CommandOutcome {
    CommandOutcome::Text(value.into())
}

/// Windowed messages in the adapter's vocabulary. Only role and text cross
/// this boundary.
fn window_to_turns(window: &[WindowMessage]) -> Vec<ChatTurn> {
    window
        .iter()
        .map(|message| ChatTurn {
            role: match message.role {
                Role::User => TurnRole::User,
                Role::Assistant => TurnRole::Assistant,
            },
            text: message.text.clone(),
        })
        .collect()
}

fn export_file_name(session: &Session) -> String {
    let mut slug = String::new();
    for ch in session.title.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_matches('-');
    let slug = if slug.is_empty() { "session" } else { slug };
    let id_prefix: String = session.id.chars().take(8).collect();
    format!("{slug}-{id_prefix}.json")
}

#[cfg(test)]
mod tests {
    use super::{export_file_name, window_to_turns};
    use gemini_api::TurnRole;
    use session_store::{Role, Session, WindowMessage};

    #[test]
    fn export_file_name_slugs_title_and_id_prefix() {
        let session = Session::new("0f8c2b44-aaaa-bbbb-cccc-121212121212", "My Research: Notes!", 1);
        assert_eq!(export_file_name(&session), "my-research-notes-0f8c2b44.json");
    }

    #[test]
    fn export_file_name_falls_back_for_symbol_only_titles() {
        let session = Session::new("abcd1234", "???", 1);
        assert_eq!(export_file_name(&session), "session-abcd1234.json");
    }

    #[test]
    fn window_turns_translate_roles() {
        let window = vec![
            WindowMessage {
                role: Role::User,
                text: "question".to_string(),
            },
            WindowMessage {
                role: Role::Assistant,
                text: "answer".to_string(),
            },
        ];

        let turns = window_to_turns(&window);
        assert_eq!(turns[0].role, TurnRole::User);
        assert_eq!(turns[1].role, TurnRole::Assistant);
        assert_eq!(turns[1].text, "answer");
    }
}
