use serde::{Deserialize, Serialize};

/// System policy sent with every generation request. Fixed at build time,
/// never user-editable.
pub const SYSTEM_INSTRUCTION: &str = "Answer in the language the user writes in. \
     Be accurate and direct; when you are not sure about something, say so \
     instead of presenting a guess as fact.";

/// Request-build bounds for `maxOutputTokens`. Wider than the settings-level
/// range on purpose; both clamps apply independently.
pub const MIN_OUTPUT_TOKENS: u32 = 1;
pub const MAX_OUTPUT_TOKENS: u32 = 2048;

/// Author of one conversation turn, in the adapter's own vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    User,
    Assistant,
}

impl TurnRole {
    /// Role string expected by the wire protocol.
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "model",
        }
    }
}

/// One windowed conversation turn handed to the adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            text: text.into(),
        }
    }
}

/// Per-call generation parameters. The caller may hand over out-of-range
/// values; request building clamps them.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub api_key: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            temperature: 0.7,
            max_tokens: 1024,
        }
    }
}

/// Canonical request payload shape for the `generateContent` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub system_instruction: Content,
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    /// Translate windowed turns into the wire shape: system policy first,
    /// then one content entry per non-empty turn, then clamped parameters.
    pub fn new(turns: &[ChatTurn], temperature: f64, max_tokens: u32) -> Self {
        Self {
            system_instruction: Content::unattributed(SYSTEM_INSTRUCTION),
            contents: turns
                .iter()
                .filter(|turn| !turn.text.is_empty())
                .map(|turn| Content::attributed(turn.role.wire_name(), &turn.text))
                .collect(),
            generation_config: GenerationConfig {
                temperature: clamp_temperature(temperature),
                max_output_tokens: clamp_max_tokens(max_tokens),
            },
        }
    }
}

/// One role-attributed block of message parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    fn attributed(role: &str, text: &str) -> Self {
        Self {
            role: Some(role.to_string()),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }

    /// System instructions carry no role field.
    fn unattributed(text: &str) -> Self {
        Self {
            role: None,
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub max_output_tokens: u32,
}

pub(crate) fn clamp_temperature(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

pub(crate) fn clamp_max_tokens(value: u32) -> u32 {
    value.clamp(MIN_OUTPUT_TOKENS, MAX_OUTPUT_TOKENS)
}

#[cfg(test)]
mod tests {
    use super::{clamp_max_tokens, clamp_temperature, ChatTurn, GenerateContentRequest};

    #[test]
    fn temperature_clamps_to_unit_interval() {
        assert_eq!(clamp_temperature(-0.5), 0.0);
        assert_eq!(clamp_temperature(0.4), 0.4);
        assert_eq!(clamp_temperature(7.0), 1.0);
    }

    #[test]
    fn max_tokens_clamp_is_wider_than_settings_range() {
        assert_eq!(clamp_max_tokens(0), 1);
        assert_eq!(clamp_max_tokens(63), 63);
        assert_eq!(clamp_max_tokens(5_000), 2048);
    }

    #[test]
    fn empty_turns_are_dropped_from_contents() {
        let turns = [
            ChatTurn::user("hello"),
            ChatTurn::assistant(""),
            ChatTurn::user("still there?"),
        ];

        let request = GenerateContentRequest::new(&turns, 0.7, 1024);
        assert_eq!(request.contents.len(), 2);
        assert_eq!(request.contents[0].parts[0].text, "hello");
        assert_eq!(request.contents[1].parts[0].text, "still there?");
    }
}
