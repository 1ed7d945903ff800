#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Help,
    New(Option<String>),
    Sessions,
    Switch(String),
    Rename(String),
    Delete,
    ClearAll,
    Export(Option<String>),
    Key(String),
    TestKey,
    Settings,
    Temp(String),
    Tokens(String),
    Quit,
    Unknown(String),
}

/// Split a line into a slash command, or `None` when it is a chat message.
/// Argument validation happens at dispatch; parsing itself never fails.
pub fn parse_slash_command(input: &str) -> Option<SlashCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (command, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (trimmed, ""),
    };

    let argument = || rest.to_string();
    let optional_argument = || {
        if rest.is_empty() {
            None
        } else {
            Some(rest.to_string())
        }
    };

    let parsed = match command {
        "/help" => SlashCommand::Help,
        "/new" => SlashCommand::New(optional_argument()),
        "/sessions" => SlashCommand::Sessions,
        "/switch" => SlashCommand::Switch(argument()),
        "/rename" => SlashCommand::Rename(argument()),
        "/delete" => SlashCommand::Delete,
        "/clear-all" => SlashCommand::ClearAll,
        "/export" => SlashCommand::Export(optional_argument()),
        "/key" => SlashCommand::Key(argument()),
        "/testkey" => SlashCommand::TestKey,
        "/settings" => SlashCommand::Settings,
        "/temp" => SlashCommand::Temp(argument()),
        "/tokens" => SlashCommand::Tokens(argument()),
        "/quit" => SlashCommand::Quit,
        _ => SlashCommand::Unknown(command.to_string()),
    };

    Some(parsed)
}
