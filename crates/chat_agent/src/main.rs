use std::io::{self, BufRead, Write};

use chat_agent::app::{App, CommandOutcome};
use chat_agent::commands::parse_slash_command;
use chat_agent::config::{data_dir_from_env, gemini_config_from_env};
use chat_agent::settings::SettingsStore;
use chat_agent::transcript::{format_reply, use_color, DIM, RESET};
use gemini_api::GeminiClient;
use session_store::{FileKvStore, SessionStore};

#[tokio::main]
async fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let data_dir = data_dir_from_env()?;
    let sessions_kv = FileKvStore::open(&data_dir).map_err(io::Error::other)?;
    let settings_kv = FileKvStore::open(&data_dir).map_err(io::Error::other)?;

    let client = GeminiClient::new(gemini_config_from_env()).map_err(io::Error::other)?;
    let model = client.config().model.clone();

    let mut app = App::new(
        SessionStore::new(Box::new(sessions_kv)),
        SettingsStore::new(Box::new(settings_kv)),
        Box::new(client),
    );

    let session = app.startup().map_err(io::Error::other)?;
    let color = use_color();
    println!("palaver ({model}) - \"{}\"", session.title);
    println!("Type /help for commands.");

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = parse_slash_command(line) {
            match app.handle_command(command).await {
                Ok(CommandOutcome::Text(message)) => println!("{message}"),
                Ok(CommandOutcome::Quit) => break,
                Err(error) => eprintln!("error: {error}"),
            }
            continue;
        }

        if color {
            println!("{DIM}...{RESET}");
        } else {
            println!("...");
        }
        match app.send_message(line).await {
            Ok(outcome) => println!("{}", format_reply(&outcome.reply, outcome.elapsed, color)),
            Err(error) => eprintln!("error: {error}"),
        }
    }

    Ok(())
}
