use std::time::Duration;

use palaver::render;
use session_store::Session;

pub const DIM: &str = "\x1b[2m";
pub const RESET: &str = "\x1b[0m";

/// Whether transcript output may use ANSI styling. `NO_COLOR` (any value)
/// disables it, per the informal convention.
#[must_use]
pub fn use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

/// Render an assistant reply for the terminal: markdown parsed into the
/// markup tree, projected to plain text, with a timing line underneath.
#[must_use]
pub fn format_reply(markdown: &str, elapsed: Duration, color: bool) -> String {
    let rendered = render(markdown).to_plain_text();
    let body = rendered.trim_end_matches('\n');
    let timing = format!("({})", format_elapsed(elapsed));
    if color {
        format!("{body}\n{DIM}{timing}{RESET}")
    } else {
        format!("{body}\n{timing}")
    }
}

/// Sub-second durations in milliseconds, longer ones in tenths of seconds.
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    if millis < 1_000 {
        format!("{millis}ms")
    } else {
        format!("{:.1}s", elapsed.as_secs_f64())
    }
}

/// Numbered session listing with the active session marked.
#[must_use]
pub fn format_session_list(sessions: &[Session], active_id: Option<&str>) -> String {
    let mut out = String::new();
    for (index, session) in sessions.iter().enumerate() {
        let marker = if active_id == Some(session.id.as_str()) {
            '*'
        } else {
            ' '
        };
        let count = session.messages.len();
        let noun = if count == 1 { "message" } else { "messages" };
        out.push_str(&format!(
            "{:>2}. {marker} {} ({count} {noun})\n",
            index + 1,
            session.title
        ));
    }
    if out.ends_with('\n') {
        out.pop();
    }
    out
}
