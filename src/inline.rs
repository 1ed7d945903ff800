//! Inline formatting pass.
//!
//! One left-to-right scan over a single line. At each position the leading
//! character selects the only candidate construct (backtick → code span,
//! `[` → link, `**` → bold); the leftmost complete construct wins and its
//! content is consumed whole, so code-span content is never bold-processed
//! and link labels are taken verbatim. Unpaired delimiters stay literal text.

use crate::markup::Inline;

/// Parse one line of prose into inline spans.
///
/// Total: any input yields a span sequence, degrading to a single
/// [`Inline::Text`] when no construct matches.
#[must_use]
pub fn parse_inline(text: &str) -> Vec<Inline> {
    let mut spans = Vec::new();
    let mut literal = String::new();
    let mut i = 0;

    while i < text.len() {
        let rest = &text[i..];

        if rest.starts_with('`') {
            if let Some((code, consumed)) = match_code_span(rest) {
                flush_literal(&mut spans, &mut literal);
                spans.push(code);
                i += consumed;
                continue;
            }
        } else if rest.starts_with('[') {
            if let Some((link, consumed)) = match_link(rest) {
                flush_literal(&mut spans, &mut literal);
                spans.push(link);
                i += consumed;
                continue;
            }
        } else if rest.starts_with("**") {
            if let Some((strong, consumed)) = match_strong(rest) {
                flush_literal(&mut spans, &mut literal);
                spans.push(strong);
                i += consumed;
                continue;
            }
        }

        let Some(ch) = rest.chars().next() else {
            break;
        };
        literal.push(ch);
        i += ch.len_utf8();
    }

    flush_literal(&mut spans, &mut literal);
    spans
}

fn flush_literal(spans: &mut Vec<Inline>, literal: &mut String) {
    if !literal.is_empty() {
        spans.push(Inline::Text(std::mem::take(literal)));
    }
}

/// `rest` starts with a backtick. A span needs a closing backtick and at least
/// one character of content.
fn match_code_span(rest: &str) -> Option<(Inline, usize)> {
    let end = rest[1..].find('`')?;
    if end == 0 {
        return None;
    }
    Some((Inline::Code(rest[1..1 + end].to_string()), end + 2))
}

/// `rest` starts with `**`. Bold needs a closing `**` and non-empty content.
fn match_strong(rest: &str) -> Option<(Inline, usize)> {
    let end = rest[2..].find("**")?;
    if end == 0 {
        return None;
    }
    Some((Inline::Strong(rest[2..2 + end].to_string()), end + 4))
}

/// `rest` starts with `[`. Link syntax is `[label](url)` where the label holds
/// no `]` and the url is a whitespace-free `http://`/`https://` target; any
/// other scheme leaves the source literal.
fn match_link(rest: &str) -> Option<(Inline, usize)> {
    let close = rest.find(']')?;
    if !rest[close + 1..].starts_with('(') {
        return None;
    }
    let label = &rest[1..close];
    let after = &rest[close + 2..];
    let end = after.find(')')?;
    let href = &after[..end];
    if !(href.starts_with("http://") || href.starts_with("https://")) {
        return None;
    }
    if href.contains(char::is_whitespace) {
        return None;
    }

    Some((
        Inline::Link {
            label: label.to_string(),
            href: href.to_string(),
        },
        close + 2 + end + 1,
    ))
}
