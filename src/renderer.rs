//! Block-level rendering: fence split, list accumulation, paragraph emission.

use crate::inline::parse_inline;
use crate::markup::{Block, Document, Inline};

const FENCE: &str = "```";

/// Render markdown-flavored text into a typed [`Document`].
///
/// Total and deterministic. The input is split on the literal fence delimiter
/// into alternating prose/code segments; the split is purely positional, so an
/// odd number of delimiters leaves the trailing segment a code block.
#[must_use]
pub fn render(text: &str) -> Document {
    let mut blocks = Vec::new();
    for (index, segment) in text.split(FENCE).enumerate() {
        if index % 2 == 1 {
            blocks.push(Block::CodeBlock(trim_code_segment(segment)));
        } else {
            scan_prose(segment, &mut blocks);
        }
    }
    Document::new(blocks)
}

/// Render straight to HTML.
#[must_use]
pub fn render_html(text: &str) -> String {
    render(text).to_html()
}

/// Drop leading and trailing blank lines; interior lines stay verbatim.
fn trim_code_segment(segment: &str) -> String {
    let lines: Vec<&str> = segment.lines().collect();
    let Some(start) = lines.iter().position(|line| !line.trim().is_empty()) else {
        return String::new();
    };
    let end = lines
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .unwrap_or(start);
    lines[start..=end].join("\n")
}

enum OpenList {
    Bullet(Vec<Vec<Inline>>),
    Numbered(Vec<Vec<Inline>>),
}

/// Single left-to-right line scan over a prose segment.
///
/// List lines of one kind accumulate; a line of the other kind, a blank line,
/// a paragraph line, or the end of the segment flushes the open list. Mixed
/// list kinds are never merged.
fn scan_prose(segment: &str, blocks: &mut Vec<Block>) {
    let mut open: Option<OpenList> = None;

    for line in segment.lines() {
        let line = line.trim();
        if line.is_empty() {
            flush_open_list(&mut open, blocks);
            continue;
        }

        if let Some(rest) = bullet_item(line) {
            let item = parse_inline(rest);
            match open.as_mut() {
                Some(OpenList::Bullet(items)) => items.push(item),
                _ => {
                    flush_open_list(&mut open, blocks);
                    open = Some(OpenList::Bullet(vec![item]));
                }
            }
            continue;
        }

        if let Some(rest) = numbered_item(line) {
            let item = parse_inline(rest);
            match open.as_mut() {
                Some(OpenList::Numbered(items)) => items.push(item),
                _ => {
                    flush_open_list(&mut open, blocks);
                    open = Some(OpenList::Numbered(vec![item]));
                }
            }
            continue;
        }

        flush_open_list(&mut open, blocks);
        blocks.push(Block::Paragraph(parse_inline(line)));
    }

    flush_open_list(&mut open, blocks);
}

fn flush_open_list(open: &mut Option<OpenList>, blocks: &mut Vec<Block>) {
    match open.take() {
        Some(OpenList::Bullet(items)) => blocks.push(Block::BulletList(items)),
        Some(OpenList::Numbered(items)) => blocks.push(Block::NumberedList(items)),
        None => {}
    }
}

fn bullet_item(line: &str) -> Option<&str> {
    line.strip_prefix("- ").or_else(|| line.strip_prefix("* "))
}

fn numbered_item(line: &str) -> Option<&str> {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix(". ")
}
