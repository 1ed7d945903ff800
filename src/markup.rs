//! Typed markup model produced by the renderer.
//!
//! A [`Document`] is an ordered sequence of [`Block`]s; paragraph and list-item
//! content is a sequence of [`Inline`] spans. Text is stored raw and escaped
//! exactly once at serialization time.

use std::fmt::Write as _;

/// A contiguous inline span within a paragraph or list item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// Plain text, escaped on serialization.
    Text(String),
    /// Bold text delimited by `**...**` in the source. Content is literal text.
    Strong(String),
    /// Inline code delimited by single backticks. Content is never re-parsed.
    Code(String),
    /// Link produced from `[label](url)` syntax; only `http`/`https` URLs qualify.
    Link { label: String, href: String },
}

/// A block-level node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Vec<Inline>),
    /// Fenced code content, verbatim apart from stripped boundary blank lines.
    CodeBlock(String),
    BulletList(Vec<Vec<Inline>>),
    NumberedList(Vec<Vec<Inline>>),
}

/// Ordered block sequence produced by [`render`](crate::render).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    #[must_use]
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Serialize to HTML. Every text fragment passes through [`escape_html`]
    /// exactly once; anchors open a new browsing context without leaking an
    /// opener or referrer.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for block in &self.blocks {
            match block {
                Block::Paragraph(spans) => {
                    html.push_str("<p>");
                    push_spans_html(&mut html, spans);
                    html.push_str("</p>");
                }
                Block::CodeBlock(code) => {
                    html.push_str("<pre><code>");
                    html.push_str(&escape_html(code));
                    html.push_str("</code></pre>");
                }
                Block::BulletList(items) => push_list_html(&mut html, "ul", items),
                Block::NumberedList(items) => push_list_html(&mut html, "ol", items),
            }
        }
        html
    }

    /// Lossy terminal-friendly projection: bullets become `• `, numbered items
    /// are renumbered from 1, code blocks are indented, inline markup collapses
    /// to plain text with backticks kept around code.
    #[must_use]
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            if !out.is_empty() {
                out.push('\n');
            }
            match block {
                Block::Paragraph(spans) => {
                    out.push_str(&spans_plain(spans));
                    out.push('\n');
                }
                Block::CodeBlock(code) => {
                    for line in code.lines() {
                        out.push_str("    ");
                        out.push_str(line);
                        out.push('\n');
                    }
                }
                Block::BulletList(items) => {
                    for item in items {
                        out.push_str("  • ");
                        out.push_str(&spans_plain(item));
                        out.push('\n');
                    }
                }
                Block::NumberedList(items) => {
                    for (index, item) in items.iter().enumerate() {
                        let _ = writeln!(out, "  {}. {}", index + 1, spans_plain(item));
                    }
                }
            }
        }
        out
    }
}

/// Escape the five HTML-reserved characters: `& < > " '`.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn push_list_html(html: &mut String, tag: &str, items: &[Vec<Inline>]) {
    let _ = write!(html, "<{tag}>");
    for item in items {
        html.push_str("<li>");
        push_spans_html(html, item);
        html.push_str("</li>");
    }
    let _ = write!(html, "</{tag}>");
}

fn push_spans_html(html: &mut String, spans: &[Inline]) {
    for span in spans {
        match span {
            Inline::Text(text) => html.push_str(&escape_html(text)),
            Inline::Strong(text) => {
                html.push_str("<strong>");
                html.push_str(&escape_html(text));
                html.push_str("</strong>");
            }
            Inline::Code(code) => {
                html.push_str("<code>");
                html.push_str(&escape_html(code));
                html.push_str("</code>");
            }
            Inline::Link { label, href } => {
                let _ = write!(
                    html,
                    "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
                    escape_html(href),
                    escape_html(label)
                );
            }
        }
    }
}

fn spans_plain(spans: &[Inline]) -> String {
    let mut out = String::new();
    for span in spans {
        match span {
            Inline::Text(text) | Inline::Strong(text) => out.push_str(text),
            Inline::Code(code) => {
                out.push('`');
                out.push_str(code);
                out.push('`');
            }
            Inline::Link { label, href } => {
                let _ = write!(out, "{label} ({href})");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{escape_html, Block, Document, Inline};

    #[test]
    fn escape_html_covers_all_five_reserved_characters() {
        assert_eq!(
            escape_html(r#"&<>"'"#),
            "&amp;&lt;&gt;&quot;&#39;".to_string()
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn empty_document_serializes_to_empty_string() {
        let document = Document::default();
        assert!(document.is_empty());
        assert_eq!(document.to_html(), "");
        assert_eq!(document.to_plain_text(), "");
    }

    #[test]
    fn link_serialization_opens_new_context_without_opener() {
        let document = Document::new(vec![Block::Paragraph(vec![Inline::Link {
            label: "docs".to_string(),
            href: "https://example.com/a?b=1&c=2".to_string(),
        }])]);

        assert_eq!(
            document.to_html(),
            "<p><a href=\"https://example.com/a?b=1&amp;c=2\" target=\"_blank\" \
             rel=\"noopener noreferrer\">docs</a></p>"
        );
    }

    #[test]
    fn plain_text_renumbers_ordered_items() {
        let item = |text: &str| vec![Inline::Text(text.to_string())];
        let document = Document::new(vec![Block::NumberedList(vec![item("one"), item("two")])]);

        assert_eq!(document.to_plain_text(), "  1. one\n  2. two\n");
    }
}
