//! Deterministic markdown-to-markup rendering for chat transcripts.
//!
//! Invariant: rendering is total. Every input yields a [`Document`], and every
//! piece of source text is HTML-escaped exactly once at serialization.
//!
//! # Public API Overview
//! - Parse generated text with [`render`] into a typed [`Document`] tree.
//! - Serialize with [`Document::to_html`] or the lossy
//!   [`Document::to_plain_text`] terminal projection.
//! - Inspect structure through [`Block`] and [`Inline`] for custom projections;
//!   [`parse_inline`] exposes the inline pass on its own for single lines.

mod inline;
mod markup;
mod renderer;

pub use inline::parse_inline;
pub use markup::{escape_html, Block, Document, Inline};
pub use renderer::{render, render_html};
