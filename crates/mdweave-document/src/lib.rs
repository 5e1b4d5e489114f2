//! Backend-independent document model for mdweave.
//!
//! This crate turns raw markdown text into an ordered sequence of [`Block`]s
//! that the DOCX and Google Docs emitters consume:
//! - [`parse`]: line-based block parser (headings, paragraphs, fences,
//!   tables, lists, dividers)
//! - [`format_inline`]: inline style scanner producing [`InlineRun`]s
//!
//! Parsing never fails. Malformed constructs degrade to the nearest
//! well-defined interpretation: short table rows are padded, unterminated
//! fences consume the rest of the input, unmatched style delimiters stay in
//! the text as literal characters.
//!
//! # Example
//!
//! ```
//! use mdweave_document::{parse, Block};
//!
//! let blocks = parse("# Title\n\nHello **world**\n");
//! assert_eq!(blocks.len(), 2);
//! assert!(matches!(blocks[0], Block::Heading { level: 1, .. }));
//! ```

mod block;
mod inline;
mod parser;

pub use block::{Block, Image, InlineRun, ListItem};
pub use inline::format_inline;
pub use parser::parse;
