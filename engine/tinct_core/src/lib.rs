//! Tinct Core - re-entrant lexical scanning and folding engine.
//!
//! This crate provides the language-independent half of a syntax
//! highlighter:
//! - A byte cursor that drives a per-language state machine and paints one
//!   style per byte (`ScanCursor`)
//! - Packed per-line states that let any line be rescanned in isolation
//!   (`LineState`, `BitWriter`, `BitReader`)
//! - Fold level computation from styles and line states (`FoldLevel`,
//!   `FoldUnit`)
//! - An incremental session that keeps a document highlighted across edits
//!   (`Highlighter`)
//!
//! # Architecture
//!
//! A language plugs in by implementing [`Lexer`]. The host owns the text and
//! the published tables ([`Document`]); the [`scan`] and [`fold`] entry
//! points read from it and return buffered output the host applies.
//!
//! Resumption is exact: scanning from line N with line N-1's decoded state
//! produces the same styles and states as scanning the whole document. Every
//! lexer upholds this by persisting or resetting all of its scanner locals
//! at line end.
//!
//! # Modules
//!
//! - [`char_class`]: byte predicates shared by all lexers
//! - [`escape`]: escape-sequence digit budgets
//! - [`nested`]: interpolation stack with a bounded persisted depth

pub mod char_class;
mod document;
mod error;
pub mod escape;
mod fold;
mod keywords;
mod lexer;
mod line_state;
pub mod nested;
mod scan_cursor;
mod session;
mod style;

#[cfg(test)]
mod test_helpers;

pub use document::{Document, DocumentMut, TextDocument};
pub use error::{DecodeError, EditError, InvalidState};
pub use escape::EscapeSequence;
pub use fold::{FoldLevel, FoldOutput, FoldUnit, HEADER_FLAG, MAX_LEVEL};
pub use keywords::{CaseSensitivity, KeywordLists, KeywordSet};
pub use lexer::{decode_line_state, fold, line_span, scan, scan_from, Lexer};
pub use line_state::{BitReader, BitWriter, LineFlags, LineState};
pub use nested::{NestedStack, PackedFrame};
pub use scan_cursor::{ScanCursor, ScanOutput, Word, MAX_DOC_LOOKAHEAD, MAX_WORD_LEN};
pub use session::{Damage, Highlighter, TextEdit};
pub use style::Style;
