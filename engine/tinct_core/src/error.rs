//! Host contract violations.
//!
//! Scanning never fails on document content: malformed source has a fixed
//! degraded styling instead. The errors here cover requests a host should
//! never make, such as resuming from a line state no lexer could have
//! written. Accepting those silently would corrupt every later incremental
//! rescan, so they are rejected at the boundary.

use thiserror::Error;

/// A resume request that falls outside the codec or document domain.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvalidState {
    /// A style id that the lexer's style table does not define.
    #[error("{lexer}: unknown style id {id}")]
    UnknownStyle { lexer: &'static str, id: u8 },

    /// A persisted line state that does not decode.
    #[error("{lexer}: line {line} carries undecodable state {value:#010x}: {reason}")]
    LineState {
        lexer: &'static str,
        line: usize,
        value: u32,
        reason: &'static str,
    },

    /// A byte range that does not fit the document.
    #[error("range {start}..{end} is outside the document (length {len})")]
    Range { start: usize, end: usize, len: usize },
}

/// Why a packed value failed to decode.
///
/// Codecs report this without position context; [`InvalidState::LineState`]
/// adds the lexer name and line when the entry points surface it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct DecodeError(pub &'static str);

impl DecodeError {
    pub(crate) fn at(self, lexer: &'static str, line: usize, value: u32) -> InvalidState {
        InvalidState::LineState {
            lexer,
            line,
            value,
            reason: self.0,
        }
    }
}

/// A text edit that cannot be applied to the document.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("edit range {start}..{end} is outside the document (length {len})")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("edit range {start}..{end} is reversed")]
    Reversed { start: usize, end: usize },

    #[error("edit boundary {pos} splits a UTF-8 sequence")]
    NotCharBoundary { pos: usize },

    #[error(transparent)]
    Rescan(#[from] InvalidState),
}
