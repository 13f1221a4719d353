//! Read/write access to the host document.
//!
//! The engine never owns document memory. Lexers read through
//! [`Document`], which answers positional queries the way a
//! sentinel-terminated buffer would: reading past the end yields `0`
//! instead of failing, so one byte of lookahead never needs a bounds check
//! in lexer code. Results flow back through [`DocumentMut`] only when the
//! host publishes a finished [`ScanOutput`](crate::ScanOutput) or
//! [`FoldOutput`](crate::FoldOutput).
//!
//! [`TextDocument`] is the in-memory implementation used by the
//! [`Highlighter`](crate::Highlighter) session, the CLI and the tests.

use crate::error::EditError;
use crate::fold::FoldLevel;

/// Positional queries a lexer may make.
///
/// Lines are separated by `\n`; a `\r` before it belongs to the line it
/// ends. A document always has at least one line, and a trailing `\n`
/// opens a final empty line.
pub trait Document {
    /// Byte length of the text.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Byte at `pos`, or `0` at and past the end.
    fn byte_at(&self, pos: usize) -> u8;

    /// Number of lines (at least 1).
    fn line_count(&self) -> usize;

    /// Line containing `pos`. Positions past the end map to the last line.
    fn line_of(&self, pos: usize) -> usize;

    /// Offset of the first byte of `line`, or [`Document::len`] for lines
    /// past the last one.
    fn line_start(&self, line: usize) -> usize;

    /// Style id previously published for the byte at `pos` (0 past the end).
    fn style_at(&self, pos: usize) -> u8;

    /// Packed state published for `line` (0 for lines never scanned).
    fn line_state(&self, line: usize) -> u32;

    /// Fold level published for `line`.
    fn level_at(&self, line: usize) -> FoldLevel;
}

/// Publication side of the host document.
pub trait DocumentMut: Document {
    fn set_styles(&mut self, start: usize, styles: &[u8]);

    fn set_line_state(&mut self, line: usize, state: u32);

    fn set_level(&mut self, line: usize, level: FoldLevel);
}

/// Owned text plus the per-byte and per-line tables a host keeps for it.
#[derive(Clone, Debug)]
pub struct TextDocument {
    text: String,
    /// Offset of every line start; `line_starts[0] == 0`.
    line_starts: Vec<usize>,
    styles: Vec<u8>,
    line_states: Vec<u32>,
    levels: Vec<FoldLevel>,
}

impl TextDocument {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0];
        line_starts.extend(memchr::memchr_iter(b'\n', text.as_bytes()).map(|i| i + 1));
        let lines = line_starts.len();
        Self {
            styles: vec![0; text.len()],
            line_states: vec![0; lines],
            levels: vec![FoldLevel::BASE; lines],
            text,
            line_starts,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text of `line` including its terminator.
    pub fn line_text(&self, line: usize) -> &str {
        let start = self.line_start(line);
        let end = self.line_start(line + 1);
        self.text.get(start..end).unwrap_or_default()
    }

    pub fn styles(&self) -> &[u8] {
        &self.styles
    }

    pub fn line_states(&self) -> &[u32] {
        &self.line_states
    }

    pub fn levels(&self) -> &[FoldLevel] {
        &self.levels
    }

    /// Replace `start..end` with `new_text`.
    ///
    /// Styles of the new text are reset to 0. In the per-line tables, the
    /// line holding the end of the edit keeps the entry of the old line that
    /// held it, so a rescan can tell whether that line's end state changed.
    /// Lines before it in the edited region get zeroed entries. Returns the
    /// first line whose content changed.
    pub fn replace(&mut self, start: usize, end: usize, new_text: &str) -> Result<usize, EditError> {
        let len = self.text.len();
        if start > end {
            return Err(EditError::Reversed { start, end });
        }
        if end > len {
            return Err(EditError::OutOfBounds { start, end, len });
        }
        for pos in [start, end] {
            if !self.text.is_char_boundary(pos) {
                return Err(EditError::NotCharBoundary { pos });
            }
        }

        let first = self.line_of(start);
        let last = self.line_of(end);

        self.text.replace_range(start..end, new_text);
        drop(
            self.styles
                .splice(start..end, std::iter::repeat(0).take(new_text.len())),
        );

        let inserted: Vec<usize> = memchr::memchr_iter(b'\n', new_text.as_bytes())
            .map(|i| start + i + 1)
            .collect();
        let added = inserted.len();
        let tail: Vec<usize> = self.line_starts[last + 1..]
            .iter()
            .map(|&s| s - end + start + new_text.len())
            .collect();
        self.line_starts.truncate(first + 1);
        self.line_starts.extend(inserted);
        self.line_starts.extend(tail);

        drop(
            self.line_states
                .splice(first..last, std::iter::repeat(0).take(added)),
        );
        drop(
            self.levels
                .splice(first..last, std::iter::repeat(FoldLevel::BASE).take(added)),
        );

        debug_assert_eq!(self.line_starts.len(), self.line_states.len());
        debug_assert_eq!(self.line_starts.len(), self.levels.len());
        Ok(first)
    }
}

impl Document for TextDocument {
    #[inline]
    fn len(&self) -> usize {
        self.text.len()
    }

    #[inline]
    fn byte_at(&self, pos: usize) -> u8 {
        self.text.as_bytes().get(pos).copied().unwrap_or(0)
    }

    #[inline]
    fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    fn line_of(&self, pos: usize) -> usize {
        // Number of line starts <= pos, minus the line itself.
        self.line_starts.partition_point(|&s| s <= pos) - 1
    }

    #[inline]
    fn line_start(&self, line: usize) -> usize {
        self.line_starts.get(line).copied().unwrap_or(self.text.len())
    }

    #[inline]
    fn style_at(&self, pos: usize) -> u8 {
        self.styles.get(pos).copied().unwrap_or(0)
    }

    #[inline]
    fn line_state(&self, line: usize) -> u32 {
        self.line_states.get(line).copied().unwrap_or(0)
    }

    #[inline]
    fn level_at(&self, line: usize) -> FoldLevel {
        self.levels.get(line).copied().unwrap_or(FoldLevel::BASE)
    }
}

impl DocumentMut for TextDocument {
    fn set_styles(&mut self, start: usize, styles: &[u8]) {
        let end = (start + styles.len()).min(self.styles.len());
        if start < end {
            self.styles[start..end].copy_from_slice(&styles[..end - start]);
        }
    }

    fn set_line_state(&mut self, line: usize, state: u32) {
        if let Some(slot) = self.line_states.get_mut(line) {
            *slot = state;
        }
    }

    fn set_level(&mut self, line: usize, level: FoldLevel) {
        if let Some(slot) = self.levels.get_mut(line) {
            *slot = level;
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
