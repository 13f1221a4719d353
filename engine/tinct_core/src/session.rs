//! Incremental highlighting session.
//!
//! [`Highlighter`] plays the host's part for one document: it applies
//! edits, decides which lines to rescan, and keeps styles, line states and
//! fold levels published.
//!
//! # Invalidation
//!
//! After an edit the scan restarts at the first line whose content, or
//! whose next-non-blank lookahead, reaches into the edit. It continues in
//! growing chunks until the last rescanned line ends with the same packed
//! state and last style it had before the edit. Every later line would
//! rescan to identical output from there.
//!
//! Folding restarts one line earlier, because a line's end level depends
//! on the line after it. It continues past the rescanned lines until a
//! line's level is unchanged.

use std::ops::Range;

use crate::char_class::is_space_char;
use crate::document::{Document, TextDocument};
use crate::error::{EditError, InvalidState};
use crate::fold::FoldLevel;
use crate::keywords::KeywordLists;
use crate::lexer::{fold, scan, Lexer};

/// A replacement of `start..end` with `text`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TextEdit {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl TextEdit {
    pub fn replace(range: Range<usize>, text: impl Into<String>) -> Self {
        TextEdit {
            start: range.start,
            end: range.end,
            text: text.into(),
        }
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        TextEdit {
            start: at,
            end: at,
            text: text.into(),
        }
    }

    pub fn delete(range: Range<usize>) -> Self {
        TextEdit {
            start: range.start,
            end: range.end,
            text: String::new(),
        }
    }

    pub fn is_insert(&self) -> bool {
        self.start == self.end && !self.text.is_empty()
    }

    pub fn is_delete(&self) -> bool {
        self.text.is_empty() && self.start != self.end
    }

    /// Length change this edit causes. Positive means the text grows.
    pub fn length_delta(&self) -> i64 {
        let removed = i64::try_from(self.end.saturating_sub(self.start)).unwrap_or(i64::MAX);
        let added = i64::try_from(self.text.len()).unwrap_or(i64::MAX);
        added - removed
    }
}

/// Lines an edit touched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Damage {
    /// Lines whose styles and states were recomputed.
    pub scanned: Range<usize>,
    /// Lines whose fold levels were recomputed.
    pub folded: Range<usize>,
}

/// One document kept highlighted across edits.
pub struct Highlighter<L: Lexer> {
    lexer: L,
    keywords: KeywordLists,
    doc: TextDocument,
}

impl<L: Lexer> Highlighter<L> {
    /// Scan and fold `text` in full.
    pub fn new(lexer: L, keywords: KeywordLists, text: impl Into<String>) -> Result<Self, InvalidState> {
        let mut session = Self {
            lexer,
            keywords,
            doc: TextDocument::new(text),
        };
        session.rehighlight()?;
        Ok(session)
    }

    pub fn lexer(&self) -> &L {
        &self.lexer
    }

    pub fn document(&self) -> &TextDocument {
        &self.doc
    }

    pub fn text(&self) -> &str {
        self.doc.text()
    }

    pub fn styles(&self) -> &[u8] {
        self.doc.styles()
    }

    pub fn line_states(&self) -> &[u32] {
        self.doc.line_states()
    }

    pub fn levels(&self) -> &[FoldLevel] {
        self.doc.levels()
    }

    /// Swap the keyword dictionaries and rehighlight everything.
    pub fn set_keywords(&mut self, keywords: KeywordLists) -> Result<(), InvalidState> {
        self.keywords = keywords;
        self.rehighlight()
    }

    fn rehighlight(&mut self) -> Result<(), InvalidState> {
        let len = self.doc.len();
        scan(&self.lexer, &self.doc, 0, len, &self.keywords)?.apply(&mut self.doc);
        fold(&self.lexer, &self.doc, 0, len)?.apply(&mut self.doc);
        Ok(())
    }

    /// Apply `edit` and bring the published tables up to date.
    #[tracing::instrument(level = "debug", skip_all, fields(start = edit.start, end = edit.end))]
    pub fn edit(&mut self, edit: &TextEdit) -> Result<Damage, EditError> {
        let changed = self.doc.replace(edit.start, edit.end, &edit.text)?;
        let first = changed.min(self.lookahead_origin(edit.start));
        let dirty_end = self.doc.line_of(edit.start + edit.text.len());

        let scanned = self.rescan(first, dirty_end)?;
        let folded = self.refold(first.saturating_sub(1), scanned.end)?;
        tracing::debug!(?scanned, ?folded, "edit applied");
        Ok(Damage { scanned, folded })
    }

    /// Line of the last non-blank byte before `pos`. Lexers may look past
    /// blanks and newlines for their next significant byte, so that line's
    /// styles can depend on text at `pos`.
    fn lookahead_origin(&self, pos: usize) -> usize {
        let mut pos = pos;
        while pos > 0 && is_space_char(self.doc.byte_at(pos - 1)) {
            pos -= 1;
        }
        if pos == 0 {
            0
        } else {
            self.doc.line_of(pos - 1)
        }
    }

    /// What the line after `line` resumes from.
    fn line_end(&self, line: usize) -> (u32, Option<u8>) {
        let start = self.doc.line_start(line);
        let end = self.doc.line_start(line + 1);
        let last_style = (end > start).then(|| self.doc.style_at(end - 1));
        (self.doc.line_state(line), last_style)
    }

    fn rescan(&mut self, first: usize, dirty_end: usize) -> Result<Range<usize>, InvalidState> {
        let line_count = self.doc.line_count();
        let mut from = first;
        let mut to = dirty_end.max(first);
        let mut chunk = 1;
        loop {
            let before = self.line_end(to);
            let start = self.doc.line_start(from);
            let end = self.doc.line_start(to + 1);
            scan(&self.lexer, &self.doc, start, end - start, &self.keywords)?.apply(&mut self.doc);
            if to + 1 >= line_count || self.line_end(to) == before {
                return Ok(first..to + 1);
            }
            from = to + 1;
            to = (to + chunk).min(line_count - 1);
            chunk *= 2;
        }
    }

    fn refold(&mut self, first: usize, scanned_end: usize) -> Result<Range<usize>, InvalidState> {
        let line_count = self.doc.line_count();
        let mut from = first;
        let mut to = scanned_end.min(line_count - 1);
        let mut chunk = 1;
        loop {
            let before = self.doc.level_at(to);
            let start = self.doc.line_start(from);
            let end = self.doc.line_start(to + 1);
            fold(&self.lexer, &self.doc, start, end - start)?.apply(&mut self.doc);
            if to + 1 >= line_count || (to >= scanned_end && self.doc.level_at(to) == before) {
                return Ok(first..to + 1);
            }
            from = to + 1;
            to = (to + chunk).min(line_count - 1);
            chunk *= 2;
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
