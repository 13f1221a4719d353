//! Forward-only styling cursor.
//!
//! The cursor walks a line-aligned byte range of a [`Document`] exactly
//! once. At every step it exposes the current byte with one byte of
//! lookbehind and lookahead, the line-boundary flags, and the current
//! scan state. Lexers drive it with three primitives:
//!
//! - [`ScanCursor::set_state`] closes the current token: every byte from
//!   the token start up to (not including) the current position is painted
//!   with the state being left, and a new token starts here.
//! - [`ScanCursor::change_state`] relabels the current token without
//!   closing it (an identifier turning out to be a keyword).
//! - [`ScanCursor::forward`] steps one byte.
//!
//! # Lookaround
//!
//! Lookahead beyond `ch_next` is explicit ([`ScanCursor::relative`],
//! [`ScanCursor::line_next_char`], [`ScanCursor::doc_next_char`]). The
//! only lookbehind is `ch_prev`. Anything else a lexer needs from earlier
//! lines must travel in the previous line's packed state, which is what
//! makes restarting at any line boundary equivalent to a full scan.
//!
//! # Output
//!
//! Styles and line states are buffered locally. [`ScanCursor::complete`]
//! hands them over as a [`ScanOutput`] the host can publish or drop.

use crate::char_class::{is_identifier_char, is_space_char, is_upper_case};
use crate::document::{Document, DocumentMut};
use crate::style::Style;

/// Longest token text [`ScanCursor::current_text`] captures.
pub const MAX_WORD_LEN: usize = 64;

/// Furthest [`ScanCursor::doc_next_char`] looks past the current byte.
pub const MAX_DOC_LOOKAHEAD: usize = 1024;

/// Words a comment may flag as a task marker.
const TASK_MARKERS: [&[u8]; 6] = [b"TODO", b"FIXME", b"XXX", b"HACK", b"NOTE", b"BUG"];

/// Styles and line states produced by one scan pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanOutput {
    /// Document offset of `styles[0]`.
    pub start: usize,
    /// One style id per byte of the scanned range.
    pub styles: Vec<u8>,
    /// Line of `line_states[0]`.
    pub first_line: usize,
    /// Packed state of every line that ended inside the range.
    pub line_states: Vec<u32>,
}

impl ScanOutput {
    /// Exclusive end offset of the styled range.
    pub fn end(&self) -> usize {
        self.start + self.styles.len()
    }

    /// Publish styles and line states into the host document.
    pub fn apply<D: DocumentMut + ?Sized>(&self, doc: &mut D) {
        doc.set_styles(self.start, &self.styles);
        for (offset, &state) in self.line_states.iter().enumerate() {
            doc.set_line_state(self.first_line + offset, state);
        }
    }
}

/// Captured token text, truncated to [`MAX_WORD_LEN`] bytes.
#[derive(Clone, Copy)]
pub struct Word {
    buf: [u8; MAX_WORD_LEN],
    len: usize,
}

impl Word {
    /// The captured text. A UTF-8 sequence cut by truncation is dropped.
    pub fn as_str(&self) -> &str {
        let bytes = &self.buf[..self.len];
        match std::str::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => std::str::from_utf8(&bytes[..err.valid_up_to()]).unwrap_or_default(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl std::fmt::Debug for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Word({:?})", self.as_str())
    }
}

impl PartialEq<&str> for Word {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

/// Cursor over a line-aligned range of a document.
pub struct ScanCursor<'d, D: Document + ?Sized, S: Style> {
    doc: &'d D,
    /// First byte of the range.
    start: usize,
    /// Exclusive end of the range.
    end: usize,
    pos: usize,
    line: usize,
    line_start_next: usize,
    /// First byte of the token being built.
    token_start: usize,
    state: S,
    ch: u8,
    ch_prev: u8,
    ch_next: u8,
    at_line_start: bool,
    at_line_end: bool,
    styles: Vec<u8>,
    first_line: usize,
    line_states: Vec<u32>,
}

impl<'d, D: Document + ?Sized, S: Style> ScanCursor<'d, D, S> {
    /// Position the cursor at `start` in `initial` state.
    ///
    /// `start` is expected to be a line start and `start + len` a line
    /// start or the document end; the entry points in [`crate::lexer`]
    /// guarantee both.
    pub fn new(doc: &'d D, start: usize, len: usize, initial: S) -> Self {
        let end = (start + len).min(doc.len());
        let line = doc.line_of(start);
        let line_start_next = doc.line_start(line + 1);
        let ch_prev = if start == 0 { 0 } else { doc.byte_at(start - 1) };
        Self {
            doc,
            start,
            end,
            pos: start,
            line,
            line_start_next,
            token_start: start,
            state: initial,
            ch: doc.byte_at(start),
            ch_prev,
            ch_next: doc.byte_at(start + 1),
            at_line_start: doc.line_start(line) == start,
            at_line_end: start + 1 >= line_start_next,
            styles: Vec::with_capacity(end.saturating_sub(start)),
            first_line: line,
            line_states: Vec::new(),
        }
    }

    // ─── Position ───────────────────────────────────────────────────────

    #[inline]
    pub fn more(&self) -> bool {
        self.pos < self.end
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn current_line(&self) -> usize {
        self.line
    }

    #[inline]
    pub fn ch(&self) -> u8 {
        self.ch
    }

    #[inline]
    pub fn ch_prev(&self) -> u8 {
        self.ch_prev
    }

    #[inline]
    pub fn ch_next(&self) -> u8 {
        self.ch_next
    }

    /// `true` on the first byte of a line.
    #[inline]
    pub fn at_line_start(&self) -> bool {
        self.at_line_start
    }

    /// `true` on the last byte of a line (its `\n`, or the final byte of
    /// an unterminated last line).
    #[inline]
    pub fn at_line_end(&self) -> bool {
        self.at_line_end
    }

    /// Step one byte. Past the range end the cursor reads spaces.
    ///
    /// Stepping off the last byte of an unterminated final line stays on
    /// that line with [`ScanCursor::at_line_end`] still set, so a token that
    /// closes on the final byte still reaches the lexer's line-end hook.
    pub fn forward(&mut self) {
        if self.pos < self.end {
            self.at_line_start = self.ch == b'\n';
            if self.at_line_start {
                self.line += 1;
                self.line_start_next = self.doc.line_start(self.line + 1);
            }
            self.ch_prev = self.ch;
            self.pos += 1;
            self.ch = self.ch_next;
            self.ch_next = self.doc.byte_at(self.pos + 1);
            self.at_line_end = self.pos + 1 >= self.line_start_next;
        } else {
            self.at_line_start = false;
            self.ch_prev = b' ';
            self.ch = b' ';
            self.ch_next = b' ';
            self.at_line_end = true;
        }
    }

    pub fn forward_by(&mut self, n: usize) {
        for _ in 0..n {
            self.forward();
        }
    }

    // ─── State ──────────────────────────────────────────────────────────

    #[inline]
    pub fn state(&self) -> S {
        self.state
    }

    /// Close the current token in the current state and start a new token
    /// in `state` at the current position.
    pub fn set_state(&mut self, state: S) {
        self.paint_to(self.pos);
        self.state = state;
    }

    pub fn forward_set_state(&mut self, state: S) {
        self.forward();
        self.set_state(state);
    }

    /// Relabel the token being built.
    #[inline]
    pub fn change_state(&mut self, state: S) {
        self.state = state;
    }

    fn paint_to(&mut self, pos: usize) {
        let pos = pos.min(self.end);
        if pos > self.token_start {
            let id = self.state.id();
            self.styles
                .extend(std::iter::repeat(id).take(pos - self.token_start));
            self.token_start = pos;
        }
    }

    // ─── Lookahead ──────────────────────────────────────────────────────

    /// Byte `n` positions ahead (0 is the current byte).
    #[inline]
    pub fn relative(&self, n: usize) -> u8 {
        match n {
            0 => self.ch,
            1 => self.ch_next,
            _ => self.doc.byte_at(self.pos + n),
        }
    }

    #[inline]
    pub fn char_after_next(&self) -> u8 {
        self.relative(2)
    }

    #[inline]
    pub fn matches(&self, a: u8, b: u8) -> bool {
        self.ch == a && self.ch_next == b
    }

    #[inline]
    pub fn matches3(&self, a: u8, b: u8, c: u8) -> bool {
        self.ch == a && self.ch_next == b && self.relative(2) == c
    }

    /// The next two bytes repeat the current one (`'''`, `"""`).
    #[inline]
    pub fn match_next(&self) -> bool {
        self.ch_next == self.ch && self.relative(2) == self.ch
    }

    /// The next two bytes are `a` then `b`.
    #[inline]
    pub fn match_next2(&self, a: u8, b: u8) -> bool {
        self.ch_next == a && self.relative(2) == b
    }

    /// Next non-blank byte on the current line, or `0` if the rest of the
    /// line is blank. Starts at the current byte unless `skip_current`.
    pub fn line_next_char(&self, skip_current: bool) -> u8 {
        let from = self.pos + usize::from(skip_current);
        (from..self.line_start_next)
            .map(|pos| self.doc.byte_at(pos))
            .find(|&ch| !is_space_char(ch))
            .unwrap_or(0)
    }

    /// Next non-blank byte ahead in the document, or `0` when none is found
    /// within [`MAX_DOC_LOOKAHEAD`] bytes.
    pub fn doc_next_char(&self, skip_current: bool) -> u8 {
        let from = self.pos + usize::from(skip_current);
        let to = self.doc.len().min(from.saturating_add(MAX_DOC_LOOKAHEAD));
        (from..to)
            .map(|pos| self.doc.byte_at(pos))
            .find(|&ch| !is_space_char(ch))
            .unwrap_or(0)
    }

    /// Count of consecutive `delim` bytes starting at the current byte and
    /// ending on the current line.
    pub fn matched_delimiter_count(&self, delim: u8) -> usize {
        (self.pos..self.line_start_next)
            .take_while(|&pos| self.doc.byte_at(pos) == delim)
            .count()
    }

    /// Length of a task marker word (`TODO`, `FIXME`, ...) starting here,
    /// or 0. The word must not touch identifier bytes on either side and
    /// must end before the line's last byte, so stepping over it never
    /// skips a line end.
    pub fn task_marker_len(&self) -> usize {
        if !is_upper_case(self.ch) || is_identifier_char(self.ch_prev) {
            return 0;
        }
        let len = (self.pos..self.line_start_next)
            .take_while(|&pos| is_upper_case(self.doc.byte_at(pos)))
            .count();
        if self.pos + len + 1 > self.line_start_next
            || is_identifier_char(self.doc.byte_at(self.pos + len))
        {
            return 0;
        }
        let word = (0..len).map(|i| self.doc.byte_at(self.pos + i));
        if TASK_MARKERS
            .iter()
            .any(|marker| marker.len() == len && word.clone().eq(marker.iter().copied()))
        {
            len
        } else {
            0
        }
    }

    // ─── Token text ─────────────────────────────────────────────────────

    /// Bytes in the token being built.
    #[inline]
    pub fn length_current(&self) -> usize {
        self.pos - self.token_start
    }

    /// Text of the token being built.
    pub fn current_text(&self) -> Word {
        self.capture(false)
    }

    /// ASCII-lowercased text of the token being built.
    pub fn current_lowered(&self) -> Word {
        self.capture(true)
    }

    fn capture(&self, lower: bool) -> Word {
        let len = self.length_current().min(MAX_WORD_LEN);
        let mut buf = [0u8; MAX_WORD_LEN];
        for (i, slot) in buf.iter_mut().take(len).enumerate() {
            let ch = self.doc.byte_at(self.token_start + i);
            *slot = if lower { ch.to_ascii_lowercase() } else { ch };
        }
        Word { buf, len }
    }

    // ─── Line state ─────────────────────────────────────────────────────

    /// Record the packed state of the current line.
    pub fn set_line_state(&mut self, value: u32) {
        let index = self.line - self.first_line;
        if self.line_states.len() <= index {
            self.line_states.resize(index + 1, 0);
        }
        self.line_states[index] = value;
    }

    /// Paint the final token and hand over the buffered output.
    pub fn complete(mut self) -> ScanOutput {
        self.paint_to(self.end);
        let expected = self.end.saturating_sub(self.start);
        if self.styles.len() < expected {
            // A lexer that stopped early leaves the tail in the final state.
            self.styles.resize(expected, self.state.id());
        }
        ScanOutput {
            start: self.start,
            styles: self.styles,
            first_line: self.first_line,
            line_states: self.line_states,
        }
    }
}
