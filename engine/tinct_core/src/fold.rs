//! Fold levels derived from the published style stream.
//!
//! The fold pass never rescans text. It walks the styles a scan pass
//! already published, line by line, keeping one running level:
//!
//! - styles a language maps to [`FoldUnit::Span`] count +1 where a run of
//!   the span begins and -1 where it ends, so a multi-line comment or string
//!   folds as one unit;
//! - [`FoldUnit::Paired`] styles count their open/close delimiters, which
//!   keeps nested block comments balanced;
//! - [`FoldUnit::Brackets`] styles count opening and closing bytes;
//! - [`FoldUnit::Word`] styles collect the word and apply the language's
//!   keyword delta at its last byte.
//!
//! Languages whose fold words depend on context (a word after `end`, a
//! declaration without a body) compute that delta while scanning and
//! publish it in the line state; [`LineState::fold_delta`] is added at the
//! line end.
//!
//! At each line end, a line flagged as a pure line comment (or import)
//! instead moves by the difference between its neighbours' flags, so a run
//! of such lines folds as one block. Otherwise a lone opening brace on the
//! next line continuing the statement is counted on this line and skipped
//! on its own. The level is then clamped to `0..=MAX_LEVEL`.
//!
//! Both line-end rules only read the line and its neighbours, so folding
//! may start at any line whose predecessor already has a level.

use smallvec::SmallVec;

use crate::char_class::{is_space_char, is_space_or_tab};
use crate::document::{Document, DocumentMut};
use crate::error::InvalidState;
use crate::lexer::Lexer;
use crate::line_state::{LineFlags, LineState};
use crate::style::Style;

/// Largest level the packed form represents.
pub const MAX_LEVEL: u16 = 0x1FFF;

/// Header bit in the packed form.
pub const HEADER_FLAG: u32 = 0x2000;

/// Longest fold keyword a language can match.
const MAX_FOLD_WORD: usize = 16;

/// Nesting depth at the start and end of a line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FoldLevel {
    pub start: u16,
    pub end: u16,
}

impl FoldLevel {
    pub const BASE: Self = Self { start: 0, end: 0 };

    pub const fn new(start: u16, end: u16) -> Self {
        Self { start, end }
    }

    /// A header line opens a collapsible block.
    #[inline]
    pub const fn is_header(self) -> bool {
        self.start < self.end
    }

    /// Classic host layout: start in the low word, end in the high word,
    /// [`HEADER_FLAG`] in the low word for headers.
    pub fn pack(self) -> u32 {
        let start = u32::from(self.start.min(MAX_LEVEL));
        let end = u32::from(self.end.min(MAX_LEVEL));
        let header = if self.is_header() { HEADER_FLAG } else { 0 };
        start | header | (end << 16)
    }

    /// Inverse of [`FoldLevel::pack`]; the header bit is recomputed.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "both fields are masked to 13 bits"
    )]
    pub fn unpack(raw: u32) -> Self {
        let mask = u32::from(MAX_LEVEL);
        Self {
            start: (raw & mask) as u16,
            end: ((raw >> 16) & mask) as u16,
        }
    }
}

/// How one style contributes to folding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FoldUnit {
    Ignore,
    /// Runs of styles sharing a group fold as one unit.
    Span(u8),
    /// Delimiter pairs inside the style open and close one level each.
    Paired { open: [u8; 2], close: [u8; 2] },
    /// Operator bytes that open or close a level.
    Brackets {
        open: &'static [u8],
        close: &'static [u8],
    },
    /// Keyword text whose fold delta the language decides.
    Word,
}

/// Fold levels for a run of lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FoldOutput {
    pub first_line: usize,
    pub levels: Vec<FoldLevel>,
}

impl FoldOutput {
    pub fn apply<D: DocumentMut + ?Sized>(&self, doc: &mut D) {
        for (offset, &level) in self.levels.iter().enumerate() {
            doc.set_level(self.first_line + offset, level);
        }
    }
}

// ─── Fold walk ──────────────────────────────────────────────────────────

/// Assign levels to `first_line..end_line`.
///
/// The walk starts from the end level published for `first_line - 1`.
pub(crate) fn fold_lines<L: Lexer, D: Document + ?Sized>(
    lexer: &L,
    doc: &D,
    first_line: usize,
    end_line: usize,
) -> Result<Vec<FoldLevel>, InvalidState> {
    let walk = FoldWalk { lexer, doc };
    let mut levels = Vec::with_capacity(end_line.saturating_sub(first_line));
    let mut level_next = 0i32;
    let mut prev_flags = LineFlags::empty();
    let mut pos = doc.line_start(first_line);

    if first_line > 0 {
        level_next = i32::from(doc.level_at(first_line - 1).end);
        prev_flags = walk.flags(first_line - 1)?;
        if let Some(brace) = walk.brace_on_next_line(first_line - 1, prev_flags)? {
            pos = brace + 1;
        }
    }
    let mut cur_flags = walk.flags(first_line)?;
    let mut word: SmallVec<[u8; MAX_FOLD_WORD]> = SmallVec::new();

    for line in first_line..end_line {
        let level_start = level_next;
        let line_end = doc.line_start(line + 1);

        while pos < line_end {
            let ch = doc.byte_at(pos);
            let style = walk.style(pos)?;
            match lexer.fold_unit(style) {
                FoldUnit::Ignore => {}
                unit @ FoldUnit::Span(_) => {
                    let prev = if pos == 0 {
                        L::Style::DEFAULT
                    } else {
                        walk.style(pos - 1)?
                    };
                    if lexer.fold_unit(prev) != unit {
                        level_next += 1;
                    }
                    // Not `else`: a one-byte run opens and closes here.
                    if lexer.fold_unit(walk.style(pos + 1)?) != unit {
                        level_next -= 1;
                    }
                }
                FoldUnit::Paired { open, close } => {
                    let pair = [ch, doc.byte_at(pos + 1)];
                    if pair == open {
                        level_next += 1;
                        pos += 1;
                    } else if pair == close {
                        level_next -= 1;
                        pos += 1;
                    }
                }
                FoldUnit::Brackets { open, close } => {
                    if open.contains(&ch) {
                        level_next += 1;
                    } else if close.contains(&ch) {
                        level_next -= 1;
                    }
                }
                FoldUnit::Word => {
                    if word.len() < MAX_FOLD_WORD {
                        word.push(ch.to_ascii_lowercase());
                    }
                    if lexer.fold_unit(walk.style(pos + 1)?) != FoldUnit::Word {
                        level_next += lexer.keyword_fold(&word);
                        word.clear();
                    }
                }
            }
            pos += 1;
        }

        level_next += walk.state(line)?.fold_delta();
        let next_flags = walk.flags(line + 1)?;
        if cur_flags.contains(LineFlags::LINE_COMMENT) {
            level_next += flag_delta(prev_flags, next_flags, LineFlags::LINE_COMMENT);
        } else if cur_flags.contains(LineFlags::IMPORT) {
            level_next += flag_delta(prev_flags, next_flags, LineFlags::IMPORT);
        } else if let Some(brace) = walk.brace_on_next_line(line, cur_flags)? {
            level_next += 1;
            pos = brace + 1;
        }
        level_next = level_next.clamp(0, i32::from(MAX_LEVEL));

        levels.push(FoldLevel::new(to_level(level_start), to_level(level_next)));
        prev_flags = cur_flags;
        cur_flags = next_flags;
    }
    Ok(levels)
}

fn flag_delta(prev: LineFlags, next: LineFlags, flag: LineFlags) -> i32 {
    i32::from(next.contains(flag)) - i32::from(prev.contains(flag))
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "levels are clamped to 0..=MAX_LEVEL before conversion"
)]
fn to_level(level: i32) -> u16 {
    level.clamp(0, i32::from(MAX_LEVEL)) as u16
}

/// Document reads with style and line-state validation.
struct FoldWalk<'a, L, D: ?Sized> {
    lexer: &'a L,
    doc: &'a D,
}

impl<L: Lexer, D: Document + ?Sized> FoldWalk<'_, L, D> {
    fn style(&self, pos: usize) -> Result<L::Style, InvalidState> {
        let id = self.doc.style_at(pos);
        L::Style::from_id(id).ok_or(InvalidState::UnknownStyle { lexer: L::NAME, id })
    }

    fn state(&self, line: usize) -> Result<L::State, InvalidState> {
        let raw = self.doc.line_state(line);
        L::State::decode(raw).map_err(|err| err.at(L::NAME, line, raw))
    }

    /// Flags of `line`; lines past the end have none.
    fn flags(&self, line: usize) -> Result<LineFlags, InvalidState> {
        if line >= self.doc.line_count() {
            return Ok(LineFlags::empty());
        }
        Ok(self.state(line)?.flags())
    }

    fn is_blank(&self, pos: usize) -> Result<bool, InvalidState> {
        Ok(is_space_char(self.doc.byte_at(pos)) || self.lexer.is_space_equiv(self.style(pos)?))
    }

    /// Position of a lone `{` opening the line after `line` when `line`
    /// ends mid-statement.
    ///
    /// The brace must be the first non-blank byte of the next line, be
    /// styled as the language's brace operator, and be followed only by
    /// blanks or comments. The last significant byte of `line` must not be
    /// one of `; { } ,`, which end a statement or a list item.
    fn brace_on_next_line(
        &self,
        line: usize,
        flags: LineFlags,
    ) -> Result<Option<usize>, InvalidState> {
        let Some(brace_style) = self.lexer.brace_style() else {
            return Ok(None);
        };
        if flags.intersects(LineFlags::LINE_COMMENT | LineFlags::IMPORT) {
            return Ok(None);
        }
        let doc = self.doc;
        let next_start = doc.line_start(line + 1);
        let next_end = doc.line_start(line + 2);

        let mut brace = next_start;
        while brace < next_end && is_space_or_tab(doc.byte_at(brace)) {
            brace += 1;
        }
        if brace >= next_end || doc.byte_at(brace) != b'{' || self.style(brace)? != brace_style {
            return Ok(None);
        }
        for pos in brace + 1..next_end {
            if !self.is_blank(pos)? {
                return Ok(None);
            }
        }

        let mut last = next_start;
        while last > doc.line_start(line) {
            last -= 1;
            if !self.is_blank(last)? {
                return Ok(match doc.byte_at(last) {
                    b';' | b'{' | b'}' | b',' => None,
                    _ => Some(brace),
                });
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
