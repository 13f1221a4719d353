//! Language plug-in trait and the scan/fold entry points.
//!
//! A language is configuration over the shared engine: a style table, a
//! line-state layout, a state machine driven through [`ScanCursor`], and a
//! mapping from styles to [`FoldUnit`]s. The entry points here do the
//! range bookkeeping common to every language:
//!
//! - ranges are widened to whole lines;
//! - the initial state comes from decoding the previous line's packed
//!   state, so a rescan needs nothing else from earlier text;
//! - output is buffered and returned, never written into the document.

use crate::document::Document;
use crate::error::InvalidState;
use crate::fold::{fold_lines, FoldOutput, FoldUnit};
use crate::keywords::KeywordLists;
use crate::line_state::LineState;
use crate::scan_cursor::{ScanCursor, ScanOutput};
use crate::style::Style;

/// A language's scanner and fold rules.
pub trait Lexer {
    type Style: Style;
    type State: LineState<Style = Self::Style>;

    /// Short lowercase language name.
    const NAME: &'static str;

    /// Run the state machine over the cursor's range.
    ///
    /// The cursor starts in `initial.resume_style()`. Implementations must
    /// call [`ScanCursor::set_line_state`] on every line end they pass.
    fn lex<D: Document + ?Sized>(
        &self,
        sc: &mut ScanCursor<'_, D, Self::Style>,
        initial: &Self::State,
        keywords: &KeywordLists,
    );

    fn fold_unit(&self, style: Self::Style) -> FoldUnit;

    /// Styles the fold pass treats as blank when it looks for a brace on
    /// the next line or the last significant byte of a line. Lexers use the
    /// same set when tracking their previous significant byte.
    fn is_space_equiv(&self, style: Self::Style) -> bool;

    /// Operator style of `{` for brace-on-next-line folding, if the
    /// language folds that way.
    fn brace_style(&self) -> Option<Self::Style> {
        None
    }

    /// Fold delta of a completed [`FoldUnit::Word`] (ASCII-lowercased).
    fn keyword_fold(&self, word: &[u8]) -> i32 {
        let _ = word;
        0
    }
}

/// Widen `start..start + len` to whole lines.
///
/// The start moves back to its line start. The end moves forward to the
/// next line start unless it already is one or is the document end.
pub fn line_span<D: Document + ?Sized>(
    doc: &D,
    start: usize,
    len: usize,
) -> Result<(usize, usize), InvalidState> {
    let doc_len = doc.len();
    let end = start
        .checked_add(len)
        .filter(|&end| end <= doc_len)
        .ok_or(InvalidState::Range {
            start,
            end: start.saturating_add(len),
            len: doc_len,
        })?;
    let span_start = doc.line_start(doc.line_of(start));
    let span_end = if end == doc_len {
        end
    } else {
        let line = doc.line_of(end);
        if doc.line_start(line) == end {
            end
        } else {
            doc.line_start(line + 1)
        }
    };
    Ok((span_start, span_end))
}

/// Decode the packed state of `line`.
pub fn decode_line_state<L: Lexer, D: Document + ?Sized>(
    doc: &D,
    line: usize,
) -> Result<L::State, InvalidState> {
    let raw = doc.line_state(line);
    L::State::decode(raw).map_err(|err| err.at(L::NAME, line, raw))
}

/// Style `start..start + len`, widened to whole lines, resuming from the
/// state published for the line before.
#[tracing::instrument(level = "debug", skip_all, fields(lexer = L::NAME, start = start, len = len))]
pub fn scan<L: Lexer, D: Document + ?Sized>(
    lexer: &L,
    doc: &D,
    start: usize,
    len: usize,
    keywords: &KeywordLists,
) -> Result<ScanOutput, InvalidState> {
    let (start, end) = line_span(doc, start, len)?;
    let line = doc.line_of(start);
    let initial = if line == 0 {
        L::State::default()
    } else {
        decode_line_state::<L, D>(doc, line - 1)?
    };
    Ok(run_scan(lexer, doc, start, end, &initial, keywords))
}

/// Style `start..start + len`, widened to whole lines, from an explicit
/// initial state.
#[tracing::instrument(level = "debug", skip_all, fields(lexer = L::NAME, start = start, len = len))]
pub fn scan_from<L: Lexer, D: Document + ?Sized>(
    lexer: &L,
    doc: &D,
    start: usize,
    len: usize,
    initial: &L::State,
    keywords: &KeywordLists,
) -> Result<ScanOutput, InvalidState> {
    let (start, end) = line_span(doc, start, len)?;
    Ok(run_scan(lexer, doc, start, end, initial, keywords))
}

fn run_scan<L: Lexer, D: Document + ?Sized>(
    lexer: &L,
    doc: &D,
    start: usize,
    end: usize,
    initial: &L::State,
    keywords: &KeywordLists,
) -> ScanOutput {
    let mut sc = ScanCursor::new(doc, start, end - start, initial.resume_style());
    lexer.lex(&mut sc, initial, keywords);
    let mut out = sc.complete();
    if end == doc.len() {
        // A trailing empty line is never visited; it holds the default state.
        let lines = doc.line_count() - out.first_line;
        if out.line_states.len() < lines {
            out.line_states.resize(lines, L::State::default().encode());
        }
    }
    tracing::debug!(
        bytes = out.styles.len(),
        lines = out.line_states.len(),
        "scan complete"
    );
    out
}

/// Fold levels for the lines overlapping `start..start + len`.
#[tracing::instrument(level = "debug", skip_all, fields(lexer = L::NAME, start = start, len = len))]
pub fn fold<L: Lexer, D: Document + ?Sized>(
    lexer: &L,
    doc: &D,
    start: usize,
    len: usize,
) -> Result<FoldOutput, InvalidState> {
    let (start, end) = line_span(doc, start, len)?;
    let first_line = doc.line_of(start);
    let end_line = if end == doc.len() {
        doc.line_count()
    } else {
        doc.line_of(end)
    };
    let levels = fold_lines(lexer, doc, first_line, end_line)?;
    tracing::debug!(lines = levels.len(), "fold complete");
    Ok(FoldOutput { first_line, levels })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
