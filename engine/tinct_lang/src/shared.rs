//! Pieces every lexer in this crate uses.

use tinct_core::char_class::{is_jump_label_prev_char, is_space_char};
use tinct_core::{DecodeError, Document, LineFlags, ScanCursor, Style};

/// What the main loop does after a state handler ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    /// Go on to token-start dispatch and advance.
    Next,
    /// Handle the current byte again in the new state.
    Repeat,
}

/// Paint a task marker word inside a comment.
///
/// On `true` the cursor sits after the marker, back in the comment state,
/// and the caller repeats its loop iteration there.
pub(crate) fn highlight_task_marker<D: Document + ?Sized, S: Style>(
    sc: &mut ScanCursor<'_, D, S>,
    marker: S,
) -> bool {
    let len = sc.task_marker_len();
    if len == 0 {
        return false;
    }
    let comment = sc.state();
    sc.set_state(marker);
    sc.forward_by(len);
    sc.set_state(comment);
    true
}

/// The previous significant byte, reduced to the classes lexers compare
/// against so it fits in a line state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub(crate) enum PrevChar {
    /// Start of document.
    #[default]
    None,
    Comma,
    LeftBrace,
    LeftParen,
    Semicolon,
    RightBrace,
    RightBracket,
    Dot,
    Less,
    /// Any identifier byte.
    Word,
    Other,
}

impl PrevChar {
    pub(crate) const BITS: u32 = 4;

    const ALL: [PrevChar; 11] = [
        PrevChar::None,
        PrevChar::Comma,
        PrevChar::LeftBrace,
        PrevChar::LeftParen,
        PrevChar::Semicolon,
        PrevChar::RightBrace,
        PrevChar::RightBracket,
        PrevChar::Dot,
        PrevChar::Less,
        PrevChar::Word,
        PrevChar::Other,
    ];

    /// Class of a non-blank byte; `is_word` is the language's identifier
    /// byte predicate.
    pub(crate) fn classify(ch: u8, is_word: fn(u8) -> bool) -> Self {
        match ch {
            b',' => PrevChar::Comma,
            b'{' => PrevChar::LeftBrace,
            b'(' => PrevChar::LeftParen,
            b';' => PrevChar::Semicolon,
            b'}' => PrevChar::RightBrace,
            b']' => PrevChar::RightBracket,
            b'.' => PrevChar::Dot,
            b'<' => PrevChar::Less,
            _ if is_space_char(ch) => PrevChar::None,
            _ if is_word(ch) => PrevChar::Word,
            _ => PrevChar::Other,
        }
    }

    /// `identifier:` after this reads as a jump label.
    pub(crate) fn starts_label(self) -> bool {
        let ch = match self {
            PrevChar::None => 0,
            PrevChar::Semicolon => b';',
            PrevChar::LeftBrace => b'{',
            PrevChar::RightBrace => b'}',
            _ => return false,
        };
        is_jump_label_prev_char(ch)
    }

    /// An identifier or `]` before a name followed by `(` makes the name
    /// a definition (`type name(`, `type[] name(`).
    pub(crate) fn ends_type(self) -> bool {
        matches!(self, PrevChar::Word | PrevChar::RightBracket)
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "eleven variants fit in four bits"
    )]
    pub(crate) fn index(self) -> u32 {
        Self::ALL
            .iter()
            .position(|&class| class == self)
            .unwrap_or_default() as u32
    }

    pub(crate) fn from_index(index: u32) -> Result<Self, DecodeError> {
        usize::try_from(index)
            .ok()
            .and_then(|index| Self::ALL.get(index))
            .copied()
            .ok_or(DecodeError("unknown previous-character class"))
    }
}

/// Position of `style` in a language's table of styles a line may end in.
#[allow(
    clippy::cast_possible_truncation,
    reason = "resume tables hold a few styles"
)]
pub(crate) fn resume_index<S: Style>(table: &[S], style: S) -> u32 {
    table
        .iter()
        .position(|&candidate| candidate == style)
        .unwrap_or_default() as u32
}

/// Inverse of [`resume_index`].
pub(crate) fn resume_style<S: Style>(table: &[S], index: u32) -> Result<S, DecodeError> {
    usize::try_from(index)
        .ok()
        .and_then(|index| table.get(index))
        .copied()
        .ok_or(DecodeError("unknown resume style"))
}

/// Stored flags plus [`LineFlags::MULTILINE`] when the next line resumes
/// inside a construct.
pub(crate) fn line_flags<S: Style>(stored: LineFlags, resume: S) -> LineFlags {
    if resume == S::DEFAULT {
        stored
    } else {
        stored | LineFlags::MULTILINE
    }
}

/// [`LineFlags::BLANK`] for a line with no visible byte that ends at top
/// level.
pub(crate) fn blank_flag<S: Style>(visible: usize, resume: S) -> LineFlags {
    if visible == 0 && resume == S::DEFAULT {
        LineFlags::BLANK
    } else {
        LineFlags::empty()
    }
}

/// Rejects a blank line that also claims content.
pub(crate) fn check_blank<S: Style>(flags: LineFlags, resume: S) -> Result<(), DecodeError> {
    let content = LineFlags::LINE_COMMENT | LineFlags::IMPORT;
    if flags.contains(LineFlags::BLANK) && (resume != S::DEFAULT || flags.intersects(content)) {
        return Err(DecodeError("blank line with content"));
    }
    Ok(())
}
