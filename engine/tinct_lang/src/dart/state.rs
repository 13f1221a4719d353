//! Dart line state.
//!
//! Layout, low bits first:
//!
//! | bits | field |
//! |------|-------|
//! | 1 | line is only a line comment |
//! | 1 | line is an `import`/`part` directive |
//! | 6 | block comment nesting level |
//! | 3 | style the next line resumes in |
//! | 3 + 4×3 | interpolation stack, innermost four frames |
//! | 4 | class of the previous significant byte |
//! | 1 | line is blank |

use tinct_core::{BitReader, BitWriter, DecodeError, LineFlags, LineState, NestedStack, PackedFrame};

use super::DartStyle;
use crate::shared::{check_blank, line_flags, resume_index, resume_style, PrevChar};

/// Deepest block comment nesting the state records.
pub const MAX_COMMENT_LEVEL: u8 = 63;

/// Interpolation frames persisted per line.
pub const MAX_FRAMES: usize = 4;

/// Styles a line can end in that the next line continues.
const RESUME_STYLES: [DartStyle; 7] = [
    DartStyle::Default,
    DartStyle::CommentBlock,
    DartStyle::CommentBlockDoc,
    DartStyle::TripleStringSq,
    DartStyle::TripleStringDq,
    DartStyle::TripleRawStringSq,
    DartStyle::TripleRawStringDq,
];

/// What an interpolation returns to when its closing `}` is reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DartFrame {
    /// A plain `{` opened inside an interpolation.
    Code,
    StringSq,
    StringDq,
    TripleStringSq,
    TripleStringDq,
}

impl DartFrame {
    /// Frame for an interpolation opened inside `style`.
    pub fn enclosing(style: DartStyle) -> Self {
        match style {
            DartStyle::StringSq => DartFrame::StringSq,
            DartStyle::StringDq => DartFrame::StringDq,
            DartStyle::TripleStringSq => DartFrame::TripleStringSq,
            DartStyle::TripleStringDq => DartFrame::TripleStringDq,
            _ => DartFrame::Code,
        }
    }

    /// Style scanning returns to when the frame is popped.
    pub fn style(self) -> DartStyle {
        match self {
            DartFrame::Code => DartStyle::Default,
            DartFrame::StringSq => DartStyle::StringSq,
            DartFrame::StringDq => DartStyle::StringDq,
            DartFrame::TripleStringSq => DartStyle::TripleStringSq,
            DartFrame::TripleStringDq => DartStyle::TripleStringDq,
        }
    }
}

impl PackedFrame for DartFrame {
    const BITS: u32 = 3;

    fn pack(self) -> u32 {
        match self {
            DartFrame::Code => 0,
            DartFrame::StringSq => 1,
            DartFrame::StringDq => 2,
            DartFrame::TripleStringSq => 3,
            DartFrame::TripleStringDq => 4,
        }
    }

    fn unpack(bits: u32) -> Option<Self> {
        Some(match bits {
            0 => DartFrame::Code,
            1 => DartFrame::StringSq,
            2 => DartFrame::StringDq,
            3 => DartFrame::TripleStringSq,
            4 => DartFrame::TripleStringDq,
            _ => return None,
        })
    }
}

/// Everything a Dart scan carries from one line to the next.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DartState {
    pub flags: LineFlags,
    pub comment_level: u8,
    pub resume: DartStyle,
    pub nested: NestedStack<DartFrame>,
    pub(crate) prev: PrevChar,
}

impl LineState for DartState {
    type Style = DartStyle;

    fn encode(&self) -> u32 {
        let writer = BitWriter::new()
            .put_flag(self.flags.contains(LineFlags::LINE_COMMENT))
            .put_flag(self.flags.contains(LineFlags::IMPORT))
            .put(6, u32::from(self.comment_level.min(MAX_COMMENT_LEVEL)))
            .put(3, resume_index(&RESUME_STYLES, self.resume));
        self.nested
            .write(writer, MAX_FRAMES)
            .put(PrevChar::BITS, self.prev.index())
            .put_flag(self.flags.contains(LineFlags::BLANK))
            .finish()
    }

    fn decode(raw: u32) -> Result<Self, DecodeError> {
        let mut reader = BitReader::new(raw);
        let mut flags = LineFlags::empty();
        flags.set(LineFlags::LINE_COMMENT, reader.take_flag());
        flags.set(LineFlags::IMPORT, reader.take_flag());
        let comment_level = u8::try_from(reader.take(6)).unwrap_or(MAX_COMMENT_LEVEL);
        let resume = resume_style(&RESUME_STYLES, reader.take(3))?;
        if matches!(resume, DartStyle::CommentBlock | DartStyle::CommentBlockDoc) && comment_level == 0 {
            return Err(DecodeError("block comment without a nesting level"));
        }
        let nested = NestedStack::read(&mut reader, MAX_FRAMES)?;
        let prev = PrevChar::from_index(reader.take(PrevChar::BITS))?;
        flags.set(LineFlags::BLANK, reader.take_flag());
        reader.finish()?;
        check_blank(flags, resume)?;
        Ok(Self {
            flags,
            comment_level,
            resume,
            nested,
            prev,
        })
    }

    fn resume_style(&self) -> DartStyle {
        self.resume
    }

    fn flags(&self) -> LineFlags {
        line_flags(self.flags, self.resume)
    }
}
