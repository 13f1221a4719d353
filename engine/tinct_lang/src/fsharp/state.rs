//! F# line state.
//!
//! Layout, low bits first:
//!
//! | bits | field |
//! |------|-------|
//! | 1 | line is only a line comment |
//! | 4 | style the next line resumes in |
//! | 4 | `(* *)` nesting level |
//! | 3 | `$` count of the open interpolated string |
//! | 3 + 2×8 | interpolation stack, innermost two frames |
//! | 1 | line is blank |

use tinct_core::{BitReader, BitWriter, DecodeError, LineFlags, LineState, NestedStack, PackedFrame};

use super::FSharpStyle;
use crate::shared::{check_blank, line_flags, resume_index, resume_style};

/// Deepest `(* *)` nesting the state records.
pub const MAX_COMMENT_LEVEL: u8 = 15;

/// Largest `$` count (and `{`/`}` run) an interpolated string records.
pub const MAX_INTERPOLATORS: u8 = 7;

/// Largest open `(`/`[` count inside one interpolation.
pub const MAX_BALANCE: u8 = 7;

/// Interpolation frames persisted per line.
pub const MAX_FRAMES: usize = 2;

const RESUME_STYLES: [FSharpStyle; 10] = [
    FSharpStyle::Default,
    FSharpStyle::Comment,
    FSharpStyle::String,
    FSharpStyle::InterpolatedString,
    FSharpStyle::VerbatimString,
    FSharpStyle::InterpolatedVerbatimString,
    FSharpStyle::TripleString,
    FSharpStyle::InterpolatedTripleString,
    FSharpStyle::Quotation,
    FSharpStyle::Backtick,
];

const _: () = assert!(
    1 + 4 + 4 + 3 + NestedStack::<FSharpFrame>::packed_bits(MAX_FRAMES) + 1 <= 32,
    "F# line state overflows u32"
);

/// An open interpolation: the string it returns to, the brackets opened
/// inside it, and the `$` count of that string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FSharpFrame {
    pub outer: FSharpStyle,
    pub balance: u8,
    pub interpolators: u8,
}

impl FSharpFrame {
    /// Frame for an interpolation opened inside `outer`.
    pub fn new(outer: FSharpStyle, interpolators: u8) -> Self {
        Self {
            outer,
            balance: 0,
            interpolators: interpolators.min(MAX_INTERPOLATORS),
        }
    }

    /// Count a bracket opened or closed inside the interpolation.
    pub fn bracket(&mut self, ch: u8) {
        match ch {
            b'(' | b'[' => self.balance = (self.balance + 1).min(MAX_BALANCE),
            b')' | b']' => self.balance = self.balance.saturating_sub(1),
            _ => {}
        }
    }
}

impl PackedFrame for FSharpFrame {
    const BITS: u32 = 8;

    fn pack(self) -> u32 {
        let outer = match self.outer {
            FSharpStyle::InterpolatedVerbatimString => 1,
            FSharpStyle::InterpolatedTripleString => 2,
            _ => 0,
        };
        BitWriter::new()
            .put(2, outer)
            .put(3, u32::from(self.balance.min(MAX_BALANCE)))
            .put(3, u32::from(self.interpolators.min(MAX_INTERPOLATORS)))
            .finish()
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "fields are three bits wide"
    )]
    fn unpack(bits: u32) -> Option<Self> {
        let mut reader = BitReader::new(bits);
        let outer = match reader.take(2) {
            0 => FSharpStyle::InterpolatedString,
            1 => FSharpStyle::InterpolatedVerbatimString,
            2 => FSharpStyle::InterpolatedTripleString,
            _ => return None,
        };
        let balance = reader.take(3) as u8;
        let interpolators = reader.take(3) as u8;
        if interpolators == 0 {
            return None;
        }
        Some(Self {
            outer,
            balance,
            interpolators,
        })
    }
}

/// Everything an F# scan carries from one line to the next.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FSharpState {
    pub flags: LineFlags,
    pub resume: FSharpStyle,
    pub comment_level: u8,
    /// `$` count of the interpolated string being scanned, zero outside one.
    pub interpolators: u8,
    pub nested: NestedStack<FSharpFrame>,
}

impl LineState for FSharpState {
    type Style = FSharpStyle;

    fn encode(&self) -> u32 {
        let writer = BitWriter::new()
            .put_flag(self.flags.contains(LineFlags::LINE_COMMENT))
            .put(4, resume_index(&RESUME_STYLES, self.resume))
            .put(4, u32::from(self.comment_level.min(MAX_COMMENT_LEVEL)))
            .put(3, u32::from(self.interpolators.min(MAX_INTERPOLATORS)));
        self.nested
            .write(writer, MAX_FRAMES)
            .put_flag(self.flags.contains(LineFlags::BLANK))
            .finish()
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "fields are at most four bits wide"
    )]
    fn decode(raw: u32) -> Result<Self, DecodeError> {
        let mut reader = BitReader::new(raw);
        let mut flags = LineFlags::empty();
        flags.set(LineFlags::LINE_COMMENT, reader.take_flag());
        let resume = resume_style(&RESUME_STYLES, reader.take(4))?;
        let comment_level = reader.take(4) as u8;
        let interpolators = reader.take(3) as u8;
        let nested = NestedStack::read(&mut reader, MAX_FRAMES)?;
        flags.set(LineFlags::BLANK, reader.take_flag());
        reader.finish()?;
        check_blank(flags, resume)?;

        if (resume == FSharpStyle::Comment) != (comment_level > 0) {
            return Err(DecodeError("comment level outside a comment"));
        }
        let expected = match resume {
            FSharpStyle::InterpolatedString | FSharpStyle::InterpolatedVerbatimString => 1..=1,
            FSharpStyle::InterpolatedTripleString => 1..=MAX_INTERPOLATORS,
            _ => 0..=0,
        };
        if !expected.contains(&interpolators) {
            return Err(DecodeError("interpolator count does not match the string"));
        }
        Ok(Self {
            flags,
            resume,
            comment_level,
            interpolators,
            nested,
        })
    }

    fn resume_style(&self) -> FSharpStyle {
        self.resume
    }

    fn flags(&self) -> LineFlags {
        line_flags(self.flags, self.resume)
    }
}
