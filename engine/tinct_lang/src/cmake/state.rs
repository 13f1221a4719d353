//! CMake line state.
//!
//! Layout, low bits first:
//!
//! | bits | field |
//! |------|-------|
//! | 1 | line is only a comment |
//! | 3 | style the next line resumes in |
//! | 1 | context a variable or generator expression returns to |
//! | 8 | `=` count of the open bracket argument or block comment (wider brackets are not recognised) |
//! | 4 | `${}` nesting depth |
//! | 4 | `$<>` nesting depth |
//! | 2 | pending user-defined command kind |
//! | 1 | line is blank |

use tinct_core::{BitReader, BitWriter, DecodeError, LineFlags, LineState};

use super::CMakeStyle;
use crate::shared::{check_blank, line_flags, resume_index, resume_style};

/// Deepest `${}` or `$<>` nesting the state records.
pub const MAX_DEPTH: u8 = 15;

const RESUME_STYLES: [CMakeStyle; 6] = [
    CMakeStyle::Default,
    CMakeStyle::String,
    CMakeStyle::BlockComment,
    CMakeStyle::BracketArgument,
    CMakeStyle::Variable,
    CMakeStyle::EscapeSequence,
];

/// Where `${}`, `$var` and `$<>` return when they close.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Outer {
    #[default]
    Default,
    String,
}

impl Outer {
    pub fn style(self) -> CMakeStyle {
        match self {
            Outer::Default => CMakeStyle::Default,
            Outer::String => CMakeStyle::String,
        }
    }
}

/// Name kind declared by the last `function(` or `macro(`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum UserDefined {
    #[default]
    None,
    Function,
    Macro,
}

impl UserDefined {
    pub(crate) fn style(self) -> Option<CMakeStyle> {
        match self {
            UserDefined::None => None,
            UserDefined::Function => Some(CMakeStyle::Function),
            UserDefined::Macro => Some(CMakeStyle::Macro),
        }
    }

    fn index(self) -> u32 {
        match self {
            UserDefined::None => 0,
            UserDefined::Function => 1,
            UserDefined::Macro => 2,
        }
    }

    fn from_index(index: u32) -> Result<Self, DecodeError> {
        match index {
            0 => Ok(UserDefined::None),
            1 => Ok(UserDefined::Function),
            2 => Ok(UserDefined::Macro),
            _ => Err(DecodeError("unknown user-defined command kind")),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CMakeState {
    pub flags: LineFlags,
    pub resume: CMakeStyle,
    pub outer: Outer,
    pub bracket: u8,
    pub var_depth: u8,
    pub generator_depth: u8,
    pub user_defined: UserDefined,
}

impl LineState for CMakeState {
    type Style = CMakeStyle;

    fn encode(&self) -> u32 {
        BitWriter::new()
            .put_flag(self.flags.contains(LineFlags::LINE_COMMENT))
            .put(3, resume_index(&RESUME_STYLES, self.resume))
            .put_flag(self.outer == Outer::String)
            .put(8, u32::from(self.bracket))
            .put(4, u32::from(self.var_depth.min(MAX_DEPTH)))
            .put(4, u32::from(self.generator_depth.min(MAX_DEPTH)))
            .put(2, self.user_defined.index())
            .put_flag(self.flags.contains(LineFlags::BLANK))
            .finish()
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "fields are masked to at most eight bits"
    )]
    fn decode(raw: u32) -> Result<Self, DecodeError> {
        let mut reader = BitReader::new(raw);
        let mut flags = LineFlags::empty();
        flags.set(LineFlags::LINE_COMMENT, reader.take_flag());
        let resume = resume_style(&RESUME_STYLES, reader.take(3))?;
        let outer = if reader.take_flag() {
            Outer::String
        } else {
            Outer::Default
        };
        let bracket = reader.take(8) as u8;
        let var_depth = reader.take(4) as u8;
        let generator_depth = reader.take(4) as u8;
        let user_defined = UserDefined::from_index(reader.take(2))?;
        flags.set(LineFlags::BLANK, reader.take_flag());
        reader.finish()?;
        check_blank(flags, resume)?;
        if resume == CMakeStyle::Variable && var_depth == 0 {
            return Err(DecodeError("variable reference without a nesting depth"));
        }
        Ok(Self {
            flags,
            resume,
            outer,
            bracket,
            var_depth,
            generator_depth,
            user_defined,
        })
    }

    fn resume_style(&self) -> CMakeStyle {
        self.resume
    }

    fn flags(&self) -> LineFlags {
        line_flags(self.flags, self.resume)
    }
}
