//! PowerShell.
//!
//! Words may contain `-` (`Get-ChildItem`) and any non-ASCII byte. All
//! keyword lists are matched case-insensitively.
//!
//! # Keyword lists
//!
//! 0. keywords, 1. cmdlets, 2. aliases, 3. functions, 4. user words.

use tinct_core::char_class::{is_ascii_digit, is_number_start, is_operator, is_space_char};
use tinct_core::{
    BitReader, BitWriter, CaseSensitivity, DecodeError, Document, FoldUnit, KeywordLists, Lexer,
    LineFlags, LineState, ScanCursor,
};

use crate::shared::{
    blank_flag, check_blank, highlight_task_marker, line_flags, resume_index, resume_style, Flow,
};

tinct_core::style_table! {
    pub enum PowerShellStyle {
        Default = "default",
        Comment = "comment",
        CommentStream = "comment_stream",
        TaskMarker = "task_marker",
        Operator = "operator",
        Number = "number",
        Variable = "variable",
        Identifier = "identifier",
        Keyword = "keyword",
        Cmdlet = "cmdlet",
        Alias = "alias",
        Function = "function",
        User1 = "user1",
        StringDq = "string_dq",
        StringSq = "string_sq",
    }
}

/// Default keyword lists, in list order.
pub const DEFAULT_KEYWORDS: [&str; 5] = [
    "begin break catch class continue data do dynamicparam else elseif end enum exit filter \
     finally for foreach from function hidden if in param process return static switch throw \
     trap try until using while",
    "add-content clear-host copy-item foreach-object get-childitem get-command get-content \
     get-date get-help get-item get-location get-member get-process import-module invoke-command \
     invoke-expression invoke-webrequest move-item new-item new-object out-file out-null \
     remove-item select-object select-string set-content set-item set-location sort-object \
     start-process test-path where-object write-error write-host write-output write-verbose \
     write-warning",
    "cat cd chdir clear cls copy cp del dir echo erase gci gcm gi gl gm gps iex ls man md mv \
     popd ps pushd pwd r rd ren rm rmdir sl sleep sort type where",
    "cd.. cd\\ clear-host help mkdir more prompt tabexpansion2",
    "",
];

/// [`DEFAULT_KEYWORDS`] as case-insensitive sets.
pub fn default_keywords() -> KeywordLists {
    KeywordLists::from_texts(DEFAULT_KEYWORDS, CaseSensitivity::Insensitive)
}

const RESUME_STYLES: [PowerShellStyle; 4] = [
    PowerShellStyle::Default,
    PowerShellStyle::CommentStream,
    PowerShellStyle::StringDq,
    PowerShellStyle::StringSq,
];

/// Word bytes, including `-` and every non-ASCII byte.
const fn is_word_char(ch: u8) -> bool {
    ch >= 0x80 || ch.is_ascii_alphanumeric() || ch == b'-' || ch == b'_'
}

/// PowerShell line state: 2 bits of resume style, then the blank line flag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PowerShellState {
    pub resume: PowerShellStyle,
    pub blank: bool,
}

impl LineState for PowerShellState {
    type Style = PowerShellStyle;

    fn encode(&self) -> u32 {
        BitWriter::new()
            .put(2, resume_index(&RESUME_STYLES, self.resume))
            .put_flag(self.blank)
            .finish()
    }

    fn decode(raw: u32) -> Result<Self, DecodeError> {
        let mut reader = BitReader::new(raw);
        let resume = resume_style(&RESUME_STYLES, reader.take(2))?;
        let blank = reader.take_flag();
        reader.finish()?;
        let state = Self { resume, blank };
        check_blank(state.flags(), resume)?;
        Ok(state)
    }

    fn resume_style(&self) -> PowerShellStyle {
        self.resume
    }

    fn flags(&self) -> LineFlags {
        let stored = if self.blank {
            LineFlags::BLANK
        } else {
            LineFlags::empty()
        };
        line_flags(stored, self.resume)
    }
}

/// The PowerShell lexer.
#[derive(Clone, Copy, Debug, Default)]
pub struct PowerShell;

impl Lexer for PowerShell {
    type Style = PowerShellStyle;
    type State = PowerShellState;

    const NAME: &'static str = "powershell";

    fn lex<D: Document + ?Sized>(
        &self,
        sc: &mut ScanCursor<'_, D, PowerShellStyle>,
        _initial: &PowerShellState,
        keywords: &KeywordLists,
    ) {
        let mut visible = 0;
        while sc.more() {
            if continue_token(sc, keywords) == Flow::Repeat {
                continue;
            }
            if sc.state() == PowerShellStyle::Default {
                start_token(sc);
            }
            if !is_space_char(sc.ch()) {
                visible += 1;
            }
            if sc.at_line_end() {
                let resume = match sc.state() {
                    state @ (PowerShellStyle::CommentStream
                    | PowerShellStyle::StringDq
                    | PowerShellStyle::StringSq) => state,
                    _ => PowerShellStyle::Default,
                };
                let blank = !blank_flag(visible, resume).is_empty();
                sc.set_line_state(PowerShellState { resume, blank }.encode());
                visible = 0;
            }
            sc.forward();
        }
    }

    fn fold_unit(&self, style: PowerShellStyle) -> FoldUnit {
        match style {
            PowerShellStyle::CommentStream => FoldUnit::Span(0),
            PowerShellStyle::Operator => FoldUnit::Brackets {
                open: b"{",
                close: b"}",
            },
            _ => FoldUnit::Ignore,
        }
    }

    fn is_space_equiv(&self, style: PowerShellStyle) -> bool {
        style <= PowerShellStyle::TaskMarker
    }
}

fn continue_token<D: Document + ?Sized>(
    sc: &mut ScanCursor<'_, D, PowerShellStyle>,
    keywords: &KeywordLists,
) -> Flow {
    match sc.state() {
        PowerShellStyle::Comment => {
            if sc.at_line_start() {
                sc.set_state(PowerShellStyle::Default);
            } else if highlight_task_marker(sc, PowerShellStyle::TaskMarker) {
                return Flow::Repeat;
            }
        }
        PowerShellStyle::CommentStream => {
            if sc.ch() == b'>' && sc.ch_prev() == b'#' {
                sc.forward_set_state(PowerShellStyle::Default);
            } else if highlight_task_marker(sc, PowerShellStyle::TaskMarker) {
                return Flow::Repeat;
            }
        }
        PowerShellStyle::StringDq => {
            if sc.ch() == b'"' {
                sc.forward_set_state(PowerShellStyle::Default);
            }
        }
        PowerShellStyle::StringSq => {
            if sc.ch() == b'\'' {
                sc.forward_set_state(PowerShellStyle::Default);
            }
        }
        PowerShellStyle::Number => {
            if !is_ascii_digit(sc.ch()) {
                sc.set_state(PowerShellStyle::Default);
            }
        }
        PowerShellStyle::Variable => {
            if !is_word_char(sc.ch()) {
                sc.set_state(PowerShellStyle::Default);
            }
        }
        PowerShellStyle::Operator => {
            if !is_operator(sc.ch()) {
                sc.set_state(PowerShellStyle::Default);
            }
        }
        PowerShellStyle::Identifier => {
            if !is_word_char(sc.ch()) {
                let word = sc.current_lowered();
                let text = word.as_str();
                let style = [
                    PowerShellStyle::Keyword,
                    PowerShellStyle::Cmdlet,
                    PowerShellStyle::Alias,
                    PowerShellStyle::Function,
                    PowerShellStyle::User1,
                ]
                .into_iter()
                .enumerate()
                .find_map(|(index, style)| keywords.contains(index, text).then_some(style));
                if let Some(style) = style {
                    sc.change_state(style);
                }
                sc.set_state(PowerShellStyle::Default);
            }
        }
        _ => {}
    }
    Flow::Next
}

fn start_token<D: Document + ?Sized>(sc: &mut ScanCursor<'_, D, PowerShellStyle>) {
    let ch = sc.ch();
    if ch == b'#' {
        sc.set_state(PowerShellStyle::Comment);
    } else if sc.matches(b'<', b'#') {
        sc.set_state(PowerShellStyle::CommentStream);
    } else if ch == b'"' {
        sc.set_state(PowerShellStyle::StringDq);
    } else if ch == b'\'' {
        sc.set_state(PowerShellStyle::StringSq);
    } else if ch == b'$' {
        sc.set_state(PowerShellStyle::Variable);
    } else if is_number_start(ch, sc.ch_next()) {
        sc.set_state(PowerShellStyle::Number);
    } else if is_operator(ch) {
        sc.set_state(PowerShellStyle::Operator);
    } else if is_word_char(ch) {
        sc.set_state(PowerShellStyle::Identifier);
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
