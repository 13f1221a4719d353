//! Asymptote.
//!
//! A C-like vector graphics language. Identifiers are classified by what
//! follows them: `name(` is a call, or a definition when a type precedes
//! it; `name[]` and `name other` make `name` a struct type.
//!
//! # Keyword lists
//!
//! 0. keywords, 1. types, 2. structs, 3. constants.

use tinct_core::char_class::{
    is_ascii_digit, is_eol, is_graphic, is_identifier_char, is_identifier_start,
    is_octal_digit, is_space_char,
};
use tinct_core::escape::{HEX_PAIR, SIMPLE};
use tinct_core::{
    BitReader, BitWriter, CaseSensitivity, DecodeError, Document, EscapeSequence, FoldUnit,
    KeywordLists, Lexer, LineFlags, LineState, ScanCursor,
};

use crate::shared::{
    blank_flag, check_blank, highlight_task_marker, line_flags, resume_index, resume_style, Flow,
    PrevChar,
};

tinct_core::style_table! {
    pub enum AsymptoteStyle {
        Default = "default",
        CommentLine = "comment_line",
        CommentBlock = "comment_block",
        TaskMarker = "task_marker",
        Operator = "operator",
        Number = "number",
        Identifier = "identifier",
        Word = "word",
        Type = "type",
        Struct = "struct",
        Constant = "constant",
        Function = "function",
        FunctionDefinition = "function_definition",
        StringDq = "string_dq",
        StringSq = "string_sq",
        EscapeChar = "escape_char",
    }
}

/// Default keyword lists, in list order.
pub const DEFAULT_KEYWORDS: [&str; 4] = [
    "access and as autounravel break case const continue default delete do else explicit \
     for foreach from if import include new operator private public quote restricted return \
     static struct switch this typedef unravel while",
    "bool bool3 bounds bruteforce coord coords2 coords3 cputime file frame guide int light \
     marker object pair path path3 pen picture position real revolution string surface \
     transform triple tube void",
    "arrowbar Label Legend margin projection scaling scientific slice",
    "currentpen currentpicture currentprojection false inf infinity nan null pi realEpsilon \
     realMax realMin true",
];

/// [`DEFAULT_KEYWORDS`] as case-sensitive sets.
pub fn default_keywords() -> KeywordLists {
    KeywordLists::from_texts(DEFAULT_KEYWORDS, CaseSensitivity::Sensitive)
}

/// Styles a line can end in that the next line continues.
const RESUME_STYLES: [AsymptoteStyle; 4] = [
    AsymptoteStyle::Default,
    AsymptoteStyle::CommentBlock,
    AsymptoteStyle::StringSq,
    AsymptoteStyle::StringDq,
];

/// Asymptote line state.
///
/// Layout, low bits first: line comment flag, import flag, 2 bits of
/// resume style, 4 bits of previous significant byte class, blank line
/// flag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AsymptoteState {
    pub flags: LineFlags,
    pub resume: AsymptoteStyle,
    pub(crate) prev: PrevChar,
}

impl LineState for AsymptoteState {
    type Style = AsymptoteStyle;

    fn encode(&self) -> u32 {
        BitWriter::new()
            .put_flag(self.flags.contains(LineFlags::LINE_COMMENT))
            .put_flag(self.flags.contains(LineFlags::IMPORT))
            .put(2, resume_index(&RESUME_STYLES, self.resume))
            .put(PrevChar::BITS, self.prev.index())
            .put_flag(self.flags.contains(LineFlags::BLANK))
            .finish()
    }

    fn decode(raw: u32) -> Result<Self, DecodeError> {
        let mut reader = BitReader::new(raw);
        let mut flags = LineFlags::empty();
        flags.set(LineFlags::LINE_COMMENT, reader.take_flag());
        flags.set(LineFlags::IMPORT, reader.take_flag());
        let resume = resume_style(&RESUME_STYLES, reader.take(2))?;
        let prev = PrevChar::from_index(reader.take(PrevChar::BITS))?;
        flags.set(LineFlags::BLANK, reader.take_flag());
        reader.finish()?;
        check_blank(flags, resume)?;
        Ok(Self {
            flags,
            resume,
            prev,
        })
    }

    fn resume_style(&self) -> AsymptoteStyle {
        self.resume
    }

    fn flags(&self) -> LineFlags {
        line_flags(self.flags, self.resume)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum KeywordType {
    None,
    Struct,
    Return,
}

/// The Asymptote lexer.
#[derive(Clone, Copy, Debug, Default)]
pub struct Asymptote;

impl Lexer for Asymptote {
    type Style = AsymptoteStyle;
    type State = AsymptoteState;

    const NAME: &'static str = "asymptote";

    fn lex<D: Document + ?Sized>(
        &self,
        sc: &mut ScanCursor<'_, D, AsymptoteStyle>,
        initial: &AsymptoteState,
        keywords: &KeywordLists,
    ) {
        let mut scan = AsymptoteScan {
            keywords,
            line: AsymptoteState {
                flags: LineFlags::empty(),
                ..initial.clone()
            },
            kw_type: KeywordType::None,
            before: PrevChar::None,
            visible: 0,
            escape: EscapeSequence::new(AsymptoteStyle::Default),
        };
        scan.run(sc);
    }

    fn fold_unit(&self, style: AsymptoteStyle) -> FoldUnit {
        match style {
            AsymptoteStyle::CommentBlock => FoldUnit::Span(0),
            AsymptoteStyle::StringSq | AsymptoteStyle::StringDq | AsymptoteStyle::EscapeChar => {
                FoldUnit::Span(1)
            }
            AsymptoteStyle::Operator => FoldUnit::Brackets {
                open: b"{[(",
                close: b"}])",
            },
            _ => FoldUnit::Ignore,
        }
    }

    fn is_space_equiv(&self, style: AsymptoteStyle) -> bool {
        style <= AsymptoteStyle::TaskMarker
    }

    fn brace_style(&self) -> Option<AsymptoteStyle> {
        Some(AsymptoteStyle::Operator)
    }
}

struct AsymptoteScan<'k> {
    keywords: &'k KeywordLists,
    line: AsymptoteState,
    kw_type: KeywordType,
    before: PrevChar,
    visible: usize,
    escape: EscapeSequence<AsymptoteStyle>,
}

impl AsymptoteScan<'_> {
    fn run<D: Document + ?Sized>(&mut self, sc: &mut ScanCursor<'_, D, AsymptoteStyle>) {
        while sc.more() {
            if self.continue_token(sc) == Flow::Repeat {
                continue;
            }
            if sc.state() == AsymptoteStyle::Default {
                self.start_token(sc);
            }

            let ch = sc.ch();
            if !is_space_char(ch) {
                self.visible += 1;
                if sc.state() > AsymptoteStyle::TaskMarker {
                    self.line.prev = PrevChar::classify(ch, is_identifier_char);
                }
            }
            if sc.at_line_end() {
                self.line.resume = match sc.state() {
                    state @ (AsymptoteStyle::CommentBlock
                    | AsymptoteStyle::StringSq
                    | AsymptoteStyle::StringDq) => state,
                    _ => AsymptoteStyle::Default,
                };
                self.line.flags |= blank_flag(self.visible, self.line.resume);
                sc.set_line_state(self.line.encode());
                self.line.flags = LineFlags::empty();
                self.visible = 0;
                self.kw_type = KeywordType::None;
            }
            sc.forward();
        }
    }

    fn continue_token<D: Document + ?Sized>(
        &mut self,
        sc: &mut ScanCursor<'_, D, AsymptoteStyle>,
    ) -> Flow {
        match sc.state() {
            AsymptoteStyle::Operator => sc.set_state(AsymptoteStyle::Default),
            AsymptoteStyle::Number => {
                if !(is_ascii_digit(sc.ch()) || (sc.ch() == b'.' && is_ascii_digit(sc.ch_next()))) {
                    sc.set_state(AsymptoteStyle::Default);
                }
            }
            AsymptoteStyle::Identifier => {
                if !is_identifier_char(sc.ch()) {
                    self.identifier_end(sc);
                }
            }
            AsymptoteStyle::CommentLine => {
                if sc.at_line_start() {
                    sc.set_state(AsymptoteStyle::Default);
                } else if highlight_task_marker(sc, AsymptoteStyle::TaskMarker) {
                    return Flow::Repeat;
                }
            }
            AsymptoteStyle::CommentBlock => {
                if sc.matches(b'*', b'/') {
                    sc.forward();
                    sc.forward_set_state(AsymptoteStyle::Default);
                } else if highlight_task_marker(sc, AsymptoteStyle::TaskMarker) {
                    return Flow::Repeat;
                }
            }
            AsymptoteStyle::StringDq => {
                if sc.ch() == b'\\' {
                    if matches!(sc.ch_next(), b'\\' | b'"') {
                        self.escape.enter(AsymptoteStyle::StringDq, SIMPLE, 16);
                        sc.set_state(AsymptoteStyle::EscapeChar);
                        sc.forward();
                    }
                } else if sc.ch() == b'"' {
                    sc.forward_set_state(AsymptoteStyle::Default);
                }
            }
            AsymptoteStyle::StringSq => {
                if sc.ch() == b'\\' {
                    let letter = sc.ch_next();
                    if !is_eol(letter) {
                        let (budget, radix) = if is_octal_digit(letter) {
                            (HEX_PAIR, 8)
                        } else if letter == b'x' || letter == b'X' {
                            (HEX_PAIR, 16)
                        } else {
                            (SIMPLE, 16)
                        };
                        self.escape.enter(AsymptoteStyle::StringSq, budget, radix);
                        sc.set_state(AsymptoteStyle::EscapeChar);
                        sc.forward();
                    }
                } else if sc.ch() == b'\'' {
                    sc.forward_set_state(AsymptoteStyle::Default);
                }
            }
            AsymptoteStyle::EscapeChar => {
                if self.escape.at_end(sc.ch()) {
                    sc.set_state(self.escape.outer);
                    return Flow::Repeat;
                }
            }
            _ => {}
        }
        Flow::Next
    }

    fn identifier_end<D: Document + ?Sized>(&mut self, sc: &mut ScanCursor<'_, D, AsymptoteStyle>) {
        let word = sc.current_text();
        let text = word.as_str();
        let keywords = self.keywords;

        if keywords.contains(0, text) {
            sc.change_state(AsymptoteStyle::Word);
            match text {
                "import" | "include" => self.line.flags |= LineFlags::IMPORT,
                "new" | "struct" => self.kw_type = KeywordType::Struct,
                "return" => self.kw_type = KeywordType::Return,
                _ => {}
            }
        } else if keywords.contains(1, text) {
            sc.change_state(AsymptoteStyle::Type);
        } else if self.kw_type == KeywordType::Struct || keywords.contains(2, text) {
            sc.change_state(AsymptoteStyle::Struct);
        } else if keywords.contains(3, text) {
            sc.change_state(AsymptoteStyle::Constant);
        } else if sc.ch() != b'.' {
            let next = sc.doc_next_char(false);
            if next == b'(' {
                if self.kw_type != KeywordType::Return && self.before.ends_type() {
                    sc.change_state(AsymptoteStyle::FunctionDefinition);
                } else {
                    sc.change_state(AsymptoteStyle::Function);
                }
            } else if sc.matches(b'[', b']') || is_identifier_start(next) {
                sc.change_state(AsymptoteStyle::Struct);
            }
        }
        if sc.state() != AsymptoteStyle::Word {
            self.kw_type = KeywordType::None;
        }
        sc.set_state(AsymptoteStyle::Default);
    }

    fn start_token<D: Document + ?Sized>(&mut self, sc: &mut ScanCursor<'_, D, AsymptoteStyle>) {
        let ch = sc.ch();
        if sc.matches(b'/', b'/') {
            if self.visible == 0 {
                self.line.flags |= LineFlags::LINE_COMMENT;
            }
            sc.set_state(AsymptoteStyle::CommentLine);
        } else if sc.matches(b'/', b'*') {
            sc.set_state(AsymptoteStyle::CommentBlock);
            sc.forward();
        } else if ch == b'"' {
            sc.set_state(AsymptoteStyle::StringDq);
        } else if ch == b'\'' {
            sc.set_state(AsymptoteStyle::StringSq);
        } else if is_ascii_digit(ch) {
            sc.set_state(AsymptoteStyle::Number);
        } else if is_identifier_start(ch) {
            self.before = self.line.prev;
            sc.set_state(AsymptoteStyle::Identifier);
        } else if is_graphic(ch) && ch != b'\\' && ch != b'`' {
            sc.set_state(AsymptoteStyle::Operator);
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
