//! Dart.
//!
//! Beyond plain tokens the lexer classifies identifiers by context:
//!
//! - `name:` after `,` `{` `(` is a map key or named argument, and after a
//!   statement boundary a jump label;
//! - `name(` is a function definition when a type precedes it and a call
//!   otherwise;
//! - `Type name`, `Type<...>` and names after `class`, `extends`, `new`
//!   and friends are classes.
//!
//! String interpolation (`$name`, `${expr}`) runs on an explicit
//! [`tinct_core::NestedStack`] persisted in the line state, see [`DartState`].
//!
//! # Keyword lists
//!
//! 0. keywords, 1. built-in types, 2. classes, 3. enums.

mod state;

pub use state::{DartFrame, DartState, MAX_COMMENT_LEVEL, MAX_FRAMES};

use tinct_core::char_class::{
    is_decimal_number, is_eol, is_graphic, is_identifier_char, is_identifier_start,
    is_number_start, is_space_char,
};
use tinct_core::escape::{HEX_PAIR, SIMPLE, UNICODE_BRACED, UNICODE_SHORT};
use tinct_core::{
    CaseSensitivity, Document, EscapeSequence, FoldUnit, KeywordLists, Lexer, LineFlags,
    LineState, ScanCursor,
};

use crate::shared::{blank_flag, highlight_task_marker, Flow, PrevChar};

tinct_core::style_table! {
    /// Dart styles. Everything up to `TaskMarker` counts as whitespace.
    pub enum DartStyle {
        Default = "default",
        CommentLine = "comment_line",
        CommentLineDoc = "comment_line_doc",
        CommentBlock = "comment_block",
        CommentBlockDoc = "comment_block_doc",
        TaskMarker = "task_marker",
        Operator = "operator",
        Operator2 = "operator2",
        Number = "number",
        Identifier = "identifier",
        SimpleIdentifier = "simple_identifier",
        Metadata = "metadata",
        SymbolIdentifier = "symbol_identifier",
        SymbolOperator = "symbol_operator",
        Word = "word",
        Word2 = "word2",
        Class = "class",
        Enum = "enum",
        Label = "label",
        Key = "key",
        Function = "function",
        FunctionDefinition = "function_definition",
        StringSq = "string_sq",
        StringDq = "string_dq",
        TripleStringSq = "triple_string_sq",
        TripleStringDq = "triple_string_dq",
        RawStringSq = "raw_string_sq",
        RawStringDq = "raw_string_dq",
        TripleRawStringSq = "triple_raw_string_sq",
        TripleRawStringDq = "triple_raw_string_dq",
        EscapeChar = "escape_char",
    }
}

impl DartStyle {
    pub fn is_string(self) -> bool {
        (DartStyle::StringSq..=DartStyle::TripleRawStringDq).contains(&self)
    }

    pub fn is_raw_string(self) -> bool {
        (DartStyle::RawStringSq..=DartStyle::TripleRawStringDq).contains(&self)
    }

    pub fn is_triple_string(self) -> bool {
        matches!(
            self,
            DartStyle::TripleStringSq
                | DartStyle::TripleStringDq
                | DartStyle::TripleRawStringSq
                | DartStyle::TripleRawStringDq
        )
    }

    fn quote(self) -> u8 {
        match self {
            DartStyle::StringSq
            | DartStyle::TripleStringSq
            | DartStyle::RawStringSq
            | DartStyle::TripleRawStringSq => b'\'',
            _ => b'"',
        }
    }

    /// Triple-quoted form of a single-quoted string style.
    fn tripled(self) -> Self {
        match self {
            DartStyle::StringSq => DartStyle::TripleStringSq,
            DartStyle::StringDq => DartStyle::TripleStringDq,
            DartStyle::RawStringSq => DartStyle::TripleRawStringSq,
            DartStyle::RawStringDq => DartStyle::TripleRawStringDq,
            other => other,
        }
    }
}

/// Default keyword lists, in list order.
pub const DEFAULT_KEYWORDS: [&str; 4] = [
    "abstract as assert async await base break case catch class const continue covariant \
     default deferred do dynamic else enum export extends extension external factory false \
     final finally for get hide if implements import in interface is late library mixin new \
     null of on operator part required rethrow return sealed set show static super switch \
     sync this throw true try type typedef var void when while with yield",
    "bool double int num Function Never Null Object dynamic void",
    "BigInt Comparable DateTime Duration Error Exception Future FutureOr Iterable Iterator \
     List Map MapEntry Match Pattern Record RegExp Runes Set Sink Stream StreamController \
     String StringBuffer Symbol Type Uri",
    "TextDirection",
];

/// [`DEFAULT_KEYWORDS`] as case-sensitive sets.
pub fn default_keywords() -> KeywordLists {
    KeywordLists::from_texts(DEFAULT_KEYWORDS, CaseSensitivity::Sensitive)
}

const fn is_dart_identifier_start(ch: u8) -> bool {
    is_identifier_start(ch) || ch == b'$'
}

const fn is_dart_identifier_char(ch: u8) -> bool {
    is_identifier_char(ch) || ch == b'$'
}

/// Operators a symbol literal `#op` may name.
const fn is_definable_operator(ch: u8) -> bool {
    matches!(
        ch,
        b'+' | b'-' | b'*' | b'/' | b'%' | b'~' | b'&' | b'|' | b'^' | b'<' | b'>' | b'=' | b'[' | b']'
    )
}

/// Context a keyword hands to the identifier after it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum KeywordType {
    None,
    Label,
    Class,
    Enum,
    Return,
}

impl KeywordType {
    /// Style the next identifier takes unconditionally.
    fn carried_style(self) -> Option<DartStyle> {
        match self {
            KeywordType::Label => Some(DartStyle::Label),
            KeywordType::Class => Some(DartStyle::Class),
            KeywordType::Enum => Some(DartStyle::Enum),
            KeywordType::None | KeywordType::Return => None,
        }
    }
}

/// The Dart lexer.
#[derive(Clone, Copy, Debug, Default)]
pub struct Dart;

impl Lexer for Dart {
    type Style = DartStyle;
    type State = DartState;

    const NAME: &'static str = "dart";

    fn lex<D: Document + ?Sized>(
        &self,
        sc: &mut ScanCursor<'_, D, DartStyle>,
        initial: &DartState,
        keywords: &KeywordLists,
    ) {
        DartScan::new(keywords, initial).run(sc);
    }

    fn fold_unit(&self, style: DartStyle) -> FoldUnit {
        match style {
            DartStyle::CommentBlock | DartStyle::CommentBlockDoc => FoldUnit::Paired {
                open: *b"/*",
                close: *b"*/",
            },
            DartStyle::TripleStringSq => FoldUnit::Span(0),
            DartStyle::TripleStringDq => FoldUnit::Span(1),
            DartStyle::TripleRawStringSq => FoldUnit::Span(2),
            DartStyle::TripleRawStringDq => FoldUnit::Span(3),
            DartStyle::Operator | DartStyle::Operator2 => FoldUnit::Brackets {
                open: b"{[(",
                close: b"}])",
            },
            _ => FoldUnit::Ignore,
        }
    }

    fn is_space_equiv(&self, style: DartStyle) -> bool {
        style <= DartStyle::TaskMarker
    }

    fn brace_style(&self) -> Option<DartStyle> {
        Some(DartStyle::Operator)
    }
}

/// Scanner locals for one pass.
struct DartScan<'k> {
    keywords: &'k KeywordLists,
    /// Persisted part, written at every line end.
    line: DartState,
    kw_type: KeywordType,
    /// Significant byte before the token being built.
    before: PrevChar,
    /// Significant byte before the current identifier chain (`a.b.c`).
    before_identifier: PrevChar,
    visible: usize,
    escape: EscapeSequence<DartStyle>,
}

impl<'k> DartScan<'k> {
    fn new(keywords: &'k KeywordLists, initial: &DartState) -> Self {
        Self {
            keywords,
            line: DartState {
                flags: LineFlags::empty(),
                ..initial.clone()
            },
            kw_type: KeywordType::None,
            before: PrevChar::None,
            before_identifier: PrevChar::None,
            visible: 0,
            escape: EscapeSequence::new(DartStyle::Default),
        }
    }

    fn run<D: Document + ?Sized>(&mut self, sc: &mut ScanCursor<'_, D, DartStyle>) {
        if sc.pos() == 0 && sc.matches(b'#', b'!') {
            sc.set_state(DartStyle::CommentLine);
            sc.forward();
            self.line.flags |= LineFlags::LINE_COMMENT;
        }

        while sc.more() {
            if self.continue_token(sc) == Flow::Repeat {
                continue;
            }
            if sc.state() == DartStyle::Default && self.start_token(sc) == Flow::Repeat {
                continue;
            }

            let ch = sc.ch();
            if !is_space_char(ch) {
                self.visible += 1;
                if sc.state() > DartStyle::TaskMarker {
                    self.line.prev = PrevChar::classify(ch, is_dart_identifier_char);
                }
            }
            if sc.at_line_end() {
                self.end_line(sc);
            }
            sc.forward();
        }
    }

    fn end_line<D: Document + ?Sized>(&mut self, sc: &mut ScanCursor<'_, D, DartStyle>) {
        self.line.resume = match sc.state() {
            state @ (DartStyle::CommentBlock
            | DartStyle::CommentBlockDoc
            | DartStyle::TripleStringSq
            | DartStyle::TripleStringDq
            | DartStyle::TripleRawStringSq
            | DartStyle::TripleRawStringDq) => state,
            _ => DartStyle::Default,
        };
        self.line.flags |= blank_flag(self.visible, self.line.resume);
        sc.set_line_state(self.line.encode());
        self.line.flags = LineFlags::empty();
        self.visible = 0;
        self.kw_type = KeywordType::None;
        self.before_identifier = PrevChar::None;
    }

    // ─── Inside a token ─────────────────────────────────────────────────

    fn continue_token<D: Document + ?Sized>(&mut self, sc: &mut ScanCursor<'_, D, DartStyle>) -> Flow {
        match sc.state() {
            DartStyle::Operator | DartStyle::Operator2 => sc.set_state(DartStyle::Default),
            DartStyle::Number => {
                if !is_decimal_number(sc.ch_prev(), sc.ch(), sc.ch_next()) {
                    sc.set_state(DartStyle::Default);
                }
            }
            state @ (DartStyle::Metadata | DartStyle::SymbolIdentifier) => {
                if !is_dart_identifier_char(sc.ch()) {
                    if sc.ch() == b'.' {
                        // `@pkg.Name`, `#a.b`: the dot joins the parts.
                        sc.set_state(DartStyle::Operator);
                        sc.forward_set_state(state);
                        return Flow::Repeat;
                    }
                    sc.set_state(DartStyle::Default);
                }
            }
            state @ (DartStyle::Identifier | DartStyle::SimpleIdentifier) => {
                let ch = sc.ch();
                if !is_dart_identifier_char(ch) || (ch == b'$' && state == DartStyle::SimpleIdentifier) {
                    return self.identifier_end(sc, state);
                }
            }
            DartStyle::SymbolOperator => {
                if !is_definable_operator(sc.ch()) {
                    sc.set_state(DartStyle::Default);
                }
            }
            DartStyle::CommentLine | DartStyle::CommentLineDoc => {
                if sc.at_line_start() {
                    sc.set_state(DartStyle::Default);
                } else if highlight_task_marker(sc, DartStyle::TaskMarker) {
                    return Flow::Repeat;
                }
            }
            DartStyle::CommentBlock | DartStyle::CommentBlockDoc => {
                if sc.matches(b'*', b'/') {
                    sc.forward();
                    self.line.comment_level = self.line.comment_level.saturating_sub(1);
                    if self.line.comment_level == 0 {
                        sc.forward_set_state(DartStyle::Default);
                    }
                } else if sc.matches(b'/', b'*') {
                    sc.forward();
                    self.line.comment_level = (self.line.comment_level + 1).min(MAX_COMMENT_LEVEL);
                } else if highlight_task_marker(sc, DartStyle::TaskMarker) {
                    return Flow::Repeat;
                }
            }
            state if state.is_string() => return self.string(sc, state),
            DartStyle::EscapeChar => {
                if self.escape.at_end(sc.ch()) {
                    if self.escape.brace && sc.ch() == b'}' {
                        sc.forward();
                    }
                    sc.set_state(self.escape.outer);
                    return Flow::Repeat;
                }
            }
            _ => {}
        }
        Flow::Next
    }

    fn string<D: Document + ?Sized>(&mut self, sc: &mut ScanCursor<'_, D, DartStyle>, state: DartStyle) -> Flow {
        let ch = sc.ch();
        if sc.at_line_start() && !state.is_triple_string() {
            sc.set_state(DartStyle::Default);
        } else if ch == b'\\' && !state.is_raw_string() {
            let letter = sc.ch_next();
            if !is_eol(letter) {
                let budget = match letter {
                    b'x' => HEX_PAIR,
                    b'u' => UNICODE_SHORT,
                    _ => SIMPLE,
                };
                self.escape.enter(state, budget, 16);
                sc.set_state(DartStyle::EscapeChar);
                sc.forward();
                if sc.matches(b'u', b'{') {
                    self.escape.brace = true;
                    self.escape.digits_left = UNICODE_BRACED;
                    sc.forward();
                }
            }
        } else if ch == b'$' && !state.is_raw_string() {
            self.escape.outer = state;
            sc.set_state(DartStyle::Operator2);
            sc.forward();
            if sc.ch() == b'{' {
                self.line.nested.push(DartFrame::enclosing(state));
            } else if sc.ch() != b'$' && is_dart_identifier_start(sc.ch()) {
                sc.set_state(DartStyle::SimpleIdentifier);
            } else {
                // A lone `$` is an operator; the string goes on.
                sc.set_state(state);
                return Flow::Repeat;
            }
        } else if ch == state.quote() && (!state.is_triple_string() || sc.match_next()) {
            if state.is_triple_string() {
                sc.forward_by(2);
            }
            sc.forward();
            if matches!(state, DartStyle::StringSq | DartStyle::StringDq)
                && matches!(self.before, PrevChar::Comma | PrevChar::LeftBrace)
                && sc.line_next_char(false) == b':'
            {
                sc.change_state(DartStyle::Key);
            }
            sc.set_state(DartStyle::Default);
        }
        Flow::Next
    }

    fn identifier_end<D: Document + ?Sized>(
        &mut self,
        sc: &mut ScanCursor<'_, D, DartStyle>,
        state: DartStyle,
    ) -> Flow {
        let word = sc.current_text();
        let text = word.as_str();
        let ch = sc.ch();
        let keywords = self.keywords;

        if keywords.contains(0, text) {
            sc.change_state(DartStyle::Word);
            if state == DartStyle::SimpleIdentifier {
                self.kw_type = KeywordType::None;
            } else if matches!(text, "import" | "part") {
                if self.visible == sc.length_current() {
                    self.line.flags |= LineFlags::IMPORT;
                }
            } else if matches!(
                text,
                "class" | "extends" | "implements" | "new" | "throw" | "with" | "as" | "is" | "on"
            ) {
                self.kw_type = KeywordType::Class;
            } else if text == "enum" {
                self.kw_type = KeywordType::Enum;
            } else if matches!(text, "break" | "continue") {
                self.kw_type = KeywordType::Label;
            } else if matches!(text, "return" | "await" | "yield") {
                self.kw_type = KeywordType::Return;
            }
            if self.kw_type.carried_style().is_some() && !is_dart_identifier_start(sc.line_next_char(false)) {
                self.kw_type = KeywordType::None;
            }
        } else if keywords.contains(1, text) {
            sc.change_state(DartStyle::Word2);
        } else if keywords.contains(2, text) {
            sc.change_state(DartStyle::Class);
        } else if keywords.contains(3, text) {
            sc.change_state(DartStyle::Enum);
        } else if state == DartStyle::Identifier && ch == b':' {
            if matches!(
                self.before,
                PrevChar::Comma | PrevChar::LeftBrace | PrevChar::LeftParen
            ) {
                sc.change_state(DartStyle::Key);
            } else if self.before.starts_label() {
                sc.change_state(DartStyle::Label);
            }
        } else if state == DartStyle::Identifier && ch != b'.' {
            if let Some(carried) = self.kw_type.carried_style() {
                sc.change_state(carried);
            } else {
                let next = sc.line_next_char(ch == b'?');
                if next == b'(' {
                    if self.kw_type != KeywordType::Return && self.before.ends_type() {
                        sc.change_state(DartStyle::FunctionDefinition);
                    } else {
                        sc.change_state(DartStyle::Function);
                    }
                } else if (self.before_identifier == PrevChar::Less && (next == b'>' || next == b'<'))
                    || is_dart_identifier_start(next)
                {
                    sc.change_state(DartStyle::Class);
                }
            }
        }

        if sc.state() != DartStyle::Word && ch != b'.' {
            self.kw_type = KeywordType::None;
        }
        if state == DartStyle::SimpleIdentifier {
            sc.set_state(self.escape.outer);
            return Flow::Repeat;
        }
        sc.set_state(DartStyle::Default);
        Flow::Next
    }

    // ─── Token start ────────────────────────────────────────────────────

    fn start_token<D: Document + ?Sized>(&mut self, sc: &mut ScanCursor<'_, D, DartStyle>) -> Flow {
        let ch = sc.ch();
        let next = sc.ch_next();
        if ch == b'/' && (next == b'/' || next == b'*') {
            sc.set_state(if next == b'/' {
                DartStyle::CommentLine
            } else {
                DartStyle::CommentBlock
            });
            sc.forward_by(2);
            if sc.ch() == next && sc.ch_next() != next {
                sc.change_state(if next == b'/' {
                    DartStyle::CommentLineDoc
                } else {
                    DartStyle::CommentBlockDoc
                });
            }
            if next == b'/' {
                if self.visible == 0 {
                    self.line.flags |= LineFlags::LINE_COMMENT;
                }
            } else {
                self.line.comment_level = 1;
            }
            return Flow::Repeat;
        }

        if ch == b'r' && (next == b'\'' || next == b'"') {
            let raw = if next == b'\'' {
                DartStyle::RawStringSq
            } else {
                DartStyle::RawStringDq
            };
            sc.set_state(raw);
            sc.forward();
            if sc.match_next() {
                sc.change_state(raw.tripled());
                sc.forward_by(2);
            }
        } else if ch == b'\'' || ch == b'"' {
            let string = if ch == b'\'' {
                DartStyle::StringSq
            } else {
                DartStyle::StringDq
            };
            sc.set_state(string);
            self.before = self.line.prev;
            if sc.match_next() {
                sc.change_state(string.tripled());
                sc.forward_by(2);
            }
        } else if is_number_start(ch, next) {
            sc.set_state(DartStyle::Number);
        } else if (ch == b'@' || ch == b'#') && is_dart_identifier_start(next) {
            sc.set_state(if ch == b'@' {
                DartStyle::Metadata
            } else {
                DartStyle::SymbolIdentifier
            });
        } else if is_dart_identifier_start(ch) {
            self.before = self.line.prev;
            if self.line.prev != PrevChar::Dot {
                self.before_identifier = self.line.prev;
            }
            sc.set_state(DartStyle::Identifier);
        } else if ch == b'#' && is_definable_operator(next) {
            sc.set_state(DartStyle::SymbolOperator);
        } else if is_graphic(ch) {
            sc.set_state(DartStyle::Operator);
            if !self.line.nested.is_empty() {
                sc.change_state(DartStyle::Operator2);
                if ch == b'{' {
                    self.line.nested.push(DartFrame::Code);
                } else if ch == b'}' {
                    let outer = self
                        .line
                        .nested
                        .pop()
                        .map_or(DartStyle::Default, DartFrame::style);
                    sc.forward_set_state(outer);
                    return Flow::Repeat;
                }
            }
        }
        Flow::Next
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
