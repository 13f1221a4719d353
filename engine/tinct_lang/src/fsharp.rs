//! F#.
//!
//! Block comments `(* *)` nest; `(*)` is the multiplication operator.
//! Strings come in plain, verbatim (`@"..."`, `""` escapes a quote) and
//! triple-quoted forms, each optionally interpolated with `$`. An
//! interpolated triple-quoted string may open with several `$`; its
//! interpolations then need that many braces and its `%` format
//! specifiers that many percent signs.
//!
//! Open interpolations live on a [`tinct_core::NestedStack`] of
//! [`FSharpFrame`]s. A frame records the string to return to, the brackets
//! opened inside the interpolation, and the `$` count of that string. An
//! interpolation ends at `}` (back to the string), or at `:` or `,width`
//! outside brackets (into a .NET format specifier, which runs up to the
//! closing `}`).
//!
//! # Keyword lists
//!
//! 0. keywords, 1. types.

mod state;

pub use state::{
    FSharpFrame, FSharpState, MAX_BALANCE, MAX_COMMENT_LEVEL, MAX_FRAMES, MAX_INTERPOLATORS,
};

use tinct_core::char_class::{
    is_ascii_digit, is_decimal_number, is_eol, is_graphic, is_hex_digit, is_identifier_char,
    is_identifier_start, is_invalid_url_char, is_lower_case, is_number_start, is_space_char,
    is_space_or_tab,
};
use tinct_core::escape::{HEX_PAIR, SIMPLE, UNICODE_LONG, UNICODE_SHORT};
use tinct_core::{
    CaseSensitivity, Document, EscapeSequence, FoldUnit, KeywordLists, Lexer, LineFlags,
    LineState, ScanCursor,
};

use crate::shared::{blank_flag, Flow};

tinct_core::style_table! {
    /// F# styles. Everything up to `Comment` counts as whitespace.
    pub enum FSharpStyle {
        Default = "default",
        CommentLine = "comment_line",
        CommentLineDoc = "comment_line_doc",
        Comment = "comment",
        Operator = "operator",
        Operator2 = "operator2",
        Number = "number",
        Identifier = "identifier",
        Keyword = "keyword",
        Type = "type",
        Attribute = "attribute",
        Preprocessor = "preprocessor",
        Backtick = "backtick",
        Quotation = "quotation",
        Character = "character",
        String = "string",
        InterpolatedString = "interpolated_string",
        VerbatimString = "verbatim_string",
        InterpolatedVerbatimString = "interpolated_verbatim_string",
        TripleString = "triple_string",
        InterpolatedTripleString = "interpolated_triple_string",
        EscapeChar = "escape_char",
        FormatSpecifier = "format_specifier",
    }
}

impl FSharpStyle {
    /// Characters and every string form.
    pub fn is_string(self) -> bool {
        (FSharpStyle::Character..=FSharpStyle::InterpolatedTripleString).contains(&self)
    }

    /// Closed by a single quote byte rather than `"""`.
    pub fn is_plain(self) -> bool {
        (FSharpStyle::Character..=FSharpStyle::InterpolatedVerbatimString).contains(&self)
    }

    pub fn is_verbatim(self) -> bool {
        matches!(
            self,
            FSharpStyle::VerbatimString | FSharpStyle::InterpolatedVerbatimString
        )
    }

    pub fn is_interpolated(self) -> bool {
        matches!(
            self,
            FSharpStyle::InterpolatedString
                | FSharpStyle::InterpolatedVerbatimString
                | FSharpStyle::InterpolatedTripleString
        )
    }

    /// Backslash escapes apply.
    fn has_escapes(self) -> bool {
        (FSharpStyle::Character..=FSharpStyle::InterpolatedString).contains(&self)
    }

    fn quote(self) -> u8 {
        if self == FSharpStyle::Character {
            b'\''
        } else {
            b'"'
        }
    }
}

/// Default keyword lists, in list order.
pub const DEFAULT_KEYWORDS: [&str; 2] = [
    "abstract and as assert base begin class default delegate do done downcast downto elif \
     else end exception extern false finally fixed for fun function global if in inherit \
     inline interface internal lazy let match member module mutable namespace new not null of \
     open or override private public rec return select sig static struct then to true try type \
     upcast use val void when while with yield const",
    "bigint bool byte char decimal double exn float float32 int int16 int32 int64 list \
     nativeint obj option sbyte seq single string uint uint16 uint32 uint64 unativeint unit \
     voption Async Map Result Set Task",
];

/// [`DEFAULT_KEYWORDS`] as case-sensitive sets.
pub fn default_keywords() -> KeywordLists {
    KeywordLists::from_texts(DEFAULT_KEYWORDS, CaseSensitivity::Sensitive)
}

/// Identifier bytes; `'` continues a name (`x'`).
const fn is_fsharp_identifier_char(ch: u8) -> bool {
    is_identifier_char(ch) || ch == b'\''
}

/// Type letters of a `%` format specifier.
const fn is_format_type(ch: u8) -> bool {
    matches!(
        ch,
        b'a' | b'A'
            | b'b'
            | b'B'
            | b'c'
            | b'd'
            | b'e'
            | b'E'
            | b'f'
            | b'F'
            | b'g'
            | b'G'
            | b'i'
            | b'M'
            | b'o'
            | b'O'
            | b'P'
            | b's'
            | b't'
            | b'u'
            | b'x'
            | b'X'
    )
}

/// Bytes that end a .NET format specifier inside an interpolation.
const fn is_invalid_format_char(ch: u8) -> bool {
    ch < b' ' || matches!(ch, b'"' | b'{' | b'}')
}

/// `}`, or the `:` or `,width` that starts a format specifier.
fn is_interpolation_end<D: Document + ?Sized>(sc: &ScanCursor<'_, D, FSharpStyle>) -> bool {
    match sc.ch() {
        b'}' | b':' => true,
        b',' => {
            is_ascii_digit(sc.ch_next())
                || (sc.ch_next() == b'-' && is_ascii_digit(sc.char_after_next()))
        }
        _ => false,
    }
}

/// The F# lexer.
#[derive(Clone, Copy, Debug, Default)]
pub struct FSharp;

impl Lexer for FSharp {
    type Style = FSharpStyle;
    type State = FSharpState;

    const NAME: &'static str = "fsharp";

    fn lex<D: Document + ?Sized>(
        &self,
        sc: &mut ScanCursor<'_, D, FSharpStyle>,
        initial: &FSharpState,
        keywords: &KeywordLists,
    ) {
        FSharpScan::new(keywords, initial).run(sc);
    }

    fn fold_unit(&self, style: FSharpStyle) -> FoldUnit {
        match style {
            FSharpStyle::Comment => FoldUnit::Paired {
                open: *b"(*",
                close: *b"*)",
            },
            FSharpStyle::Quotation => FoldUnit::Span(0),
            style if (FSharpStyle::String..=FSharpStyle::FormatSpecifier).contains(&style) => {
                FoldUnit::Span(1)
            }
            FSharpStyle::Operator => FoldUnit::Brackets {
                open: b"{[(",
                close: b"}])",
            },
            _ => FoldUnit::Ignore,
        }
    }

    fn is_space_equiv(&self, style: FSharpStyle) -> bool {
        style <= FSharpStyle::Comment
    }
}

struct FSharpScan<'k> {
    keywords: &'k KeywordLists,
    line: FSharpState,
    visible: usize,
    /// Also holds the string a format specifier returns to.
    escape: EscapeSequence<FSharpStyle>,
    inside_url: bool,
    /// Between `[<` and `>]`.
    inside_attribute: bool,
}

impl<'k> FSharpScan<'k> {
    fn new(keywords: &'k KeywordLists, initial: &FSharpState) -> Self {
        Self {
            keywords,
            line: FSharpState {
                flags: LineFlags::empty(),
                ..initial.clone()
            },
            visible: 0,
            escape: EscapeSequence::new(FSharpStyle::Default),
            inside_url: false,
            inside_attribute: false,
        }
    }

    fn run<D: Document + ?Sized>(&mut self, sc: &mut ScanCursor<'_, D, FSharpStyle>) {
        if sc.pos() == 0 && sc.matches(b'#', b'!') {
            sc.set_state(FSharpStyle::CommentLine);
            sc.forward();
            self.line.flags |= LineFlags::LINE_COMMENT;
        }

        while sc.more() {
            // A repeat that ran off the end still owes the last line its state.
            if self.continue_token(sc) == Flow::Repeat && sc.more() {
                continue;
            }
            if sc.state() == FSharpStyle::Default && self.start_token(sc) == Flow::Repeat && sc.more() {
                continue;
            }

            if !is_space_char(sc.ch()) {
                self.visible += 1;
            }
            if sc.at_line_end() {
                self.end_line(sc);
            }
            sc.forward();
        }
    }

    fn end_line<D: Document + ?Sized>(&mut self, sc: &mut ScanCursor<'_, D, FSharpStyle>) {
        let state = match sc.state() {
            FSharpStyle::EscapeChar | FSharpStyle::FormatSpecifier => self.escape.outer,
            state => state,
        };
        self.line.resume = match state {
            FSharpStyle::Comment
            | FSharpStyle::String
            | FSharpStyle::InterpolatedString
            | FSharpStyle::VerbatimString
            | FSharpStyle::InterpolatedVerbatimString
            | FSharpStyle::TripleString
            | FSharpStyle::InterpolatedTripleString
            | FSharpStyle::Quotation
            | FSharpStyle::Backtick => state,
            _ => FSharpStyle::Default,
        };
        self.line.flags |= blank_flag(self.visible, self.line.resume);
        sc.set_line_state(self.line.encode());
        self.line.flags = LineFlags::empty();
        self.visible = 0;
        self.inside_url = false;
        self.inside_attribute = false;
    }

    // ─── Inside a token ─────────────────────────────────────────────────

    fn continue_token<D: Document + ?Sized>(&mut self, sc: &mut ScanCursor<'_, D, FSharpStyle>) -> Flow {
        match sc.state() {
            FSharpStyle::Operator | FSharpStyle::Operator2 => sc.set_state(FSharpStyle::Default),
            FSharpStyle::Number => {
                if !is_decimal_number(sc.ch_prev(), sc.ch(), sc.ch_next()) {
                    sc.set_state(FSharpStyle::Default);
                }
            }
            state @ (FSharpStyle::Identifier | FSharpStyle::Preprocessor) => {
                if !is_fsharp_identifier_char(sc.ch()) {
                    if state == FSharpStyle::Identifier {
                        self.classify_identifier(sc);
                    }
                    sc.set_state(FSharpStyle::Default);
                }
            }
            FSharpStyle::Comment => {
                if sc.matches(b'(', b'*') {
                    self.line.comment_level = (self.line.comment_level + 1).min(MAX_COMMENT_LEVEL);
                    sc.forward();
                } else if sc.matches(b'*', b')') {
                    sc.forward();
                    self.line.comment_level = self.line.comment_level.saturating_sub(1);
                    if self.line.comment_level == 0 {
                        sc.forward_set_state(FSharpStyle::Default);
                    }
                }
            }
            FSharpStyle::CommentLine | FSharpStyle::CommentLineDoc => {
                if sc.at_line_start() {
                    sc.set_state(FSharpStyle::Default);
                }
            }
            FSharpStyle::Backtick => {
                if sc.matches(b'`', b'`') {
                    sc.forward();
                    sc.forward_set_state(FSharpStyle::Default);
                }
            }
            FSharpStyle::Quotation => {
                if sc.matches(b'@', b'>') {
                    sc.forward();
                    sc.forward_set_state(FSharpStyle::Default);
                }
            }
            state if state.is_string() => return self.string(sc, state),
            FSharpStyle::EscapeChar => {
                if self.escape.at_end(sc.ch()) {
                    sc.set_state(self.escape.outer);
                    return Flow::Repeat;
                }
            }
            FSharpStyle::FormatSpecifier => {
                if is_invalid_format_char(sc.ch()) {
                    sc.set_state(self.escape.outer);
                    return Flow::Repeat;
                }
            }
            _ => {}
        }
        Flow::Next
    }

    fn classify_identifier<D: Document + ?Sized>(&self, sc: &mut ScanCursor<'_, D, FSharpStyle>) {
        let word = sc.current_text();
        let text = word.as_str();
        if self.keywords.contains(0, text) {
            sc.change_state(FSharpStyle::Keyword);
        } else if self.keywords.contains(1, text) {
            sc.change_state(FSharpStyle::Type);
        } else if self.inside_attribute && matches!(sc.line_next_char(false), b':' | b'(' | b'>') {
            sc.change_state(FSharpStyle::Attribute);
        }
    }

    /// Start a one-byte escape such as `""` or `{{` inside `state`.
    fn escape_pair<D: Document + ?Sized>(&mut self, sc: &mut ScanCursor<'_, D, FSharpStyle>, state: FSharpStyle) {
        self.escape.enter(state, SIMPLE, 16);
        sc.set_state(FSharpStyle::EscapeChar);
        sc.forward();
    }

    fn string<D: Document + ?Sized>(&mut self, sc: &mut ScanCursor<'_, D, FSharpStyle>, state: FSharpStyle) -> Flow {
        let ch = sc.ch();
        if state == FSharpStyle::Character && sc.at_line_start() {
            sc.set_state(FSharpStyle::Default);
        } else if ch == b'\\' {
            let letter = sc.ch_next();
            if state.has_escapes() && !is_eol(letter) {
                let (budget, radix) = match letter {
                    b'x' => (HEX_PAIR, 16),
                    b'u' => (UNICODE_SHORT, 16),
                    b'U' => (UNICODE_LONG, 16),
                    _ if is_ascii_digit(letter) => (HEX_PAIR, 10),
                    _ => (SIMPLE, 16),
                };
                self.escape.enter(state, budget, radix);
                sc.set_state(FSharpStyle::EscapeChar);
                sc.forward();
            }
        } else if ch == state.quote() {
            if state.is_verbatim() && sc.ch_next() == b'"' {
                self.escape_pair(sc, state);
            } else if state.is_plain() || sc.match_next2(b'"', b'"') {
                if !state.is_plain() {
                    sc.forward_by(2);
                }
                if sc.ch_next() == b'B' {
                    sc.forward();
                }
                self.line.interpolators = 0;
                sc.forward_set_state(FSharpStyle::Default);
            }
        } else if state != FSharpStyle::Character {
            if sc.matches3(b':', b'/', b'/') && is_lower_case(sc.ch_prev()) {
                self.inside_url = true;
            } else if self.inside_url && is_invalid_url_char(ch) {
                self.inside_url = false;
            } else if ch == b'%' {
                return self.percent(sc, state);
            }
            if state.is_interpolated() {
                return self.brace(sc, state);
            }
        }
        Flow::Next
    }

    /// `%` inside a string: a printf-style specifier, or `%%`.
    fn percent<D: Document + ?Sized>(&mut self, sc: &mut ScanCursor<'_, D, FSharpStyle>, state: FSharpStyle) -> Flow {
        let interpolators = usize::from(self.line.interpolators);
        if state == FSharpStyle::InterpolatedTripleString && interpolators > 1 {
            // `$$"""`: a specifier needs exactly as many `%` as the string has `$`.
            let count = sc.matched_delimiter_count(b'%');
            if count != interpolators {
                sc.forward_by(count);
                return Flow::Repeat;
            }
            self.inside_url = false;
            sc.set_state(FSharpStyle::FormatSpecifier);
            sc.forward_by(count - 1);
        }
        let len = self.format_specifier_len(sc);
        if len != 0 || sc.state() == FSharpStyle::FormatSpecifier {
            sc.set_state(FSharpStyle::FormatSpecifier);
            sc.forward_by(len);
            sc.set_state(state);
            return Flow::Repeat;
        }
        Flow::Next
    }

    /// Length of the `%[flags][width][.precision]type` specifier at the
    /// cursor, or zero.
    fn format_specifier_len<D: Document + ?Sized>(&self, sc: &ScanCursor<'_, D, FSharpStyle>) -> usize {
        let next = sc.ch_next();
        if next == b'%' {
            return 2;
        }
        if self.inside_url && is_hex_digit(next) {
            // Percent-encoded URL.
            return 0;
        }
        if is_space_or_tab(next) && is_ascii_digit(sc.ch_prev()) {
            // "5% off"
            return 0;
        }
        let mut len = 1;
        while matches!(sc.relative(len), b'-' | b'+' | b' ' | b'0') {
            len += 1;
        }
        let digits = |mut len: usize| {
            if sc.relative(len) == b'*' {
                return len + 1;
            }
            while is_ascii_digit(sc.relative(len)) {
                len += 1;
            }
            len
        };
        len = digits(len);
        if sc.relative(len) == b'.' {
            len = digits(len + 1);
        }
        if is_format_type(sc.relative(len)) {
            len + 1
        } else {
            0
        }
    }

    /// `{` and `}` inside an interpolated string.
    fn brace<D: Document + ?Sized>(&mut self, sc: &mut ScanCursor<'_, D, FSharpStyle>, state: FSharpStyle) -> Flow {
        let plain = state.is_plain();
        let interpolators = usize::from(self.line.interpolators);
        match sc.ch() {
            b'{' if plain && sc.ch_next() == b'{' => self.escape_pair(sc, state),
            b'{' => {
                let count = sc.matched_delimiter_count(b'{');
                if plain || count >= interpolators {
                    self.line
                        .nested
                        .push(FSharpFrame::new(state, self.line.interpolators));
                    // Braces beyond the `$` count are string content.
                    sc.forward_by(count.saturating_sub(interpolators));
                    sc.set_state(FSharpStyle::Operator2);
                    sc.forward_by(interpolators.saturating_sub(1));
                    sc.forward_set_state(FSharpStyle::Default);
                    self.line.interpolators = 0;
                }
            }
            b'}' => {
                let count = if plain {
                    1
                } else {
                    sc.matched_delimiter_count(b'}')
                };
                let closing = !self.line.nested.is_empty() && count >= interpolators;
                if closing {
                    self.line.nested.pop();
                }
                if closing || (plain && sc.ch_next() != b'}') {
                    sc.set_state(FSharpStyle::Operator2);
                    sc.forward_by(interpolators.saturating_sub(1));
                    sc.forward_set_state(state);
                    sc.forward_by(count.saturating_sub(interpolators));
                    return Flow::Repeat;
                }
                if plain {
                    self.escape_pair(sc, state);
                }
            }
            _ => {}
        }
        Flow::Next
    }

    // ─── Token start ────────────────────────────────────────────────────

    fn start_token<D: Document + ?Sized>(&mut self, sc: &mut ScanCursor<'_, D, FSharpStyle>) -> Flow {
        let ch = sc.ch();
        let next = sc.ch_next();
        if sc.matches(b'(', b'*') {
            sc.set_state(FSharpStyle::Comment);
            sc.forward();
            if sc.ch_next() == b')' {
                sc.change_state(FSharpStyle::Operator);
            } else {
                self.line.comment_level = 1;
            }
        } else if sc.matches(b'/', b'/') {
            if self.visible == 0 {
                self.line.flags |= LineFlags::LINE_COMMENT;
            }
            sc.set_state(FSharpStyle::CommentLine);
            sc.forward();
            if sc.ch_next() == b'/' {
                sc.change_state(FSharpStyle::CommentLineDoc);
            }
        } else if ch == b'"' {
            self.inside_url = false;
            sc.set_state(FSharpStyle::String);
            if sc.match_next2(b'"', b'"') {
                sc.change_state(FSharpStyle::TripleString);
                sc.forward_by(2);
            }
        } else if ch == b'$' || ch == b'@' {
            self.string_prefix(sc);
        } else if ch == b'\'' {
            let style = if is_eol(next) {
                FSharpStyle::Operator
            } else if next != b'\\' && sc.char_after_next() != b'\'' {
                // `'a` is a type parameter, not a character.
                if is_identifier_start(next) {
                    FSharpStyle::Identifier
                } else {
                    FSharpStyle::Operator
                }
            } else {
                FSharpStyle::Character
            };
            sc.set_state(style);
        } else if sc.matches(b'`', b'`') {
            sc.set_state(FSharpStyle::Backtick);
            sc.forward();
        } else if sc.matches(b'<', b'@') {
            sc.set_state(FSharpStyle::Quotation);
            sc.forward();
        } else if is_number_start(ch, next) {
            sc.set_state(FSharpStyle::Number);
        } else if ch == b'#' && self.visible == 0 {
            sc.set_state(FSharpStyle::Preprocessor);
        } else if is_identifier_start(ch) {
            sc.set_state(FSharpStyle::Identifier);
        } else if is_graphic(ch) {
            return self.operator(sc, ch);
        }
        Flow::Next
    }

    /// `$"`, `@"`, `$@"`, `@$"`, `$"""` and `$$..."""`.
    fn string_prefix<D: Document + ?Sized>(&mut self, sc: &mut ScanCursor<'_, D, FSharpStyle>) {
        let ch = sc.ch();
        let next = sc.ch_next();
        self.inside_url = false;
        sc.set_state(FSharpStyle::Operator);
        if ch != next && (next == b'$' || next == b'@') {
            sc.forward();
            if sc.ch_next() == b'"' {
                self.line.interpolators = 1;
                sc.change_state(FSharpStyle::InterpolatedVerbatimString);
                sc.forward();
            }
        } else if next == b'"' {
            let interpolated = ch == b'$';
            self.line.interpolators = u8::from(interpolated);
            sc.change_state(if interpolated {
                FSharpStyle::InterpolatedString
            } else {
                FSharpStyle::VerbatimString
            });
            sc.forward();
            if interpolated && sc.match_next2(b'"', b'"') {
                sc.change_state(FSharpStyle::InterpolatedTripleString);
                sc.forward_by(2);
            }
        } else if next == b'$' {
            let count = sc.matched_delimiter_count(b'$');
            sc.forward_by(count - 1);
            if sc.match_next2(b'"', b'"') && sc.relative(3) == b'"' {
                self.line.interpolators = u8::try_from(count)
                    .unwrap_or(MAX_INTERPOLATORS)
                    .min(MAX_INTERPOLATORS);
                sc.change_state(FSharpStyle::InterpolatedTripleString);
                sc.forward_by(3);
            }
        }
    }

    /// Punctuation, which inside an interpolation may end it.
    fn operator<D: Document + ?Sized>(&mut self, sc: &mut ScanCursor<'_, D, FSharpStyle>, ch: u8) -> Flow {
        sc.set_state(FSharpStyle::Operator);
        if sc.matches(b'[', b'<') {
            self.inside_attribute = true;
        } else if sc.matches(b'>', b']') {
            self.inside_attribute = false;
        }
        let Some(frame) = self.line.nested.top_mut() else {
            return Flow::Next;
        };
        sc.change_state(FSharpStyle::Operator2);
        frame.bracket(ch);
        if frame.balance == 0 && is_interpolation_end(sc) {
            let frame = *frame;
            self.escape.outer = frame.outer;
            self.line.interpolators = frame.interpolators;
            sc.change_state(if ch == b'}' {
                frame.outer
            } else {
                FSharpStyle::FormatSpecifier
            });
            return Flow::Repeat;
        }
        Flow::Next
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
