//! VHDL.
//!
//! All keyword lists are matched case-insensitively. `--` comments run to
//! the line end (`--!` is a doc comment), `/* */` comments may span lines,
//! and a string still open at the line end is painted as unterminated.
//!
//! Fold words depend on the words around them: `end loop` closes one level
//! rather than opening one, `u1: entity work.x` is an instance and not a
//! declaration, and a `procedure` or `function` only folds once its `is`
//! shows up. The scan tracks that context in [`VhdlState`] and publishes
//! each line's keyword fold change there; `(`, `)` and block comments fold
//! from their styles.
//!
//! # Keyword lists
//!
//! 0. keywords, 1. operators, 2. attributes, 3. standard functions,
//! 4. standard packages, 5. standard types, 6. user words, 7. unused,
//! 8. fold words.

use tinct_core::char_class::{is_alpha_numeric, is_number_start, is_operator, is_space_char};
use tinct_core::{
    BitReader, BitWriter, CaseSensitivity, DecodeError, Document, FoldUnit, KeywordLists, Lexer,
    LineFlags, LineState, ScanCursor,
};

use crate::shared::{blank_flag, check_blank, line_flags};

tinct_core::style_table! {
    pub enum VhdlStyle {
        Default = "default",
        Comment = "comment",
        CommentLineBang = "comment_line_bang",
        BlockComment = "block_comment",
        Number = "number",
        Identifier = "identifier",
        Keyword = "keyword",
        StdOperator = "std_operator",
        Attribute = "attribute",
        StdFunction = "std_function",
        StdPackage = "std_package",
        StdType = "std_type",
        UserWord = "user_word",
        String = "string",
        StringEol = "string_eol",
        Operator = "operator",
    }
}

/// Default keyword lists, in list order.
pub const DEFAULT_KEYWORDS: [&str; 9] = [
    "access after alias all architecture array assert attribute begin block body buffer bus \
     case component configuration constant context disconnect downto else elsif end entity exit \
     file for force function generate generic group guarded if impure in inertial inout is \
     label library linkage literal loop map new next null of on open others out package \
     parameter port postponed procedure process protected pure range record register reject \
     release report return select severity shared signal subtype then to transport type \
     unaffected units until use variable wait when while with",
    "abs and mod nand nor not or rem rol ror sla sll sra srl xnor xor",
    "left right low high ascending image value pos val succ pred leftof rightof base range \
     reverse_range length delayed stable quiet transaction event active last_event \
     last_active last_value driving driving_value simple_name path_name instance_name",
    "now readline read writeline write endfile resolved to_bit to_bitvector to_stdulogic \
     to_stdlogicvector to_stdulogicvector to_x01 to_x01z to_ux01 rising_edge falling_edge \
     is_x shift_left shift_right rotate_left rotate_right resize to_integer to_unsigned \
     to_signed std_match to_01",
    "std ieee work standard textio std_logic_1164 std_logic_arith std_logic_misc \
     std_logic_signed std_logic_textio std_logic_unsigned numeric_bit numeric_std \
     math_complex math_real vital_primitives vital_timing",
    "boolean bit character severity_level integer real time delay_length natural positive \
     string bit_vector file_open_kind file_open_status line text side width std_ulogic \
     std_ulogic_vector std_logic std_logic_vector x01 x01z ux01 ux01z unsigned signed",
    "",
    "",
    "architecture begin block case component configuration elsif end entity function \
     generate loop package procedure process record then units",
];

/// [`DEFAULT_KEYWORDS`] as case-insensitive sets.
pub fn default_keywords() -> KeywordLists {
    KeywordLists::from_texts(DEFAULT_KEYWORDS, CaseSensitivity::Insensitive)
}

/// Deepest `(` nesting tracked while a subprogram waits for its `is`.
pub const MAX_PAREN: u8 = 7;

/// Largest keyword fold change one line records, in either direction.
pub const MAX_FOLD_DELTA: i8 = 15;

/// Identifier bytes.
const fn is_word_char(ch: u8) -> bool {
    is_alpha_numeric(ch) || ch == b'_'
}

/// Bytes continuing a number: `16#FF#`, `1.5e3`, `1_000`.
const fn is_number_char(ch: u8) -> bool {
    is_word_char(ch) || ch == b'.' || ch == b'#'
}

/// VHDL line state.
///
/// Layout, low bits first: line comment flag, block comment resume flag,
/// `after_end`, `after_colon`, `awaiting_is`, 3 bits of `paren`, the sign
/// and 4 bits of magnitude of `fold_delta`, blank line flag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VhdlState {
    pub flags: LineFlags,
    pub in_block_comment: bool,
    /// The last fold word was `end` and no `;` followed it yet.
    pub after_end: bool,
    /// The last byte outside comments and whitespace was `:`.
    pub after_colon: bool,
    /// A `procedure` or `function` has not reached its `is` or `;`.
    pub awaiting_is: bool,
    /// Open `(` since that subprogram word.
    pub paren: u8,
    /// Keyword fold change of this line.
    pub fold_delta: i8,
}

impl LineState for VhdlState {
    type Style = VhdlStyle;

    fn encode(&self) -> u32 {
        let delta = self.fold_delta.clamp(-MAX_FOLD_DELTA, MAX_FOLD_DELTA);
        BitWriter::new()
            .put_flag(self.flags.contains(LineFlags::LINE_COMMENT))
            .put_flag(self.in_block_comment)
            .put_flag(self.after_end)
            .put_flag(self.after_colon)
            .put_flag(self.awaiting_is)
            .put(3, u32::from(self.paren.min(MAX_PAREN)))
            .put_flag(delta < 0)
            .put(4, u32::from(delta.unsigned_abs()))
            .put_flag(self.flags.contains(LineFlags::BLANK))
            .finish()
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        reason = "fields are at most four bits wide"
    )]
    fn decode(raw: u32) -> Result<Self, DecodeError> {
        let mut reader = BitReader::new(raw);
        let mut flags = LineFlags::empty();
        flags.set(LineFlags::LINE_COMMENT, reader.take_flag());
        let in_block_comment = reader.take_flag();
        let after_end = reader.take_flag();
        let after_colon = reader.take_flag();
        let awaiting_is = reader.take_flag();
        let paren = reader.take(3) as u8;
        let negative = reader.take_flag();
        let magnitude = reader.take(4) as i8;
        flags.set(LineFlags::BLANK, reader.take_flag());
        reader.finish()?;

        let state = Self {
            flags,
            in_block_comment,
            after_end,
            after_colon,
            awaiting_is,
            paren,
            fold_delta: if negative { -magnitude } else { magnitude },
        };
        check_blank(flags, state.resume_style())?;
        if negative && magnitude == 0 {
            return Err(DecodeError("negative zero fold delta"));
        }
        if paren > 0 && !awaiting_is {
            return Err(DecodeError("open parenthesis outside a subprogram header"));
        }
        Ok(state)
    }

    fn resume_style(&self) -> VhdlStyle {
        if self.in_block_comment {
            VhdlStyle::BlockComment
        } else {
            VhdlStyle::Default
        }
    }

    fn flags(&self) -> LineFlags {
        line_flags(self.flags, self.resume_style())
    }

    fn fold_delta(&self) -> i32 {
        i32::from(self.fold_delta)
    }
}

/// The VHDL lexer.
#[derive(Clone, Copy, Debug, Default)]
pub struct Vhdl;

impl Lexer for Vhdl {
    type Style = VhdlStyle;
    type State = VhdlState;

    const NAME: &'static str = "vhdl";

    fn lex<D: Document + ?Sized>(
        &self,
        sc: &mut ScanCursor<'_, D, VhdlStyle>,
        initial: &VhdlState,
        keywords: &KeywordLists,
    ) {
        let mut scan = VhdlScan {
            keywords,
            line: VhdlState {
                flags: LineFlags::empty(),
                fold_delta: 0,
                ..initial.clone()
            },
            visible: 0,
            colon_before_word: false,
        };
        scan.run(sc);
    }

    fn fold_unit(&self, style: VhdlStyle) -> FoldUnit {
        match style {
            VhdlStyle::BlockComment => FoldUnit::Span(0),
            VhdlStyle::Operator => FoldUnit::Brackets {
                open: b"(",
                close: b")",
            },
            _ => FoldUnit::Ignore,
        }
    }

    fn is_space_equiv(&self, style: VhdlStyle) -> bool {
        style <= VhdlStyle::BlockComment
    }
}

struct VhdlScan<'k> {
    keywords: &'k KeywordLists,
    line: VhdlState,
    visible: usize,
    /// `after_colon` as it stood when the current word started.
    colon_before_word: bool,
}

impl VhdlScan<'_> {
    fn run<D: Document + ?Sized>(&mut self, sc: &mut ScanCursor<'_, D, VhdlStyle>) {
        while sc.more() {
            self.continue_token(sc);
            if sc.state() == VhdlStyle::Default {
                self.start_token(sc);
            }

            let ch = sc.ch();
            if !is_space_char(ch) {
                self.visible += 1;
                let comment = matches!(
                    sc.state(),
                    VhdlStyle::Comment | VhdlStyle::CommentLineBang | VhdlStyle::BlockComment
                );
                if !comment {
                    self.line.after_colon = ch == b':';
                }
            }
            if sc.at_line_end() {
                if sc.state() == VhdlStyle::String {
                    sc.change_state(VhdlStyle::StringEol);
                }
                self.line.in_block_comment = sc.state() == VhdlStyle::BlockComment;
                self.line.flags |= blank_flag(self.visible, self.line.resume_style());
                sc.set_line_state(self.line.encode());
                self.line.flags = LineFlags::empty();
                self.line.fold_delta = 0;
                self.visible = 0;
            }
            sc.forward();
        }
    }

    fn continue_token<D: Document + ?Sized>(&mut self, sc: &mut ScanCursor<'_, D, VhdlStyle>) {
        match sc.state() {
            VhdlStyle::Operator | VhdlStyle::StringEol => sc.set_state(VhdlStyle::Default),
            VhdlStyle::Number => {
                if !is_number_char(sc.ch()) {
                    sc.set_state(VhdlStyle::Default);
                }
            }
            VhdlStyle::Identifier => {
                if !is_word_char(sc.ch()) {
                    self.classify_identifier(sc);
                    sc.set_state(VhdlStyle::Default);
                }
            }
            VhdlStyle::Comment | VhdlStyle::CommentLineBang => {
                if sc.at_line_start() {
                    sc.set_state(VhdlStyle::Default);
                }
            }
            VhdlStyle::String => {
                if sc.ch() == b'\\' {
                    if matches!(sc.ch_next(), b'"' | b'\'' | b'\\') {
                        sc.forward();
                    }
                } else if sc.ch() == b'"' {
                    sc.forward_set_state(VhdlStyle::Default);
                }
            }
            VhdlStyle::BlockComment => {
                if sc.matches(b'*', b'/') {
                    sc.forward();
                    sc.forward_set_state(VhdlStyle::Default);
                }
            }
            _ => {}
        }
    }

    fn classify_identifier<D: Document + ?Sized>(&mut self, sc: &mut ScanCursor<'_, D, VhdlStyle>) {
        let word = sc.current_lowered();
        let text = word.as_str();
        let style = [
            VhdlStyle::Keyword,
            VhdlStyle::StdOperator,
            VhdlStyle::Attribute,
            VhdlStyle::StdFunction,
            VhdlStyle::StdPackage,
            VhdlStyle::StdType,
            VhdlStyle::UserWord,
        ]
        .into_iter()
        .enumerate()
        .find_map(|(index, style)| self.keywords.contains(index, text).then_some(style));
        if let Some(style) = style {
            sc.change_state(style);
        }
        self.fold_word(text);
    }

    /// Apply the fold rules for a completed word.
    fn fold_word(&mut self, word: &str) {
        let line = &mut self.line;
        if line.awaiting_is && line.paren == 0 && word == "is" {
            line.awaiting_is = false;
            line.fold_delta = line.fold_delta.saturating_add(1);
            return;
        }
        if !self.keywords.contains(8, word) {
            return;
        }
        let opens = match word {
            "architecture" | "block" | "case" | "generate" | "loop" | "package" | "process"
            | "record" | "then" | "units" => !line.after_end,
            // `label: entity work.unit` instantiates rather than declares.
            "component" | "configuration" | "entity" => {
                !line.after_end && !self.colon_before_word
            }
            "function" | "procedure" => {
                if !line.after_end {
                    line.awaiting_is = true;
                    line.paren = 0;
                }
                false
            }
            "elsif" | "end" => {
                line.fold_delta = line.fold_delta.saturating_sub(1);
                false
            }
            _ => false,
        };
        if opens {
            line.fold_delta = line.fold_delta.saturating_add(1);
        }
        line.after_end = word == "end";
    }

    fn start_token<D: Document + ?Sized>(&mut self, sc: &mut ScanCursor<'_, D, VhdlStyle>) {
        let ch = sc.ch();
        if is_number_start(ch, sc.ch_next()) {
            sc.set_state(VhdlStyle::Number);
        } else if is_word_char(ch) {
            self.colon_before_word = self.line.after_colon;
            sc.set_state(VhdlStyle::Identifier);
        } else if sc.matches(b'-', b'-') {
            if self.visible == 0 {
                self.line.flags |= LineFlags::LINE_COMMENT;
            }
            let style = if sc.relative(2) == b'!' {
                VhdlStyle::CommentLineBang
            } else {
                VhdlStyle::Comment
            };
            sc.set_state(style);
        } else if sc.matches(b'/', b'*') {
            sc.set_state(VhdlStyle::BlockComment);
            sc.forward();
        } else if ch == b'"' {
            sc.set_state(VhdlStyle::String);
        } else if is_operator(ch) {
            sc.set_state(VhdlStyle::Operator);
            self.operator(ch);
        }
    }

    fn operator(&mut self, ch: u8) {
        let line = &mut self.line;
        match ch {
            b';' => {
                line.after_end = false;
                if line.paren == 0 {
                    line.awaiting_is = false;
                }
            }
            b'(' if line.awaiting_is => line.paren = (line.paren + 1).min(MAX_PAREN),
            b')' => line.paren = line.paren.saturating_sub(1),
            _ => {}
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
