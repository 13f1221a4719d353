//! CMake.
//!
//! Commands are matched case-insensitively and only when a `(` follows,
//! possibly on a later line. Arguments are free text; upper-case words are
//! looked up in the case-sensitive parameter, property, variable and value
//! lists. Variable references and generator expressions nest and may
//! appear inside quoted arguments.
//!
//! # Keyword lists
//!
//! 0. keywords (`if`, `function`, ...), 1. commands, 2. parameters,
//! 3. properties, 4. variables, 5. values.

mod state;

pub use state::{CMakeState, Outer, UserDefined, MAX_DEPTH};

use tinct_core::char_class::{
    is_ascii_digit, is_eol, is_identifier_char, is_identifier_start, is_number_start,
    is_space_char, is_upper_case,
};
use tinct_core::{
    CaseSensitivity, Document, FoldUnit, KeywordLists, KeywordSet, Lexer, LineFlags, LineState,
    ScanCursor,
};

use crate::shared::{blank_flag, highlight_task_marker, Flow};

tinct_core::style_table! {
    pub enum CMakeStyle {
        Default = "default",
        Comment = "comment",
        BlockComment = "block_comment",
        TaskMarker = "task_marker",
        Operator = "operator",
        Number = "number",
        Identifier = "identifier",
        Word = "word",
        Commands = "commands",
        Function = "function",
        Macro = "macro",
        Parameters = "parameters",
        Properties = "properties",
        Variable = "variable",
        Values = "values",
        String = "string",
        EscapeSequence = "escape_sequence",
        LineContinue = "line_continue",
        VariableDollar = "variable_dollar",
        VariableAt = "variable_at",
        BracketArgument = "bracket_argument",
    }
}

/// Default keyword lists, in list order.
pub const DEFAULT_KEYWORDS: [&str; 6] = [
    "block break continue else elseif endblock endforeach endfunction endif endmacro endwhile \
     foreach function if macro return while",
    "add_compile_definitions add_compile_options add_custom_command add_custom_target \
     add_definitions add_dependencies add_executable add_library add_subdirectory add_test \
     cmake_minimum_required cmake_parse_arguments cmake_policy configure_file enable_testing \
     execute_process file find_library find_package find_path find_program \
     get_filename_component get_property include include_directories install list message \
     option project set set_property set_target_properties string target_compile_definitions \
     target_compile_features target_compile_options target_include_directories \
     target_link_libraries target_sources unset",
    "AFTER ALIAS APPEND BEFORE COMMAND COMPONENTS CONFIG DEPENDS DESTINATION FATAL_ERROR GLOB \
     GLOB_RECURSE IMPORTED INTERFACE NAME OPTIONAL PRIVATE PROPERTIES PUBLIC QUIET REQUIRED \
     SEND_ERROR SHARED STATIC STATUS TARGETS VERSION WARNING WORKING_DIRECTORY",
    "COMPILE_DEFINITIONS COMPILE_OPTIONS CXX_STANDARD CXX_STANDARD_REQUIRED FOLDER \
     INCLUDE_DIRECTORIES LINK_LIBRARIES OUTPUT_NAME POSITION_INDEPENDENT_CODE SOURCES",
    "APPLE CMAKE_BINARY_DIR CMAKE_BUILD_TYPE CMAKE_CURRENT_BINARY_DIR CMAKE_CURRENT_SOURCE_DIR \
     CMAKE_CXX_COMPILER CMAKE_CXX_FLAGS CMAKE_CXX_STANDARD CMAKE_INSTALL_PREFIX \
     CMAKE_MODULE_PATH CMAKE_SOURCE_DIR CMAKE_SYSTEM_NAME MSVC PROJECT_NAME PROJECT_SOURCE_DIR \
     UNIX WIN32",
    "AND DEFINED EQUAL EXISTS FALSE IGNORE MATCHES N NO NOT NOTFOUND OFF ON OR STREQUAL TRUE \
     VERSION_LESS Y YES",
];

/// [`DEFAULT_KEYWORDS`] with commands case-insensitive and the upper-case
/// lists case-sensitive.
pub fn default_keywords() -> KeywordLists {
    KeywordLists::new(
        DEFAULT_KEYWORDS
            .iter()
            .enumerate()
            .map(|(index, words)| {
                let case = if index < 2 {
                    CaseSensitivity::Insensitive
                } else {
                    CaseSensitivity::Sensitive
                };
                KeywordSet::new(words, case)
            })
            .collect(),
    )
}

const fn is_cmake_operator(ch: u8) -> bool {
    matches!(
        ch,
        b'(' | b')' | b'=' | b':' | b';' | b'$' | b'<' | b'>' | b','
    )
}

const fn is_cmake_char(ch: u8) -> bool {
    is_identifier_char(ch) || ch == b'.' || ch == b'-' || ch == b'+'
}

/// The CMake lexer.
#[derive(Clone, Copy, Debug, Default)]
pub struct CMake;

impl Lexer for CMake {
    type Style = CMakeStyle;
    type State = CMakeState;

    const NAME: &'static str = "cmake";

    fn lex<D: Document + ?Sized>(
        &self,
        sc: &mut ScanCursor<'_, D, CMakeStyle>,
        initial: &CMakeState,
        keywords: &KeywordLists,
    ) {
        let mut scan = CMakeScan {
            keywords,
            line: CMakeState {
                flags: LineFlags::empty(),
                ..initial.clone()
            },
            before_number: 0,
            identifier_start: 0,
            visible: 0,
        };
        scan.run(sc);
    }

    fn fold_unit(&self, style: CMakeStyle) -> FoldUnit {
        match style {
            CMakeStyle::BlockComment => FoldUnit::Span(0),
            CMakeStyle::BracketArgument => FoldUnit::Span(1),
            CMakeStyle::Operator => FoldUnit::Brackets {
                open: b"(",
                close: b")",
            },
            CMakeStyle::Word => FoldUnit::Word,
            _ => FoldUnit::Ignore,
        }
    }

    fn is_space_equiv(&self, style: CMakeStyle) -> bool {
        style <= CMakeStyle::TaskMarker
    }

    fn keyword_fold(&self, word: &[u8]) -> i32 {
        if word.starts_with(b"end") {
            -1
        } else if matches!(word, b"if" | b"function" | b"macro" | b"foreach" | b"while") {
            1
        } else {
            0
        }
    }
}

struct CMakeScan<'k> {
    keywords: &'k KeywordLists,
    line: CMakeState,
    before_number: u8,
    identifier_start: u8,
    visible: usize,
}

impl CMakeScan<'_> {
    fn run<D: Document + ?Sized>(&mut self, sc: &mut ScanCursor<'_, D, CMakeStyle>) {
        while sc.more() {
            if self.continue_token(sc) == Flow::Repeat {
                continue;
            }
            if sc.state() == CMakeStyle::Default && self.start_token(sc) == Flow::Repeat {
                continue;
            }

            if !is_space_char(sc.ch()) {
                self.visible += 1;
            }
            if sc.at_line_end() {
                self.line.resume = match sc.state() {
                    state @ (CMakeStyle::String
                    | CMakeStyle::BlockComment
                    | CMakeStyle::BracketArgument
                    | CMakeStyle::Variable
                    | CMakeStyle::EscapeSequence) => state,
                    _ => CMakeStyle::Default,
                };
                self.line.flags |= blank_flag(self.visible, self.line.resume);
                sc.set_line_state(self.line.encode());
                self.line.flags = LineFlags::empty();
                self.visible = 0;
            }
            sc.forward();
        }
    }

    /// `=` count after the bracket at `offset` and the byte following them.
    fn bracket_at<D: Document + ?Sized>(sc: &ScanCursor<'_, D, CMakeStyle>, offset: usize) -> (usize, u8) {
        let mut count = 0;
        while sc.relative(offset + 1 + count) == b'=' {
            count += 1;
        }
        (count, sc.relative(offset + 1 + count))
    }

    /// `[=*[` at `offset`; records its width on success.
    fn open_bracket<D: Document + ?Sized>(&mut self, sc: &ScanCursor<'_, D, CMakeStyle>, offset: usize) -> bool {
        let (count, after) = Self::bracket_at(sc, offset);
        match u8::try_from(count) {
            Ok(width) if after == b'[' => {
                self.line.bracket = width;
                true
            }
            _ => false,
        }
    }

    /// Close a bracket argument or block comment on a matching `]=*]`.
    fn close_bracket<D: Document + ?Sized>(&mut self, sc: &mut ScanCursor<'_, D, CMakeStyle>) {
        if sc.ch() != b']' || !matches!(sc.ch_next(), b'=' | b']') {
            return;
        }
        let (count, after) = Self::bracket_at(sc, 0);
        if after == b']' && count == usize::from(self.line.bracket) {
            sc.forward_by(1 + count);
            sc.forward_set_state(CMakeStyle::Default);
            self.line.bracket = 0;
        }
    }

    fn continue_token<D: Document + ?Sized>(&mut self, sc: &mut ScanCursor<'_, D, CMakeStyle>) -> Flow {
        match sc.state() {
            CMakeStyle::Operator => sc.set_state(CMakeStyle::Default),
            CMakeStyle::Number => {
                if !is_number_start(sc.ch(), sc.ch_next()) {
                    // `1.2.3-beta`, `-O2` and friends are plain arguments.
                    if is_cmake_char(sc.ch()) || is_cmake_char(self.before_number) {
                        sc.change_state(CMakeStyle::Default);
                    }
                    sc.set_state(CMakeStyle::Default);
                }
            }
            CMakeStyle::Identifier => {
                if !(is_identifier_char(sc.ch()) || sc.ch() == b'-') {
                    self.identifier_end(sc);
                }
            }
            CMakeStyle::Comment => {
                if sc.at_line_start() {
                    sc.set_state(CMakeStyle::Default);
                } else if highlight_task_marker(sc, CMakeStyle::TaskMarker) {
                    return Flow::Repeat;
                }
            }
            CMakeStyle::BlockComment => {
                if highlight_task_marker(sc, CMakeStyle::TaskMarker) {
                    return Flow::Repeat;
                }
                self.close_bracket(sc);
            }
            CMakeStyle::BracketArgument => self.close_bracket(sc),
            CMakeStyle::String => return self.string(sc),
            CMakeStyle::EscapeSequence => {
                if sc.ch() == b'\\' {
                    if is_eol(sc.ch_next()) {
                        sc.set_state(CMakeStyle::LineContinue);
                        sc.forward_set_state(self.line.outer.style());
                    } else {
                        sc.forward();
                    }
                } else {
                    sc.set_state(self.line.outer.style());
                    return Flow::Repeat;
                }
            }
            CMakeStyle::Variable => {
                if sc.ch() == b'}' {
                    self.line.var_depth = self.line.var_depth.saturating_sub(1);
                    if self.line.var_depth == 0 {
                        sc.forward_set_state(self.line.outer.style());
                        return Flow::Repeat;
                    }
                } else if sc.matches(b'$', b'{') {
                    self.line.var_depth = (self.line.var_depth + 1).min(MAX_DEPTH);
                }
            }
            state @ (CMakeStyle::VariableDollar | CMakeStyle::VariableAt) => {
                if !is_identifier_char(sc.ch()) {
                    if state == CMakeStyle::VariableAt {
                        if sc.ch() == b'@' {
                            sc.forward();
                        }
                    } else if sc.ch() == b'{' && matches!(sc.current_text().as_str(), "$ENV" | "$CACHE") {
                        sc.set_state(CMakeStyle::Variable);
                        self.line.var_depth = 1;
                        return Flow::Next;
                    }
                    sc.set_state(self.line.outer.style());
                    return Flow::Repeat;
                }
            }
            _ => {}
        }
        Flow::Next
    }

    fn string<D: Document + ?Sized>(&mut self, sc: &mut ScanCursor<'_, D, CMakeStyle>) -> Flow {
        let ch = sc.ch();
        if ch == b'\\' {
            if is_eol(sc.ch_next()) {
                sc.set_state(CMakeStyle::LineContinue);
                sc.forward_set_state(CMakeStyle::String);
            } else {
                sc.set_state(CMakeStyle::EscapeSequence);
                sc.forward();
            }
        } else if sc.matches(b'$', b'{') {
            self.line.var_depth = 1;
            sc.set_state(CMakeStyle::Variable);
        } else if sc.matches(b'$', b'<') {
            self.line.generator_depth = 1;
            sc.set_state(CMakeStyle::Operator);
        } else if (ch == b'$' || ch == b'@') && is_identifier_start(sc.ch_next()) {
            sc.set_state(if ch == b'$' {
                CMakeStyle::VariableDollar
            } else {
                CMakeStyle::VariableAt
            });
        } else if self.line.generator_depth != 0 && is_cmake_operator(ch) {
            if ch == b'>' {
                self.line.generator_depth -= 1;
            }
            sc.set_state(CMakeStyle::Operator);
            sc.forward_set_state(CMakeStyle::String);
            return Flow::Repeat;
        } else if ch == b'"' {
            sc.forward_set_state(CMakeStyle::Default);
            self.line.outer = Outer::Default;
        }
        Flow::Next
    }

    fn identifier_end<D: Document + ?Sized>(&mut self, sc: &mut ScanCursor<'_, D, CMakeStyle>) {
        let keywords = self.keywords;
        if sc.doc_next_char(false) == b'(' {
            let lowered = sc.current_lowered();
            let text = lowered.as_str();
            self.line.user_defined = UserDefined::None;
            if keywords.contains_with_suffix(0, text, b'(') {
                sc.change_state(CMakeStyle::Word);
                self.line.user_defined = match text {
                    "function" => UserDefined::Function,
                    "macro" => UserDefined::Macro,
                    _ => UserDefined::None,
                };
            } else if keywords.contains_with_suffix(1, text, b'(') {
                sc.change_state(CMakeStyle::Commands);
            } else {
                sc.change_state(CMakeStyle::Function);
            }
        } else if let Some(style) = self.line.user_defined.style() {
            sc.change_state(style);
            self.line.user_defined = UserDefined::None;
        } else if is_upper_case(self.identifier_start) {
            let word = sc.current_text();
            let text = word.as_str();
            if keywords.contains(2, text) {
                sc.change_state(CMakeStyle::Parameters);
            } else if keywords.contains(3, text) {
                sc.change_state(CMakeStyle::Properties);
            } else if keywords.contains(4, text) {
                sc.change_state(CMakeStyle::Variable);
            } else if keywords.contains(5, text) {
                sc.change_state(CMakeStyle::Values);
            }
        }
        sc.set_state(CMakeStyle::Default);
    }

    fn start_token<D: Document + ?Sized>(&mut self, sc: &mut ScanCursor<'_, D, CMakeStyle>) -> Flow {
        let ch = sc.ch();
        let next = sc.ch_next();
        let resume_outer = if self.line.generator_depth != 0 {
            self.line.outer
        } else {
            Outer::Default
        };

        if ch == b'#' {
            if next == b'[' && self.open_bracket(sc, 1) {
                sc.set_state(CMakeStyle::BlockComment);
                sc.forward_by(2 + usize::from(self.line.bracket));
            } else {
                sc.set_state(CMakeStyle::Comment);
                if self.visible == 0 {
                    self.line.flags |= LineFlags::LINE_COMMENT;
                }
            }
        } else if ch == b'[' && (next == b'=' || next == b'[') {
            if self.open_bracket(sc, 0) {
                sc.set_state(CMakeStyle::BracketArgument);
                sc.forward_by(1 + usize::from(self.line.bracket));
            }
        } else if sc.matches(b'/', b'/') {
            // CMakeCache.txt comments.
            sc.set_state(CMakeStyle::Comment);
            if self.visible == 0 {
                self.line.flags |= LineFlags::LINE_COMMENT;
            }
        } else if ch == b'"' {
            self.line.outer = Outer::String;
            sc.set_state(CMakeStyle::String);
        } else if sc.matches(b'$', b'{') {
            self.line.var_depth = 1;
            self.line.outer = resume_outer;
            sc.set_state(CMakeStyle::Variable);
        } else if (ch == b'$' || ch == b'@') && is_identifier_start(next) {
            self.line.outer = resume_outer;
            sc.set_state(if ch == b'$' {
                CMakeStyle::VariableDollar
            } else {
                CMakeStyle::VariableAt
            });
            sc.forward();
        } else if ch == b'\\' {
            sc.set_state(CMakeStyle::EscapeSequence);
            sc.forward();
        } else if is_identifier_start(ch) {
            self.identifier_start = ch;
            sc.set_state(CMakeStyle::Identifier);
        } else if is_ascii_digit(ch) || (ch == b'-' && is_ascii_digit(next)) {
            sc.set_state(CMakeStyle::Number);
            self.before_number = sc.ch_prev();
        } else if is_cmake_operator(ch) {
            sc.set_state(CMakeStyle::Operator);
            if self.line.generator_depth != 0 {
                if sc.matches(b'$', b'<') {
                    self.line.generator_depth = (self.line.generator_depth + 1).min(MAX_DEPTH);
                } else if ch == b'>' {
                    self.line.generator_depth -= 1;
                    sc.forward_set_state(if self.line.generator_depth != 0 {
                        CMakeStyle::Default
                    } else {
                        self.line.outer.style()
                    });
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
mod tests;
