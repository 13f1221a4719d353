use pretty_assertions::assert_eq;

use super::*;
use crate::test_helpers::{assert_resumes, highlight, level_pairs, runs, style_of};
use tinct_core::TextDocument;

fn cmake(text: &str) -> TextDocument {
    highlight(&CMake, &default_keywords(), text)
}

fn state(doc: &TextDocument, line: usize) -> CMakeState {
    CMakeState::decode(doc.line_states()[line]).unwrap()
}

// === Line state ===

#[test]
fn state_round_trips() {
    let state = CMakeState {
        flags: LineFlags::LINE_COMMENT,
        resume: CMakeStyle::Variable,
        outer: Outer::String,
        bracket: 200,
        var_depth: 3,
        generator_depth: 15,
        user_defined: UserDefined::Macro,
    };
    assert_eq!(CMakeState::decode(state.encode()), Ok(state));
    assert_eq!(CMakeState::default().encode(), 0);
}

#[test]
fn decode_rejects_impossible_states() {
    // Resume index past the table.
    assert!(CMakeState::decode(6 << 1).is_err());
    // Variable resume without depth.
    assert!(CMakeState::decode(4 << 1).is_err());
    // Unknown user-defined kind.
    assert!(CMakeState::decode(3 << 21).is_err());
    // Blank line that is also a comment.
    assert!(CMakeState::decode(1 << 23 | 1).is_err());
    assert!(CMakeState::decode(1 << 24).is_err());
}

// === Commands ===

#[test]
fn commands_keywords_and_arguments() {
    let doc = cmake("if(WIN32)\n  message(STATUS \"hi ${NAME}\")\nendif()\n");
    assert_eq!(
        runs::<CMake>(&doc),
        vec![
            ("if".to_string(), CMakeStyle::Word),
            ("(".to_string(), CMakeStyle::Operator),
            ("WIN32".to_string(), CMakeStyle::Variable),
            (")".to_string(), CMakeStyle::Operator),
            ("message".to_string(), CMakeStyle::Commands),
            ("(".to_string(), CMakeStyle::Operator),
            ("STATUS".to_string(), CMakeStyle::Parameters),
            ("\"hi ".to_string(), CMakeStyle::String),
            ("${NAME}".to_string(), CMakeStyle::Variable),
            ("\"".to_string(), CMakeStyle::String),
            (")".to_string(), CMakeStyle::Operator),
            ("endif".to_string(), CMakeStyle::Word),
            ("()".to_string(), CMakeStyle::Operator),
        ]
    );
    assert_eq!(level_pairs(&doc), vec![(0, 1), (1, 1), (1, 0), (0, 0)]);
}

#[test]
fn commands_ignore_case() {
    let doc = cmake("IF(x)\nENDIF()\nAdd_Executable(app)\n");
    assert_eq!(style_of::<CMake>(&doc, "IF"), CMakeStyle::Word);
    assert_eq!(style_of::<CMake>(&doc, "ENDIF"), CMakeStyle::Word);
    assert_eq!(style_of::<CMake>(&doc, "Add_Executable"), CMakeStyle::Commands);
    assert_eq!(level_pairs(&doc), vec![(0, 1), (1, 0), (0, 0), (0, 0)]);
}

#[test]
fn command_paren_on_a_later_line() {
    let doc = cmake("add_executable\n  (app main.cpp)\n");
    assert_eq!(style_of::<CMake>(&doc, "add_executable"), CMakeStyle::Commands);
    assert_eq!(style_of::<CMake>(&doc, "app"), CMakeStyle::Identifier);
}

#[test]
fn user_defined_names() {
    let doc = cmake("function(my_func ARG)\nendfunction()\nmacro(my_macro)\nendmacro()\nmy_func(x)\n");
    assert_eq!(style_of::<CMake>(&doc, "my_func "), CMakeStyle::Function);
    assert_eq!(style_of::<CMake>(&doc, "ARG"), CMakeStyle::Identifier);
    assert_eq!(style_of::<CMake>(&doc, "my_macro"), CMakeStyle::Macro);
    assert_eq!(style_of::<CMake>(&doc, "my_func(x"), CMakeStyle::Function);
    assert_eq!(
        level_pairs(&doc),
        vec![(0, 1), (1, 0), (0, 1), (1, 0), (0, 0), (0, 0)]
    );
}

#[test]
fn user_defined_name_on_the_next_line() {
    let text = "function(\n  foo bar)\nendfunction()\n";
    let doc = cmake(text);
    assert_eq!(state(&doc, 0).user_defined, UserDefined::Function);
    assert_eq!(style_of::<CMake>(&doc, "foo"), CMakeStyle::Function);
    assert_eq!(style_of::<CMake>(&doc, "bar"), CMakeStyle::Identifier);
    assert_resumes(&CMake, &default_keywords(), text);
}

// === Arguments ===

#[test]
fn numbers_only_when_standing_alone() {
    let doc = cmake("set(V 1.2.3 1a -5 a-1)\n");
    assert_eq!(style_of::<CMake>(&doc, "1.2.3"), CMakeStyle::Number);
    assert_eq!(style_of::<CMake>(&doc, "1a"), CMakeStyle::Default);
    assert_eq!(style_of::<CMake>(&doc, "a "), CMakeStyle::Identifier);
    assert_eq!(style_of::<CMake>(&doc, "-5"), CMakeStyle::Number);
    assert_eq!(style_of::<CMake>(&doc, "a-1"), CMakeStyle::Identifier);
    assert_eq!(style_of::<CMake>(&doc, "-1)"), CMakeStyle::Identifier);
}

#[test]
fn variable_references() {
    let doc = cmake("set(A $ENV{HOME} @at@ $var)\nmessage(${a${b}} done)\n");
    assert_eq!(style_of::<CMake>(&doc, "$ENV"), CMakeStyle::VariableDollar);
    assert_eq!(style_of::<CMake>(&doc, "{HOME}"), CMakeStyle::Variable);
    assert_eq!(style_of::<CMake>(&doc, "@at@"), CMakeStyle::VariableAt);
    assert_eq!(style_of::<CMake>(&doc, "at@ "), CMakeStyle::VariableAt);
    assert_eq!(style_of::<CMake>(&doc, "$var"), CMakeStyle::VariableDollar);
    assert_eq!(style_of::<CMake>(&doc, "}} "), CMakeStyle::Variable);
    assert_eq!(style_of::<CMake>(&doc, "} done"), CMakeStyle::Variable);
    assert_eq!(style_of::<CMake>(&doc, "done"), CMakeStyle::Identifier);
}

#[test]
fn variable_reference_spans_lines() {
    let text = "set(x ${a\nb})\n";
    let doc = cmake(text);
    let first = state(&doc, 0);
    assert_eq!(first.resume, CMakeStyle::Variable);
    assert_eq!(first.var_depth, 1);
    assert_eq!(style_of::<CMake>(&doc, "b}"), CMakeStyle::Variable);
    assert_eq!(style_of::<CMake>(&doc, ")\n"), CMakeStyle::Operator);
    assert_resumes(&CMake, &default_keywords(), text);
}

#[test]
fn generator_expressions_nest_inside_strings() {
    let doc = cmake("target_compile_definitions(app PRIVATE \"$<$<CONFIG:Debug>:DBG>\")\n");
    assert_eq!(style_of::<CMake>(&doc, "PRIVATE"), CMakeStyle::Parameters);
    assert_eq!(style_of::<CMake>(&doc, "\"$"), CMakeStyle::String);
    assert_eq!(style_of::<CMake>(&doc, "$<$"), CMakeStyle::Operator);
    assert_eq!(style_of::<CMake>(&doc, "CONFIG"), CMakeStyle::Parameters);
    assert_eq!(style_of::<CMake>(&doc, "Debug"), CMakeStyle::Identifier);
    assert_eq!(style_of::<CMake>(&doc, ">:"), CMakeStyle::Operator);
    assert_eq!(style_of::<CMake>(&doc, "DBG"), CMakeStyle::Identifier);
    assert_eq!(style_of::<CMake>(&doc, "\")"), CMakeStyle::String);
    let end = state(&doc, 0);
    assert_eq!(end.generator_depth, 0);
    assert_eq!(end.outer, Outer::Default);
}

#[test]
fn escapes_and_line_continuation() {
    let text = "set(s \"a\\n\\\nb\")\n";
    let doc = cmake(text);
    assert_eq!(style_of::<CMake>(&doc, "\\n"), CMakeStyle::EscapeSequence);
    assert_eq!(style_of::<CMake>(&doc, "\\\n"), CMakeStyle::LineContinue);
    assert_eq!(state(&doc, 0).resume, CMakeStyle::String);
    assert_eq!(style_of::<CMake>(&doc, "b\""), CMakeStyle::String);
    assert_resumes(&CMake, &default_keywords(), text);
}

#[test]
fn unquoted_escape_at_line_end_resumes() {
    let text = "set(x a\\\n\\\nb)\n";
    let doc = cmake(text);
    assert_eq!(state(&doc, 0).resume, CMakeStyle::EscapeSequence);
    assert_resumes(&CMake, &default_keywords(), text);
}

// === Brackets and comments ===

#[test]
fn bracket_arguments_match_their_width() {
    let text = "set(x [==[a\n]]\nb]==])\n#[[c\nd]]\n";
    let doc = cmake(text);
    assert_eq!(state(&doc, 0).resume, CMakeStyle::BracketArgument);
    assert_eq!(state(&doc, 0).bracket, 2);
    assert_eq!(style_of::<CMake>(&doc, "]]\n"), CMakeStyle::BracketArgument);
    assert_eq!(style_of::<CMake>(&doc, "]==]"), CMakeStyle::BracketArgument);
    assert_eq!(style_of::<CMake>(&doc, ")\n#"), CMakeStyle::Operator);
    assert_eq!(style_of::<CMake>(&doc, "#[["), CMakeStyle::BlockComment);
    assert_eq!(style_of::<CMake>(&doc, "d]]"), CMakeStyle::BlockComment);
    assert_eq!(state(&doc, 4).resume, CMakeStyle::Default);
    assert_eq!(
        level_pairs(&doc),
        vec![(0, 2), (2, 2), (2, 0), (0, 1), (1, 0), (0, 0)]
    );
    assert_resumes(&CMake, &default_keywords(), text);
}

#[test]
fn empty_bracket_argument_closes() {
    let doc = cmake("set(x [[]] y)");
    assert_eq!(style_of::<CMake>(&doc, "]] "), CMakeStyle::BracketArgument);
    assert_eq!(style_of::<CMake>(&doc, "y"), CMakeStyle::Identifier);
}

#[test]
fn comment_lines_fold_as_a_block() {
    let doc = cmake("# a\n# TODO b\nset(x) # c\n// d\n");
    assert!(state(&doc, 0).flags.contains(LineFlags::LINE_COMMENT));
    assert!(!state(&doc, 2).flags.contains(LineFlags::LINE_COMMENT));
    assert!(state(&doc, 3).flags.contains(LineFlags::LINE_COMMENT));
    assert_eq!(style_of::<CMake>(&doc, "TODO"), CMakeStyle::TaskMarker);
    assert_eq!(style_of::<CMake>(&doc, "# c"), CMakeStyle::Comment);
    assert_eq!(
        level_pairs(&doc),
        vec![(0, 1), (1, 0), (0, 0), (0, 0), (0, 0)]
    );
}
