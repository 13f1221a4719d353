use pretty_assertions::assert_eq;

use super::*;
use crate::test_helpers::{assert_resumes, highlight, level_pairs, runs, style_of};
use tinct_core::{KeywordSet, TextDocument};

fn keywords() -> KeywordLists {
    default_keywords()
}

fn vhdl(text: &str) -> TextDocument {
    highlight(&Vhdl, &keywords(), text)
}

fn state(doc: &TextDocument, line: usize) -> VhdlState {
    VhdlState::decode(doc.line_states()[line]).unwrap()
}

const COUNTER: &str = "\
library ieee;
use ieee.std_logic_1164.all;

architecture rtl of counter is
begin
  p: process (clk)
  begin
    if rising_edge(clk) then
      q <= d;
    elsif reset = '1' then
      q <= '0';
    end if;
  end process;
end architecture rtl;
";

// === Line state ===

#[test]
fn state_round_trips() {
    let state = VhdlState {
        flags: LineFlags::LINE_COMMENT,
        in_block_comment: true,
        after_end: true,
        after_colon: true,
        awaiting_is: true,
        paren: 3,
        fold_delta: -4,
    };
    assert_eq!(VhdlState::decode(state.encode()), Ok(state));
    assert_eq!(VhdlState::default().encode(), 0);

    let wide = VhdlState {
        fold_delta: 40,
        ..VhdlState::default()
    };
    assert_eq!(VhdlState::decode(wide.encode()).unwrap().fold_delta, MAX_FOLD_DELTA);
}

#[test]
fn decode_rejects_impossible_states() {
    // Parenthesis count with no subprogram header open.
    assert!(VhdlState::decode(1 << 5).is_err());
    assert!(VhdlState::decode(1 << 4 | 2 << 5).is_ok());
    // Negative zero delta.
    assert!(VhdlState::decode(1 << 8).is_err());
    assert_eq!(VhdlState::decode(1 << 8 | 3 << 9).unwrap().fold_delta, -3);
    // Blank inside a block comment.
    assert!(VhdlState::decode(1 << 13 | 1 << 1).is_err());
    assert!(VhdlState::decode(1 << 14).is_err());
}

// === Styles ===

#[test]
fn word_lists_are_case_insensitive() {
    let doc = vhdl("SIGNAL s : STD_LOGIC := '0' AND x;\n");
    assert_eq!(style_of::<Vhdl>(&doc, "SIGNAL"), VhdlStyle::Keyword);
    assert_eq!(style_of::<Vhdl>(&doc, "STD_LOGIC"), VhdlStyle::StdType);
    assert_eq!(style_of::<Vhdl>(&doc, "AND"), VhdlStyle::StdOperator);
    assert_eq!(style_of::<Vhdl>(&doc, "x;"), VhdlStyle::Identifier);
}

#[test]
fn standard_library_words() {
    let doc = vhdl(COUNTER);
    assert_eq!(style_of::<Vhdl>(&doc, "library"), VhdlStyle::Keyword);
    assert_eq!(style_of::<Vhdl>(&doc, "ieee"), VhdlStyle::StdPackage);
    assert_eq!(style_of::<Vhdl>(&doc, "std_logic_1164"), VhdlStyle::StdPackage);
    assert_eq!(style_of::<Vhdl>(&doc, "rising_edge"), VhdlStyle::StdFunction);
    assert_eq!(style_of::<Vhdl>(&doc, "clk"), VhdlStyle::Identifier);
    assert_eq!(style_of::<Vhdl>(&doc, "<="), VhdlStyle::Operator);

    let doc = vhdl("if clk'event then\n");
    assert_eq!(style_of::<Vhdl>(&doc, "event"), VhdlStyle::Attribute);
}

#[test]
fn numbers_keep_base_and_exponent() {
    let doc = vhdl("x := 16#FF# + 1.5e3 + 1_000;\n");
    assert_eq!(
        runs::<Vhdl>(&doc),
        vec![
            ("x".to_string(), VhdlStyle::Identifier),
            (":=".to_string(), VhdlStyle::Operator),
            ("16#FF#".to_string(), VhdlStyle::Number),
            ("+".to_string(), VhdlStyle::Operator),
            ("1.5e3".to_string(), VhdlStyle::Number),
            ("+".to_string(), VhdlStyle::Operator),
            ("1_000".to_string(), VhdlStyle::Number),
            (";".to_string(), VhdlStyle::Operator),
        ]
    );
}

#[test]
fn strings_and_escapes() {
    let doc = vhdl("s <= \"ab\\\"c\";\n");
    assert_eq!(
        runs::<Vhdl>(&doc),
        vec![
            ("s".to_string(), VhdlStyle::Identifier),
            ("<=".to_string(), VhdlStyle::Operator),
            ("\"ab\\\"c\"".to_string(), VhdlStyle::String),
            (";".to_string(), VhdlStyle::Operator),
        ]
    );
}

#[test]
fn unterminated_string_ends_at_the_line() {
    let doc = vhdl("x := \"abc\ny;\n");
    assert_eq!(style_of::<Vhdl>(&doc, "\"abc"), VhdlStyle::StringEol);
    assert_eq!(style_of::<Vhdl>(&doc, "y"), VhdlStyle::Identifier);
    assert_eq!(state(&doc, 0).resume_style(), VhdlStyle::Default);
}

#[test]
fn comments() {
    let text = "-- a\n--! b\n/* c\nd */ x\n";
    let doc = vhdl(text);
    assert_eq!(style_of::<Vhdl>(&doc, "-- a"), VhdlStyle::Comment);
    assert_eq!(style_of::<Vhdl>(&doc, "--! b"), VhdlStyle::CommentLineBang);
    assert_eq!(style_of::<Vhdl>(&doc, "d */"), VhdlStyle::BlockComment);
    assert_eq!(style_of::<Vhdl>(&doc, "x"), VhdlStyle::Identifier);
    assert!(state(&doc, 0).flags.contains(LineFlags::LINE_COMMENT));
    assert!(state(&doc, 1).flags.contains(LineFlags::LINE_COMMENT));
    assert_eq!(state(&doc, 2).flags(), LineFlags::MULTILINE);
    assert_eq!(
        level_pairs(&doc),
        vec![(0, 1), (1, 0), (0, 1), (1, 0), (0, 0)]
    );
    assert_resumes(&Vhdl, &keywords(), text);
}

// === Folding ===

#[test]
fn design_units_fold_on_keywords() {
    let doc = vhdl(COUNTER);
    assert_eq!(
        level_pairs(&doc),
        vec![
            (0, 0),
            (0, 0),
            (0, 0),
            (0, 1),
            (1, 1),
            (1, 2),
            (2, 2),
            (2, 3),
            (3, 3),
            (3, 3),
            (3, 3),
            (3, 2),
            (2, 1),
            (1, 0),
            (0, 0),
        ]
    );
    assert_eq!(state(&doc, 2).flags(), LineFlags::BLANK);
    assert_resumes(&Vhdl, &keywords(), COUNTER);
}

#[test]
fn end_words_do_not_reopen() {
    let doc = vhdl("ENTITY e IS\n  PORT (a : IN bit);\nEND ENTITY;\n");
    assert_eq!(style_of::<Vhdl>(&doc, "ENTITY"), VhdlStyle::Keyword);
    assert_eq!(level_pairs(&doc), vec![(0, 1), (1, 1), (1, 0), (0, 0)]);
    assert_eq!(state(&doc, 2).fold_delta, -1);
}

#[test]
fn instances_do_not_fold() {
    let doc = vhdl("u1: entity work.adder port map (a);\ncomponent c is\nend component;\n");
    assert_eq!(level_pairs(&doc), vec![(0, 0), (0, 1), (1, 0), (0, 0)]);

    let text = "u2:\n  -- note\n  entity work.x;\n";
    let doc = vhdl(text);
    assert!(state(&doc, 0).after_colon);
    assert!(state(&doc, 1).after_colon);
    assert_eq!(level_pairs(&doc), vec![(0, 0), (0, 0), (0, 0), (0, 0)]);
    assert_resumes(&Vhdl, &keywords(), text);
}

#[test]
fn subprograms_fold_at_their_body() {
    let text = "\
package p is
  procedure f(a : bit);
end package;
package body p is
  function g(a : bit)
    return bit is
  begin
    return a;
  end function;
end package body;
";
    let doc = vhdl(text);
    assert!(!state(&doc, 1).awaiting_is);
    assert!(state(&doc, 4).awaiting_is);
    assert_eq!(state(&doc, 4).paren, 0);
    assert_eq!(
        level_pairs(&doc),
        vec![
            (0, 1),
            (1, 1),
            (1, 0),
            (0, 1),
            (1, 1),
            (1, 2),
            (2, 2),
            (2, 2),
            (2, 1),
            (1, 0),
            (0, 0),
        ]
    );
    assert_resumes(&Vhdl, &keywords(), text);
}

#[test]
fn subprogram_header_spans_parentheses() {
    let text = "procedure f(a : bit;\n            b : bit) is\nbegin\nend;\n";
    let doc = vhdl(text);
    // The `;` inside the parameter list does not end the header.
    assert_eq!(state(&doc, 0).paren, 1);
    assert!(state(&doc, 0).awaiting_is);
    assert_eq!(
        level_pairs(&doc),
        vec![(0, 1), (1, 1), (1, 1), (1, 0), (0, 0)]
    );
    assert_resumes(&Vhdl, &keywords(), text);
}

#[test]
fn fold_words_come_from_list_eight() {
    let mut lists = keywords();
    lists.set(8, KeywordSet::new("end", CaseSensitivity::Insensitive));
    let doc = highlight(&Vhdl, &lists, "process\nend process;\n");
    assert_eq!(level_pairs(&doc), vec![(0, 0), (0, 0), (0, 0)]);
}
