use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use crate::document::TextDocument;
use crate::lexer;
use crate::test_helpers::{highlighted, level_pairs, MockLexer};

// === FoldLevel ===

#[test]
fn header_flag_tracks_increase() {
    assert!(FoldLevel::new(1, 2).is_header());
    assert!(!FoldLevel::new(2, 2).is_header());
    assert!(!FoldLevel::new(2, 1).is_header());
}

#[test]
fn packed_layout() {
    let header = FoldLevel::new(1, 2);
    assert_eq!(header.pack(), 1 | HEADER_FLAG | (2 << 16));
    assert_eq!(FoldLevel::unpack(header.pack()), header);

    let closing = FoldLevel::new(3, 0);
    assert_eq!(closing.pack(), 3);
    assert_eq!(FoldLevel::unpack(closing.pack()), closing);
}

// === Fold rules ===

#[test]
fn brackets_open_and_close_levels() {
    let doc = highlighted("foo(x) {\n}\n");
    assert_eq!(level_pairs(&doc), vec![(0, 1), (1, 0), (0, 0)]);
}

#[test]
fn line_comment_run_folds_as_one_block() {
    let doc = highlighted("a\n# c\n# c\nb\n");
    assert_eq!(
        level_pairs(&doc),
        vec![(0, 0), (0, 1), (1, 0), (0, 0), (0, 0)]
    );
}

#[test]
fn import_run_folds_as_one_block() {
    let doc = highlighted("use a\nuse b\nx");
    assert_eq!(level_pairs(&doc), vec![(0, 1), (1, 0), (0, 0)]);
}

#[test]
fn brace_on_next_line_folds_into_statement() {
    let doc = highlighted("if x\n{\n  y\n}\n");
    assert_eq!(
        level_pairs(&doc),
        vec![(0, 1), (1, 1), (1, 1), (1, 0), (0, 0)]
    );
}

#[test]
fn brace_after_statement_end_is_its_own_header() {
    let doc = highlighted("x;\n{\n}\n");
    assert_eq!(level_pairs(&doc), vec![(0, 0), (0, 1), (1, 0), (0, 0)]);
}

#[test]
fn brace_followed_by_code_is_not_moved() {
    let doc = highlighted("if x\n{ y }\n");
    assert_eq!(level_pairs(&doc), vec![(0, 0), (0, 0), (0, 0)]);
}

#[test]
fn multi_line_string_is_one_span() {
    let doc = highlighted("\"a\nb\"\nc");
    assert_eq!(level_pairs(&doc), vec![(0, 1), (1, 0), (0, 0)]);
}

#[test]
fn one_byte_span_is_balanced() {
    let doc = highlighted("x \"");
    assert_eq!(level_pairs(&doc), vec![(0, 0)]);
}

#[test]
fn keyword_words_fold() {
    let doc = highlighted("begin\nx\nend\n");
    assert_eq!(
        level_pairs(&doc),
        vec![(0, 1), (1, 1), (1, 0), (0, 0)]
    );
}

#[test]
fn unmatched_closers_clamp_at_zero() {
    let doc = highlighted("}\n}\nx {\n");
    assert_eq!(level_pairs(&doc), vec![(0, 0), (0, 0), (0, 1), (1, 1)]);
}

// === Resumption ===

#[test]
fn refold_from_a_middle_line_matches() {
    let text = "if x\n{\n  # a\n  # b\n  \"s\nt\"\n}\nbegin\nend\n";
    let doc = highlighted(text);
    let full = doc.levels().to_vec();
    for line in 1..doc.line_count() {
        let start = doc.line_start(line);
        let out = lexer::fold(&MockLexer, &doc, start, doc.len() - start).unwrap();
        assert_eq!(out.first_line, line);
        assert_eq!(out.levels.as_slice(), &full[line..], "refold from line {line}");
    }
}

// === Contract violations ===

#[test]
fn unknown_style_is_rejected() {
    let mut doc = TextDocument::new("x");
    doc.set_styles(0, &[99]);
    let err = lexer::fold(&MockLexer, &doc, 0, 1).unwrap_err();
    assert_eq!(
        err,
        InvalidState::UnknownStyle {
            lexer: "mock",
            id: 99
        }
    );
}

#[test]
fn undecodable_line_state_is_rejected() {
    let mut doc = TextDocument::new("x\ny");
    doc.set_line_state(0, 0xFF);
    let err = lexer::fold(&MockLexer, &doc, 0, doc.len()).unwrap_err();
    assert!(matches!(
        err,
        InvalidState::LineState {
            lexer: "mock",
            line: 0,
            value: 0xFF,
            ..
        }
    ));
}

// === Property tests ===

mod properties {
    use super::*;

    proptest! {
        #[test]
        fn levels_are_continuous(text in "[a-z#\"{}()\\[\\] ;\n]{0,120}") {
            let doc = highlighted(&text);
            let levels = doc.levels();
            prop_assert_eq!(levels[0].start, 0);
            for pair in levels.windows(2) {
                prop_assert_eq!(pair[1].start, pair[0].end);
            }
        }
    }
}
