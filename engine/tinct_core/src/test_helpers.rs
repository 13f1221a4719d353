//! Test helpers for engine unit testing.
//!
//! Provides `MockLexer`, a tiny brace language that exercises every engine
//! feature without depending on a real language:
//!
//! - `#` starts a line comment;
//! - `"` strings may span lines;
//! - `begin`/`end` fold as keywords and `{[(`/`}])` as brackets;
//! - a line starting with `use` is an import line.

#![allow(clippy::unwrap_used)]

use crate::char_class::{is_graphic, is_identifier_char, is_identifier_start, is_space_char};
use crate::document::{Document, TextDocument};
use crate::error::DecodeError;
use crate::fold::FoldUnit;
use crate::keywords::{CaseSensitivity, KeywordLists};
use crate::lexer::{self, Lexer};
use crate::line_state::{BitReader, BitWriter, LineFlags, LineState};
use crate::scan_cursor::ScanCursor;

crate::style_table! {
    pub enum MockStyle {
        Default = "default",
        Comment = "comment",
        Operator = "operator",
        Identifier = "identifier",
        Keyword = "keyword",
        Str = "string",
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MockState {
    pub in_string: bool,
    pub flags: LineFlags,
}

impl LineState for MockState {
    type Style = MockStyle;

    fn encode(&self) -> u32 {
        BitWriter::new()
            .put_flag(self.in_string)
            .put_flag(self.flags.contains(LineFlags::LINE_COMMENT))
            .put_flag(self.flags.contains(LineFlags::IMPORT))
            .finish()
    }

    fn decode(raw: u32) -> Result<Self, DecodeError> {
        let mut reader = BitReader::new(raw);
        let in_string = reader.take_flag();
        let mut flags = LineFlags::empty();
        flags.set(LineFlags::LINE_COMMENT, reader.take_flag());
        flags.set(LineFlags::IMPORT, reader.take_flag());
        reader.finish()?;
        Ok(Self { in_string, flags })
    }

    fn resume_style(&self) -> MockStyle {
        if self.in_string {
            MockStyle::Str
        } else {
            MockStyle::Default
        }
    }

    fn flags(&self) -> LineFlags {
        self.flags
    }
}

pub struct MockLexer;

impl Lexer for MockLexer {
    type Style = MockStyle;
    type State = MockState;

    const NAME: &'static str = "mock";

    fn lex<D: Document + ?Sized>(
        &self,
        sc: &mut ScanCursor<'_, D, MockStyle>,
        _initial: &MockState,
        keywords: &KeywordLists,
    ) {
        let mut flags = LineFlags::empty();
        let mut visible = 0usize;
        while sc.more() {
            match sc.state() {
                MockStyle::Operator => sc.set_state(MockStyle::Default),
                MockStyle::Comment => {
                    if sc.at_line_start() {
                        sc.set_state(MockStyle::Default);
                    }
                }
                MockStyle::Identifier => {
                    if !is_identifier_char(sc.ch()) {
                        let word = sc.current_text();
                        if keywords.contains(0, word.as_str()) {
                            sc.change_state(MockStyle::Keyword);
                            if word == "use" && visible == sc.length_current() {
                                flags |= LineFlags::IMPORT;
                            }
                        }
                        sc.set_state(MockStyle::Default);
                    }
                }
                MockStyle::Str => {
                    if sc.ch() == b'"' {
                        sc.forward_set_state(MockStyle::Default);
                    }
                }
                MockStyle::Default | MockStyle::Keyword => {}
            }

            if sc.state() == MockStyle::Default {
                if sc.ch() == b'#' {
                    if visible == 0 {
                        flags |= LineFlags::LINE_COMMENT;
                    }
                    sc.set_state(MockStyle::Comment);
                } else if sc.ch() == b'"' {
                    sc.set_state(MockStyle::Str);
                } else if is_identifier_start(sc.ch()) {
                    sc.set_state(MockStyle::Identifier);
                } else if is_graphic(sc.ch()) {
                    sc.set_state(MockStyle::Operator);
                }
            }

            if !is_space_char(sc.ch()) {
                visible += 1;
            }
            if sc.at_line_end() {
                let state = MockState {
                    in_string: sc.state() == MockStyle::Str,
                    flags,
                };
                sc.set_line_state(state.encode());
                flags = LineFlags::empty();
                visible = 0;
            }
            sc.forward();
        }
    }

    fn fold_unit(&self, style: MockStyle) -> FoldUnit {
        match style {
            MockStyle::Str => FoldUnit::Span(0),
            MockStyle::Operator => FoldUnit::Brackets {
                open: b"{[(",
                close: b"}])",
            },
            MockStyle::Keyword => FoldUnit::Word,
            _ => FoldUnit::Ignore,
        }
    }

    fn is_space_equiv(&self, style: MockStyle) -> bool {
        matches!(style, MockStyle::Default | MockStyle::Comment)
    }

    fn brace_style(&self) -> Option<MockStyle> {
        Some(MockStyle::Operator)
    }

    fn keyword_fold(&self, word: &[u8]) -> i32 {
        match word {
            b"begin" => 1,
            b"end" => -1,
            _ => 0,
        }
    }
}

pub fn mock_keywords() -> KeywordLists {
    KeywordLists::from_texts(["begin end use"], CaseSensitivity::Sensitive)
}

/// Scan and fold the whole of `text` and publish the results.
pub fn highlighted(text: &str) -> TextDocument {
    let mut doc = TextDocument::new(text);
    let len = doc.len();
    let scanned = lexer::scan(&MockLexer, &doc, 0, len, &mock_keywords()).unwrap();
    scanned.apply(&mut doc);
    let folded = lexer::fold(&MockLexer, &doc, 0, len).unwrap();
    folded.apply(&mut doc);
    doc
}

/// `(start, end)` pairs of every line's fold level.
pub fn level_pairs(doc: &TextDocument) -> Vec<(u16, u16)> {
    doc.levels().iter().map(|level| (level.start, level.end)).collect()
}
