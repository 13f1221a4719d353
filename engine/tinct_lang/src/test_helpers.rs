//! Test helpers for the language lexers.
//!
//! Provides full highlighting of a snippet, a run-length view of its
//! styles for readable assertions, and the restart check every language
//! must pass.

#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use tinct_core::{fold, scan, Document, DocumentMut, KeywordLists, Lexer, Style, TextDocument};

/// Scan and fold the whole of `text` and publish the results.
pub fn highlight<L: Lexer>(lexer: &L, keywords: &KeywordLists, text: &str) -> TextDocument {
    let mut doc = TextDocument::new(text);
    let len = doc.len();
    scan(lexer, &doc, 0, len, keywords).unwrap().apply(&mut doc);
    fold(lexer, &doc, 0, len).unwrap().apply(&mut doc);
    doc
}

/// Style runs of a highlighted document, blanks dropped.
pub fn runs<L: Lexer>(doc: &TextDocument) -> Vec<(String, L::Style)> {
    let text = doc.text().as_bytes();
    let mut out: Vec<(Vec<u8>, L::Style)> = Vec::new();
    for (&ch, &id) in text.iter().zip(doc.styles()) {
        let style = L::Style::from_id(id).unwrap();
        match out.last_mut() {
            Some((bytes, last)) if *last == style => bytes.push(ch),
            _ => out.push((vec![ch], style)),
        }
    }
    out.into_iter()
        .map(|(bytes, style)| (String::from_utf8(bytes).unwrap(), style))
        .filter(|(text, _)| !text.trim().is_empty())
        .collect()
}

/// Style of the first occurrence of `needle`.
pub fn style_of<L: Lexer>(doc: &TextDocument, needle: &str) -> L::Style {
    let at = doc.text().find(needle).unwrap();
    L::Style::from_id(doc.style_at(at)).unwrap()
}

/// `(start, end)` pairs of every line's fold level.
pub fn level_pairs(doc: &TextDocument) -> Vec<(u16, u16)> {
    doc.levels().iter().map(|level| (level.start, level.end)).collect()
}

/// Rescanning from every line start with only the published state of the
/// line before must reproduce the full scan.
pub fn assert_resumes<L: Lexer>(lexer: &L, keywords: &KeywordLists, text: &str) {
    let full = highlight(lexer, keywords, text);
    for line in 1..full.line_count() {
        let mut doc = TextDocument::new(text);
        let start = doc.line_start(line);
        doc.set_line_state(line - 1, full.line_states()[line - 1]);
        let out = scan(lexer, &doc, start, doc.len() - start, keywords).unwrap();
        assert_eq!(
            out.styles.as_slice(),
            &full.styles()[start..],
            "styles resuming at line {line} of {text:?}"
        );
        assert_eq!(
            out.line_states.as_slice(),
            &full.line_states()[line..],
            "states resuming at line {line} of {text:?}"
        );
    }
}
