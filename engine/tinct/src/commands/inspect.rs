//! The `styles`, `folds` and `states` views.

use std::fmt::Write;

use tinct_core::{Document, TextDocument};
use tinct_lang::Language;

/// One row per style run: `line:column style "text"`. Blank runs and line
/// ends are skipped.
pub fn render_styles(lang: Language, doc: &TextDocument) -> String {
    let mut out = String::new();
    for line in 0..doc.line_count() {
        let start = doc.line_start(line);
        let text = doc.line_text(line).trim_end_matches(['\r', '\n']).as_bytes();
        let styles = &doc.styles()[start..start + text.len()];
        let mut run_start = 0;
        while run_start < text.len() {
            let id = styles[run_start];
            let run_end = styles[run_start..]
                .iter()
                .position(|&other| other != id)
                .map_or(text.len(), |len| run_start + len);
            let run = String::from_utf8_lossy(&text[run_start..run_end]);
            if !run.trim().is_empty() {
                let name = lang.style_name(id).unwrap_or("?");
                let _ = writeln!(out, "{:>4}:{:<3} {name:<20} {run:?}", line + 1, run_start + 1);
            }
            run_start = run_end;
        }
    }
    out
}

/// One row per line: start and end level, `+` on headers, then the text.
pub fn render_folds(doc: &TextDocument) -> String {
    let mut out = String::new();
    for (line, level) in doc.levels().iter().enumerate() {
        let marker = if level.is_header() { '+' } else { ' ' };
        let text = doc.line_text(line).trim_end_matches(['\r', '\n']);
        let _ = writeln!(
            out,
            "{:>4} {:>3} {:>3} {marker} | {text}",
            line + 1,
            level.start,
            level.end
        );
    }
    out
}

/// One row per line: the packed state and its decoded fields.
pub fn render_states(lang: Language, doc: &TextDocument) -> String {
    let mut out = String::new();
    for (line, &raw) in doc.line_states().iter().enumerate() {
        let decoded = match lang.describe_state(raw) {
            Ok(state) => state,
            Err(err) => format!("<invalid: {err}>"),
        };
        let _ = writeln!(out, "{:>4} {raw:#010x} {decoded}", line + 1);
    }
    out
}
