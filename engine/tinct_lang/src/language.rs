//! Language registry.
//!
//! [`Language`] names every lexer this crate ships and forwards the
//! generic entry points to the matching one, so tooling can pick a
//! language at run time without trait objects.

use std::fmt;
use std::path::Path;

use tinct_core::{
    decode_line_state, fold, scan, scan_from, CaseSensitivity, DecodeError, Document, FoldOutput,
    InvalidState, KeywordLists, Lexer, LineState, ScanOutput, Style, TextDocument,
};

use crate::asymptote::{self, Asymptote};
use crate::cmake::{self, CMake};
use crate::dart::{self, Dart};
use crate::fsharp::{self, FSharp};
use crate::powershell::{self, PowerShell};
use crate::vhdl::{self, Vhdl};

/// A language with a lexer in this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Language {
    Dart,
    Asymptote,
    CMake,
    PowerShell,
    FSharp,
    Vhdl,
}

/// Run `$body` with `$lexer` bound to the lexer value for `$lang`.
macro_rules! with_lexer {
    ($lang:expr, $lexer:ident => $body:expr) => {
        match $lang {
            Language::Dart => {
                let $lexer = Dart;
                $body
            }
            Language::Asymptote => {
                let $lexer = Asymptote;
                $body
            }
            Language::CMake => {
                let $lexer = CMake;
                $body
            }
            Language::PowerShell => {
                let $lexer = PowerShell;
                $body
            }
            Language::FSharp => {
                let $lexer = FSharp;
                $body
            }
            Language::Vhdl => {
                let $lexer = Vhdl;
                $body
            }
        }
    };
}

const ALL: [Language; 6] = [
    Language::Dart,
    Language::Asymptote,
    Language::CMake,
    Language::PowerShell,
    Language::FSharp,
    Language::Vhdl,
];

impl Language {
    pub fn all() -> &'static [Language] {
        &ALL
    }

    /// Lexer name, as used by `from_name` and in error messages.
    pub fn name(self) -> &'static str {
        with_lexer!(self, lexer => lexer_name(&lexer))
    }

    /// Look up a language by lexer name or common alias, ignoring case.
    pub fn from_name(name: &str) -> Option<Language> {
        let lang = match name.to_ascii_lowercase().as_str() {
            "dart" => Language::Dart,
            "asymptote" | "asy" => Language::Asymptote,
            "cmake" => Language::CMake,
            "powershell" | "pwsh" | "ps1" => Language::PowerShell,
            "fsharp" | "f#" | "fs" => Language::FSharp,
            "vhdl" => Language::Vhdl,
            _ => return None,
        };
        Some(lang)
    }

    /// Look up a language by file extension, without the dot.
    pub fn from_extension(ext: &str) -> Option<Language> {
        let lang = match ext.to_ascii_lowercase().as_str() {
            "dart" => Language::Dart,
            "asy" => Language::Asymptote,
            "cmake" => Language::CMake,
            "ps1" | "psm1" | "psd1" => Language::PowerShell,
            "fs" | "fsi" | "fsx" => Language::FSharp,
            "vhd" | "vhdl" => Language::Vhdl,
            _ => return None,
        };
        Some(lang)
    }

    /// Look up a language from a file path. `CMakeLists.txt` and
    /// `CMakeCache.txt` are recognised by name.
    pub fn from_path(path: &Path) -> Option<Language> {
        let file_name = path.file_name()?.to_str()?;
        if file_name.eq_ignore_ascii_case("CMakeLists.txt")
            || file_name.eq_ignore_ascii_case("CMakeCache.txt")
        {
            return Some(Language::CMake);
        }
        Language::from_extension(path.extension()?.to_str()?)
    }

    /// Built-in keyword lists for this language.
    pub fn default_keywords(self) -> KeywordLists {
        match self {
            Language::Dart => dart::default_keywords(),
            Language::Asymptote => asymptote::default_keywords(),
            Language::CMake => cmake::default_keywords(),
            Language::PowerShell => powershell::default_keywords(),
            Language::FSharp => fsharp::default_keywords(),
            Language::Vhdl => vhdl::default_keywords(),
        }
    }

    /// Case policy of keyword list `index`.
    pub fn keyword_case(self, index: usize) -> CaseSensitivity {
        match self {
            Language::Dart | Language::Asymptote | Language::FSharp => CaseSensitivity::Sensitive,
            Language::CMake if index >= 2 => CaseSensitivity::Sensitive,
            Language::CMake | Language::PowerShell | Language::Vhdl => {
                CaseSensitivity::Insensitive
            }
        }
    }

    /// Every style name in id order.
    pub fn style_names(self) -> Vec<&'static str> {
        with_lexer!(self, lexer => style_names(&lexer))
    }

    /// Name of the style with `id`, if the table defines it.
    pub fn style_name(self, id: u8) -> Option<&'static str> {
        with_lexer!(self, lexer => style_name(&lexer, id))
    }

    /// Debug rendering of a packed line state.
    pub fn describe_state(self, raw: u32) -> Result<String, DecodeError> {
        with_lexer!(self, lexer => describe_state(&lexer, raw))
    }

    /// See [`tinct_core::scan`].
    pub fn scan<D: Document + ?Sized>(
        self,
        doc: &D,
        start: usize,
        len: usize,
        keywords: &KeywordLists,
    ) -> Result<ScanOutput, InvalidState> {
        with_lexer!(self, lexer => scan(&lexer, doc, start, len, keywords))
    }

    /// See [`tinct_core::fold`].
    pub fn fold<D: Document + ?Sized>(
        self,
        doc: &D,
        start: usize,
        len: usize,
    ) -> Result<FoldOutput, InvalidState> {
        with_lexer!(self, lexer => fold(&lexer, doc, start, len))
    }

    /// Scan and fold all of `text`.
    pub fn highlight(
        self,
        text: &str,
        keywords: &KeywordLists,
    ) -> Result<TextDocument, InvalidState> {
        let mut doc = TextDocument::new(text);
        let len = doc.len();
        self.scan(&doc, 0, len, keywords)?.apply(&mut doc);
        self.fold(&doc, 0, len)?.apply(&mut doc);
        tracing::debug!(
            language = self.name(),
            lines = doc.line_count(),
            "highlighted"
        );
        Ok(doc)
    }

    /// First line whose rescan from the published state of the line before
    /// differs from the full scan in `doc`.
    ///
    /// `doc` must hold the output of a full scan. Every published line state
    /// is decoded before its line is compared, so an undecodable state is an
    /// error rather than a divergence. Each line is rescanned on its own;
    /// matching every line one at a time implies matching any longer rescan.
    pub fn first_divergence(
        self,
        doc: &TextDocument,
        keywords: &KeywordLists,
    ) -> Result<Option<Divergence>, InvalidState> {
        with_lexer!(self, lexer => first_divergence(&lexer, doc, keywords))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a line rescan disagreed with the full scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Divergence {
    pub line: usize,
    /// Byte offset of the first differing style, or `None` when only the
    /// line state differs.
    pub pos: Option<usize>,
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pos {
            Some(pos) => write!(f, "line {}: style differs at byte {pos}", self.line + 1),
            None => write!(f, "line {}: line state differs", self.line + 1),
        }
    }
}

fn lexer_name<L: Lexer>(_: &L) -> &'static str {
    L::NAME
}

fn style_names<L: Lexer>(_: &L) -> Vec<&'static str> {
    L::Style::ALL.iter().map(|style| style.name()).collect()
}

fn style_name<L: Lexer>(_: &L, id: u8) -> Option<&'static str> {
    L::Style::from_id(id).map(Style::name)
}

fn describe_state<L: Lexer>(_: &L, raw: u32) -> Result<String, DecodeError> {
    L::State::decode(raw).map(|state| format!("{state:?}"))
}

#[tracing::instrument(level = "debug", skip_all, fields(lexer = L::NAME))]
fn first_divergence<L: Lexer>(
    lexer: &L,
    doc: &TextDocument,
    keywords: &KeywordLists,
) -> Result<Option<Divergence>, InvalidState> {
    let mut initial = L::State::default();
    for line in 0..doc.line_count() {
        let published = decode_line_state::<L, _>(doc, line)?;
        let start = doc.line_start(line);
        let end = doc.line_start(line + 1);
        if start == end {
            initial = published;
            continue;
        }
        let out = scan_from(lexer, doc, start, end - start, &initial, keywords)?;
        if let Some(offset) = out
            .styles
            .iter()
            .zip(&doc.styles()[start..end])
            .position(|(rescanned, full)| rescanned != full)
        {
            return Ok(Some(Divergence {
                line,
                pos: Some(start + offset),
            }));
        }
        if out.line_states.first() != doc.line_states().get(line) {
            return Ok(Some(Divergence { line, pos: None }));
        }
        initial = published;
    }
    Ok(None)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;

