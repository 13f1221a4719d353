//! Command handlers for the tinct CLI.
//!
//! `styles`, `folds` and `states` print one file each; `check` verifies
//! resumption over many files. Rendering is split from I/O so the output
//! formats can be tested on in-memory documents.

use std::path::Path;

use tinct_core::{KeywordLists, TextDocument};
use tinct_lang::Language;

use crate::error::CliError;
use crate::options::Options;

mod check;
mod inspect;

pub use check::{check_paths, CheckReport};
pub use inspect::{render_folds, render_states, render_styles};

/// Which per-file view to print.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Styles,
    Folds,
    States,
}

/// A file read and highlighted.
pub(crate) struct Loaded {
    pub lang: Language,
    pub keywords: KeywordLists,
    pub doc: TextDocument,
}

pub(crate) fn load(path: &Path, options: &Options) -> Result<Loaded, CliError> {
    let lang = options.language_for(path)?;
    let keywords = options.keywords_for(lang)?;
    let text = std::fs::read_to_string(path).map_err(|err| CliError::read(path, err))?;
    let doc = lang.highlight(&text, &keywords)?;
    Ok(Loaded {
        lang,
        keywords,
        doc,
    })
}

/// Print `view` for every path in `options`.
pub fn inspect(view: View, options: &Options) -> Result<(), CliError> {
    if options.paths.is_empty() {
        return Err(CliError::Usage("expected at least one file".to_string()));
    }
    for path in &options.paths {
        let loaded = load(path, options)?;
        if options.paths.len() > 1 {
            println!("==> {} ({}) <==", path.display(), loaded.lang);
        }
        let out = match view {
            View::Styles => render_styles(loaded.lang, &loaded.doc),
            View::Folds => render_folds(&loaded.doc),
            View::States => render_states(loaded.lang, &loaded.doc),
        };
        print!("{out}");
    }
    Ok(())
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
