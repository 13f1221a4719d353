//! Command-line options shared by every command.

use std::path::{Path, PathBuf};

use tinct_core::{KeywordLists, KeywordSet};
use tinct_lang::Language;

use crate::error::CliError;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Options {
    /// Language override; otherwise picked from each file name.
    pub lang: Option<Language>,
    /// Keyword list replacements, `(index, file)`.
    pub keywords: Vec<(usize, PathBuf)>,
    /// Files and directories to process.
    pub paths: Vec<PathBuf>,
}

impl Options {
    /// Parse everything after the command name.
    pub fn parse(args: &[String]) -> Result<Self, CliError> {
        let mut options = Options::default();
        for arg in args {
            if let Some(name) = arg.strip_prefix("--lang=") {
                let lang = Language::from_name(name)
                    .ok_or_else(|| CliError::UnknownLanguage(name.to_string()))?;
                options.lang = Some(lang);
            } else if let Some(value) = arg.strip_prefix("--keywords=") {
                options.keywords.push(parse_keywords_arg(value)?);
            } else if arg.starts_with('-') {
                return Err(CliError::Usage(format!("unknown option '{arg}'")));
            } else {
                options.paths.push(PathBuf::from(arg));
            }
        }
        Ok(options)
    }

    /// Language for `path`: the override, else the file name.
    pub fn language_for(&self, path: &Path) -> Result<Language, CliError> {
        self.lang
            .or_else(|| Language::from_path(path))
            .ok_or_else(|| CliError::NoLanguage(path.to_path_buf()))
    }

    /// Default lists for `lang` with the `--keywords` files swapped in.
    pub fn keywords_for(&self, lang: Language) -> Result<KeywordLists, CliError> {
        let mut lists = lang.default_keywords();
        for (index, path) in &self.keywords {
            let text = std::fs::read_to_string(path).map_err(|err| CliError::read(path, err))?;
            lists.set(*index, KeywordSet::new(&text, lang.keyword_case(*index)));
        }
        Ok(lists)
    }
}

fn parse_keywords_arg(value: &str) -> Result<(usize, PathBuf), CliError> {
    let bad = || CliError::KeywordsArg(value.to_string());
    let (index, file) = value.split_once('=').ok_or_else(bad)?;
    let index = index.parse::<usize>().map_err(|_| bad())?;
    if file.is_empty() {
        return Err(bad());
    }
    Ok((index, PathBuf::from(file)))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
