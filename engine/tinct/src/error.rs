//! CLI errors.

use std::path::PathBuf;

use thiserror::Error;
use tinct_core::InvalidState;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error("unknown language '{0}' (known: dart, asymptote, cmake, powershell, fsharp, vhdl)")]
    UnknownLanguage(String),

    #[error("cannot tell the language of '{}'; pass --lang=<name>", .0.display())]
    NoLanguage(PathBuf),

    #[error("invalid --keywords value '{0}'; expected <index>=<file>")]
    KeywordsArg(String),

    #[error("cannot read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    InvalidState(#[from] InvalidState),

    #[error("{count} file(s) do not rescan to the same result")]
    Diverged { count: usize },

    #[error("{count} file(s) could not be checked")]
    Unchecked { count: usize },
}

impl CliError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CliError::Read {
            path: path.into(),
            source,
        }
    }
}
