//! The `check` command: verify that every line of every file rescans to
//! the same styles and state from the published state of the line before.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tinct_lang::{Divergence, Language};

use super::load;
use crate::error::CliError;
use crate::options::Options;

/// Outcome of a `check` run.
#[derive(Debug, Default)]
pub struct CheckReport {
    pub checked: usize,
    pub diverged: Vec<(PathBuf, Divergence)>,
    pub failed: Vec<(PathBuf, CliError)>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.diverged.is_empty() && self.failed.is_empty()
    }
}

enum FileResult {
    Clean,
    Diverged(Divergence),
    Failed(CliError),
}

/// Check every file named in `options`, descending into directories.
pub fn check_paths(options: &Options) -> Result<CheckReport, CliError> {
    if options.paths.is_empty() {
        return Err(CliError::Usage("expected at least one file or directory".to_string()));
    }
    let mut files = Vec::new();
    for path in &options.paths {
        if path.is_dir() {
            collect_files(path, options.lang.is_some(), &mut files)?;
        } else {
            files.push(path.clone());
        }
    }
    files.sort();
    tracing::debug!(files = files.len(), "checking");

    let results: Vec<(PathBuf, FileResult)> = files
        .into_par_iter()
        .map(|path| {
            let result = check_file(&path, options);
            (path, result)
        })
        .collect();

    let mut report = CheckReport::default();
    for (path, result) in results {
        report.checked += 1;
        match result {
            FileResult::Clean => {}
            FileResult::Diverged(divergence) => report.diverged.push((path, divergence)),
            FileResult::Failed(err) => report.failed.push((path, err)),
        }
    }
    Ok(report)
}

fn check_file(path: &Path, options: &Options) -> FileResult {
    let loaded = match load(path, options) {
        Ok(loaded) => loaded,
        Err(err) => return FileResult::Failed(err),
    };
    match loaded.lang.first_divergence(&loaded.doc, &loaded.keywords) {
        Ok(None) => FileResult::Clean,
        Ok(Some(divergence)) => {
            tracing::debug!(path = %path.display(), %divergence, "rescan diverged");
            FileResult::Diverged(divergence)
        }
        Err(err) => FileResult::Failed(err.into()),
    }
}

/// Files under `dir` with a recognised name. With a language override every
/// file qualifies.
fn collect_files(dir: &Path, any_name: bool, files: &mut Vec<PathBuf>) -> Result<(), CliError> {
    let entries = std::fs::read_dir(dir).map_err(|err| CliError::read(dir, err))?;
    for entry in entries {
        let path = entry.map_err(|err| CliError::read(dir, err))?.path();
        if path.is_dir() {
            let hidden = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with('.'));
            if !hidden {
                collect_files(&path, any_name, files)?;
            }
        } else if any_name || Language::from_path(&path).is_some() {
            files.push(path);
        }
    }
    Ok(())
}
