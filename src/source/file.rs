// src/source/file.rs
// =============================================================================
// Reads the endpoint list from a text file.
//
// Format:
// - One endpoint per line, surrounding whitespace trimmed
// - Blank lines are skipped
// - Lines whose first non-whitespace character is '#' are comments
//
// A missing or unreadable file is fatal for the whole run: we report it and
// stop before a single probe is sent.
// =============================================================================

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("URL file '{}' not found", path.display())]
    NotFound { path: PathBuf },

    #[error("could not read URL file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Loads and parses the endpoint list at `path`.
pub fn load_endpoints(path: &Path) -> Result<Vec<String>, SourceError> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => SourceError::NotFound {
            path: path.to_path_buf(),
        },
        _ => SourceError::Read {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let endpoints = parse_endpoints(&content);
    debug!(path = %path.display(), count = endpoints.len(), "loaded endpoints");
    Ok(endpoints)
}

/// Extracts endpoints from the file contents. Duplicates are kept.
pub fn parse_endpoints(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}
