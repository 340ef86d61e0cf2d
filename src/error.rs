use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VocabError {
    #[error("Cannot read vocabulary file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Vocabulary JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid pattern for label '{label}': {source}")]
    Pattern {
        label: String,
        source: regex::Error,
    },

    #[error("Invalid boilerplate pattern '{pattern}': {source}")]
    Boilerplate {
        pattern: String,
        source: regex::Error,
    },

    #[error("Rule has an empty label")]
    EmptyLabel,

    #[error("Rule '{0}' needs either a pattern or at least one term")]
    NoMatcher(String),

    #[error("Year range {0}..={1} is empty")]
    YearRange(i32, i32),

    #[error("Cause trigger '{0}' maps to the reserved resolved marker")]
    ReservedPhrase(String),
}

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path} is not UTF-8 text (invalid byte at offset {offset})")]
    NotText { path: PathBuf, offset: usize },
}
