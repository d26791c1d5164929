use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort date resolution for a page
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("page record is missing its {field} path")]
    MissingPath { field: &'static str },

    #[error("failed to stat {path}: {source}")]
    Stat {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("priority must name at least one source")]
    EmptyPriority,
}
