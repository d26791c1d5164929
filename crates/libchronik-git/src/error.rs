use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during git history queries
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    #[error("not a git repository")]
    NotARepo,

    #[error("repository has no commits")]
    NoCommits,

    #[error("{path} is not tracked by git")]
    Untracked { path: PathBuf },
}
