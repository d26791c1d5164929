//! Git-backed history queries for chronik date resolution.
//!
//! This crate answers one question for the resolver: when did a commit
//! last touch this file? It provides:
//! - Repository discovery from the content root, run once per build
//! - Latest-modified-date queries for tracked paths

mod error;
mod repo;

pub use error::HistoryError;
pub use repo::GitHistory;
