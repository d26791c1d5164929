//! Seam between the resolver and version-control history.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Local};

/// A build-scoped, read-only view of version-control history.
///
/// Implementations are discovered once per build, never per file, and are
/// queried for the newest commit touching each page. Per-file failures
/// surface through `Error` and are downgraded to warnings by the resolver.
pub trait History {
    type Error: fmt::Display;

    /// The checkout's working directory, when the backend knows one.
    fn workdir(&self) -> Option<&Path>;

    /// Commit date of the newest commit that touched `path`, relative to
    /// [`workdir`](History::workdir).
    fn latest_modified(&self, path: &Path) -> Result<DateTime<Local>, Self::Error>;
}

/// History backend for builds that run without version control.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

impl History for NoHistory {
    type Error = &'static str;

    fn workdir(&self) -> Option<&Path> {
        None
    }

    fn latest_modified(&self, _path: &Path) -> Result<DateTime<Local>, Self::Error> {
        Err("version-control history is not available")
    }
}
