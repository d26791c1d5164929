//! Build-scoped git history handle.
//!
//! Discovery happens once, before any page is resolved. A
//! `git2::Repository` cannot be shared across threads, so hosts with a
//! worker pool run [`GitHistory::for_build`] once per worker; the probe is
//! idempotent and touches nothing on disk.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use git2::{Commit, ErrorCode, Oid, Repository, Sort};
use tracing::{debug, warn};

use libchronik_core::history::History;
use libchronik_core::types::source::{Priority, SourceKind};

use crate::HistoryError;

/// Read-only view of the repository containing the content directory.
pub struct GitHistory {
    repo: Repository,
    workdir: Option<PathBuf>,
}

impl GitHistory {
    /// Discover the repository containing `dir`, walking up parents.
    pub fn discover(dir: &Path) -> Result<Self, HistoryError> {
        let repo = Repository::discover(dir).map_err(|e| match e.code() {
            ErrorCode::NotFound => HistoryError::NotARepo,
            _ => HistoryError::Git(e),
        })?;
        let workdir = repo.workdir().map(Path::to_path_buf);
        Ok(Self { repo, workdir })
    }

    /// Run the once-per-build discovery step.
    ///
    /// Probes only when `git` is actually configured. A failed probe logs
    /// a warning and leaves the git source disabled for the rest of the
    /// build; per-page resolution carries on with the remaining sources.
    pub fn for_build(priority: &Priority, content_root: &Path) -> Option<Self> {
        if !priority.contains(SourceKind::Git) {
            return None;
        }
        match Self::discover(content_root) {
            Ok(history) => {
                if let Some(workdir) = &history.workdir {
                    debug!("using git history at {}", workdir.display());
                }
                Some(history)
            }
            Err(e) => {
                warn!(
                    "couldn't find git repository for {}: {}",
                    content_root.display(),
                    e
                );
                None
            }
        }
    }

    /// Commit date of the newest commit that touched `path`, which is
    /// relative to the working directory.
    ///
    /// A commit touches the path when its tree entry differs from every
    /// parent's, the same notion of "modified" that `git log -- <path>`
    /// reports.
    pub fn latest_modified(&self, path: &Path) -> Result<DateTime<Local>, HistoryError> {
        let head = match self.repo.head() {
            Ok(head) => head.peel_to_commit()?,
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                return Err(HistoryError::NoCommits);
            }
            Err(e) => return Err(e.into()),
        };

        if self.entry_id(&head, path)?.is_none() {
            return Err(HistoryError::Untracked {
                path: path.to_path_buf(),
            });
        }

        let mut revwalk = self.repo.revwalk()?;
        revwalk.push_head()?;
        revwalk.set_sorting(Sort::TIME)?;

        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            let entry = match self.entry_id(&commit, path)? {
                Some(id) => id,
                None => continue,
            };

            let mut changed = true;
            for parent in commit.parents() {
                if self.entry_id(&parent, path)? == Some(entry) {
                    changed = false;
                    break;
                }
            }
            if changed {
                return Ok(commit_date(&commit));
            }
        }

        // A path present at HEAD always has an introducing commit, so the
        // walk above cannot fall through.
        Err(HistoryError::Untracked {
            path: path.to_path_buf(),
        })
    }

    /// Blob OID of `path` in the commit's tree, or `None` if the tree has
    /// no such entry.
    fn entry_id(&self, commit: &Commit, path: &Path) -> Result<Option<Oid>, HistoryError> {
        let tree = commit.tree()?;
        match tree.get_path(path) {
            Ok(entry) => Ok(Some(entry.id())),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl History for GitHistory {
    type Error = HistoryError;

    fn workdir(&self) -> Option<&Path> {
        self.workdir.as_deref()
    }

    fn latest_modified(&self, path: &Path) -> Result<DateTime<Local>, Self::Error> {
        GitHistory::latest_modified(self, path)
    }
}

fn commit_date(commit: &Commit) -> DateTime<Local> {
    Local
        .timestamp_opt(commit.time().seconds(), 0)
        .single()
        .unwrap_or_else(Local::now)
}
