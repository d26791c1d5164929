//! Priority-ordered date resolution, one page at a time.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::warn;

use crate::coerce::coerce;
use crate::config::DateOptions;
use crate::error::ResolveError;
use crate::history::History;
use crate::types::page::{PageFile, RawDate, ResolvedDates};
use crate::types::source::SourceKind;

/// Resolves created/modified/published dates for pages by walking the
/// configured source list and keeping the first value each field sees.
///
/// One resolver serves a whole build: the history handle is discovered up
/// front (see the git crate) and reused for every page.
pub struct DateResolver<H> {
    options: DateOptions,
    content_root: PathBuf,
    history: Option<H>,
}

impl<H: History> DateResolver<H> {
    pub fn new(options: DateOptions, content_root: impl Into<PathBuf>, history: Option<H>) -> Self {
        Self {
            options,
            content_root: content_root.into(),
            history,
        }
    }

    /// The directory git paths are computed against: the checkout's
    /// working directory, or the content root when the backend reports
    /// none.
    fn workdir(&self) -> &Path {
        self.history
            .as_ref()
            .and_then(|h| h.workdir())
            .unwrap_or(&self.content_root)
    }

    /// Resolve all three dates for one page.
    ///
    /// Fatal errors are limited to missing path fields (a wiring defect in
    /// the host pipeline) and filesystem stat failures; everything else
    /// degrades to a warning and a defaulted date.
    pub fn resolve(&self, page: &PageFile) -> Result<ResolvedDates, ResolveError> {
        let rel = page
            .relative_path
            .as_deref()
            .ok_or(ResolveError::MissingPath { field: "relative" })?;
        let full = page
            .source_path
            .as_deref()
            .ok_or(ResolveError::MissingPath { field: "source" })?;

        let mut created: Option<RawDate> = None;
        let mut modified: Option<RawDate> = None;
        let mut published: Option<RawDate> = None;

        for source in self.options.priority.sources() {
            match source {
                SourceKind::Frontmatter => {
                    if let Some(fm) = &page.frontmatter {
                        fill(&mut created, &fm.created);
                        fill(&mut modified, &fm.modified);
                        fill(&mut published, &fm.published);
                    }
                }
                SourceKind::Git => {
                    if let Some(history) = &self.history {
                        if modified.is_none() {
                            self.fill_from_history(history, rel, full, &mut modified);
                        }
                    }
                }
                SourceKind::Filesystem => {
                    let meta = fs::metadata(full).map_err(|source| ResolveError::Stat {
                        path: full.to_path_buf(),
                        source,
                    })?;
                    // Filesystems that cannot report a birth time surface
                    // zero millis here; coercion treats that as unset.
                    fill_millis(&mut created, meta.created().map_or(0, system_time_millis));
                    fill_millis(&mut modified, meta.modified().map_or(0, system_time_millis));
                }
            }
        }

        Ok(ResolvedDates {
            created: coerce(rel, created.as_ref()),
            modified: coerce(rel, modified.as_ref()),
            published: coerce(rel, published.as_ref()),
        })
    }

    fn fill_from_history(&self, history: &H, rel: &Path, full: &Path, slot: &mut Option<RawDate>) {
        // The checkout normally contains the content root; if it does not,
        // the content-relative path is the best query we have and fails
        // per-file as untracked.
        let repo_rel = full.strip_prefix(self.workdir()).unwrap_or(rel);
        match history.latest_modified(repo_rel) {
            Ok(ts) => *slot = Some(RawDate::EpochMillis(ts.timestamp_millis())),
            Err(e) => {
                warn!(
                    "`{}` has no usable git history ({}), dates may be inaccurate",
                    full.display(),
                    e
                );
            }
        }
    }
}

/// First write wins: a field that already has a value keeps it.
fn fill(slot: &mut Option<RawDate>, value: &Option<RawDate>) {
    if slot.is_none() {
        *slot = value.clone();
    }
}

fn fill_millis(slot: &mut Option<RawDate>, millis: i64) {
    if slot.is_none() {
        *slot = Some(RawDate::EpochMillis(millis));
    }
}

fn system_time_millis(t: SystemTime) -> i64 {
    t.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::NoHistory;
    use crate::types::page::FrontmatterDates;
    use crate::types::source::Priority;
    use chrono::{DateTime, Datelike, Local, NaiveTime, TimeZone};
    use std::io::Write;

    /// Stub history returning a fixed date, or a fixed per-file failure.
    struct StubHistory {
        workdir: Option<PathBuf>,
        date: Result<DateTime<Local>, String>,
    }

    impl StubHistory {
        fn returning(ts_millis: i64) -> Self {
            Self {
                workdir: None,
                date: Ok(Local.timestamp_millis_opt(ts_millis).unwrap()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                workdir: None,
                date: Err(message.to_string()),
            }
        }
    }

    impl History for StubHistory {
        type Error = String;

        fn workdir(&self) -> Option<&Path> {
            self.workdir.as_deref()
        }

        fn latest_modified(&self, _path: &Path) -> Result<DateTime<Local>, Self::Error> {
            self.date.clone()
        }
    }

    fn options(sources: Vec<SourceKind>) -> DateOptions {
        DateOptions {
            priority: Priority::new(sources).unwrap(),
        }
    }

    fn frontmatter(created: Option<&str>, modified: Option<&str>) -> FrontmatterDates {
        FrontmatterDates {
            created: created.map(|s| RawDate::Text(s.to_string())),
            modified: modified.map(|s| RawDate::Text(s.to_string())),
            published: None,
        }
    }

    fn temp_page(dir: &tempfile::TempDir) -> PageFile {
        let source = dir.path().join("note.md");
        let mut file = fs::File::create(&source).unwrap();
        writeln!(file, "# note").unwrap();
        PageFile {
            relative_path: Some(PathBuf::from("note.md")),
            source_path: Some(source),
            frontmatter: None,
        }
    }

    #[test]
    fn test_missing_relative_path_is_fatal() {
        let resolver = DateResolver::new(DateOptions::default(), "/content", None::<NoHistory>);
        let page = PageFile {
            relative_path: None,
            source_path: Some(PathBuf::from("/content/a.md")),
            frontmatter: None,
        };
        let err = resolver.resolve(&page).unwrap_err();
        assert!(matches!(err, ResolveError::MissingPath { field: "relative" }));
    }

    #[test]
    fn test_missing_source_path_is_fatal() {
        let resolver = DateResolver::new(DateOptions::default(), "/content", None::<NoHistory>);
        let page = PageFile {
            relative_path: Some(PathBuf::from("a.md")),
            source_path: None,
            frontmatter: None,
        };
        let err = resolver.resolve(&page).unwrap_err();
        assert!(matches!(err, ResolveError::MissingPath { field: "source" }));
    }

    #[test]
    fn test_first_source_wins_per_field() {
        let dir = tempfile::tempdir().unwrap();
        let mut page = temp_page(&dir);
        page.frontmatter = Some(frontmatter(Some("2020-01-01"), Some("2020-06-01")));

        let resolver = DateResolver::new(
            options(vec![
                SourceKind::Frontmatter,
                SourceKind::Git,
                SourceKind::Filesystem,
            ]),
            dir.path(),
            Some(StubHistory::returning(1700000000000)),
        );
        let dates = resolver.resolve(&page).unwrap();

        // Front-matter came first, so neither git nor the filesystem may
        // overwrite modified.
        assert_eq!(dates.created.date_naive().year(), 2020);
        assert_eq!(dates.modified.date_naive().month(), 6);
        assert_ne!(dates.modified.timestamp_millis(), 1700000000000);
    }

    #[test]
    fn test_git_fills_modified_when_frontmatter_silent() {
        let dir = tempfile::tempdir().unwrap();
        let mut page = temp_page(&dir);
        page.frontmatter = Some(frontmatter(Some("2020-01-01"), None));

        let resolver = DateResolver::new(
            DateOptions::default(),
            dir.path(),
            Some(StubHistory::returning(1700000000000)),
        );
        let before = Local::now();
        let dates = resolver.resolve(&page).unwrap();
        let after = Local::now();

        // created from front-matter, as local midnight
        assert_eq!(dates.created.date_naive().year(), 2020);
        assert_eq!(dates.created.time(), NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        // modified from git
        assert_eq!(dates.modified.timestamp_millis(), 1700000000000);
        // published had no source anywhere and defaults to now
        assert!(dates.published >= before && dates.published <= after);
    }

    #[test]
    fn test_git_failure_falls_through_to_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let page = temp_page(&dir);

        let resolver = DateResolver::new(
            options(vec![SourceKind::Git, SourceKind::Filesystem]),
            dir.path(),
            Some(StubHistory::failing("file not tracked")),
        );
        let before = Local::now();
        let dates = resolver.resolve(&page).unwrap();
        let after = Local::now();

        // mtime of a file created moments ago
        assert!(dates.modified >= before - chrono::Duration::seconds(10));
        assert!(dates.modified <= after);
    }

    #[test]
    fn test_no_history_leaves_other_sources_intact() {
        let dir = tempfile::tempdir().unwrap();
        let mut page = temp_page(&dir);
        page.frontmatter = Some(frontmatter(Some("2019-05-05"), None));

        let resolver = DateResolver::new(DateOptions::default(), dir.path(), None::<NoHistory>);
        let dates = resolver.resolve(&page).unwrap();

        assert_eq!(dates.created.date_naive().year(), 2019);
        // modified fell through to the filesystem
        assert!(dates.modified.date_naive().year() >= 2024);
    }

    #[test]
    fn test_stat_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let page = PageFile {
            relative_path: Some(PathBuf::from("ghost.md")),
            source_path: Some(dir.path().join("ghost.md")),
            frontmatter: None,
        };

        let resolver = DateResolver::new(
            options(vec![SourceKind::Filesystem]),
            dir.path(),
            None::<NoHistory>,
        );
        let err = resolver.resolve(&page).unwrap_err();
        assert!(matches!(err, ResolveError::Stat { .. }));
    }

    #[test]
    fn test_unconfigured_source_is_never_consulted() {
        // The source path does not exist, but the filesystem source is not
        // in the priority, so stat never runs and nothing fails.
        let page = PageFile {
            relative_path: Some(PathBuf::from("ghost.md")),
            source_path: Some(PathBuf::from("/nonexistent/ghost.md")),
            frontmatter: Some(frontmatter(Some("2021-01-01"), None)),
        };

        let resolver = DateResolver::new(
            options(vec![SourceKind::Frontmatter]),
            "/content",
            None::<NoHistory>,
        );
        let dates = resolver.resolve(&page).unwrap();
        assert_eq!(dates.created.date_naive().year(), 2021);
    }

    #[test]
    fn test_duplicate_sources_are_harmless() {
        let dir = tempfile::tempdir().unwrap();
        let mut page = temp_page(&dir);
        page.frontmatter = Some(frontmatter(Some("2020-01-01"), None));

        let resolver = DateResolver::new(
            options(vec![
                SourceKind::Frontmatter,
                SourceKind::Frontmatter,
                SourceKind::Filesystem,
            ]),
            dir.path(),
            None::<NoHistory>,
        );
        let dates = resolver.resolve(&page).unwrap();
        assert_eq!(dates.created.date_naive().year(), 2020);
    }
}
