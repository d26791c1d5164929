use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// A raw, not-yet-coerced date value from an upstream source.
///
/// Absence is `Option<RawDate>::None`, an explicit "this field was never
/// set" marker; a present-but-malformed value still reaches coercion so it
/// can be reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDate {
    EpochMillis(i64),
    Text(String),
}

impl fmt::Display for RawDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawDate::EpochMillis(ms) => write!(f, "{}", ms),
            RawDate::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// The date-bearing subset of a page's front-matter.
///
/// Unknown keys (title, tags, ...) are ignored, so this deserializes
/// straight out of a full front-matter mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontmatterDates {
    pub created: Option<RawDate>,
    pub modified: Option<RawDate>,
    pub published: Option<RawDate>,
}

/// One content file as handed over by the host pipeline.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PageFile {
    /// Path relative to the content root
    pub relative_path: Option<PathBuf>,
    /// Absolute path on disk
    pub source_path: Option<PathBuf>,
    /// Front-matter dates, if the page carries front-matter at all
    pub frontmatter: Option<FrontmatterDates>,
}

/// Resolved calendar timestamps for one page.
///
/// All three fields are concrete after resolution; missing or invalid
/// inputs are repaired by defaulting to the time of resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedDates {
    pub created: DateTime<Local>,
    pub modified: DateTime<Local>,
    pub published: DateTime<Local>,
}
