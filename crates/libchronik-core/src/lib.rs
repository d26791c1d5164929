//! Core date resolution for chronik.
//!
//! Given one content file, determine `created`, `modified`, and `published`
//! timestamps by consulting a configurable, priority-ordered list of
//! sources (front-matter, git history, filesystem metadata) and keeping the
//! first value each field sees. Whatever is still missing afterwards is
//! defaulted to the time of resolution, so every page ends up with three
//! concrete dates.

pub mod coerce;
pub mod config;
pub mod error;
pub mod history;
pub mod resolver;
pub mod types;

pub use coerce::coerce;
pub use config::{load_options, DateOptions};
pub use error::ResolveError;
pub use history::{History, NoHistory};
pub use resolver::DateResolver;
pub use types::page::{FrontmatterDates, PageFile, RawDate, ResolvedDates};
pub use types::source::{Priority, SourceKind};
