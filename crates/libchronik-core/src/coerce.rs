//! Raw value to calendar timestamp coercion.
//!
//! Every resolved field passes through [`coerce`] exactly once, whether a
//! source supplied a value or not, so downstream consumers always see a
//! concrete timestamp.

use std::path::Path;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use regex::Regex;
use tracing::warn;

use crate::types::page::RawDate;

/// Accepted string formats, named in the invalid-date warning.
const ACCEPTED_FORMATS: &str =
    "RFC 3339, YYYY-MM-DD, YYYY-MM-DD[T ]HH:MM:SS, RFC 2822, or epoch milliseconds";

/// Coerce a raw source value into a concrete local timestamp.
///
/// A bare `YYYY-MM-DD` string is read as *local* midnight rather than UTC
/// midnight, so date-only front-matter does not shift by a day for readers
/// away from UTC. Values that fail to parse, and values that parse to the
/// epoch instant itself (some providers report 0 instead of nothing), fall
/// back to the current time; the page path and the offending value are
/// logged when a value was actually present.
pub fn coerce(page: &Path, raw: Option<&RawDate>) -> DateTime<Local> {
    // Epoch-exact timestamps are a "never set" sentinel, not a real date.
    let parsed = raw
        .and_then(parse_raw)
        .filter(|dt| dt.timestamp_millis() != 0);

    match parsed {
        Some(dt) => dt,
        None => {
            if let Some(raw) = raw {
                warn!(
                    "found invalid date {} in `{}`, using current time; accepted formats: {}",
                    raw,
                    page.display(),
                    ACCEPTED_FORMATS
                );
            }
            Local::now()
        }
    }
}

fn parse_raw(raw: &RawDate) -> Option<DateTime<Local>> {
    match raw {
        RawDate::Text(s) => parse_text(s.trim()),
        RawDate::EpochMillis(ms) => Local.timestamp_millis_opt(*ms).single(),
    }
}

// YYYY-MM-DD
fn is_date_only(s: &str) -> bool {
    Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap().is_match(s)
}

fn parse_text(s: &str) -> Option<DateTime<Local>> {
    // Date-only values become local midnight, not UTC midnight.
    let rewritten;
    let s = if is_date_only(s) {
        rewritten = format!("{}T00:00:00", s);
        &rewritten
    } else {
        s
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            // A naive timestamp inside a DST gap has no local instant and
            // is treated as invalid by the caller.
            return naive.and_local_timezone(Local).earliest();
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Local));
    }
    None
}
