use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ResolveError;
use crate::types::source::Priority;

/// Options block for date resolution, as it appears in the host's site
/// configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DateOptions {
    /// Sources to consult, in order; the first value wins per field.
    pub priority: Priority,
}

/// Load date options from a TOML file.
pub fn load_options(path: &Path) -> Result<DateOptions, ResolveError> {
    let content = std::fs::read_to_string(path)?;
    let options: DateOptions = toml::from_str(&content)?;
    Ok(options)
}
