use serde::{Deserialize, Serialize};

use crate::error::ResolveError;

/// Where a page date can come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Frontmatter,
    Git,
    Filesystem,
}

/// Ordered list of sources to consult, earliest first.
///
/// Must name at least one source. Duplicates are harmless: a field that
/// already has a value is never reconsidered. A source missing from the
/// list is never consulted at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SourceKind>", into = "Vec<SourceKind>")]
pub struct Priority(Vec<SourceKind>);

impl Priority {
    pub fn new(sources: Vec<SourceKind>) -> Result<Self, ResolveError> {
        if sources.is_empty() {
            return Err(ResolveError::EmptyPriority);
        }
        Ok(Self(sources))
    }

    pub fn sources(&self) -> &[SourceKind] {
        &self.0
    }

    pub fn contains(&self, kind: SourceKind) -> bool {
        self.0.contains(&kind)
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self(vec![
            SourceKind::Frontmatter,
            SourceKind::Git,
            SourceKind::Filesystem,
        ])
    }
}

impl TryFrom<Vec<SourceKind>> for Priority {
    type Error = ResolveError;

    fn try_from(sources: Vec<SourceKind>) -> Result<Self, Self::Error> {
        Self::new(sources)
    }
}

impl From<Priority> for Vec<SourceKind> {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}
