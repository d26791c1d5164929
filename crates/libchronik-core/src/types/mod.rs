pub mod page;
pub mod source;

pub use page::{FrontmatterDates, PageFile, RawDate, ResolvedDates};
pub use source::{Priority, SourceKind};
