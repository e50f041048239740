//! Page-range resolution and export page selection

pub mod range;
pub mod selection;

pub use range::{resolve, PageRangeError, PageRanges, PageSelection, PageSpan};
pub use selection::{ExportLayout, ExportPages, PageSelectionMode, PageSelector};
