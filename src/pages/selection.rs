//! Page selection policy for export and signing.
//!
//! Exactly one mode is active at a time; choosing a mode replaces whatever was
//! selected before.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::range::{PageRangeError, PageRanges, PageSelection};

/// Which pages an export covers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PageSelectionMode {
    /// Every page, 1..=N
    All,
    /// Only the page the viewer is showing
    Current,
    /// An explicit range expression
    Range { expression: String },
}

impl Default for PageSelectionMode {
    fn default() -> Self {
        Self::Current
    }
}

/// Whether exported pages go to one file or one file per page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportLayout {
    SingleFile,
    #[default]
    MultipleFiles,
}

/// Resolved export request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportPages {
    pub pages: PageSelection,
    pub layout: ExportLayout,
}

/// Export page picker bound to one open document
#[derive(Debug, Clone)]
pub struct PageSelector {
    page_count: u32,
    current_page: u32,
    mode: PageSelectionMode,
    layout: ExportLayout,
}

impl PageSelector {
    /// Create a selector; starts on the current page like the export dialog does
    pub fn new(page_count: u32, current_page: u32) -> Self {
        Self {
            page_count,
            current_page,
            mode: PageSelectionMode::Current,
            layout: ExportLayout::default(),
        }
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn mode(&self) -> &PageSelectionMode {
        &self.mode
    }

    pub fn layout(&self) -> ExportLayout {
        self.layout
    }

    /// Select a mode, replacing the previous one
    pub fn select(&mut self, mode: PageSelectionMode) {
        debug!(?mode, "page selection mode changed");
        self.mode = mode;
    }

    pub fn set_layout(&mut self, layout: ExportLayout) {
        self.layout = layout;
    }

    /// Track edits to the range text field.
    ///
    /// A non-empty field switches to range mode, clearing it falls back to the
    /// current page.
    pub fn edit_range_text(&mut self, text: &str) {
        if text.is_empty() {
            self.select(PageSelectionMode::Current);
        } else {
            self.select(PageSelectionMode::Range {
                expression: text.to_string(),
            });
        }
    }

    /// Resolve the active mode to concrete pages
    pub fn pages(&self) -> Result<PageSelection, PageRangeError> {
        match &self.mode {
            PageSelectionMode::All => Ok(PageSelection::from((1..=self.page_count).collect::<Vec<_>>())),
            PageSelectionMode::Current => {
                if self.current_page == 0 || self.current_page > self.page_count {
                    return Err(PageRangeError::OutOfBounds {
                        page: self.current_page,
                        page_count: self.page_count,
                    });
                }
                Ok(PageSelection::from(vec![self.current_page]))
            }
            PageSelectionMode::Range { expression } => {
                PageRanges::parse(expression)?.resolve(self.page_count)
            }
        }
    }

    /// Resolve pages together with the chosen output layout
    pub fn export_pages(&self) -> Result<ExportPages, PageRangeError> {
        Ok(ExportPages {
            pages: self.pages()?,
            layout: self.layout,
        })
    }
}
