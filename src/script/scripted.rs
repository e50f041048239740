//! Collaborators backed by script data

use anyhow::{anyhow, Result};
use std::collections::VecDeque;
use std::sync::Mutex;

use super::{DocumentScript, DragScript};
use crate::collaborators::{DocumentProbe, PointerSource, PreviewRenderer, RenderedPage};
use crate::geometry::{CropBox, ViewPoint};

/// Document whose signature layout comes from a script
#[derive(Debug, Clone)]
pub struct ScriptDocument {
    document: DocumentScript,
    open: bool,
    unlocked: bool,
}

impl ScriptDocument {
    pub fn new(document: DocumentScript) -> Self {
        Self {
            unlocked: document.password.is_none(),
            document,
            open: true,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

impl DocumentProbe for ScriptDocument {
    fn page_count(&self) -> u32 {
        self.document.pages
    }

    fn unlock(&mut self, password: &str) -> Result<()> {
        if self.document.password.as_deref().is_some_and(|expected| expected != password) {
            return Err(anyhow!("incorrect document password"));
        }
        self.unlocked = true;
        Ok(())
    }

    fn has_signature_fields(&mut self, page: u32) -> Result<bool> {
        if !self.open {
            return Err(anyhow!("document is closed"));
        }
        if !self.unlocked {
            return Err(anyhow!("document is encrypted"));
        }
        if self.document.unreadable_pages.contains(&page) {
            return Err(anyhow!("page {} could not be decoded", page));
        }
        Ok(self.document.signed_pages.contains(&page))
    }

    fn close(&mut self) {
        self.open = false;
    }
}

/// Renders every page at the scripted size
#[derive(Debug, Clone)]
pub struct ScriptRenderer {
    pages: u32,
    width: f64,
    height: f64,
    crop_box: CropBox,
}

impl ScriptRenderer {
    pub fn new(document: &DocumentScript) -> Self {
        let [width, height] = document.page_size;
        Self {
            pages: document.pages,
            width,
            height,
            crop_box: document
                .crop_box
                .unwrap_or_else(|| CropBox::new(0.0, 0.0, width, height)),
        }
    }
}

impl PreviewRenderer for ScriptRenderer {
    fn render_page(&self, page: u32) -> Result<RenderedPage> {
        if page == 0 || page > self.pages {
            return Err(anyhow!("page {} is outside 1..={}", page, self.pages));
        }
        Ok(RenderedPage {
            page,
            image_width: self.width,
            image_height: self.height,
            crop_box: self.crop_box,
        })
    }
}

/// Pointer that walks a fixed path, one point per sample, then rests on the last
#[derive(Debug)]
pub struct ScriptedPointer {
    remaining: Mutex<VecDeque<ViewPoint>>,
    rest: ViewPoint,
}

impl ScriptedPointer {
    pub fn new(drag: &DragScript) -> Self {
        Self {
            remaining: Mutex::new(drag.path.iter().copied().collect()),
            rest: drag.path.last().copied().unwrap_or(drag.from),
        }
    }

    /// Where the pointer ends up once the path is exhausted
    pub fn rest(&self) -> ViewPoint {
        self.rest
    }
}

impl PointerSource for ScriptedPointer {
    fn position(&self) -> Option<ViewPoint> {
        let mut remaining = self.remaining.lock().ok()?;
        Some(remaining.pop_front().unwrap_or(self.rest))
    }
}
