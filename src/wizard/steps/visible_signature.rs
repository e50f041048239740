//! Visible signature placement: page choice and the dragged rectangle.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::StepDataCollector;
use crate::collaborators::PreviewRenderer;
use crate::geometry::{CropBox, DocRect, PreviewLayout, PreviewTransform, ViewPoint};
use crate::signature::SignatureConfiguration;

/// Size of the preview surface, in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviewPanel {
    pub width: f64,
    pub height: f64,
}

impl Default for PreviewPanel {
    fn default() -> Self {
        Self {
            width: 300.0,
            height: 400.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VisibleSignatureStep {
    enabled: bool,
    page_count: u32,
    page: u32,
    panel: PreviewPanel,
    transform: Option<PreviewTransform>,
    drag: Option<(ViewPoint, ViewPoint)>,
}

impl VisibleSignatureStep {
    pub fn new(page_count: u32, panel: PreviewPanel) -> Self {
        Self {
            enabled: false,
            page_count,
            page: 1,
            panel,
            transform: None,
            drag: None,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Render `page` into the preview and reset the rectangle to its crop box.
    ///
    /// Out-of-range pages and render failures leave the preview as it was and
    /// return false.
    pub fn select_page(&mut self, page: u32, renderer: &dyn PreviewRenderer) -> bool {
        if page == 0 || page > self.page_count {
            debug!(page, page_count = self.page_count, "preview page out of range");
            return false;
        }

        let rendered = match renderer.render_page(page) {
            Ok(rendered) => rendered,
            Err(e) => {
                warn!(page, "failed to render preview page: {:#}", e);
                return false;
            }
        };

        let Some(layout) = PreviewLayout::fit(
            self.panel.width,
            self.panel.height,
            rendered.image_width,
            rendered.image_height,
        ) else {
            warn!(page, "preview image has no area");
            return false;
        };

        self.page = page;
        self.transform = Some(PreviewTransform::new(layout, rendered.crop_box));
        self.drag = None;
        debug!(page, scale = layout.scale, "preview page selected");
        true
    }

    /// Use an explicit layout and crop box, bypassing the renderer
    pub fn set_preview(&mut self, page: u32, layout: PreviewLayout, crop: CropBox) {
        self.page = page.clamp(1, self.page_count.max(1));
        self.transform = Some(PreviewTransform::new(layout, crop));
        self.drag = None;
    }

    pub fn transform(&self) -> Option<&PreviewTransform> {
        self.transform.as_ref()
    }

    /// Record a finished drag, in preview coordinates
    pub fn set_drag(&mut self, origin: ViewPoint, end: ViewPoint) {
        self.drag = Some((origin, end));
    }

    /// Preview corners of the current rectangle; the full crop box before any drag
    pub fn drag_points(&self) -> Option<(ViewPoint, ViewPoint)> {
        let transform = self.transform.as_ref()?;
        Some(self.drag.unwrap_or_else(|| transform.default_drag()))
    }

    /// Current rectangle in document space
    pub fn signature_rect(&self) -> Option<DocRect> {
        let transform = self.transform.as_ref()?;
        let (origin, end) = self.drag_points()?;
        Some(transform.rect_to_document(origin, end))
    }
}

impl StepDataCollector for VisibleSignatureStep {
    fn collect_data(&self, config: &mut SignatureConfiguration) {
        config.visible.enabled = self.enabled;
        if !self.enabled {
            return;
        }
        config.visible.page = self.page;
        if let Some(rect) = self.signature_rect() {
            config.visible.rect = Some(rect);
        }
    }

    fn can_advance(&self) -> bool {
        true
    }
}
