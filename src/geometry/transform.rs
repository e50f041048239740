//! Preview ↔ document coordinate conversion for the signature rectangle.
//!
//! Preview space is screen pixels inside the preview surface, origin top-left,
//! y growing downward. Document space is page units, origin bottom-left, shifted
//! by the crop box origin.

use serde::{Deserialize, Serialize};

/// A point in preview (screen) space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewPoint {
    pub x: f64,
    pub y: f64,
}

impl ViewPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A point in document space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DocPoint {
    pub x: f64,
    pub y: f64,
}

impl DocPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Visible page rectangle in document units
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CropBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The crop box as a document rectangle
    pub fn to_rect(&self) -> DocRect {
        DocRect {
            lower_left: DocPoint::new(self.x, self.y),
            upper_right: DocPoint::new(self.x + self.width, self.y + self.height),
        }
    }
}

/// Rectangle in document space, always normalized
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DocRect {
    pub lower_left: DocPoint,
    pub upper_right: DocPoint,
}

impl DocRect {
    /// Build from any two opposite corners, swapping per axis as needed
    pub fn from_corners(a: DocPoint, b: DocPoint) -> Self {
        Self {
            lower_left: DocPoint::new(a.x.min(b.x), a.y.min(b.y)),
            upper_right: DocPoint::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn width(&self) -> f64 {
        self.upper_right.x - self.lower_left.x
    }

    pub fn height(&self) -> f64 {
        self.upper_right.y - self.lower_left.y
    }

    /// Compare corner by corner within `tolerance` document units
    pub fn approx_eq(&self, other: &DocRect, tolerance: f64) -> bool {
        (self.lower_left.x - other.lower_left.x).abs() <= tolerance
            && (self.lower_left.y - other.lower_left.y).abs() <= tolerance
            && (self.upper_right.x - other.upper_right.x).abs() <= tolerance
            && (self.upper_right.y - other.upper_right.y).abs() <= tolerance
    }
}

/// How a rendered page image sits inside the preview surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviewLayout {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl PreviewLayout {
    pub fn new(scale: f64, offset_x: f64, offset_y: f64) -> Self {
        Self {
            scale,
            offset_x,
            offset_y,
        }
    }

    /// Fit an image into a panel, letterboxing on the short axis.
    ///
    /// Landscape images are scaled to the panel width, portrait ones to the
    /// panel height. Returns `None` for an empty image.
    pub fn fit(panel_width: f64, panel_height: f64, image_width: f64, image_height: f64) -> Option<Self> {
        if image_width <= 0.0 || image_height <= 0.0 {
            return None;
        }

        let scale = if image_width > image_height {
            panel_width / image_width
        } else {
            panel_height / image_height
        };
        if scale <= 0.0 || !scale.is_finite() {
            return None;
        }

        Some(Self {
            scale,
            offset_x: (panel_width - image_width * scale) / 2.0,
            offset_y: (panel_height - image_height * scale) / 2.0,
        })
    }
}

/// Stateless conversion between preview and document coordinates for one page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviewTransform {
    pub layout: PreviewLayout,
    pub crop: CropBox,
}

impl PreviewTransform {
    pub fn new(layout: PreviewLayout, crop: CropBox) -> Self {
        Self { layout, crop }
    }

    pub fn to_document(&self, point: ViewPoint) -> DocPoint {
        let l = &self.layout;
        DocPoint {
            x: (point.x - l.offset_x) / l.scale + self.crop.x,
            y: (self.crop.height - (point.y - l.offset_y) / l.scale) + self.crop.y,
        }
    }

    pub fn to_view(&self, point: DocPoint) -> ViewPoint {
        let l = &self.layout;
        ViewPoint {
            x: (point.x - self.crop.x) * l.scale + l.offset_x,
            y: (self.crop.height - (point.y - self.crop.y)) * l.scale + l.offset_y,
        }
    }

    /// Convert a dragged pair of preview points to a normalized document rectangle
    pub fn rect_to_document(&self, origin: ViewPoint, end: ViewPoint) -> DocRect {
        DocRect::from_corners(self.to_document(origin), self.to_document(end))
    }

    /// Convert a document rectangle to preview corners (top-left, bottom-right)
    pub fn rect_to_view(&self, rect: &DocRect) -> (ViewPoint, ViewPoint) {
        let top_left = self.to_view(DocPoint::new(rect.lower_left.x, rect.upper_right.y));
        let bottom_right = self.to_view(DocPoint::new(rect.upper_right.x, rect.lower_left.y));
        (top_left, bottom_right)
    }

    /// Preview corners covering the whole crop box, used before any drag
    pub fn default_drag(&self) -> (ViewPoint, ViewPoint) {
        self.rect_to_view(&self.crop.to_rect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform() -> PreviewTransform {
        PreviewTransform::new(
            PreviewLayout::new(0.5, 20.0, 10.0),
            CropBox::new(18.0, 36.0, 612.0, 792.0),
        )
    }

    #[test]
    fn test_view_origin_maps_to_crop_top_left() {
        let t = transform();
        let doc = t.to_document(ViewPoint::new(20.0, 10.0));
        assert_eq!(doc, DocPoint::new(18.0, 792.0 + 36.0));
    }

    #[test]
    fn test_y_axis_flips() {
        let t = transform();
        let top = t.to_document(ViewPoint::new(20.0, 10.0));
        let lower = t.to_document(ViewPoint::new(20.0, 110.0));
        assert!(lower.y < top.y);
        assert!((top.y - lower.y - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_rect_normalized_regardless_of_drag_direction() {
        let t = transform();
        let forward = t.rect_to_document(ViewPoint::new(40.0, 30.0), ViewPoint::new(140.0, 80.0));
        let backward = t.rect_to_document(ViewPoint::new(140.0, 80.0), ViewPoint::new(40.0, 30.0));
        let crossed = t.rect_to_document(ViewPoint::new(40.0, 80.0), ViewPoint::new(140.0, 30.0));
        assert_eq!(forward, backward);
        assert_eq!(forward, crossed);
        assert!(forward.lower_left.x < forward.upper_right.x);
        assert!(forward.lower_left.y < forward.upper_right.y);
    }

    #[test]
    fn test_document_rect_round_trips_through_preview() {
        let t = transform();
        let rect = DocRect::from_corners(DocPoint::new(100.5, 200.25), DocPoint::new(300.0, 260.75));
        let (a, b) = t.rect_to_view(&rect);
        let back = t.rect_to_document(a, b);
        assert!(back.approx_eq(&rect, 1e-6));
    }

    #[test]
    fn test_default_drag_covers_crop_box() {
        let t = transform();
        let (a, b) = t.default_drag();
        let rect = t.rect_to_document(a, b);
        assert!(rect.approx_eq(&t.crop.to_rect(), 1e-9));
    }

    #[test]
    fn test_fit_portrait_letterboxes_horizontally() {
        let layout = PreviewLayout::fit(400.0, 400.0, 200.0, 400.0).unwrap();
        assert!((layout.scale - 1.0).abs() < 1e-9);
        assert!((layout.offset_x - 100.0).abs() < 1e-9);
        assert!(layout.offset_y.abs() < 1e-9);
    }

    #[test]
    fn test_fit_landscape_uses_width() {
        let layout = PreviewLayout::fit(300.0, 300.0, 600.0, 300.0).unwrap();
        assert!((layout.scale - 0.5).abs() < 1e-9);
        assert!((layout.offset_y - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_rejects_empty_image() {
        assert!(PreviewLayout::fit(300.0, 300.0, 0.0, 300.0).is_none());
    }
}
