//! Preview geometry: coordinate transform, preview fit and drag tracking

pub mod drag;
pub mod transform;

pub use drag::{CancelToken, DragTracker, DEFAULT_SAMPLE_INTERVAL};
pub use transform::{CropBox, DocPoint, DocRect, PreviewLayout, PreviewTransform, ViewPoint};
