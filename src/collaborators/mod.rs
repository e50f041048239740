//! Boundaries to the collaborators the wizard core does not own.
//!
//! Document probing, preview rendering, pointer sampling and the final signing
//! step all live outside this crate. Failures coming back across these traits
//! are logged and degraded, never propagated as crashes.

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::geometry::{CropBox, ViewPoint};
use crate::signature::SignatureConfiguration;

/// Read access to the document being signed, used before the wizard starts
pub trait DocumentProbe {
    /// Number of pages in the document
    fn page_count(&self) -> u32;

    /// Open an encrypted document with `password` before it is probed
    fn unlock(&mut self, _password: &str) -> Result<()> {
        Ok(())
    }

    /// Whether `page` (1-based) carries at least one signature field
    fn has_signature_fields(&mut self, page: u32) -> Result<bool>;

    /// Release the document handle
    fn close(&mut self);
}

/// Rendered page as seen by the preview surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderedPage {
    pub page: u32,
    pub image_width: f64,
    pub image_height: f64,
    pub crop_box: CropBox,
}

/// Page renderer backing the visible-signature preview
pub trait PreviewRenderer {
    fn render_page(&self, page: u32) -> Result<RenderedPage>;
}

/// Live pointer position relative to the preview surface
pub trait PointerSource: Send + Sync {
    /// `None` when the pointer cannot currently be located
    fn position(&self) -> Option<ViewPoint>;
}

/// Receives the finished configuration and performs the actual signing/export
pub trait SigningConsumer {
    fn consume(&mut self, configuration: &SignatureConfiguration) -> Result<()>;
}

/// Unlock the document when a password is configured.
///
/// A wrong password is logged and probing continues; the document then reads
/// as unsigned.
pub fn unlock_document(probe: &mut dyn DocumentProbe, password: Option<&str>) -> bool {
    let Some(password) = password else {
        return true;
    };
    match probe.unlock(password) {
        Ok(()) => {
            debug!("document unlocked");
            true
        }
        Err(e) => {
            warn!("failed to unlock document: {:#}", e);
            false
        }
    }
}

/// Look for existing signature fields on any page.
///
/// Pages that fail to decode are skipped; the result is `false` unless some
/// page positively reports a signature field.
pub fn detect_existing_signatures(probe: &mut dyn DocumentProbe) -> bool {
    let page_count = probe.page_count();
    for page in 1..=page_count {
        match probe.has_signature_fields(page) {
            Ok(true) => {
                info!(page, "existing signature found, signing in append mode");
                return true;
            }
            Ok(false) => {}
            Err(e) => {
                warn!(page, "failed to probe page for signatures: {:#}", e);
            }
        }
    }
    debug!(page_count, "no existing signatures found");
    false
}

#[cfg(test)]
pub(crate) mod fakes {
    //! In-memory collaborators shared by unit tests

    use super::*;
    use anyhow::anyhow;
    use std::collections::HashSet;

    #[derive(Debug, Default)]
    pub struct FakeDocument {
        pub pages: u32,
        pub signed_pages: HashSet<u32>,
        pub broken_pages: HashSet<u32>,
        pub probed: Vec<u32>,
        pub close_count: usize,
        /// Pages cannot be read until unlocked with this password
        pub password: Option<String>,
    }

    impl FakeDocument {
        pub fn unsigned(pages: u32) -> Self {
            Self {
                pages,
                ..Self::default()
            }
        }

        pub fn signed_on(pages: u32, page: u32) -> Self {
            let mut doc = Self::unsigned(pages);
            doc.signed_pages.insert(page);
            doc
        }
    }

    impl DocumentProbe for FakeDocument {
        fn page_count(&self) -> u32 {
            self.pages
        }

        fn unlock(&mut self, password: &str) -> Result<()> {
            if self.password.as_deref().is_some_and(|expected| expected != password) {
                return Err(anyhow!("bad password"));
            }
            self.password = None;
            Ok(())
        }

        fn has_signature_fields(&mut self, page: u32) -> Result<bool> {
            self.probed.push(page);
            if self.password.is_some() {
                return Err(anyhow!("document is encrypted"));
            }
            if self.broken_pages.contains(&page) {
                return Err(anyhow!("page {} failed to decode", page));
            }
            Ok(self.signed_pages.contains(&page))
        }

        fn close(&mut self) {
            self.close_count += 1;
        }
    }

    /// Renders every page as a US-letter portrait; page 0 and pages past `pages` fail
    pub struct FakeRenderer {
        pub pages: u32,
    }

    impl PreviewRenderer for FakeRenderer {
        fn render_page(&self, page: u32) -> Result<RenderedPage> {
            if page == 0 || page > self.pages {
                return Err(anyhow!("no such page {}", page));
            }
            Ok(RenderedPage {
                page,
                image_width: 612.0,
                image_height: 792.0,
                crop_box: CropBox::new(0.0, 0.0, 612.0, 792.0),
            })
        }
    }
}
