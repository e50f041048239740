//! Integration tests for a full signing wizard session through the public API
//!
//! Drives `WizardController` the way a UI driver would: probing a document,
//! filling steps, dragging the signature rectangle and finishing.

use anyhow::{anyhow, Result};
use signwiz::collaborators::{DocumentProbe, PointerSource, PreviewRenderer, RenderedPage};
use signwiz::geometry::{CropBox, DragTracker, ViewPoint};
use signwiz::signature::{CertifyMode, EncryptionPermissions};
use signwiz::wizard::{PreviewPanel, StepId, WizardController, WizardError};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

// ─── Collaborators ───────────────────────────────────────────────────────────

struct Document {
    pages: u32,
    signed_page: Option<u32>,
    failing_page: Option<u32>,
}

impl DocumentProbe for Document {
    fn page_count(&self) -> u32 {
        self.pages
    }

    fn has_signature_fields(&mut self, page: u32) -> Result<bool> {
        if self.failing_page == Some(page) {
            return Err(anyhow!("corrupt page"));
        }
        Ok(self.signed_page == Some(page))
    }

    fn close(&mut self) {}
}

/// Landscape pages with a shifted crop box
struct Renderer;

impl PreviewRenderer for Renderer {
    fn render_page(&self, page: u32) -> Result<RenderedPage> {
        Ok(RenderedPage {
            page,
            image_width: 600.0,
            image_height: 300.0,
            crop_box: CropBox::new(20.0, 30.0, 600.0, 300.0),
        })
    }
}

struct FixedPointer(ViewPoint);

impl PointerSource for FixedPointer {
    fn position(&self) -> Option<ViewPoint> {
        Some(self.0)
    }
}

fn open(document: Document) -> WizardController {
    WizardController::open(Box::new(document), PreviewPanel::default())
}

fn unsigned(pages: u32) -> Document {
    Document {
        pages,
        signed_page: None,
        failing_page: None,
    }
}

// ─── Sessions ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_pfx_session_with_visible_signature() {
    let dir = TempDir::new().unwrap();
    let mut wizard = open(unsigned(5));
    assert!(!wizard.config().append_mode());

    wizard
        .mode_select_mut()
        .select_certify_mode(CertifyMode::FormFillingAndAnnotations);
    assert_eq!(wizard.try_next(), Ok(StepId::PfxCredentials));

    wizard.pfx_mut().choose_key_file(Some(PathBuf::from("id.pfx")));
    wizard.pfx_mut().enter_passphrase("pw");
    assert_eq!(wizard.try_next(), Ok(StepId::VisibleSignaturePlacement));

    let visible = wizard.visible_mut();
    visible.set_enabled(true);
    assert!(visible.select_page(4, &Renderer));

    // Landscape page in a 300x400 panel: scale 0.5, centered vertically
    let transform = *visible.transform().unwrap();
    assert!((transform.layout.scale - 0.5).abs() < 1e-9);
    assert!((transform.layout.offset_y - 125.0).abs() < 1e-9);

    let tracker = DragTracker::start(
        ViewPoint::new(50.0, 150.0),
        Arc::new(FixedPointer(ViewPoint::new(150.0, 200.0))),
        Duration::from_millis(2),
    );
    let mut updates = tracker.subscribe();
    updates.changed().await.unwrap();
    let (origin, end) = tracker.release().await;
    visible.set_drag(origin, end);

    wizard.try_next().unwrap();
    wizard.try_next().unwrap();
    assert!(wizard.is_finish_step());

    let output = dir.path().join("signed.pdf");
    wizard.output_mut().choose_output_path(output.clone()).unwrap();
    wizard.output_mut().set_location("Lisbon");

    let config = wizard.finish().unwrap();
    wizard.close();

    assert_eq!(config.certify_mode(), CertifyMode::FormFillingAndAnnotations);
    assert_eq!(config.visible.page, 4);
    let rect = config.visible.rect.unwrap();
    // x: (50 - 0)/0.5 + 20 and (150 - 0)/0.5 + 20
    assert!((rect.lower_left.x - 120.0).abs() < 1e-9);
    assert!((rect.upper_right.x - 320.0).abs() < 1e-9);
    // y: 300 - (200 - 125)/0.5 + 30 and 300 - (150 - 125)/0.5 + 30
    assert!((rect.lower_left.y - 180.0).abs() < 1e-9);
    assert!((rect.upper_right.y - 280.0).abs() < 1e-9);
    assert_eq!(config.output.path, Some(output));
}

#[test]
fn test_signed_document_session() {
    let mut wizard = open(Document {
        pages: 3,
        signed_page: Some(3),
        failing_page: None,
    });
    assert!(wizard.config().append_mode());

    wizard.mode_select_mut().set_keystore_mode(true);
    assert!(!wizard
        .mode_select_mut()
        .select_certify_mode(CertifyMode::NoChanges));
    wizard.next();
    assert_eq!(wizard.config().certify_mode(), CertifyMode::NotCertified);

    let keystore = wizard.keystore_mut();
    keystore.choose_keystore(Some(PathBuf::from("team.p12")));
    keystore.enter_passphrase("a");
    keystore.enter_alias("lead");
    keystore.enter_alias_passphrase("b");
    wizard.try_next().unwrap();
    wizard.try_next().unwrap();

    assert!(!wizard.encryption_mut().set_enabled(true));
    assert!(wizard.can_advance());
    wizard.try_next().unwrap();
    assert!(!wizard.config().encryption_enabled());

    wizard.close();
    wizard.close();
}

#[test]
fn test_probe_failure_degrades_to_normal_mode() {
    let wizard = open(Document {
        pages: 2,
        signed_page: None,
        failing_page: Some(1),
    });
    assert!(!wizard.config().append_mode());
    assert!(wizard.can_advance());
}

#[test]
fn test_encryption_scenario_blocks_then_unblocks() {
    let dir = TempDir::new().unwrap();
    let mut wizard = open(unsigned(1));
    wizard.mode_select_mut().set_keystore_mode(true);
    wizard.next();

    let keystore = wizard.keystore_mut();
    keystore.choose_keystore(Some(PathBuf::from("store.jks")));
    keystore.enter_passphrase("s");
    keystore.enter_alias("a");
    keystore.enter_alias_passphrase("p");

    for _ in 0..2 {
        wizard.try_next().unwrap();
    }
    assert_eq!(wizard.current_step(), StepId::EncryptionOptions);

    wizard.encryption_mut().set_enabled(true);
    wizard
        .encryption_mut()
        .set_permission(EncryptionPermissions::SCREEN_READERS, true);
    assert!(!wizard.can_advance());
    assert_eq!(
        wizard.try_next(),
        Err(WizardError::NotReady(StepId::EncryptionOptions))
    );

    wizard.encryption_mut().enter_user_passphrase("x");
    assert!(wizard.can_advance());
    wizard.try_next().unwrap();

    wizard
        .output_mut()
        .choose_output_path(dir.path().join("enc.pdf"))
        .unwrap();
    assert_eq!(wizard.finish(), Err(WizardError::MissingOwnerPassphrase));
    assert!(wizard.is_finish_step());
}

#[test]
fn test_output_directory_rejected_at_point_of_choice() {
    let dir = TempDir::new().unwrap();
    let mut wizard = open(unsigned(1));
    for _ in 0..4 {
        wizard.next();
    }
    assert!(wizard
        .output_mut()
        .choose_output_path(dir.path().to_path_buf())
        .is_err());
    assert!(!wizard.can_advance());
    assert_eq!(
        wizard.finish(),
        Err(WizardError::NotReady(StepId::CommonOutputOptions))
    );
}
