use anyhow::{bail, Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::scripted::{ScriptDocument, ScriptRenderer, ScriptedPointer};
use super::{DragScript, Script};
use crate::collaborators::SigningConsumer;
use crate::config::Config;
use crate::geometry::{DragTracker, ViewPoint};
use crate::signature::{EncryptionPermissions, SignatureConfiguration};
use crate::wizard::{StepId, WizardController};

/// Drive a wizard session from `script` and hand the result to `consumer`.
///
/// Each step is filled in when the wizard reaches it and left with a guarded
/// advance, so a script missing required input fails at that step.
pub async fn run_script(
    script: &Script,
    config: &Config,
    consumer: &mut dyn SigningConsumer,
) -> Result<SignatureConfiguration> {
    let document = ScriptDocument::new(script.document.clone());
    let renderer = ScriptRenderer::new(&script.document);
    let mut wizard = WizardController::open_with_password(
        Box::new(document),
        config.preview.panel(),
        config.document.password.as_deref(),
    );

    let result = drive(&mut wizard, script, config, &renderer).await;
    wizard.close();
    let signature = result?;

    consumer
        .consume(&signature)
        .context("Signing consumer rejected the configuration")?;
    info!("scripted session complete");
    Ok(signature)
}

async fn drive(
    wizard: &mut WizardController,
    script: &Script,
    config: &Config,
    renderer: &ScriptRenderer,
) -> Result<SignatureConfiguration> {
    loop {
        let step = wizard.current_step();
        debug!(step = ?step, progress = %step.progress_label(), "filling step");
        match step {
            StepId::ModeSelect => fill_mode(wizard, script),
            StepId::PfxCredentials => fill_pfx(wizard, script),
            StepId::KeystoreCredentials => fill_keystore(wizard, script),
            StepId::VisibleSignaturePlacement => {
                fill_visible(wizard, script, config, renderer).await;
            }
            StepId::EncryptionOptions => fill_encryption(wizard, script)?,
            StepId::CommonOutputOptions => {
                fill_output(wizard, script)?;
                return wizard.finish().context("Could not finish the wizard");
            }
        }
        wizard
            .try_next()
            .with_context(|| format!("Script stopped at '{}'", step))?;
    }
}

fn fill_mode(wizard: &mut WizardController, script: &Script) {
    let step = wizard.mode_select_mut();
    step.set_keystore_mode(script.mode.keystore);
    if !step.select_certify_mode(script.mode.certify) {
        warn!(certify = ?script.mode.certify, "document is already signed, certify mode ignored");
    }
}

fn fill_pfx(wizard: &mut WizardController, script: &Script) {
    let Some(pfx) = &script.pfx else {
        return;
    };
    let step = wizard.pfx_mut();
    step.choose_key_file(pfx.key_file.clone());
    step.enter_passphrase(&pfx.passphrase);
}

fn fill_keystore(wizard: &mut WizardController, script: &Script) {
    let Some(keystore) = &script.keystore else {
        return;
    };
    let step = wizard.keystore_mut();
    step.choose_keystore(keystore.path.clone());
    step.enter_passphrase(&keystore.passphrase);
    step.enter_alias(&keystore.alias);
    step.enter_alias_passphrase(&keystore.alias_passphrase);
}

async fn fill_visible(
    wizard: &mut WizardController,
    script: &Script,
    config: &Config,
    renderer: &ScriptRenderer,
) {
    let visible = &script.visible;
    let step = wizard.visible_mut();
    step.set_enabled(visible.enabled);
    if !visible.enabled {
        return;
    }

    let page = visible.page.unwrap_or(1);
    if !step.select_page(page, renderer) {
        warn!(page, "could not show page in preview");
        return;
    }

    if let Some(drag) = &visible.drag {
        let (origin, end) = perform_drag(drag, config).await;
        step.set_drag(origin, end);
    }
}

/// Replay a drag through the sampling tracker, releasing once the path is walked
async fn perform_drag(
    drag: &DragScript,
    config: &Config,
) -> (ViewPoint, ViewPoint) {
    let interval = config.drag.poll_interval();
    let pointer = Arc::new(ScriptedPointer::new(drag));
    let target = pointer.rest();

    let tracker = DragTracker::start(drag.from, pointer, interval);
    let mut updates = tracker.subscribe();

    // Every path point takes one sample
    let steps = u32::try_from(drag.path.len()).unwrap_or(u32::MAX).saturating_add(5);
    let limit = interval.saturating_mul(steps).max(Duration::from_secs(1));
    let reached = tokio::time::timeout(limit, async {
        loop {
            if *updates.borrow_and_update() == target {
                return;
            }
            if updates.changed().await.is_err() {
                return;
            }
        }
    })
    .await;
    if reached.is_err() {
        warn!(?target, "drag did not reach its end point before release");
    }

    tracker.release().await
}

fn fill_encryption(wizard: &mut WizardController, script: &Script) -> Result<()> {
    let encryption = &script.encryption;
    let step = wizard.encryption_mut();
    if !step.set_flatten(encryption.flatten) {
        warn!("document is already signed, flatten ignored");
    }
    if !step.set_enabled(encryption.enabled) {
        warn!("document is already signed, encryption ignored");
    }

    for name in &encryption.permissions {
        let Some(permission) = EncryptionPermissions::from_name(name) else {
            bail!("Unknown encryption permission '{}'", name);
        };
        step.set_permission(permission, true);
    }
    step.enter_user_passphrase(&encryption.user_passphrase);
    step.enter_owner_passphrase(&encryption.owner_passphrase);
    Ok(())
}

fn fill_output(wizard: &mut WizardController, script: &Script) -> Result<()> {
    let output = &script.output;
    let step = wizard.output_mut();
    step.set_reason(&output.reason);
    step.set_location(&output.location);
    if let Some(path) = &output.path {
        step.choose_output_path(path.clone())
            .context("Output path rejected")?;
    }
    Ok(())
}
