//! Step navigation for the signing wizard.
//!
//! The controller owns the configuration and one collector per step. Data flows
//! from a step into the configuration only when the wizard leaves it, so the
//! configuration always reflects the last step the user saw.

use tracing::{debug, info};

use super::steps::{
    EncryptionStep, KeystoreStep, ModeSelectStep, OutputStep, PfxStep, PreviewPanel,
    StepDataCollector, VisibleSignatureStep,
};
use super::types::{StepId, WizardError};
use crate::collaborators::{detect_existing_signatures, unlock_document, DocumentProbe};
use crate::signature::SignatureConfiguration;

pub struct WizardController {
    current: StepId,
    config: SignatureConfiguration,
    mode_select: ModeSelectStep,
    pfx: PfxStep,
    keystore: KeystoreStep,
    visible: VisibleSignatureStep,
    encryption: EncryptionStep,
    output: OutputStep,
    /// Document opened for probing, released on close
    document: Option<Box<dyn DocumentProbe>>,
}

impl WizardController {
    /// Start a session for a document with a known signing mode
    pub fn new(append_mode: bool, page_count: u32, panel: PreviewPanel) -> Self {
        info!(append_mode, page_count, "signing wizard opened");
        Self {
            current: StepId::ModeSelect,
            config: SignatureConfiguration::new(append_mode),
            mode_select: ModeSelectStep::new(append_mode),
            pfx: PfxStep::new(),
            keystore: KeystoreStep::new(),
            visible: VisibleSignatureStep::new(page_count, panel),
            encryption: EncryptionStep::new(append_mode),
            output: OutputStep::new(),
            document: None,
        }
    }

    /// Probe the document for existing signatures and start a session for it.
    ///
    /// The document handle is held until `close`.
    pub fn open(document: Box<dyn DocumentProbe>, panel: PreviewPanel) -> Self {
        Self::open_with_password(document, panel, None)
    }

    /// Like `open`, unlocking an encrypted document with `password` first
    pub fn open_with_password(
        mut document: Box<dyn DocumentProbe>,
        panel: PreviewPanel,
        password: Option<&str>,
    ) -> Self {
        unlock_document(document.as_mut(), password);
        let append_mode = detect_existing_signatures(document.as_mut());
        let page_count = document.page_count();
        let mut wizard = Self::new(append_mode, page_count, panel);
        wizard.document = Some(document);
        wizard
    }

    pub fn start_step(&self) -> StepId {
        StepId::ModeSelect
    }

    pub fn current_step(&self) -> StepId {
        self.current
    }

    pub fn has_previous(&self) -> bool {
        self.current != StepId::ModeSelect
    }

    pub fn is_finish_step(&self) -> bool {
        self.current == StepId::CommonOutputOptions
    }

    /// Whether the active step holds all of its mandatory input
    pub fn can_advance(&self) -> bool {
        self.active().can_advance()
    }

    /// Flush the active step and move forward.
    ///
    /// # Panics
    ///
    /// Panics when called on the finish step, which has no successor.
    pub fn next(&mut self) -> StepId {
        self.flush();
        let next = match self.current {
            StepId::ModeSelect if self.config.keystore_mode => StepId::KeystoreCredentials,
            StepId::ModeSelect => StepId::PfxCredentials,
            StepId::PfxCredentials | StepId::KeystoreCredentials => {
                StepId::VisibleSignaturePlacement
            }
            StepId::VisibleSignaturePlacement => StepId::EncryptionOptions,
            StepId::EncryptionOptions => StepId::CommonOutputOptions,
            StepId::CommonOutputOptions => {
                panic!("next() called on the finish step '{}'", self.current)
            }
        };
        debug!(from = ?self.current, to = ?next, "wizard next");
        self.current = next;
        next
    }

    /// Flush the active step and move back.
    ///
    /// # Panics
    ///
    /// Panics when called on the first step, which has no predecessor.
    pub fn previous(&mut self) -> StepId {
        self.flush();
        let previous = match self.current {
            StepId::ModeSelect => panic!("previous() called on the first step '{}'", self.current),
            StepId::PfxCredentials | StepId::KeystoreCredentials => StepId::ModeSelect,
            StepId::VisibleSignaturePlacement if self.config.keystore_mode => {
                StepId::KeystoreCredentials
            }
            StepId::VisibleSignaturePlacement => StepId::PfxCredentials,
            StepId::EncryptionOptions => StepId::VisibleSignaturePlacement,
            StepId::CommonOutputOptions => StepId::EncryptionOptions,
        };
        debug!(from = ?self.current, to = ?previous, "wizard previous");
        self.current = previous;
        previous
    }

    /// Move forward only if the active step is ready; otherwise nothing changes
    pub fn try_next(&mut self) -> Result<StepId, WizardError> {
        if self.is_finish_step() {
            return Err(WizardError::NoNextStep(self.current));
        }
        if !self.can_advance() {
            debug!(step = ?self.current, "advance blocked");
            return Err(WizardError::NotReady(self.current));
        }
        Ok(self.next())
    }

    /// Complete the session and hand back the final configuration.
    ///
    /// Only valid on the finish step. On error the wizard stays where it is.
    pub fn finish(&mut self) -> Result<SignatureConfiguration, WizardError> {
        if !self.is_finish_step() {
            return Err(WizardError::NotAtFinish(self.current));
        }
        if let Some(path) = self.output.output_path() {
            super::steps::validate_output_path(path)?;
        }
        if !self.can_advance() {
            return Err(WizardError::NotReady(self.current));
        }
        self.flush();
        if !self.config.encryption_finalizable() {
            return Err(WizardError::MissingOwnerPassphrase);
        }

        info!(
            keystore_mode = self.config.keystore_mode,
            certify_mode = ?self.config.certify_mode(),
            encrypted = self.config.encryption_enabled(),
            "signing wizard finished"
        );
        Ok(self.config.clone())
    }

    /// Flush the active step and release the probed document.
    ///
    /// Safe to call repeatedly; the document is released only once.
    pub fn close(&mut self) {
        self.flush();
        if let Some(mut document) = self.document.take() {
            document.close();
            debug!("document handle released");
        }
    }

    /// Configuration as of the last flush
    pub fn config(&self) -> &SignatureConfiguration {
        &self.config
    }

    pub fn mode_select_mut(&mut self) -> &mut ModeSelectStep {
        &mut self.mode_select
    }

    pub fn pfx_mut(&mut self) -> &mut PfxStep {
        &mut self.pfx
    }

    pub fn keystore_mut(&mut self) -> &mut KeystoreStep {
        &mut self.keystore
    }

    pub fn visible_mut(&mut self) -> &mut VisibleSignatureStep {
        &mut self.visible
    }

    pub fn encryption_mut(&mut self) -> &mut EncryptionStep {
        &mut self.encryption
    }

    pub fn output_mut(&mut self) -> &mut OutputStep {
        &mut self.output
    }

    fn active(&self) -> &dyn StepDataCollector {
        match self.current {
            StepId::ModeSelect => &self.mode_select,
            StepId::PfxCredentials => &self.pfx,
            StepId::KeystoreCredentials => &self.keystore,
            StepId::VisibleSignaturePlacement => &self.visible,
            StepId::EncryptionOptions => &self.encryption,
            StepId::CommonOutputOptions => &self.output,
        }
    }

    fn flush(&mut self) {
        let mut config = std::mem::take(&mut self.config);
        self.active().collect_data(&mut config);
        self.config = config;
        debug!(step = ?self.current, "step data collected");
    }
}

impl std::fmt::Debug for WizardController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WizardController")
            .field("current", &self.current)
            .field("config", &self.config)
            .field("document_open", &self.document.is_some())
            .finish_non_exhaustive()
    }
}

impl Drop for WizardController {
    fn drop(&mut self) {
        if let Some(mut document) = self.document.take() {
            document.close();
        }
    }
}
