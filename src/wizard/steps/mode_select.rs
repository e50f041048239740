use tracing::debug;

use super::StepDataCollector;
use crate::signature::{CertifyMode, SignatureConfiguration};

/// Signing mode choice: key file vs keystore, plus certification
#[derive(Debug, Clone, Default)]
pub struct ModeSelectStep {
    keystore_mode: bool,
    certify_mode: CertifyMode,
    certify_enabled: bool,
}

impl ModeSelectStep {
    /// The certify choice is disabled for documents that are already signed
    pub fn new(append_mode: bool) -> Self {
        Self {
            keystore_mode: false,
            certify_mode: CertifyMode::NotCertified,
            certify_enabled: !append_mode,
        }
    }

    pub fn keystore_mode(&self) -> bool {
        self.keystore_mode
    }

    pub fn set_keystore_mode(&mut self, keystore_mode: bool) {
        self.keystore_mode = keystore_mode;
    }

    pub fn certify_mode(&self) -> CertifyMode {
        self.certify_mode
    }

    pub fn certify_enabled(&self) -> bool {
        self.certify_enabled
    }

    /// Returns false when the certify choice is disabled
    pub fn select_certify_mode(&mut self, mode: CertifyMode) -> bool {
        if !self.certify_enabled {
            debug!(?mode, "certify mode is disabled for signed documents");
            return false;
        }
        self.certify_mode = mode;
        true
    }
}

impl StepDataCollector for ModeSelectStep {
    fn collect_data(&self, config: &mut SignatureConfiguration) {
        config.keystore_mode = self.keystore_mode;
        config.set_certify_mode(self.certify_mode);
    }

    fn can_advance(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_mode_and_certify() {
        let mut step = ModeSelectStep::new(false);
        step.set_keystore_mode(true);
        assert!(step.select_certify_mode(CertifyMode::NoChanges));

        let mut config = SignatureConfiguration::new(false);
        step.collect_data(&mut config);
        assert!(config.keystore_mode);
        assert_eq!(config.certify_mode(), CertifyMode::NoChanges);
        assert!(step.can_advance());
    }

    #[test]
    fn test_certify_disabled_in_append_mode() {
        let mut step = ModeSelectStep::new(true);
        assert!(!step.certify_enabled());
        assert!(!step.select_certify_mode(CertifyMode::FormFilling));
        assert_eq!(step.certify_mode(), CertifyMode::NotCertified);
    }
}
