use serde::Serialize;

use crate::fingerprint::DeviceFingerprint;
use crate::integrity::IntegrityVerdict;
use crate::pinning::PinningState;
use crate::signal::{AdvisoryFinding, SignalKind, TrustSignal};

/// Snapshot of every probe, taken in one pass. Policy stays with the caller.
#[derive(Debug, Clone, Serialize)]
pub struct TrustReport {
    pub platform: String,
    pub fingerprint: DeviceFingerprint,
    pub integrity: IntegrityVerdict,
    pub signals: Vec<TrustSignal>,
    pub advisories: Vec<AdvisoryFinding>,
    pub screen_capture_blocked: bool,
    pub pinning: PinningState,
}

impl TrustReport {
    /// No gating signal fired and integrity was not contradicted.
    pub fn is_trusted(&self) -> bool {
        self.integrity.intact && self.signals.iter().all(|signal| !signal.detected)
    }

    pub fn signal(&self, kind: SignalKind) -> Option<&TrustSignal> {
        self.signals.iter().find(|signal| signal.kind == kind)
    }

    pub fn detected_codes(&self) -> Vec<&'static str> {
        let mut codes: Vec<&'static str> = self
            .signals
            .iter()
            .filter(|signal| signal.detected)
            .map(|signal| signal.kind.code())
            .collect();
        if !self.integrity.intact {
            codes.push("integrity_mismatch");
        }
        codes
    }

    pub fn summary(&self) -> String {
        let mut parts: Vec<String> = self
            .signals
            .iter()
            .filter(|signal| signal.detected)
            .map(ToString::to_string)
            .collect();
        if !self.integrity.intact {
            parts.push(self.integrity.detail());
        }
        if parts.is_empty() {
            return "ok".to_string();
        }
        parts.join("; ")
    }
}
