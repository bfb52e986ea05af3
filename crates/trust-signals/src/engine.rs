use serde_json::Value;
use tracing::{info, warn};

use crate::capability::CapabilityProvider;
use crate::config::TrustConfig;
use crate::fingerprint::{compute_fingerprint, DeviceFingerprint};
use crate::integrity::{
    compute_app_signature, os_version_or_unknown, verify_signature, IntegrityVerdict,
};
use crate::pinning::{PinSet, PinningState, PinningValidator, PresentedIdentity};
use crate::probes::ProbeSet;
use crate::report::TrustReport;
use crate::sentinel::CaptureSentinel;
use crate::signal::{AdvisoryFinding, ProbeResult, SignalKind, TrustSignal};
use crate::usb::UsbConnectionStatus;

/// One entry point per trust operation. Every call reads the host afresh;
/// nothing but the pin set and the capture sentinel carries state.
#[derive(Debug)]
pub struct TrustEngine<P> {
    caps: P,
    probes: ProbeSet,
    pinning: PinningValidator,
    sentinel: CaptureSentinel,
    expected_signature: Option<String>,
}

impl<P: CapabilityProvider> TrustEngine<P> {
    pub fn new(caps: P, config: TrustConfig) -> Self {
        let probes = ProbeSet::new(config.probe_profile(caps.platform()));
        let pinning = PinningValidator::new(&config.secure_scheme);
        if !config.initial_pins.is_empty() {
            pinning.configure(config.initial_pins);
        }
        Self {
            caps,
            probes,
            pinning,
            sentinel: CaptureSentinel::new(config.sentinel_path),
            expected_signature: config.expected_signature,
        }
    }

    pub fn from_env(caps: P) -> Self {
        Self::new(caps, TrustConfig::from_env())
    }

    pub fn capabilities(&self) -> &P {
        &self.caps
    }

    pub fn probes(&self) -> &ProbeSet {
        &self.probes
    }

    pub fn pinning(&self) -> &PinningValidator {
        &self.pinning
    }

    pub fn sentinel(&self) -> &CaptureSentinel {
        &self.sentinel
    }

    /// e.g. `"Linux Ubuntu 22.04.4 LTS"`.
    pub fn platform_version(&self) -> String {
        format!(
            "{} {}",
            self.caps.platform().display_name(),
            os_version_or_unknown(&self.caps)
        )
    }

    pub fn signal(&self, kind: SignalKind) -> Option<TrustSignal> {
        match self.probes.run(&self.caps, kind) {
            ProbeResult::Gating(signal) => Some(signal),
            ProbeResult::Advisory(_) => None,
        }
    }

    pub fn is_rooted(&self) -> bool {
        self.probes.privilege_elevation(&self.caps).detected
    }

    pub fn is_jailbroken(&self) -> bool {
        self.probes.tamper_markers(&self.caps).detected
    }

    pub fn is_emulator(&self) -> bool {
        self.probes.emulation(&self.caps).detected
    }

    pub fn is_debugger_attached(&self) -> bool {
        self.probes.debugger(&self.caps).detected
    }

    pub fn prevent_reverse_engineering(&self) -> AdvisoryFinding {
        let finding = self.probes.reverse_engineering_tooling(&self.caps);
        info!(
            tools_found = finding.evidence_count(),
            "anti reverse engineering measures applied"
        );
        finding
    }

    pub fn is_developer_mode_enabled(&self) -> bool {
        self.probes.developer_mode(&self.caps).detected
    }

    pub fn has_proxy_settings(&self) -> bool {
        self.probes.proxy(&self.caps).detected
    }

    pub fn has_vpn_connection(&self) -> bool {
        self.probes.vpn(&self.caps).detected
    }

    pub fn is_usb_cable_attached(&self) -> bool {
        self.probes.removable_media(&self.caps).detected
    }

    pub fn usb_connection_status(&self) -> UsbConnectionStatus {
        let status = UsbConnectionStatus::collect(&self.probes, &self.caps);
        info!(
            attached = status.is_attached,
            devices = status.device_count,
            "usb connection status"
        );
        status
    }

    pub fn device_fingerprint(&self) -> DeviceFingerprint {
        compute_fingerprint(&self.caps)
    }

    pub fn app_signature(&self) -> String {
        compute_app_signature(&os_version_or_unknown(&self.caps), &self.device_fingerprint())
    }

    pub fn integrity_verdict(&self) -> IntegrityVerdict {
        verify_signature(self.expected_signature.as_deref(), self.app_signature())
    }

    /// Without a reference signature this is always `true` and carries no
    /// weight; see [`TrustEngine::integrity_verdict`].
    pub fn verify_app_integrity(&self) -> bool {
        let verdict = self.integrity_verdict();
        info!(
            intact = verdict.intact,
            authoritative = verdict.authoritative,
            "app integrity verification"
        );
        verdict.intact
    }

    pub fn apply_anti_tampering(&self) -> IntegrityVerdict {
        let verdict = self.integrity_verdict();
        if !verdict.intact {
            warn!(detail = %verdict.detail(), "app tampering detected");
        }
        info!("anti tampering measures applied");
        verdict
    }

    pub fn configure_pinning<C, K>(&self, certificates: C, public_keys: K) -> PinningState
    where
        C: IntoIterator,
        C::Item: AsRef<str>,
        K: IntoIterator,
        K::Item: AsRef<str>,
    {
        self.pinning.configure_lists(certificates, public_keys)
    }

    /// Accepts the loosely typed `{certificates: [...], publicKeys: [...]}`
    /// shape; non-string entries are skipped.
    pub fn configure_pinning_from_json(&self, arguments: &Value) -> PinningState {
        let pins = PinSet::from_json(arguments.get("certificates"), arguments.get("publicKeys"));
        self.pinning.configure(pins)
    }

    pub fn verify_pinning(&self, target: &str) -> bool {
        self.pinning.verify(target)
    }

    pub fn verify_presented_identity(&self, target: &str, presented: &PresentedIdentity) -> bool {
        self.pinning.verify_presented(target, presented)
    }

    /// Certificate inventory is left to the platform TLS stack; nothing is
    /// ever reported here.
    pub fn unexpected_certificates(&self) -> Vec<String> {
        info!("certificate validation requested");
        Vec::new()
    }

    pub fn enable_screen_capture_protection(&self) -> bool {
        match self.sentinel.enable() {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "failed enabling screen capture protection");
                false
            }
        }
    }

    pub fn disable_screen_capture_protection(&self) -> bool {
        match self.sentinel.disable() {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "failed disabling screen capture protection");
                false
            }
        }
    }

    pub fn is_screen_capture_blocked(&self) -> bool {
        self.sentinel.is_blocked()
    }

    /// Runs every probe once and bundles the results.
    pub fn assess(&self) -> TrustReport {
        let mut signals = Vec::new();
        let mut advisories = Vec::new();
        for result in self.probes.run_all(&self.caps) {
            match result {
                ProbeResult::Gating(signal) => signals.push(signal),
                ProbeResult::Advisory(finding) => advisories.push(finding),
            }
        }
        TrustReport {
            platform: self.caps.platform().as_str().to_string(),
            fingerprint: self.device_fingerprint(),
            integrity: self.integrity_verdict(),
            signals,
            advisories,
            screen_capture_blocked: self.is_screen_capture_blocked(),
            pinning: self.pinning.state(),
        }
    }
}
