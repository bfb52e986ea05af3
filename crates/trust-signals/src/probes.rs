//! Environment probes.
//!
//! Each probe is independent: no shared state, no ordering between probes,
//! and any missing host fact reads as "not detected". The lists are
//! heuristics and false negatives are expected.

use tracing::{debug, warn};

use crate::capability::CapabilityProvider;
use crate::profile::ProbeProfile;
use crate::signal::{AdvisoryFinding, ProbeResult, SignalKind, TrustSignal};

const ELEVATED_PROCESS_EVIDENCE: &str = "elevated_process";

#[derive(Debug, Clone)]
pub struct ProbeSet {
    profile: ProbeProfile,
}

impl ProbeSet {
    pub fn new(profile: ProbeProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &ProbeProfile {
        &self.profile
    }

    pub fn run(&self, caps: &dyn CapabilityProvider, kind: SignalKind) -> ProbeResult {
        match kind {
            SignalKind::Root => ProbeResult::Gating(self.privilege_elevation(caps)),
            SignalKind::Jailbreak => ProbeResult::Gating(self.tamper_markers(caps)),
            SignalKind::Emulator => ProbeResult::Gating(self.emulation(caps)),
            SignalKind::Debugger => ProbeResult::Gating(self.debugger(caps)),
            SignalKind::ReverseEngTooling => {
                ProbeResult::Advisory(self.reverse_engineering_tooling(caps))
            }
            SignalKind::DeveloperMode => ProbeResult::Gating(self.developer_mode(caps)),
            SignalKind::Proxy => ProbeResult::Gating(self.proxy(caps)),
            SignalKind::Vpn => ProbeResult::Gating(self.vpn(caps)),
            SignalKind::RemovableMediaAttached => {
                ProbeResult::Gating(self.removable_media(caps))
            }
        }
    }

    pub fn run_all(&self, caps: &dyn CapabilityProvider) -> Vec<ProbeResult> {
        SignalKind::ALL
            .iter()
            .map(|kind| self.run(caps, *kind))
            .collect()
    }

    pub fn privilege_elevation(&self, caps: &dyn CapabilityProvider) -> TrustSignal {
        let mut evidence = Vec::new();
        if caps.current_process_is_elevated() {
            evidence.push(ELEVATED_PROCESS_EVIDENCE.to_string());
        }
        evidence.extend(existing_paths(caps, &self.profile.elevation_tool_paths));
        finish(SignalKind::Root, evidence)
    }

    pub fn tamper_markers(&self, caps: &dyn CapabilityProvider) -> TrustSignal {
        let evidence = existing_paths(caps, &self.profile.tamper_marker_paths);
        finish(SignalKind::Jailbreak, evidence)
    }

    pub fn emulation(&self, caps: &dyn CapabilityProvider) -> TrustSignal {
        let description = caps.processor_description().unwrap_or_default();
        let evidence = self
            .profile
            .virtualization_vendors
            .iter()
            .filter(|vendor| !vendor.is_empty() && description.contains(vendor.as_str()))
            .cloned()
            .collect();
        finish(SignalKind::Emulator, evidence)
    }

    pub fn debugger(&self, caps: &dyn CapabilityProvider) -> TrustSignal {
        let evidence = match caps.tracer_id_of_self() {
            Some(tracer_id) if tracer_id != 0 => vec![format!("tracer_id={}", tracer_id)],
            _ => Vec::new(),
        };
        finish(SignalKind::Debugger, evidence)
    }

    /// Advisory only: findings are logged and returned as evidence, and the
    /// measures are always reported as applied.
    pub fn reverse_engineering_tooling(&self, caps: &dyn CapabilityProvider) -> AdvisoryFinding {
        let evidence = existing_paths(caps, &self.profile.reverse_engineering_tool_paths);
        for path in &evidence {
            warn!(signal = "reverse_eng_tooling", path = %path, "reverse engineering tool present");
        }
        AdvisoryFinding {
            kind: SignalKind::ReverseEngTooling,
            evidence,
            measures_applied: true,
        }
    }

    pub fn developer_mode(&self, caps: &dyn CapabilityProvider) -> TrustSignal {
        let mut evidence = existing_paths(caps, &self.profile.developer_tool_paths);
        for marker in &self.profile.developer_registry_markers {
            let Some(data) = caps.registry_value(&marker.key, &marker.value) else {
                continue;
            };
            if registry_data_matches(&data, &marker.expected) {
                evidence.push(format!(r"{}\{}", marker.key, marker.value));
            }
        }
        finish(SignalKind::DeveloperMode, evidence)
    }

    pub fn proxy(&self, caps: &dyn CapabilityProvider) -> TrustSignal {
        let mut evidence = Vec::new();
        for name in &self.profile.proxy_env_vars {
            if non_blank(caps.environment_variable(name)) {
                evidence.push(format!("env:{}", name));
            }
        }
        for name in &self.profile.proxy_settings {
            if non_blank(caps.proxy_setting(name)) {
                evidence.push(format!("setting:{}", name));
            }
        }
        finish(SignalKind::Proxy, evidence)
    }

    pub fn vpn(&self, caps: &dyn CapabilityProvider) -> TrustSignal {
        let patterns = &self.profile.vpn_interface_patterns;
        let evidence = caps
            .network_interface_names()
            .into_iter()
            .filter(|name| patterns.iter().any(|pattern| pattern.matches(name)))
            .collect();
        finish(SignalKind::Vpn, evidence)
    }

    pub fn removable_media(&self, caps: &dyn CapabilityProvider) -> TrustSignal {
        let devices = attached_usb_devices(caps);
        self.removable_media_with(caps, &devices)
    }

    /// Same as [`ProbeSet::removable_media`] over an already enumerated
    /// device list.
    pub fn removable_media_with(
        &self,
        caps: &dyn CapabilityProvider,
        attached: &[String],
    ) -> TrustSignal {
        let mut evidence = existing_paths(caps, &self.profile.usb_subsystem_paths);
        evidence.extend(attached.iter().cloned());
        finish(SignalKind::RemovableMediaAttached, evidence)
    }
}

/// Enumerated USB devices minus the bus controllers and root hubs.
pub fn attached_usb_devices(caps: &dyn CapabilityProvider) -> Vec<String> {
    caps.enumerate_usb_like_devices()
        .into_iter()
        .filter(|device| !is_bus_controller(device))
        .collect()
}

pub fn is_bus_controller(device: &str) -> bool {
    let name = device
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(device)
        .to_ascii_lowercase();
    if let Some(rest) = name.strip_prefix("usb") {
        if !rest.is_empty() && rest.chars().all(|ch| ch.is_ascii_digit()) {
            return true;
        }
    }
    let full = device.to_ascii_lowercase();
    full.contains("root_hub") || full.contains("root hub") || full.contains("host controller")
}

fn existing_paths(caps: &dyn CapabilityProvider, paths: &[String]) -> Vec<String> {
    paths
        .iter()
        .filter(|path| !path.trim().is_empty() && caps.file_exists(path))
        .cloned()
        .collect()
}

fn non_blank(value: Option<String>) -> bool {
    value.map(|v| !v.trim().is_empty()).unwrap_or(false)
}

fn registry_data_matches(data: &str, expected: &str) -> bool {
    let data = data.trim();
    if data.eq_ignore_ascii_case(expected.trim()) {
        return true;
    }
    match (parse_registry_number(data), parse_registry_number(expected)) {
        (Some(observed), Some(wanted)) => observed == wanted,
        _ => false,
    }
}

fn parse_registry_number(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else {
        raw.parse::<u64>().ok()
    }
}

fn finish(kind: SignalKind, evidence: Vec<String>) -> TrustSignal {
    let signal = TrustSignal::from_evidence(kind, evidence);
    if signal.detected {
        warn!(signal = kind.code(), evidence = ?signal.evidence, "trust signal detected");
    } else {
        debug!(signal = kind.code(), "trust signal clear");
    }
    signal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bus_controllers_are_recognised() {
        assert!(is_bus_controller("/sys/bus/usb/devices/usb1"));
        assert!(is_bus_controller(r"USB\ROOT_HUB30\4&2A7C8D2F&0&0"));
        assert!(is_bus_controller("Intel(R) USB 3.0 eXtensible Host Controller"));
        assert!(!is_bus_controller("/sys/bus/usb/devices/1-1"));
        assert!(!is_bus_controller("/sys/bus/usb/devices/usbmon"));
    }

    #[test]
    fn registry_numbers_compare_across_bases() {
        assert!(registry_data_matches("0x1", "1"));
        assert!(registry_data_matches(" 1 ", "1"));
        assert!(!registry_data_matches("0x0", "1"));
        assert!(!registry_data_matches("enabled", "1"));
    }
}
