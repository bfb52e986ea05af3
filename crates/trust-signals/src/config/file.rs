use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

use super::util::{non_empty, non_empty_list};
use super::TrustConfig;
use crate::hash::normalize_sha256_hex;
use crate::pinning::PinSet;
use crate::profile::{InterfacePattern, ProbeProfile, RegistryMarker};

impl TrustConfig {
    pub(super) fn apply_file(&mut self, path: &Path) -> Result<()> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed reading config file {}", path.display()))?;
        let file_cfg: FileConfig = toml::from_str(&raw)
            .with_context(|| format!("failed parsing TOML config {}", path.display()))?;

        self.apply_file_sentinel(file_cfg.sentinel);
        self.apply_file_integrity(file_cfg.integrity);
        self.apply_file_pinning(file_cfg.pinning);
        if let Some(probes) = file_cfg.probes {
            self.probe_overrides = probes;
        }
        Ok(())
    }

    fn apply_file_sentinel(&mut self, sentinel: Option<FileSentinelConfig>) {
        let Some(sentinel) = sentinel else {
            return;
        };
        if let Some(v) = non_empty(sentinel.path) {
            self.sentinel_path = v.into();
        }
    }

    fn apply_file_integrity(&mut self, integrity: Option<FileIntegrityConfig>) {
        let Some(integrity) = integrity else {
            return;
        };
        let Some(raw) = non_empty(integrity.expected_signature) else {
            return;
        };
        match normalize_sha256_hex(&raw) {
            Some(value) => self.expected_signature = Some(value),
            None => {
                // Kept as is: an unusable reference fails verification closed.
                warn!(
                    value = %raw,
                    "config integrity.expected_signature is not a SHA-256 hex digest"
                );
                self.expected_signature = Some(raw);
            }
        }
    }

    fn apply_file_pinning(&mut self, pinning: Option<FilePinningConfig>) {
        let Some(pinning) = pinning else {
            return;
        };
        if let Some(v) = non_empty(pinning.secure_scheme) {
            self.secure_scheme = v;
        }
        if pinning.certificates.is_some() || pinning.public_keys.is_some() {
            self.initial_pins = PinSet::new(
                pinning.certificates.unwrap_or_default(),
                pinning.public_keys.unwrap_or_default(),
            );
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    sentinel: Option<FileSentinelConfig>,
    #[serde(default)]
    integrity: Option<FileIntegrityConfig>,
    #[serde(default)]
    pinning: Option<FilePinningConfig>,
    #[serde(default)]
    probes: Option<ProbeOverrides>,
}

#[derive(Debug, Default, Deserialize)]
struct FileSentinelConfig {
    #[serde(default)]
    path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FileIntegrityConfig {
    #[serde(default)]
    expected_signature: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FilePinningConfig {
    #[serde(default)]
    secure_scheme: Option<String>,
    #[serde(default)]
    certificates: Option<Vec<String>>,
    #[serde(default)]
    public_keys: Option<Vec<String>>,
}

/// Replacement lists for the platform probe profile. A present list replaces
/// the default wholesale; a string list that is blank after trimming leaves
/// the default in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeOverrides {
    #[serde(default)]
    pub elevation_tool_paths: Option<Vec<String>>,
    #[serde(default)]
    pub tamper_marker_paths: Option<Vec<String>>,
    #[serde(default)]
    pub virtualization_vendors: Option<Vec<String>>,
    #[serde(default)]
    pub reverse_engineering_tool_paths: Option<Vec<String>>,
    #[serde(default)]
    pub developer_tool_paths: Option<Vec<String>>,
    #[serde(default)]
    pub developer_registry_markers: Option<Vec<RegistryMarker>>,
    #[serde(default)]
    pub proxy_env_vars: Option<Vec<String>>,
    #[serde(default)]
    pub proxy_settings: Option<Vec<String>>,
    #[serde(default)]
    pub vpn_interface_patterns: Option<Vec<InterfacePattern>>,
    #[serde(default)]
    pub usb_subsystem_paths: Option<Vec<String>>,
}

impl ProbeOverrides {
    pub fn apply(&self, profile: &mut ProbeProfile) {
        replace_list(&mut profile.elevation_tool_paths, &self.elevation_tool_paths);
        replace_list(&mut profile.tamper_marker_paths, &self.tamper_marker_paths);
        replace_list(&mut profile.virtualization_vendors, &self.virtualization_vendors);
        replace_list(
            &mut profile.reverse_engineering_tool_paths,
            &self.reverse_engineering_tool_paths,
        );
        replace_list(&mut profile.developer_tool_paths, &self.developer_tool_paths);
        replace_list(&mut profile.proxy_env_vars, &self.proxy_env_vars);
        replace_list(&mut profile.proxy_settings, &self.proxy_settings);
        replace_list(&mut profile.usb_subsystem_paths, &self.usb_subsystem_paths);
        if let Some(markers) = &self.developer_registry_markers {
            profile.developer_registry_markers = markers.clone();
        }
        if let Some(patterns) = &self.vpn_interface_patterns {
            profile.vpn_interface_patterns = patterns.clone();
        }
    }
}

fn replace_list(target: &mut Vec<String>, replacement: &Option<Vec<String>>) {
    if let Some(values) = non_empty_list(replacement.clone()) {
        *target = values;
    }
}
