//! Device fingerprint: `host|machine-id|processor|` hashed with SHA-256.
//!
//! Field order and separators are frozen. Changing either changes every
//! fingerprint already issued.

use std::fmt;

use serde::Serialize;

use crate::capability::CapabilityProvider;
use crate::hash::digest_hex;

const FIELD_SEPARATOR: char = '|';
const PROCESSOR_LINE_PREFIX: &str = "processor";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DeviceFingerprint(String);

impl DeviceFingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DeviceFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DeviceFingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub fn compute_fingerprint(caps: &dyn CapabilityProvider) -> DeviceFingerprint {
    DeviceFingerprint(digest_hex(fingerprint_material(caps).as_bytes()))
}

/// The exact byte string that gets hashed. Missing fields are empty.
pub fn fingerprint_material(caps: &dyn CapabilityProvider) -> String {
    let host = caps.host_name().map(|v| v.trim().to_string());
    let machine_id = caps
        .persistent_machine_id()
        .map(|raw| first_line(&raw).to_string());
    let processor = caps
        .processor_description()
        .map(|raw| processor_line(&raw).to_string());

    let mut material = String::new();
    for field in [host, machine_id, processor] {
        material.push_str(field.as_deref().unwrap_or_default());
        material.push(FIELD_SEPARATOR);
    }
    material
}

fn first_line(raw: &str) -> &str {
    raw.lines().next().unwrap_or_default().trim()
}

/// Picks the one processor line that represents the CPU. On procfs-style
/// input that is the first `processor` line, elsewhere the first non-empty
/// line.
pub fn processor_line(raw: &str) -> &str {
    let mut fallback = None;
    for line in raw.lines() {
        let line = line.trim_end();
        if line.starts_with(PROCESSOR_LINE_PREFIX) {
            return line;
        }
        if fallback.is_none() && !line.trim().is_empty() {
            fallback = Some(line.trim());
        }
    }
    fallback.unwrap_or_default()
}
