//! App signature and integrity verdict.
//!
//! Without a shipped reference signature the verdict is the historical stub:
//! always intact and explicitly non-authoritative. With a reference it is a
//! real comparison against the computed signature.

use serde::Serialize;

use crate::capability::CapabilityProvider;
use crate::fingerprint::DeviceFingerprint;
use crate::hash::{digest_hex, normalize_sha256_hex};

pub const UNKNOWN_OS_VERSION: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityVerdict {
    pub intact: bool,
    /// `false` when no reference signature was available to compare against.
    pub authoritative: bool,
    pub expected: Option<String>,
    pub observed: String,
}

impl IntegrityVerdict {
    pub fn detail(&self) -> String {
        match (&self.expected, self.intact) {
            (None, _) => "integrity not verified: no reference signature".to_string(),
            (Some(_), true) => "integrity verified".to_string(),
            (Some(expected), false) => format!(
                "app signature mismatch: expected={} observed={}",
                expected, self.observed
            ),
        }
    }
}

pub fn os_version_or_unknown(caps: &dyn CapabilityProvider) -> String {
    caps.os_version()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| UNKNOWN_OS_VERSION.to_string())
}

/// Digest of the OS version string immediately followed by the fingerprint.
pub fn compute_app_signature(os_version: &str, fingerprint: &DeviceFingerprint) -> String {
    let mut material = String::with_capacity(os_version.len() + fingerprint.as_str().len());
    material.push_str(os_version);
    material.push_str(fingerprint.as_str());
    digest_hex(material.as_bytes())
}

pub fn verify_signature(expected: Option<&str>, observed: String) -> IntegrityVerdict {
    let Some(raw) = expected else {
        return IntegrityVerdict {
            intact: true,
            authoritative: false,
            expected: None,
            observed,
        };
    };

    match normalize_sha256_hex(raw) {
        Some(expected) => IntegrityVerdict {
            intact: expected == observed,
            authoritative: true,
            expected: Some(expected),
            observed,
        },
        // A reference that is not a digest can never match.
        None => IntegrityVerdict {
            intact: false,
            authoritative: true,
            expected: Some(raw.trim().to_string()),
            observed,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_verdict_is_intact_but_not_authoritative() {
        let verdict = verify_signature(None, "AB".repeat(32));
        assert!(verdict.intact);
        assert!(!verdict.authoritative);
        assert!(verdict.detail().contains("no reference"));
    }

    #[test]
    fn reference_comparison_is_case_insensitive() {
        let observed = "AB".repeat(32);
        let verdict = verify_signature(Some(&"ab".repeat(32)), observed.clone());
        assert!(verdict.intact);
        assert!(verdict.authoritative);

        let verdict = verify_signature(Some(&"cd".repeat(32)), observed.clone());
        assert!(!verdict.intact);
        assert!(verdict.detail().contains("mismatch"));

        let verdict = verify_signature(Some("not-a-digest"), observed);
        assert!(!verdict.intact);
        assert!(verdict.authoritative);
    }
}
