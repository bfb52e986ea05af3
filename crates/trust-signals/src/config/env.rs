use tracing::warn;

use super::util::env_non_empty;
use super::TrustConfig;
use crate::hash::normalize_sha256_hex;

pub(super) const SENTINEL_PATH_ENV: &str = "TRUST_SIGNALS_SENTINEL_PATH";
pub(super) const EXPECTED_SIGNATURE_ENV: &str = "TRUST_SIGNALS_EXPECTED_SIGNATURE";
pub(super) const EXPECTED_SIGNATURE_FILE_ENV: &str = "TRUST_SIGNALS_EXPECTED_SIGNATURE_FILE";
pub(super) const SECURE_SCHEME_ENV: &str = "TRUST_SIGNALS_SECURE_SCHEME";

impl TrustConfig {
    pub(super) fn apply_env_overrides(&mut self) {
        if let Some(v) = env_non_empty(SENTINEL_PATH_ENV) {
            self.sentinel_path = v.into();
        }
        if let Some(v) = env_non_empty(SECURE_SCHEME_ENV) {
            self.secure_scheme = v;
        }
        if let Some(v) = resolve_expected_signature() {
            self.expected_signature = Some(v);
        }
    }
}

/// A valid digest in the variable wins; otherwise the first line of the
/// referenced file is used if it is a valid digest.
fn resolve_expected_signature() -> Option<String> {
    if let Some(raw) = env_non_empty(EXPECTED_SIGNATURE_ENV) {
        match normalize_sha256_hex(&raw) {
            Some(value) => return Some(value),
            None => warn!(
                variable = EXPECTED_SIGNATURE_ENV,
                "expected signature is not a SHA-256 hex digest"
            ),
        }
    }

    let path = env_non_empty(EXPECTED_SIGNATURE_FILE_ENV)?;
    match std::fs::read_to_string(&path) {
        Ok(content) => normalize_sha256_hex(&content),
        Err(err) => {
            warn!(path = %path, error = %err, "failed reading expected signature file");
            None
        }
    }
}
