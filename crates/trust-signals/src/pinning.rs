//! Certificate / public-key pinning.
//!
//! `verify` is a scheme-only gate: once pins are configured the target must
//! use the secure scheme, but the stored pins are not consulted. Chain and
//! key validation belongs to the platform TLS stack. Callers that can see
//! the presented certificate use `verify_presented`, which does compare
//! against the pin set.

use std::collections::BTreeSet;
use std::sync::{PoisonError, RwLock};

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::hash::normalize_sha256_hex;

pub const DEFAULT_SECURE_SCHEME: &str = "https://";
const SHA256_PIN_PREFIX: &str = "sha256/";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PinSet {
    pub certificates: BTreeSet<String>,
    pub public_keys: BTreeSet<String>,
}

impl PinSet {
    pub fn new<C, K>(certificates: C, public_keys: K) -> Self
    where
        C: IntoIterator,
        C::Item: AsRef<str>,
        K: IntoIterator,
        K::Item: AsRef<str>,
    {
        Self {
            certificates: normalize_pins(certificates),
            public_keys: normalize_pins(public_keys),
        }
    }

    /// Builds a pin set from loosely typed lists. Entries that are not
    /// strings are skipped; a missing or non-array list is empty.
    pub fn from_json(certificates: Option<&Value>, public_keys: Option<&Value>) -> Self {
        Self::new(json_strings(certificates), json_strings(public_keys))
    }

    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty() && self.public_keys.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PinningState {
    Unconfigured,
    Configured,
}

/// Digests of the identity a server presented during the handshake.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresentedIdentity {
    pub certificate_sha256: Option<String>,
    pub public_key_sha256: Option<String>,
}

#[derive(Debug)]
pub struct PinningValidator {
    secure_scheme: String,
    pins: RwLock<PinSet>,
}

impl Default for PinningValidator {
    fn default() -> Self {
        Self::new(DEFAULT_SECURE_SCHEME)
    }
}

impl PinningValidator {
    pub fn new(secure_scheme: &str) -> Self {
        Self {
            secure_scheme: secure_scheme.to_string(),
            pins: RwLock::new(PinSet::default()),
        }
    }

    pub fn secure_scheme(&self) -> &str {
        &self.secure_scheme
    }

    /// Replaces the whole pin set. Last write wins; nothing is merged.
    pub fn configure(&self, pins: PinSet) -> PinningState {
        info!(
            certificates = pins.certificates.len(),
            public_keys = pins.public_keys.len(),
            "pinning configured"
        );
        let state = state_of(&pins);
        *self.pins.write().unwrap_or_else(PoisonError::into_inner) = pins;
        state
    }

    pub fn configure_lists<C, K>(&self, certificates: C, public_keys: K) -> PinningState
    where
        C: IntoIterator,
        C::Item: AsRef<str>,
        K: IntoIterator,
        K::Item: AsRef<str>,
    {
        self.configure(PinSet::new(certificates, public_keys))
    }

    pub fn state(&self) -> PinningState {
        state_of(&self.pins.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn snapshot(&self) -> PinSet {
        self.pins
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn verify(&self, target: &str) -> bool {
        if self.state() == PinningState::Unconfigured {
            return true;
        }
        let secure = target.starts_with(self.secure_scheme.as_str());
        if !secure {
            warn!(target = %target, "pinned connection refused: insecure scheme");
        }
        secure
    }

    pub fn verify_presented(&self, target: &str, presented: &PresentedIdentity) -> bool {
        let pins = self.snapshot();
        if pins.is_empty() {
            return true;
        }
        if !target.starts_with(self.secure_scheme.as_str()) {
            warn!(target = %target, "pinned connection refused: insecure scheme");
            return false;
        }

        let certificate_match = presented
            .certificate_sha256
            .as_deref()
            .and_then(normalize_pin)
            .is_some_and(|pin| pins.certificates.contains(&pin));
        let key_match = presented
            .public_key_sha256
            .as_deref()
            .and_then(normalize_pin)
            .is_some_and(|pin| pins.public_keys.contains(&pin));

        if !(certificate_match || key_match) {
            warn!(target = %target, "pinned connection refused: no pin matched");
        }
        certificate_match || key_match
    }
}

fn state_of(pins: &PinSet) -> PinningState {
    if pins.is_empty() {
        PinningState::Unconfigured
    } else {
        PinningState::Configured
    }
}

fn normalize_pins<I>(raw: I) -> BTreeSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    // A blank entry is kept as "" so it still switches pinning on; no
    // presented digest normalizes to "", so it never matches.
    raw.into_iter()
        .map(|pin| normalize_pin(pin.as_ref()).unwrap_or_default())
        .collect()
}

/// Trims, drops a `sha256/` prefix and uppercases hex digests. Blank pins
/// are rejected.
pub fn normalize_pin(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let body = trimmed.strip_prefix(SHA256_PIN_PREFIX).unwrap_or(trimmed).trim();
    if body.is_empty() {
        return None;
    }
    Some(normalize_sha256_hex(body).unwrap_or_else(|| body.to_string()))
}

fn json_strings(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| item.as_str().map(str::to_string))
        .collect()
}
