use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Root,
    Jailbreak,
    Emulator,
    Debugger,
    ReverseEngTooling,
    DeveloperMode,
    Proxy,
    Vpn,
    RemovableMediaAttached,
}

/// Whether a probe's outcome may be used to refuse an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeClass {
    Gating,
    Advisory,
}

impl SignalKind {
    pub const ALL: [SignalKind; 9] = [
        SignalKind::Root,
        SignalKind::Jailbreak,
        SignalKind::Emulator,
        SignalKind::Debugger,
        SignalKind::ReverseEngTooling,
        SignalKind::DeveloperMode,
        SignalKind::Proxy,
        SignalKind::Vpn,
        SignalKind::RemovableMediaAttached,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Jailbreak => "jailbreak",
            Self::Emulator => "emulator",
            Self::Debugger => "debugger",
            Self::ReverseEngTooling => "reverse_eng_tooling",
            Self::DeveloperMode => "developer_mode",
            Self::Proxy => "proxy",
            Self::Vpn => "vpn",
            Self::RemovableMediaAttached => "removable_media_attached",
        }
    }

    pub fn class(self) -> ProbeClass {
        match self {
            Self::ReverseEngTooling => ProbeClass::Advisory,
            _ => ProbeClass::Gating,
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Outcome of a gating probe. Recomputed on every query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrustSignal {
    pub kind: SignalKind,
    pub detected: bool,
    pub evidence: Vec<String>,
}

impl TrustSignal {
    pub fn from_evidence(kind: SignalKind, evidence: Vec<String>) -> Self {
        Self {
            kind,
            detected: !evidence.is_empty(),
            evidence,
        }
    }
}

impl fmt::Display for TrustSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.detected {
            return write!(f, "{}: clear", self.kind);
        }
        if self.evidence.is_empty() {
            write!(f, "{}: detected", self.kind)
        } else {
            write!(f, "{}: detected ({})", self.kind, self.evidence.join(", "))
        }
    }
}

/// Outcome of an advisory probe. Carries evidence but no verdict; the probe
/// always reports its measures as applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvisoryFinding {
    pub kind: SignalKind,
    pub evidence: Vec<String>,
    pub measures_applied: bool,
}

impl AdvisoryFinding {
    pub fn evidence_count(&self) -> usize {
        self.evidence.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "class", rename_all = "snake_case")]
pub enum ProbeResult {
    Gating(TrustSignal),
    Advisory(AdvisoryFinding),
}

impl ProbeResult {
    pub fn kind(&self) -> SignalKind {
        match self {
            Self::Gating(signal) => signal.kind,
            Self::Advisory(finding) => finding.kind,
        }
    }

    pub fn evidence(&self) -> &[String] {
        match self {
            Self::Gating(signal) => &signal.evidence,
            Self::Advisory(finding) => &finding.evidence,
        }
    }

    /// `Some(detected)` for gating probes, `None` for advisory ones.
    pub fn verdict(&self) -> Option<bool> {
        match self {
            Self::Gating(signal) => Some(signal.detected),
            Self::Advisory(_) => None,
        }
    }
}
