//! Trust signals for the host a client application runs on.
//!
//! Heuristic probes (elevation, tampering, emulation, debugger, tooling,
//! developer mode, proxy, VPN, removable media), a device fingerprint, an
//! app signature, certificate pinning state and a persisted capture
//! protection flag. Host facts come from a [`CapabilityProvider`]; the
//! caller decides what to do with the results.

mod capability;
mod config;
mod engine;
mod fingerprint;
mod hash;
mod integrity;
mod pinning;
mod probes;
mod profile;
mod report;
mod sentinel;
mod signal;
mod usb;

pub use capability::{CapabilityProvider, Platform, StaticCapabilities};
pub use config::{default_sentinel_path, ProbeOverrides, TrustConfig, CONFIG_PATH_ENV};
pub use engine::TrustEngine;
pub use fingerprint::{compute_fingerprint, fingerprint_material, processor_line, DeviceFingerprint};
pub use hash::{digest_hex, normalize_sha256_hex, SHA256_HEX_LEN};
pub use integrity::{compute_app_signature, verify_signature, IntegrityVerdict, UNKNOWN_OS_VERSION};
pub use pinning::{
    normalize_pin, PinSet, PinningState, PinningValidator, PresentedIdentity,
    DEFAULT_SECURE_SCHEME,
};
pub use probes::{attached_usb_devices, is_bus_controller, ProbeSet};
pub use profile::{InterfacePattern, ProbeProfile, RegistryMarker};
pub use report::TrustReport;
pub use sentinel::{CaptureSentinel, SentinelError, SENTINEL_FILE_NAME};
pub use signal::{AdvisoryFinding, ProbeClass, ProbeResult, SignalKind, TrustSignal};
pub use usb::{UsbConnectionStatus, CONNECTION_DATA_TRANSFER, CONNECTION_NONE, POWER_SOURCE_UNKNOWN};
