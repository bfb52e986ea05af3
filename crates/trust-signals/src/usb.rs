//! USB connection-status record.
//!
//! Charging and host-computer detection are not available through the
//! capability interface, so those fields are fixed at `false` and the power
//! source is always `"unknown"`.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::capability::CapabilityProvider;
use crate::probes::{attached_usb_devices, ProbeSet};

pub const CONNECTION_DATA_TRANSFER: &str = "data_transfer";
pub const CONNECTION_NONE: &str = "none";
pub const POWER_SOURCE_UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsbConnectionStatus {
    pub is_attached: bool,
    pub connection_type: String,
    pub is_charging: bool,
    pub is_data_transfer: bool,
    pub is_usb_charging: bool,
    pub is_connected_to_computer: bool,
    pub is_connected_via_usb: bool,
    pub device_count: usize,
    pub power_source: String,
    pub platform: String,
    #[serde(rename = "timestamp")]
    pub timestamp_millis: i64,
}

impl UsbConnectionStatus {
    pub fn collect(probes: &ProbeSet, caps: &dyn CapabilityProvider) -> Self {
        let devices = attached_usb_devices(caps);
        let is_attached = probes.removable_media_with(caps, &devices).detected;
        let device_count = devices.len();
        Self::from_parts(
            is_attached,
            device_count,
            caps.platform().as_str(),
            now_unix_millis(),
        )
    }

    pub fn from_parts(
        is_attached: bool,
        device_count: usize,
        platform: &str,
        timestamp_millis: i64,
    ) -> Self {
        let connection_type = if is_attached {
            CONNECTION_DATA_TRANSFER
        } else {
            CONNECTION_NONE
        };
        Self {
            is_attached,
            connection_type: connection_type.to_string(),
            is_charging: false,
            is_data_transfer: is_attached,
            is_usb_charging: false,
            is_connected_to_computer: false,
            is_connected_via_usb: is_attached,
            device_count,
            power_source: POWER_SOURCE_UNKNOWN.to_string(),
            platform: platform.to_string(),
            timestamp_millis,
        }
    }
}

fn now_unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}
