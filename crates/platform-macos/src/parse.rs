//! Parsers for `ioreg`, `scutil --proxy` and `system_profiler` output.

use serde_json::Value;

/// `IOPlatformUUID` from `ioreg -rd1 -c IOPlatformExpertDevice`.
pub fn parse_platform_uuid(ioreg: &str) -> Option<String> {
    for line in ioreg.lines() {
        let line = line.trim();
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        if key.trim().trim_matches('"') != "IOPlatformUUID" {
            continue;
        }
        let value = value.trim().trim_matches('"').trim();
        if value.is_empty() {
            return None;
        }
        return Some(value.to_string());
    }
    None
}

/// Value of `name` in the `scutil --proxy` dictionary dump.
pub fn parse_scutil_value(scutil: &str, name: &str) -> Option<String> {
    for line in scutil.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        if key.trim() != name {
            continue;
        }
        let value = value.trim();
        if value.is_empty() || value.starts_with('<') {
            return None;
        }
        return Some(value.to_string());
    }
    None
}

/// Names of devices attached under each USB bus in
/// `system_profiler SPUSBDataType -json`. Bus entries themselves are not
/// returned.
pub fn parse_usb_profiler(json: &str) -> Vec<String> {
    let Ok(root) = serde_json::from_str::<Value>(json) else {
        return Vec::new();
    };
    let mut names = Vec::new();
    for key in ["SPUSBDataType", "SPUSBHostDataType"] {
        let Some(buses) = root.get(key).and_then(Value::as_array) else {
            continue;
        };
        for bus in buses {
            collect_items(bus, &mut names);
        }
    }
    names
}

fn collect_items(node: &Value, names: &mut Vec<String>) {
    let Some(items) = node.get("_items").and_then(Value::as_array) else {
        return;
    };
    for item in items {
        if let Some(name) = item.get("_name").and_then(Value::as_str) {
            let name = name.trim();
            if !name.is_empty() {
                names.push(name.to_string());
            }
        }
        collect_items(item, names);
    }
}
