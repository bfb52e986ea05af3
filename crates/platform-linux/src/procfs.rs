//! Parsers for procfs / os-release text.

pub fn parse_tracer_pid(status: &str) -> Option<u64> {
    for line in status.lines() {
        let Some(raw) = line.strip_prefix("TracerPid:") else {
            continue;
        };
        let value = raw.trim();
        if value.is_empty() {
            return None;
        }
        return value.parse::<u64>().ok();
    }
    None
}

/// `PRETTY_NAME` from an os-release file, without surrounding quotes.
pub fn parse_os_release_pretty_name(os_release: &str) -> Option<String> {
    for line in os_release.lines() {
        let Some(raw) = line.trim().strip_prefix("PRETTY_NAME=") else {
            continue;
        };
        let value = raw
            .trim()
            .trim_start_matches(['"', '\''])
            .trim_end_matches(['"', '\''])
            .trim();
        if value.is_empty() {
            return None;
        }
        return Some(value.to_string());
    }
    None
}

/// sysfs USB device entries are `N-P[.P...]`; `N-P:C.I` entries are
/// interfaces of a device and are not counted on their own.
pub fn is_usb_interface_entry(name: &str) -> bool {
    name.contains(':')
}
