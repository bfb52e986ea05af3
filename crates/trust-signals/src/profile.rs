//! Fixed heuristic lists, one set per platform.

use serde::{Deserialize, Serialize};

use crate::capability::Platform;

/// How a network interface name is matched against a VPN naming convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "match", content = "value", rename_all = "snake_case")]
pub enum InterfacePattern {
    Exact(String),
    Prefix(String),
    Contains(String),
    /// `value` starting a word: at the beginning of the name or after a
    /// non-alphanumeric character. Keeps `TAP` from matching `ISATAP`.
    Word(String),
}

impl InterfacePattern {
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Exact(value) => name == value,
            Self::Prefix(value) => name.starts_with(value.as_str()),
            Self::Contains(value) => name.contains(value.as_str()),
            Self::Word(value) => {
                !value.is_empty()
                    && name.match_indices(value.as_str()).any(|(at, _)| {
                        name[..at]
                            .chars()
                            .next_back()
                            .map_or(true, |prev| !prev.is_ascii_alphanumeric())
                    })
            }
        }
    }
}

/// A registry value whose presence with `expected` data marks a condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryMarker {
    pub key: String,
    pub value: String,
    pub expected: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeProfile {
    pub elevation_tool_paths: Vec<String>,
    pub tamper_marker_paths: Vec<String>,
    pub virtualization_vendors: Vec<String>,
    pub reverse_engineering_tool_paths: Vec<String>,
    pub developer_tool_paths: Vec<String>,
    pub developer_registry_markers: Vec<RegistryMarker>,
    pub proxy_env_vars: Vec<String>,
    pub proxy_settings: Vec<String>,
    pub vpn_interface_patterns: Vec<InterfacePattern>,
    pub usb_subsystem_paths: Vec<String>,
}

impl ProbeProfile {
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Linux => Self::linux(),
            Platform::Macos => Self::macos(),
            Platform::Windows => Self::windows(),
            Platform::Unknown => Self::empty(),
        }
    }

    /// No lists at all. Every list-driven probe reports "not detected".
    pub fn empty() -> Self {
        Self {
            elevation_tool_paths: Vec::new(),
            tamper_marker_paths: Vec::new(),
            virtualization_vendors: Vec::new(),
            reverse_engineering_tool_paths: Vec::new(),
            developer_tool_paths: Vec::new(),
            developer_registry_markers: Vec::new(),
            proxy_env_vars: Vec::new(),
            proxy_settings: Vec::new(),
            vpn_interface_patterns: Vec::new(),
            usb_subsystem_paths: Vec::new(),
        }
    }

    pub fn linux() -> Self {
        Self {
            elevation_tool_paths: strings(&["/usr/bin/sudo", "/usr/bin/su", "/usr/local/bin/brew"]),
            tamper_marker_paths: strings(&["/tmp/cydia", "/var/lib/dpkg", "/etc/apt"]),
            virtualization_vendors: strings(&["VMware", "VirtualBox", "QEMU", "Xen", "KVM"]),
            reverse_engineering_tool_paths: strings(&[
                "/usr/bin/gdb",
                "/usr/bin/lldb",
                "/usr/bin/objdump",
                "/usr/bin/strings",
                "/usr/bin/nm",
                "/usr/bin/strace",
                "/usr/bin/ltrace",
            ]),
            developer_tool_paths: strings(&[
                "/usr/bin/gcc",
                "/usr/bin/make",
                "/usr/bin/git",
                "/usr/bin/vim",
                "/usr/bin/emacs",
            ]),
            developer_registry_markers: Vec::new(),
            proxy_env_vars: default_proxy_env_vars(),
            proxy_settings: Vec::new(),
            vpn_interface_patterns: vec![
                InterfacePattern::Prefix("tun".to_string()),
                InterfacePattern::Prefix("tap".to_string()),
            ],
            usb_subsystem_paths: strings(&["/proc/bus/usb", "/sys/bus/usb", "/dev/bus/usb"]),
        }
    }

    pub fn macos() -> Self {
        Self {
            elevation_tool_paths: strings(&["/usr/bin/sudo", "/usr/bin/su", "/usr/local/bin/brew"]),
            tamper_marker_paths: strings(&[
                "/Applications/Cydia.app",
                "/Library/MobileSubstrate",
                "/private/var/lib/apt",
            ]),
            virtualization_vendors: strings(&["VMware", "VirtualBox", "Parallels", "QEMU", "Xen"]),
            reverse_engineering_tool_paths: strings(&[
                "/usr/bin/gdb",
                "/usr/bin/lldb",
                "/usr/bin/otool",
                "/usr/bin/strings",
                "/usr/bin/nm",
                "/usr/bin/class-dump",
                "/usr/bin/cycript",
                "/usr/bin/frida",
            ]),
            developer_tool_paths: strings(&[
                "/Applications/Xcode.app",
                "/Applications/Xcode-beta.app",
                "/usr/bin/xcodebuild",
            ]),
            developer_registry_markers: Vec::new(),
            proxy_env_vars: default_proxy_env_vars(),
            proxy_settings: strings(&["HTTPProxy", "HTTPSProxy"]),
            vpn_interface_patterns: vec![InterfacePattern::Prefix("utun".to_string())],
            usb_subsystem_paths: Vec::new(),
        }
    }

    pub fn windows() -> Self {
        Self {
            elevation_tool_paths: Vec::new(),
            tamper_marker_paths: strings(&[
                r"C:\cydia",
                r"C:\Program Files\Cydia",
                r"C:\Windows\System32\drivers\etc\hosts",
            ]),
            virtualization_vendors: strings(&["VMware", "VirtualBox", "QEMU", "Xen", "Hyper-V"]),
            reverse_engineering_tool_paths: strings(&[
                r"C:\Program Files\IDA Pro",
                r"C:\Program Files\x64dbg",
                r"C:\Program Files\OllyDbg",
                r"C:\Program Files\Cheat Engine",
                r"C:\Program Files\Process Hacker",
            ]),
            developer_tool_paths: Vec::new(),
            developer_registry_markers: vec![RegistryMarker {
                key: r"HKLM\SOFTWARE\Microsoft\Windows\CurrentVersion\AppModelUnlock".to_string(),
                value: "AllowDevelopmentWithoutDevLicense".to_string(),
                expected: "1".to_string(),
            }],
            proxy_env_vars: default_proxy_env_vars(),
            proxy_settings: strings(&["ProxyServer"]),
            vpn_interface_patterns: vec![
                InterfacePattern::Contains("VPN".to_string()),
                InterfacePattern::Word("TAP".to_string()),
                InterfacePattern::Word("TUN".to_string()),
            ],
            usb_subsystem_paths: Vec::new(),
        }
    }
}

fn default_proxy_env_vars() -> Vec<String> {
    strings(&["http_proxy", "https_proxy", "HTTP_PROXY", "HTTPS_PROXY"])
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interface_patterns_match_by_kind() {
        assert!(InterfacePattern::Prefix("tun".into()).matches("tun0"));
        assert!(!InterfacePattern::Prefix("tun".into()).matches("eth0"));
        assert!(InterfacePattern::Exact("tap1".into()).matches("tap1"));
        assert!(!InterfacePattern::Exact("tap1".into()).matches("tap10"));
        assert!(InterfacePattern::Contains("VPN".into()).matches("Cisco AnyConnect VPN"));
        assert!(!InterfacePattern::Contains("VPN".into()).matches("vpn-bridge"));
        assert!(InterfacePattern::Word("TAP".into()).matches("TAP-Windows Adapter V9"));
        assert!(InterfacePattern::Word("TUN".into()).matches("Wintun TUN device"));
        assert!(!InterfacePattern::Word("TAP".into()).matches("Microsoft ISATAP Adapter"));
        assert!(!InterfacePattern::Word("TUN".into()).matches("Teredo Tunneling Pseudo-Interface"));
    }

    #[test]
    fn unknown_platform_profile_is_empty() {
        assert_eq!(ProbeProfile::for_platform(Platform::Unknown), ProbeProfile::empty());
        assert!(!ProbeProfile::for_platform(Platform::Linux)
            .usb_subsystem_paths
            .is_empty());
    }
}
