//! Windows capability provider.
//!
//! Reads go through `reg.exe` and PowerShell at their System32 paths and
//! through the debugging API. Off Windows the provider reports nothing
//! beyond the local filesystem and environment.

mod debugger;
mod registry;
mod windows_cmd;

use std::fs;
use std::path::Path;

use trust_signals::{CapabilityProvider, Platform};

pub use debugger::debugger_flag;
pub use registry::{parse_reg_value, read_reg_value, run_powershell, run_powershell_lines};

const CRYPTOGRAPHY_KEY: &str = r"HKLM\SOFTWARE\Microsoft\Cryptography";
const CENTRAL_PROCESSOR_KEY: &str = r"HKLM\HARDWARE\DESCRIPTION\System\CentralProcessor\0";
const SYSTEM_INFORMATION_KEY: &str = r"HKLM\SYSTEM\CurrentControlSet\Control\SystemInformation";
const CURRENT_VERSION_KEY: &str = r"HKLM\SOFTWARE\Microsoft\Windows NT\CurrentVersion";
const INTERNET_SETTINGS_KEY: &str =
    r"HKCU\Software\Microsoft\Windows\CurrentVersion\Internet Settings";

const IS_ADMIN_PS: &str = "([Security.Principal.WindowsPrincipal][Security.Principal.WindowsIdentity]::GetCurrent()).IsInRole([Security.Principal.WindowsBuiltInRole]::Administrator)";
const ADAPTERS_PS: &str =
    "Get-NetAdapter | ForEach-Object { $_.Name; $_.InterfaceDescription }";
const USB_DEVICES_PS: &str =
    "Get-PnpDevice -PresentOnly -Class USB | Select-Object -ExpandProperty FriendlyName";

#[derive(Debug, Clone, Default)]
pub struct WindowsCapabilities;

impl WindowsCapabilities {
    pub fn new() -> Self {
        Self
    }
}

impl CapabilityProvider for WindowsCapabilities {
    fn platform(&self) -> Platform {
        Platform::Windows
    }

    fn file_exists(&self, path: &str) -> bool {
        Path::new(path).exists()
    }

    fn read_text_file(&self, path: &str) -> Option<String> {
        fs::read_to_string(path).ok()
    }

    fn list_directory(&self, path: &str) -> Vec<String> {
        let Ok(entries) = fs::read_dir(path) else {
            return Vec::new();
        };
        let mut paths: Vec<String> = entries
            .flatten()
            .map(|entry| entry.path().to_string_lossy().into_owned())
            .collect();
        paths.sort();
        paths
    }

    fn current_process_is_elevated(&self) -> bool {
        run_powershell(IS_ADMIN_PS).is_some_and(|out| out.eq_ignore_ascii_case("true"))
    }

    fn tracer_id_of_self(&self) -> Option<u64> {
        debugger_flag()
    }

    fn host_name(&self) -> Option<String> {
        std::env::var("COMPUTERNAME")
            .ok()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
    }

    fn persistent_machine_id(&self) -> Option<String> {
        read_reg_value(CRYPTOGRAPHY_KEY, "MachineGuid")
    }

    /// Processor name on the first line, system manufacturer on the second.
    fn processor_description(&self) -> Option<String> {
        let lines: Vec<String> = [
            (CENTRAL_PROCESSOR_KEY, "ProcessorNameString"),
            (SYSTEM_INFORMATION_KEY, "SystemManufacturer"),
        ]
        .into_iter()
        .filter_map(|(key, value)| read_reg_value(key, value))
        .collect();
        if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        }
    }

    fn environment_variable(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn network_interface_names(&self) -> Vec<String> {
        run_powershell_lines(ADAPTERS_PS)
    }

    fn enumerate_usb_like_devices(&self) -> Vec<String> {
        run_powershell_lines(USB_DEVICES_PS)
    }

    fn os_version(&self) -> Option<String> {
        let major = read_reg_value(CURRENT_VERSION_KEY, "CurrentMajorVersionNumber")?;
        let minor = read_reg_value(CURRENT_VERSION_KEY, "CurrentMinorVersionNumber")
            .unwrap_or_else(|| "0".to_string());
        match read_reg_value(CURRENT_VERSION_KEY, "CurrentBuild") {
            Some(build) => Some(format!("{major}.{minor}.{build}")),
            None => Some(format!("{major}.{minor}")),
        }
    }

    fn registry_value(&self, key: &str, value: &str) -> Option<String> {
        read_reg_value(key, value)
    }

    fn proxy_setting(&self, name: &str) -> Option<String> {
        read_reg_value(INTERNET_SETTINGS_KEY, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filesystem_queries_use_real_paths() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let file = dir.path().join("hosts");
        fs::write(&file, "127.0.0.1 localhost").expect("write fixture");

        let caps = WindowsCapabilities::new();
        let path = file.to_string_lossy();
        assert!(caps.file_exists(&path));
        assert_eq!(
            caps.read_text_file(&path).as_deref(),
            Some("127.0.0.1 localhost")
        );
        assert_eq!(caps.list_directory(&dir.path().to_string_lossy()).len(), 1);
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn registry_backed_facts_are_absent_off_windows() {
        let caps = WindowsCapabilities::new();
        assert_eq!(caps.persistent_machine_id(), None);
        assert_eq!(caps.os_version(), None);
        assert_eq!(caps.proxy_setting("ProxyServer"), None);
        assert!(!caps.current_process_is_elevated());
        assert!(caps.network_interface_names().is_empty());
        assert!(caps.enumerate_usb_like_devices().is_empty());
    }
}
