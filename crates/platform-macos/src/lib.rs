//! macOS capability provider.
//!
//! Host facts come from `sysctl`, `ioreg`, `scutil`, `system_profiler` and
//! `sw_vers`. Off macOS every command fails to spawn and the provider
//! reports nothing.

mod command;
mod parse;
mod traced;

use std::fs;
use std::path::Path;

use trust_signals::{CapabilityProvider, Platform};

pub use parse::{parse_platform_uuid, parse_scutil_value, parse_usb_profiler};
pub use traced::{traced_flag, traced_from_kinfo, KINFO_PROC_SIZE};

use command::{run, sysctl_string, IFCONFIG, IOREG, SCUTIL, SW_VERS, SYSTEM_PROFILER};

#[derive(Debug, Clone, Default)]
pub struct MacosCapabilities;

impl MacosCapabilities {
    pub fn new() -> Self {
        Self
    }
}

impl CapabilityProvider for MacosCapabilities {
    fn platform(&self) -> Platform {
        Platform::Macos
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
        // SAFETY: geteuid has no preconditions and cannot fail.
        unsafe { libc::geteuid() == 0 }
    }

    fn tracer_id_of_self(&self) -> Option<u64> {
        traced_flag()
    }

    fn host_name(&self) -> Option<String> {
        let mut buf = [0u8; 256];
        // SAFETY: buf is valid for buf.len() bytes.
        let rc = unsafe { libc::gethostname(buf.as_mut_ptr().cast::<libc::c_char>(), buf.len()) };
        if rc != 0 {
            return None;
        }
        let len = buf.iter().position(|b| *b == 0).unwrap_or(buf.len());
        let name = String::from_utf8_lossy(&buf[..len]).trim().to_string();
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }

    fn persistent_machine_id(&self) -> Option<String> {
        let ioreg = run(IOREG, &["-rd1", "-c", "IOPlatformExpertDevice"])?;
        parse_platform_uuid(&ioreg)
    }

    /// CPU brand string followed by the hardware model, one per line.
    /// Virtual machines report their hypervisor in `hw.model`.
    fn processor_description(&self) -> Option<String> {
        let lines: Vec<String> = ["machdep.cpu.brand_string", "hw.model"]
            .into_iter()
            .filter_map(sysctl_string)
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
        run(IFCONFIG, &["-l"])
            .map(|list| list.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn enumerate_usb_like_devices(&self) -> Vec<String> {
        run(SYSTEM_PROFILER, &["SPUSBDataType", "-json"])
            .map(|json| parse_usb_profiler(&json))
            .unwrap_or_default()
    }

    fn os_version(&self) -> Option<String> {
        run(SW_VERS, &["-productVersion"])
    }

    fn proxy_setting(&self, name: &str) -> Option<String> {
        let scutil = run(SCUTIL, &["--proxy"])?;
        parse_scutil_value(&scutil, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filesystem_queries_use_real_paths() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let file = dir.path().join("Cydia.app");
        fs::write(&file, "").expect("write fixture");

        let caps = MacosCapabilities::new();
        let path = file.to_string_lossy();
        assert!(caps.file_exists(&path));
        assert_eq!(caps.read_text_file(&path).as_deref(), Some(""));
        assert_eq!(
            caps.list_directory(&dir.path().to_string_lossy()),
            vec![path.into_owned()]
        );
        assert!(!caps.file_exists(&dir.path().join("missing").to_string_lossy()));
    }

    #[test]
    fn reports_macos_platform() {
        assert_eq!(MacosCapabilities::new().platform(), Platform::Macos);
    }
}
