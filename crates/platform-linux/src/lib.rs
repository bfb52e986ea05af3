//! Linux capability provider: procfs, sysfs and `/etc`.
//!
//! All filesystem reads go through `root`, which is `/` in production and a
//! scratch directory in tests.

mod procfs;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use trust_signals::{CapabilityProvider, Platform};

pub use procfs::{is_usb_interface_entry, parse_os_release_pretty_name, parse_tracer_pid};

const PROC_SELF_STATUS: &str = "/proc/self/status";
const PROC_CPUINFO: &str = "/proc/cpuinfo";
const MACHINE_ID_PATHS: [&str; 2] = ["/etc/machine-id", "/var/lib/dbus/machine-id"];
const OS_RELEASE_PATHS: [&str; 2] = ["/etc/os-release", "/usr/lib/os-release"];
const SYS_CLASS_NET: &str = "/sys/class/net";
const SYS_USB_DEVICES: &str = "/sys/bus/usb/devices";

#[derive(Debug, Clone)]
pub struct LinuxCapabilities {
    root: PathBuf,
}

impl Default for LinuxCapabilities {
    fn default() -> Self {
        Self::new()
    }
}

impl LinuxCapabilities {
    pub fn new() -> Self {
        Self::with_root("/")
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let relative = Path::new(path)
            .strip_prefix("/")
            .unwrap_or_else(|_| Path::new(path));
        self.root.join(relative)
    }

    fn read(&self, path: &str) -> Option<String> {
        match fs::read_to_string(self.resolve(path)) {
            Ok(content) => Some(content),
            Err(err) => {
                debug!(path, error = %err, "capability read failed");
                None
            }
        }
    }

    fn entry_names(&self, path: &str) -> Vec<String> {
        let Ok(entries) = fs::read_dir(self.resolve(path)) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .flatten()
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

impl CapabilityProvider for LinuxCapabilities {
    fn platform(&self) -> Platform {
        Platform::Linux
    }

    fn file_exists(&self, path: &str) -> bool {
        self.resolve(path).exists()
    }

    fn read_text_file(&self, path: &str) -> Option<String> {
        self.read(path)
    }

    fn list_directory(&self, path: &str) -> Vec<String> {
        let base = path.trim_end_matches('/');
        self.entry_names(path)
            .into_iter()
            .map(|name| format!("{}/{}", base, name))
            .collect()
    }

    fn current_process_is_elevated(&self) -> bool {
        // SAFETY: geteuid has no preconditions and cannot fail.
        unsafe { libc::geteuid() == 0 }
    }

    fn tracer_id_of_self(&self) -> Option<u64> {
        self.read(PROC_SELF_STATUS)
            .and_then(|status| parse_tracer_pid(&status))
    }

    fn host_name(&self) -> Option<String> {
        let mut buf = [0u8; 256];
        // SAFETY: buf is valid for buf.len() bytes; gethostname NUL-terminates
        // on success when the name fits.
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
        MACHINE_ID_PATHS
            .iter()
            .filter_map(|path| self.read(path))
            .map(|raw| raw.lines().next().unwrap_or_default().trim().to_string())
            .find(|id| !id.is_empty())
    }

    fn processor_description(&self) -> Option<String> {
        self.read(PROC_CPUINFO)
    }

    fn environment_variable(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn network_interface_names(&self) -> Vec<String> {
        self.entry_names(SYS_CLASS_NET)
    }

    fn enumerate_usb_like_devices(&self) -> Vec<String> {
        self.entry_names(SYS_USB_DEVICES)
            .into_iter()
            .filter(|name| !is_usb_interface_entry(name))
            .map(|name| format!("{}/{}", SYS_USB_DEVICES, name))
            .collect()
    }

    fn os_version(&self) -> Option<String> {
        OS_RELEASE_PATHS
            .iter()
            .filter_map(|path| self.read(path))
            .find_map(|raw| parse_os_release_pretty_name(&raw))
    }
}
