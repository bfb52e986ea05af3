//! Host facts the engine reads through.
//!
//! Every method is best-effort: a read that fails or has nothing to report
//! comes back as `None`, `false` or an empty list. Probes never see an error.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Linux,
    Macos,
    Windows,
    Unknown,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "linux") {
            Self::Linux
        } else if cfg!(target_os = "macos") {
            Self::Macos
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else {
            Self::Unknown
        }
    }

    /// Tag used in connection-status records.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Macos => "macos",
            Self::Windows => "windows",
            Self::Unknown => "unknown",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Linux => "Linux",
            Self::Macos => "macOS",
            Self::Windows => "Windows",
            Self::Unknown => "Unknown",
        }
    }
}

pub trait CapabilityProvider: Send + Sync {
    fn platform(&self) -> Platform;

    fn file_exists(&self, path: &str) -> bool;

    fn read_text_file(&self, path: &str) -> Option<String>;

    fn list_directory(&self, path: &str) -> Vec<String>;

    fn current_process_is_elevated(&self) -> bool;

    /// Identifier of whatever is tracing this process. `Some(0)` means
    /// nothing is attached; `None` means the platform could not tell.
    fn tracer_id_of_self(&self) -> Option<u64>;

    fn host_name(&self) -> Option<String>;

    fn persistent_machine_id(&self) -> Option<String>;

    fn processor_description(&self) -> Option<String>;

    fn environment_variable(&self, name: &str) -> Option<String>;

    fn network_interface_names(&self) -> Vec<String>;

    fn enumerate_usb_like_devices(&self) -> Vec<String>;

    fn os_version(&self) -> Option<String>;

    fn registry_value(&self, _key: &str, _value: &str) -> Option<String> {
        None
    }

    fn proxy_setting(&self, _name: &str) -> Option<String> {
        None
    }
}

impl<T: CapabilityProvider + ?Sized> CapabilityProvider for &T {
    fn platform(&self) -> Platform {
        (**self).platform()
    }
    fn file_exists(&self, path: &str) -> bool {
        (**self).file_exists(path)
    }
    fn read_text_file(&self, path: &str) -> Option<String> {
        (**self).read_text_file(path)
    }
    fn list_directory(&self, path: &str) -> Vec<String> {
        (**self).list_directory(path)
    }
    fn current_process_is_elevated(&self) -> bool {
        (**self).current_process_is_elevated()
    }
    fn tracer_id_of_self(&self) -> Option<u64> {
        (**self).tracer_id_of_self()
    }
    fn host_name(&self) -> Option<String> {
        (**self).host_name()
    }
    fn persistent_machine_id(&self) -> Option<String> {
        (**self).persistent_machine_id()
    }
    fn processor_description(&self) -> Option<String> {
        (**self).processor_description()
    }
    fn environment_variable(&self, name: &str) -> Option<String> {
        (**self).environment_variable(name)
    }
    fn network_interface_names(&self) -> Vec<String> {
        (**self).network_interface_names()
    }
    fn enumerate_usb_like_devices(&self) -> Vec<String> {
        (**self).enumerate_usb_like_devices()
    }
    fn os_version(&self) -> Option<String> {
        (**self).os_version()
    }
    fn registry_value(&self, key: &str, value: &str) -> Option<String> {
        (**self).registry_value(key, value)
    }
    fn proxy_setting(&self, name: &str) -> Option<String> {
        (**self).proxy_setting(name)
    }
}

/// In-memory provider built from a snapshot of host facts.
///
/// `StaticCapabilities::new(platform)` reports "absent/unknown" for
/// everything; builder methods fill in what is known.
#[derive(Debug, Clone)]
pub struct StaticCapabilities {
    pub platform: Platform,
    pub files: BTreeMap<String, String>,
    pub directories: BTreeMap<String, Vec<String>>,
    pub elevated: bool,
    pub tracer_id: Option<u64>,
    pub host_name: Option<String>,
    pub machine_id: Option<String>,
    pub processor: Option<String>,
    pub env: BTreeMap<String, String>,
    pub interfaces: Vec<String>,
    pub usb_devices: Vec<String>,
    pub os_version: Option<String>,
    pub registry: BTreeMap<(String, String), String>,
    pub proxy_settings: BTreeMap<String, String>,
}

impl StaticCapabilities {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            files: BTreeMap::new(),
            directories: BTreeMap::new(),
            elevated: false,
            tracer_id: None,
            host_name: None,
            machine_id: None,
            processor: None,
            env: BTreeMap::new(),
            interfaces: Vec::new(),
            usb_devices: Vec::new(),
            os_version: None,
            registry: BTreeMap::new(),
            proxy_settings: BTreeMap::new(),
        }
    }

    pub fn with_file(mut self, path: &str, contents: &str) -> Self {
        self.files.insert(path.to_string(), contents.to_string());
        self
    }

    pub fn with_paths<'a>(mut self, paths: impl IntoIterator<Item = &'a str>) -> Self {
        for path in paths {
            self.files.entry(path.to_string()).or_default();
        }
        self
    }

    pub fn with_directory(mut self, path: &str, entries: &[&str]) -> Self {
        self.directories.insert(
            path.to_string(),
            entries.iter().map(|entry| (*entry).to_string()).collect(),
        );
        self
    }

    pub fn with_elevated(mut self, elevated: bool) -> Self {
        self.elevated = elevated;
        self
    }

    pub fn with_tracer_id(mut self, tracer_id: u64) -> Self {
        self.tracer_id = Some(tracer_id);
        self
    }

    pub fn with_host_name(mut self, host_name: &str) -> Self {
        self.host_name = Some(host_name.to_string());
        self
    }

    pub fn with_machine_id(mut self, machine_id: &str) -> Self {
        self.machine_id = Some(machine_id.to_string());
        self
    }

    pub fn with_processor(mut self, processor: &str) -> Self {
        self.processor = Some(processor.to_string());
        self
    }

    pub fn with_env(mut self, name: &str, value: &str) -> Self {
        self.env.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_interfaces(mut self, names: &[&str]) -> Self {
        self.interfaces = names.iter().map(|name| (*name).to_string()).collect();
        self
    }

    pub fn with_usb_devices(mut self, devices: &[&str]) -> Self {
        self.usb_devices = devices.iter().map(|device| (*device).to_string()).collect();
        self
    }

    pub fn with_os_version(mut self, version: &str) -> Self {
        self.os_version = Some(version.to_string());
        self
    }

    pub fn with_registry(mut self, key: &str, value: &str, data: &str) -> Self {
        self.registry
            .insert((key.to_string(), value.to_string()), data.to_string());
        self
    }

    pub fn with_proxy_setting(mut self, name: &str, value: &str) -> Self {
        self.proxy_settings
            .insert(name.to_string(), value.to_string());
        self
    }
}

impl CapabilityProvider for StaticCapabilities {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn file_exists(&self, path: &str) -> bool {
        self.files.contains_key(path) || self.directories.contains_key(path)
    }

    fn read_text_file(&self, path: &str) -> Option<String> {
        self.files.get(path).cloned()
    }

    fn list_directory(&self, path: &str) -> Vec<String> {
        self.directories.get(path).cloned().unwrap_or_default()
    }

    fn current_process_is_elevated(&self) -> bool {
        self.elevated
    }

    fn tracer_id_of_self(&self) -> Option<u64> {
        self.tracer_id
    }

    fn host_name(&self) -> Option<String> {
        self.host_name.clone()
    }

    fn persistent_machine_id(&self) -> Option<String> {
        self.machine_id.clone()
    }

    fn processor_description(&self) -> Option<String> {
        self.processor.clone()
    }

    fn environment_variable(&self, name: &str) -> Option<String> {
        self.env.get(name).cloned()
    }

    fn network_interface_names(&self) -> Vec<String> {
        self.interfaces.clone()
    }

    fn enumerate_usb_like_devices(&self) -> Vec<String> {
        self.usb_devices.clone()
    }

    fn os_version(&self) -> Option<String> {
        self.os_version.clone()
    }

    fn registry_value(&self, key: &str, value: &str) -> Option<String> {
        self.registry
            .get(&(key.to_string(), value.to_string()))
            .cloned()
    }

    fn proxy_setting(&self, name: &str) -> Option<String> {
        self.proxy_settings.get(name).cloned()
    }
}
