mod env;
mod file;
mod util;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use tracing::warn;

use crate::capability::Platform;
use crate::pinning::{PinSet, DEFAULT_SECURE_SCHEME};
use crate::profile::ProbeProfile;
use crate::sentinel::SENTINEL_FILE_NAME;

pub use file::ProbeOverrides;

pub const CONFIG_PATH_ENV: &str = "TRUST_SIGNALS_CONFIG";
const COMPILETIME_EXPECTED_SIGNATURE: Option<&str> =
    option_env!("TRUST_SIGNALS_EMBEDDED_SIGNATURE");

#[derive(Debug, Clone)]
pub struct TrustConfig {
    pub sentinel_path: PathBuf,
    /// Reference app signature shipped with the build, if any.
    pub expected_signature: Option<String>,
    pub secure_scheme: String,
    pub initial_pins: PinSet,
    pub probe_overrides: ProbeOverrides,
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            sentinel_path: default_sentinel_path(),
            expected_signature: None,
            secure_scheme: DEFAULT_SECURE_SCHEME.to_string(),
            initial_pins: PinSet::default(),
            probe_overrides: ProbeOverrides::default(),
        }
    }
}

impl TrustConfig {
    /// Defaults, then the TOML file named by `TRUST_SIGNALS_CONFIG`, then
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::default();
        if let Some(path) = util::env_non_empty(CONFIG_PATH_ENV) {
            config.apply_file(Path::new(&path))?;
        }
        config.apply_env_overrides();
        config.apply_compiletime_fallback();
        Ok(config)
    }

    /// Like [`TrustConfig::load`], but a broken config file is logged and
    /// skipped instead of failing.
    pub fn from_env() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(err) => {
                warn!(error = %format!("{:#}", err), "config file ignored, using defaults");
                let mut config = Self::default();
                config.apply_env_overrides();
                config.apply_compiletime_fallback();
                config
            }
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = Self::default();
        config
            .apply_file(path)
            .with_context(|| format!("failed loading trust config {}", path.display()))?;
        Ok(config)
    }

    pub fn probe_profile(&self, platform: Platform) -> ProbeProfile {
        let mut profile = ProbeProfile::for_platform(platform);
        self.probe_overrides.apply(&mut profile);
        profile
    }

    fn apply_compiletime_fallback(&mut self) {
        if self.expected_signature.is_none() {
            self.expected_signature =
                COMPILETIME_EXPECTED_SIGNATURE.and_then(|raw| util::non_empty(Some(raw.to_string())));
        }
    }
}

pub fn default_sentinel_path() -> PathBuf {
    match ProjectDirs::from("", "", "trust-signals") {
        Some(dirs) => dirs.data_local_dir().join(SENTINEL_FILE_NAME),
        None => std::env::temp_dir()
            .join("trust-signals")
            .join(SENTINEL_FILE_NAME),
    }
}
