//! Capture-protection flag persisted as a marker file. The file existing
//! means protection is on; its contents are irrelevant.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

pub const SENTINEL_FILE_NAME: &str = "screenshot_blocking_enabled";

#[derive(Debug)]
pub enum SentinelError {
    CreateDir { path: PathBuf, source: std::io::Error },
    Write { path: PathBuf, source: std::io::Error },
    Remove { path: PathBuf, source: std::io::Error },
}

impl fmt::Display for SentinelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateDir { path, source } => {
                write!(f, "create sentinel directory {}: {}", path.display(), source)
            }
            Self::Write { path, source } => {
                write!(f, "write sentinel {}: {}", path.display(), source)
            }
            Self::Remove { path, source } => {
                write!(f, "remove sentinel {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for SentinelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CreateDir { source, .. }
            | Self::Write { source, .. }
            | Self::Remove { source, .. } => Some(source),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CaptureSentinel {
    path: PathBuf,
}

impl CaptureSentinel {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the marker. Enabling twice is the same as enabling once.
    pub fn enable(&self) -> Result<(), SentinelError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| SentinelError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|source| SentinelError::Write {
                path: self.path.clone(),
                source,
            })?;
        file.write_all(b"1").map_err(|source| SentinelError::Write {
            path: self.path.clone(),
            source,
        })?;

        info!(path = %self.path.display(), "screen capture protection enabled");
        Ok(())
    }

    /// Removes the marker. A marker that is already gone is not an error.
    pub fn disable(&self) -> Result<(), SentinelError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(SentinelError::Remove {
                    path: self.path.clone(),
                    source,
                })
            }
        }
        info!(path = %self.path.display(), "screen capture protection disabled");
        Ok(())
    }

    pub fn is_blocked(&self) -> bool {
        self.path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enable_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let sentinel = CaptureSentinel::new(dir.path().join("nested/state").join(SENTINEL_FILE_NAME));
        sentinel.enable().expect("enable sentinel");
        assert!(sentinel.is_blocked());
    }

    #[test]
    fn disable_reports_failure_when_marker_is_a_directory() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let marker = dir.path().join(SENTINEL_FILE_NAME);
        std::fs::create_dir(&marker).expect("create directory in marker slot");
        let sentinel = CaptureSentinel::new(&marker);
        let err = sentinel.disable().expect_err("removing a directory as a file fails");
        assert!(err.to_string().contains("remove sentinel"));
    }
}
