//! Thin wrappers over the system tools the provider shells out to.

use std::process::Command;

use tracing::debug;

pub(crate) const SYSCTL: &str = "/usr/sbin/sysctl";
pub(crate) const SYSTEM_PROFILER: &str = "/usr/sbin/system_profiler";
pub(crate) const IOREG: &str = "/usr/sbin/ioreg";
pub(crate) const SCUTIL: &str = "/usr/sbin/scutil";
pub(crate) const SW_VERS: &str = "/usr/bin/sw_vers";
pub(crate) const IFCONFIG: &str = "/sbin/ifconfig";

/// Trimmed stdout of a successful run, `None` on spawn failure, non-zero
/// exit, or empty output.
pub(crate) fn run(binary: &str, args: &[&str]) -> Option<String> {
    let output = match Command::new(binary).args(args).output() {
        Ok(output) => output,
        Err(err) => {
            debug!(binary, error = %err, "command spawn failed");
            return None;
        }
    };
    if !output.status.success() {
        debug!(binary, status = ?output.status.code(), "command exited non-zero");
        return None;
    }
    let s = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

pub(crate) fn sysctl_string(key: &str) -> Option<String> {
    run(SYSCTL, &["-n", key])
}
