//! Absolute system tool paths, so spawns never go through a PATH search.

#[cfg(target_os = "windows")]
pub(crate) const POWERSHELL_EXE: &str =
    r"C:\Windows\System32\WindowsPowerShell\v1.0\powershell.exe";
#[cfg(target_os = "windows")]
pub(crate) const REG_EXE: &str = r"C:\Windows\System32\reg.exe";
