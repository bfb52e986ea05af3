//! Registry and PowerShell reads.
//!
//! Values come back as text: `REG_DWORD` in decimal, string types trimmed.

#[cfg(target_os = "windows")]
use crate::windows_cmd::{POWERSHELL_EXE, REG_EXE};
#[cfg(target_os = "windows")]
use std::process::Command;

/// Read `value_name` under `key`, where `key` carries its hive
/// (`HKLM\SOFTWARE\...`).
pub fn read_reg_value(key: &str, value_name: &str) -> Option<String> {
    let output = run_reg_query(key, value_name)?;
    parse_reg_value(&output, value_name)
}

/// Non-empty trimmed stdout lines of a PowerShell command.
pub fn run_powershell_lines(command: &str) -> Vec<String> {
    run_powershell(command)
        .map(|stdout| {
            stdout
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub fn run_powershell(command: &str) -> Option<String> {
    #[cfg(target_os = "windows")]
    {
        let output = Command::new(POWERSHELL_EXE)
            .args(["-NoProfile", "-NonInteractive", "-Command", command])
            .output()
            .ok()?;
        if !output.status.success() {
            tracing::debug!(command, "powershell exited non-zero");
            return None;
        }
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if stdout.is_empty() {
            None
        } else {
            Some(stdout)
        }
    }
    #[cfg(not(target_os = "windows"))]
    {
        let _ = command;
        None
    }
}

fn run_reg_query(key: &str, value_name: &str) -> Option<String> {
    #[cfg(target_os = "windows")]
    {
        let output = Command::new(REG_EXE)
            .args(["query", key, "/v", value_name])
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        Some(String::from_utf8_lossy(&output.stdout).to_string())
    }
    #[cfg(not(target_os = "windows"))]
    {
        let _ = (key, value_name);
        None
    }
}

pub fn parse_reg_value(output: &str, value_name: &str) -> Option<String> {
    let (reg_type, value) = parse_reg_line(output, value_name)?;
    match reg_type.as_str() {
        "REG_DWORD" | "REG_QWORD" => parse_reg_number(&value).map(|n| n.to_string()),
        _ => Some(value.trim().to_string()),
    }
}

fn parse_reg_number(value: &str) -> Option<u64> {
    let value = value.trim();
    match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => value.parse::<u64>().ok(),
    }
}

fn parse_reg_line(output: &str, value_name: &str) -> Option<(String, String)> {
    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        // Value names may contain spaces; the type column is the first
        // REG_* token after the name.
        let mut tokens = line.split_whitespace().peekable();
        let mut name_parts = Vec::new();
        while let Some(token) = tokens.peek() {
            if token.starts_with("REG_") {
                break;
            }
            name_parts.push(*token);
            tokens.next();
        }
        let Some(reg_type) = tokens.next() else {
            continue;
        };
        if !name_parts.join(" ").eq_ignore_ascii_case(value_name) {
            continue;
        }

        let value = tokens.collect::<Vec<_>>().join(" ");
        if value.is_empty() {
            continue;
        }
        return Some((reg_type.to_string(), value));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::parse_reg_value;

    #[test]
    fn dword_values_come_back_in_decimal() {
        let output = r#"
HKEY_LOCAL_MACHINE\SOFTWARE\Microsoft\Windows\CurrentVersion\AppModelUnlock
    AllowDevelopmentWithoutDevLicense    REG_DWORD    0x1
"#;
        assert_eq!(
            parse_reg_value(output, "AllowDevelopmentWithoutDevLicense").as_deref(),
            Some("1")
        );
    }

    #[test]
    fn string_values_are_trimmed() {
        let output = r#"
HKEY_LOCAL_MACHINE\SOFTWARE\Microsoft\Cryptography
    MachineGuid    REG_SZ    6d1f3b1a-2c4e-4f5a-8b9c-0d1e2f3a4b5c
"#;
        assert_eq!(
            parse_reg_value(output, "MachineGuid").as_deref(),
            Some("6d1f3b1a-2c4e-4f5a-8b9c-0d1e2f3a4b5c")
        );
    }

    #[test]
    fn does_not_match_prefix_only_value_names() {
        let output = r#"
HKEY_CURRENT_USER\Software\Microsoft\Windows\CurrentVersion\Internet Settings
    ProxyServerEx    REG_SZ    10.0.0.1:8080
"#;
        assert_eq!(parse_reg_value(output, "ProxyServer"), None);
    }

    #[test]
    fn value_names_with_spaces_and_values_with_spaces() {
        let output = r#"
HKEY_LOCAL_MACHINE\HARDWARE\DESCRIPTION\System\CentralProcessor\0
    ProcessorNameString    REG_SZ    Intel(R) Core(TM) i7-9750H CPU @ 2.60GHz
    Friendly Name    REG_SZ    Some Value
"#;
        assert_eq!(
            parse_reg_value(output, "ProcessorNameString").as_deref(),
            Some("Intel(R) Core(TM) i7-9750H CPU @ 2.60GHz")
        );
        assert_eq!(parse_reg_value(output, "Friendly Name").as_deref(), Some("Some Value"));
    }
}
