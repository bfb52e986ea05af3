use trust_signals::{
    CapabilityProvider, Platform, ProbeProfile, ProbeResult, ProbeSet, SignalKind,
    StaticCapabilities,
};

fn linux_probes() -> ProbeSet {
    ProbeSet::new(ProbeProfile::linux())
}

#[test]
fn absent_host_facts_leave_every_gating_probe_clear() {
    for platform in [Platform::Linux, Platform::Macos, Platform::Windows, Platform::Unknown] {
        let caps = StaticCapabilities::new(platform);
        let probes = ProbeSet::new(ProbeProfile::for_platform(platform));
        for result in probes.run_all(&caps) {
            assert!(!result.verdict().unwrap_or(false), "{:?} on {:?}", result, platform);
            assert!(result.evidence().is_empty());
        }
    }
}

#[test]
fn run_all_covers_every_signal_once_and_tags_tooling_as_advisory() {
    let caps = StaticCapabilities::new(Platform::Linux);
    let results = linux_probes().run_all(&caps);
    assert_eq!(results.len(), SignalKind::ALL.len());
    for result in &results {
        match result {
            ProbeResult::Advisory(finding) => {
                assert_eq!(finding.kind, SignalKind::ReverseEngTooling);
                assert!(finding.measures_applied);
                assert_eq!(result.verdict(), None);
            }
            ProbeResult::Gating(signal) => assert_ne!(signal.kind, SignalKind::ReverseEngTooling),
        }
    }
}

#[test]
fn privilege_elevation_fires_on_elevated_process_or_tool_path() {
    let probes = linux_probes();

    let elevated = StaticCapabilities::new(Platform::Linux).with_elevated(true);
    let signal = probes.privilege_elevation(&elevated);
    assert!(signal.detected);
    assert_eq!(signal.evidence, vec!["elevated_process".to_string()]);

    let sudo = StaticCapabilities::new(Platform::Linux).with_paths(["/usr/bin/sudo"]);
    let signal = probes.privilege_elevation(&sudo);
    assert!(signal.detected);
    assert_eq!(signal.evidence, vec!["/usr/bin/sudo".to_string()]);
}

#[test]
fn tamper_markers_report_matching_paths() {
    let caps = StaticCapabilities::new(Platform::Macos)
        .with_paths(["/Library/MobileSubstrate", "/usr/bin/unrelated"]);
    let signal = ProbeSet::new(ProbeProfile::macos()).tamper_markers(&caps);
    assert!(signal.detected);
    assert_eq!(signal.evidence, vec!["/Library/MobileSubstrate".to_string()]);
}

#[test]
fn emulation_matches_vendor_substrings_in_processor_description() {
    let probes = linux_probes();
    let vm = StaticCapabilities::new(Platform::Linux)
        .with_processor("processor\t: 0\nmodel name\t: QEMU Virtual CPU version 2.5+\n");
    let signal = probes.emulation(&vm);
    assert!(signal.detected);
    assert_eq!(signal.evidence, vec!["QEMU".to_string()]);

    let metal = StaticCapabilities::new(Platform::Linux)
        .with_processor("processor\t: 0\nmodel name\t: AMD Ryzen 7 5800X\n");
    assert!(!probes.emulation(&metal).detected);
}

#[test]
fn debugger_requires_non_zero_tracer() {
    let probes = linux_probes();
    assert!(!probes
        .debugger(&StaticCapabilities::new(Platform::Linux).with_tracer_id(0))
        .detected);
    let traced = probes.debugger(&StaticCapabilities::new(Platform::Linux).with_tracer_id(4242));
    assert!(traced.detected);
    assert_eq!(traced.evidence, vec!["tracer_id=4242".to_string()]);
}

#[test]
fn reverse_engineering_finding_counts_tools_without_verdict() {
    let caps = StaticCapabilities::new(Platform::Linux)
        .with_paths(["/usr/bin/gdb", "/usr/bin/strace"]);
    let finding = linux_probes().reverse_engineering_tooling(&caps);
    assert_eq!(finding.evidence_count(), 2);
    assert!(finding.measures_applied);
}

#[test]
fn developer_mode_reads_paths_and_registry_markers() {
    let caps = StaticCapabilities::new(Platform::Linux).with_paths(["/usr/bin/git"]);
    assert!(linux_probes().developer_mode(&caps).detected);

    let windows = ProbeSet::new(ProbeProfile::windows());
    let key = r"HKLM\SOFTWARE\Microsoft\Windows\CurrentVersion\AppModelUnlock";
    let on = StaticCapabilities::new(Platform::Windows).with_registry(
        key,
        "AllowDevelopmentWithoutDevLicense",
        "0x1",
    );
    assert!(windows.developer_mode(&on).detected);

    let off = StaticCapabilities::new(Platform::Windows).with_registry(
        key,
        "AllowDevelopmentWithoutDevLicense",
        "0x0",
    );
    assert!(!windows.developer_mode(&off).detected);
}

#[test]
fn proxy_ignores_blank_values_and_reads_system_settings() {
    let probes = linux_probes();
    let blank = StaticCapabilities::new(Platform::Linux).with_env("HTTPS_PROXY", "   ");
    assert!(!probes.proxy(&blank).detected);

    let set = StaticCapabilities::new(Platform::Linux).with_env("https_proxy", "http://10.0.0.1:3128");
    let signal = probes.proxy(&set);
    assert!(signal.detected);
    assert_eq!(signal.evidence, vec!["env:https_proxy".to_string()]);

    let mac = StaticCapabilities::new(Platform::Macos).with_proxy_setting("HTTPProxy", "proxy.corp");
    assert!(ProbeSet::new(ProbeProfile::macos()).proxy(&mac).detected);
}

#[test]
fn vpn_matches_interface_naming_conventions() {
    let linux = StaticCapabilities::new(Platform::Linux).with_interfaces(&["lo", "eth0", "tun0"]);
    let signal = linux_probes().vpn(&linux);
    assert!(signal.detected);
    assert_eq!(signal.evidence, vec!["tun0".to_string()]);

    let plain = StaticCapabilities::new(Platform::Linux).with_interfaces(&["lo", "wlan0"]);
    assert!(!linux_probes().vpn(&plain).detected);

    let windows = StaticCapabilities::new(Platform::Windows)
        .with_interfaces(&["Ethernet", "TAP-Windows Adapter V9"]);
    assert!(ProbeSet::new(ProbeProfile::windows()).vpn(&windows).detected);
}

#[test]
fn stock_windows_tunnel_adapters_are_not_vpns() {
    let stock = StaticCapabilities::new(Platform::Windows).with_interfaces(&[
        "Ethernet",
        "Teredo Tunneling Pseudo-Interface",
        "Microsoft ISATAP Adapter",
    ]);
    let signal = ProbeSet::new(ProbeProfile::windows()).vpn(&stock);
    assert!(!signal.detected, "unexpected evidence: {:?}", signal.evidence);

    let vpn = StaticCapabilities::new(Platform::Windows)
        .with_interfaces(&["Ethernet", "OpenVPN Data Channel Offload"]);
    assert!(ProbeSet::new(ProbeProfile::windows()).vpn(&vpn).detected);
}

#[test]
fn removable_media_ignores_bus_controllers() {
    let probes = linux_probes();
    let hubs_only = StaticCapabilities::new(Platform::Linux)
        .with_usb_devices(&["/sys/bus/usb/devices/usb1", "/sys/bus/usb/devices/usb2"]);
    assert!(!probes.removable_media(&hubs_only).detected);

    let stick = StaticCapabilities::new(Platform::Linux)
        .with_usb_devices(&["/sys/bus/usb/devices/usb1", "/sys/bus/usb/devices/1-2"]);
    let signal = probes.removable_media(&stick);
    assert!(signal.detected);
    assert_eq!(signal.evidence, vec!["/sys/bus/usb/devices/1-2".to_string()]);

    let subsystem = StaticCapabilities::new(Platform::Linux).with_paths(["/sys/bus/usb"]);
    assert!(probes.removable_media(&subsystem).detected);
}

#[test]
fn probes_accept_trait_objects() {
    let caps = StaticCapabilities::new(Platform::Linux).with_tracer_id(7);
    let dyn_caps: &dyn CapabilityProvider = &caps;
    assert!(linux_probes().debugger(dyn_caps).detected);
}
