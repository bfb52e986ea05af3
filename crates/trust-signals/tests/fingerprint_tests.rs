use proptest::prelude::*;
use trust_signals::{
    compute_fingerprint, digest_hex, fingerprint_material, Platform, StaticCapabilities,
};

fn host() -> StaticCapabilities {
    StaticCapabilities::new(Platform::Linux)
        .with_host_name("build-box")
        .with_machine_id("0123456789abcdef0123456789abcdef\n")
        .with_processor("processor\t: 0\nvendor_id\t: GenuineIntel\n")
}

#[test]
fn material_follows_field_order_and_separators() {
    assert_eq!(
        fingerprint_material(&host()),
        "build-box|0123456789abcdef0123456789abcdef|processor\t: 0|"
    );
}

#[test]
fn fingerprint_is_stable_and_uppercase_hex() {
    let caps = host();
    let first = compute_fingerprint(&caps);
    let second = compute_fingerprint(&caps);
    assert_eq!(first, second);
    assert_eq!(first.as_str().len(), 64);
    assert!(first
        .as_str()
        .chars()
        .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
    assert_eq!(first.as_str(), digest_hex(fingerprint_material(&caps).as_bytes()));
}

#[test]
fn each_component_changes_the_fingerprint() {
    let base = compute_fingerprint(&host());
    assert_ne!(base, compute_fingerprint(&host().with_host_name("other-box")));
    assert_ne!(base, compute_fingerprint(&host().with_machine_id("ffff")));
    assert_ne!(base, compute_fingerprint(&host().with_processor("processor\t: 1\n")));
}

#[test]
fn empty_host_still_produces_a_fingerprint() {
    let fingerprint = compute_fingerprint(&StaticCapabilities::new(Platform::Unknown));
    assert_eq!(fingerprint.as_str(), digest_hex(b"|||"));
}

proptest! {
    #[test]
    fn digest_is_deterministic_uppercase_hex(data in proptest::collection::vec(any::<u8>(), 0..256)) {
        let a = digest_hex(&data);
        let b = digest_hex(&data);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.len(), 64);
        prop_assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    }

    #[test]
    fn distinct_host_names_give_distinct_fingerprints(a in "[a-z0-9-]{1,24}", b in "[a-z0-9-]{1,24}") {
        prop_assume!(a != b);
        let left = StaticCapabilities::new(Platform::Linux).with_host_name(&a);
        let right = StaticCapabilities::new(Platform::Linux).with_host_name(&b);
        prop_assert_ne!(compute_fingerprint(&left), compute_fingerprint(&right));
    }
}
