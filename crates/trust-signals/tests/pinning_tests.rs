use std::sync::Arc;
use std::thread;

use trust_signals::{PinSet, PinningState, PinningValidator, PresentedIdentity};

const NO_PINS: [&str; 0] = [];

#[test]
fn unconfigured_validator_accepts_any_target() {
    let validator = PinningValidator::default();
    assert_eq!(validator.configure_lists(NO_PINS, NO_PINS), PinningState::Unconfigured);
    assert!(validator.verify("https://x"));
    assert!(validator.verify("http://x"));
}

#[test]
fn configured_validator_requires_secure_scheme() {
    let validator = PinningValidator::default();
    assert_eq!(validator.configure_lists(["cert1"], NO_PINS), PinningState::Configured);
    assert!(!validator.verify("http://x"));
    assert!(validator.verify("https://x"));
}

#[test]
fn reconfiguring_replaces_pins_wholesale() {
    let validator = PinningValidator::default();
    validator.configure_lists(["cert1"], ["key1"]);
    validator.configure_lists(["cert2"], NO_PINS);

    let pins = validator.snapshot();
    assert_eq!(pins.certificates.into_iter().collect::<Vec<_>>(), vec!["cert2"]);
    assert!(pins.public_keys.is_empty());

    assert_eq!(validator.configure_lists(NO_PINS, NO_PINS), PinningState::Unconfigured);
    assert!(validator.verify("http://x"));
}

#[test]
fn blank_pins_still_configure_and_never_match() {
    let validator = PinningValidator::default();
    assert_eq!(validator.configure_lists([""], NO_PINS), PinningState::Configured);
    assert!(!validator.verify("http://x"));
    assert!(validator.verify("https://x"));

    let blank = PresentedIdentity {
        certificate_sha256: Some("  ".to_string()),
        public_key_sha256: Some(String::new()),
    };
    assert!(!validator.verify_presented("https://x", &blank));

    let from_json = PinSet::from_json(None, Some(&serde_json::json!(["   ", 3])));
    assert!(!from_json.is_empty());
    assert_eq!(validator.configure(from_json), PinningState::Configured);
}

#[test]
fn presented_identity_must_match_a_pin() {
    let cert = "aa".repeat(32);
    let validator = PinningValidator::default();
    validator.configure_lists([format!("sha256/{}", cert)], ["spki-pin"]);

    let by_cert = PresentedIdentity {
        certificate_sha256: Some(cert.to_uppercase()),
        public_key_sha256: None,
    };
    assert!(validator.verify_presented("https://api.example", &by_cert));
    assert!(!validator.verify_presented("http://api.example", &by_cert));

    let by_key = PresentedIdentity {
        certificate_sha256: Some("bb".repeat(32)),
        public_key_sha256: Some("spki-pin".to_string()),
    };
    assert!(validator.verify_presented("https://api.example", &by_key));

    let stranger = PresentedIdentity {
        certificate_sha256: Some("bb".repeat(32)),
        public_key_sha256: Some("other".to_string()),
    };
    assert!(!validator.verify_presented("https://api.example", &stranger));
    assert!(!validator.verify_presented("https://api.example", &PresentedIdentity::default()));
}

#[test]
fn custom_secure_scheme_is_honoured() {
    let validator = PinningValidator::new("wss://");
    validator.configure(PinSet::new(["cert1"], NO_PINS));
    assert!(validator.verify("wss://socket.example"));
    assert!(!validator.verify("https://socket.example"));
}

#[test]
fn concurrent_configuration_leaves_a_single_written_state() {
    let validator = Arc::new(PinningValidator::default());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let validator = Arc::clone(&validator);
            thread::spawn(move || {
                for _ in 0..50 {
                    validator.configure_lists(
                        [format!("cert-{}", i)],
                        [format!("key-{}", i)],
                    );
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("configure thread");
    }

    let pins = validator.snapshot();
    assert_eq!(pins.certificates.len(), 1);
    assert_eq!(pins.public_keys.len(), 1);
    let cert = pins.certificates.iter().next().expect("one cert");
    let key = pins.public_keys.iter().next().expect("one key");
    assert_eq!(cert.trim_start_matches("cert-"), key.trim_start_matches("key-"));
}
