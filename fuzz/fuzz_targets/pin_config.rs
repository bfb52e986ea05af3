#![no_main]

use libfuzzer_sys::fuzz_target;
use serde_json::Value;
use trust_signals::{normalize_pin, PinSet, PinningState, PinningValidator};

fn split_input(data: &[u8]) -> (&[u8], String) {
    let cut = data.iter().position(|b| *b == 0).unwrap_or(data.len());
    let (json, rest) = data.split_at(cut);
    let target = String::from_utf8_lossy(rest.get(1..).unwrap_or_default()).to_string();
    (json, target)
}

fuzz_target!(|data: &[u8]| {
    let (json, target) = split_input(data);
    let Ok(arguments) = serde_json::from_slice::<Value>(json) else {
        return;
    };

    let pins = PinSet::from_json(arguments.get("certificates"), arguments.get("publicKeys"));
    for pin in pins.certificates.iter().chain(pins.public_keys.iter()) {
        let _ = normalize_pin(pin);
    }

    // Any string entry, blank or not, switches pinning on.
    let expect_configured = ["certificates", "publicKeys"].iter().any(|key| {
        arguments
            .get(*key)
            .and_then(Value::as_array)
            .is_some_and(|items| items.iter().any(Value::is_string))
    });
    let validator = PinningValidator::default();
    let state = validator.configure(pins);
    assert_eq!(state == PinningState::Configured, expect_configured);

    let allowed = validator.verify(&target);
    if !expect_configured {
        assert!(allowed);
    } else {
        assert_eq!(allowed, target.starts_with("https://"));
    }
});
