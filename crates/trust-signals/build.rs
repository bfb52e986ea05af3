fn main() {
    println!("cargo:rerun-if-env-changed=TRUST_SIGNALS_EXPECTED_SIGNATURE");

    if let Ok(value) = std::env::var("TRUST_SIGNALS_EXPECTED_SIGNATURE") {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            println!("cargo:rustc-env=TRUST_SIGNALS_EMBEDDED_SIGNATURE={trimmed}");
        }
    }
}
