use sha2::{Digest, Sha256};

pub const SHA256_HEX_LEN: usize = 64;

/// SHA-256 of `data` as 64 uppercase hex characters.
pub fn digest_hex(data: &[u8]) -> String {
    encode_hex_upper(&Sha256::digest(data))
}

/// Accepts a SHA-256 hex string in any case, surrounded by whitespace, and
/// returns it uppercased. Anything else is rejected.
pub fn normalize_sha256_hex(raw: &str) -> Option<String> {
    let normalized = raw.trim().to_ascii_uppercase();
    if normalized.len() != SHA256_HEX_LEN {
        return None;
    }
    if !normalized.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }
    Some(normalized)
}

fn encode_hex_upper(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0f) as usize] as char);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_matches_known_vectors() {
        assert_eq!(
            digest_hex(b"abc"),
            "BA7816BF8F01CFEA414140DE5DAE2223B00361A396177A9CB410FF61F20015AD"
        );
        assert_eq!(
            digest_hex(b""),
            "E3B0C44298FC1C149AFBF4C8996FB92427AE41E4649B934CA495991B7852B855"
        );
    }

    #[test]
    fn normalize_accepts_trimmed_lowercase_and_rejects_invalid() {
        let lower = "  ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad\n";
        assert_eq!(
            normalize_sha256_hex(lower).as_deref(),
            Some("BA7816BF8F01CFEA414140DE5DAE2223B00361A396177A9CB410FF61F20015AD")
        );
        assert!(normalize_sha256_hex("abc").is_none());
        assert!(normalize_sha256_hex(&"g".repeat(64)).is_none());
    }
}
