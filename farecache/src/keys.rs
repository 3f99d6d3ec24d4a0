//! Cache key derivation.

use sha2::{Digest, Sha256};

const KEY_PREFIX: &str = "cached_sro_";

/// Hashes the raw token so keys have a fixed, store-safe shape no
/// matter what the client sent.
pub fn cache_key(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    let mut key = String::with_capacity(KEY_PREFIX.len() + digest.len() * 2);
    key.push_str(KEY_PREFIX);
    for byte in digest {
        key.push_str(&format!("{byte:02x}"));
    }
    key
}
