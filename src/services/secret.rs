//! Secret generation and log-safe fingerprints.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Number of random bytes in a secret (128 bits).
pub const SECRET_BYTES: usize = 16;

/// Generate a new secret: 16 bytes from the thread CSPRNG, hex encoded.
pub fn generate_secret() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Short SHA-256 prefix of a secret, safe to put in logs.
pub fn fingerprint(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..12].to_string()
}
