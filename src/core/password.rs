use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 digest of a password
///
/// Accounts created by the previous system store exactly this digest, so the
/// format must not change without a migration.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let computed = hash_password(password);

    // Compare every byte so timing does not reveal the matching prefix
    computed.len() == stored_hash.len()
        && computed
            .bytes()
            .zip(stored_hash.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}
