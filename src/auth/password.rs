//! One-way password hashing.

use anyhow::{Context, Result};

/// Hash a raw password with a per-password random salt (fixed cost).
///
/// # Errors
/// Returns error if the hashing backend fails.
pub fn hash_password(raw: &str) -> Result<String> {
    bcrypt::hash(raw, bcrypt::DEFAULT_COST).context("Failed to hash password")
}

/// Verify a raw password against a stored hash.
///
/// Malformed hashes verify as false rather than erroring; a login attempt
/// against a corrupt record must not turn into a server fault.
#[must_use]
pub fn verify_password(hash: &str, raw: &str) -> bool {
    bcrypt::verify(raw, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_never_equals_plaintext() {
        let hash = hash_password("secret").expect("hashing succeeds");
        assert_ne!(hash, "secret");
        assert!(hash.starts_with("$2"));
    }

    #[test]
    fn verify_accepts_matching_password_only() {
        let hash = hash_password("secret").expect("hashing succeeds");
        assert!(verify_password(&hash, "secret"));
        assert!(!verify_password(&hash, "wrong"));
    }

    #[test]
    fn verify_rejects_malformed_hash() {
        assert!(!verify_password("not-a-hash", "secret"));
    }

    #[test]
    fn same_password_hashes_differently() {
        let first = hash_password("secret").expect("hashing succeeds");
        let second = hash_password("secret").expect("hashing succeeds");
        assert_ne!(first, second);
    }
}
