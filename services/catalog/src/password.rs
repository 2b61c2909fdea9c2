//! Password hashing and verification

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use tracing::warn;

/// Hash a password with argon2 into a PHC string
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Check a candidate password against the stored value.
///
/// The stored value is first checked as an argon2 hash. When that does not
/// verify, it is compared for equality as a plaintext password from before
/// hashing was introduced.
// TODO: drop the plaintext branch once every remaining account has changed its password
pub fn verify_password(stored: &str, candidate: &str) -> bool {
    let hashed = PasswordHash::new(stored)
        .map(|parsed| {
            Argon2::default()
                .verify_password(candidate.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false);
    if hashed {
        return true;
    }

    let matched = !stored.is_empty() && stored == candidate;
    if matched {
        warn!("Password verified against a plaintext value; account still needs a hashed password");
    }
    matched
}
