//! Password codec and credential material generation.
//!
//! Passwords are stored twice: a SHA-256 hex digest of the plaintext in the
//! `password` column, and an Argon2id hash computed over that digest in
//! `password_hash`. The slow hash is the only thing ever verified against;
//! the digest normalizes the input so the Argon2 work factor applies to a
//! fixed-size value.

use anyhow::Result;
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use rand::Rng;
use rand::distr::Alphanumeric;

use crate::config::SecurityConfig;

pub const AUTH_KEY_LEN: usize = 32;
pub const ONE_TIME_CODE_LEN: usize = 8;

/// Both stored representations of one plaintext password.
#[derive(Debug, Clone)]
pub struct EncryptedPassword {
    pub digest: String,
    pub hash: String,
}

/// Hex SHA-256 digest of the plaintext.
#[must_use]
pub fn password_digest(plain: &str) -> String {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(plain.as_bytes());
    let out = hasher.finalize();

    out.iter().fold(String::with_capacity(64), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}

fn build_argon2(config: &SecurityConfig) -> Result<Argon2<'static>> {
    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None,
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Encrypt a plaintext password into its two stored forms.
///
/// Argon2 is CPU-heavy; callers on the async runtime should wrap this in
/// `spawn_blocking`.
pub fn encrypt_password(plain: &str, config: &SecurityConfig) -> Result<EncryptedPassword> {
    let digest = password_digest(plain);
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = build_argon2(config)?;
    let hash = argon2
        .hash_password(digest.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(EncryptedPassword {
        digest,
        hash: hash.to_string(),
    })
}

/// Check a plaintext password against a stored `password_hash`.
///
/// A malformed stored hash counts as a mismatch, not an error.
#[must_use]
pub fn validate_password(plain: &str, stored_hash: &str) -> bool {
    let digest = password_digest(plain);

    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(digest.as_bytes(), &parsed)
        .is_ok()
}

/// Random 32-char alphanumeric auth key.
#[must_use]
pub fn generate_auth_key() -> String {
    let rng = rand::rng();
    rng.sample_iter(Alphanumeric)
        .take(AUTH_KEY_LEN)
        .map(char::from)
        .collect()
}

/// Random 8-char one-time code, uppercase letters and digits.
#[must_use]
pub fn generate_one_time_code() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

    let mut rng = rand::rng();
    (0..ONE_TIME_CODE_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}
