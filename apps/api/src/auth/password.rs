use anyhow::{anyhow, Result};
use argon2::password_hash::{
    rand_core::OsRng, Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier,
    SaltString,
};
use argon2::Argon2;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Well-formed argon2id hash with the default cost parameters that no
/// password matches. Verified against when the account does not exist so
/// both sign-in failures cost the same.
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$cG9ydGZvbGlvLWR1bW15IQ$XScrwgH3QnIyNNI116ASMau4yQSWblNNa4Yup2jKSiU";

/// Hashes a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| anyhow!("failed to hash password: {err}"))?;
    Ok(hash.to_string())
}

/// `Ok(false)` on a wrong password; `Err` only when the stored hash is unusable.
pub fn verify_password(expected_hash: &str, candidate: &str) -> Result<bool> {
    let parsed =
        PasswordHash::new(expected_hash).map_err(|err| anyhow!("invalid stored hash: {err}"))?;
    match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(PasswordHashError::Password) => Ok(false),
        Err(err) => Err(anyhow!("failed to verify password: {err}")),
    }
}

/// Verifies against the stored hash, or burns an equal amount of work and
/// returns `false` when there is none.
pub fn verify_password_or_dummy(expected_hash: Option<&str>, candidate: &str) -> Result<bool> {
    match expected_hash {
        Some(hash) => verify_password(hash, candidate),
        None => verify_password(DUMMY_HASH, candidate).map(|_| false),
    }
}
