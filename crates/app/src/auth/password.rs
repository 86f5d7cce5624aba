//! Argon2 password hashing.

use std::sync::OnceLock;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{Error, SaltString},
};
use rand::{RngCore, rngs::OsRng};

const SALT_BYTES: usize = 16;

/// Stand-in hash for accounts that do not exist. Built on first use.
static ABSENT_ACCOUNT_HASH: OnceLock<Option<String>> = OnceLock::new();

/// Hash `password` into a PHC-format Argon2id string.
///
/// # Errors
///
/// Returns an error if the salt cannot be encoded or hashing fails.
pub fn hash_password(password: &str) -> Result<String, Error> {
    let mut salt = [0_u8; SALT_BYTES];

    OsRng.fill_bytes(&mut salt);

    let salt = SaltString::encode_b64(&salt)?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

/// Check `password` against a stored PHC-format hash.
///
/// Returns `Ok(false)` on mismatch.
///
/// # Errors
///
/// Returns an error when the stored hash is malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, Error> {
    let parsed = PasswordHash::new(hash)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(Error::Password) => Ok(false),
        Err(error) => Err(error),
    }
}

/// Run a full Argon2 verification for an account that does not exist, so an
/// unknown email costs as much as a wrong password. Always `false`.
pub fn verify_absent_account(password: &str) -> bool {
    let hash = ABSENT_ACCOUNT_HASH.get_or_init(|| hash_password("").ok());

    if let Some(hash) = hash {
        let _ = verify_password(password, hash);
    }

    false
}
