//! Password hashing and verification.
//!
//! Passwords are stored as PHC-formatted Argon2id strings. The plaintext never
//! leaves this module in any other form.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::LazyLock,
};

use argon2::{
    Argon2,
    password_hash::{
        self, PasswordHash as PhcString, PasswordHasher, PasswordVerifier, SaltString,
    },
};
use rand::rngs::OsRng;
use thiserror::Error;

/// Minimum accepted password length, counted in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Hash built once so lookups for unknown users pay the same Argon2 cost.
static DUMMY_HASH: LazyLock<Option<PasswordHash>> =
    LazyLock::new(|| hash_password("gbms-unknown-user-placeholder").ok());

#[cfg(test)]
thread_local! {
    static VERIFICATIONS: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

/// Password validation and hashing failures.
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    TooShort,

    #[error("failed to hash password")]
    Hashing(#[source] password_hash::Error),
}

/// Salted one-way hash of a user password.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a hash previously read back from storage.
    #[must_use]
    pub fn from_stored(hash: String) -> Self {
        Self(hash)
    }

    /// The PHC string as stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Debug for PasswordHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Reject passwords shorter than [`MIN_PASSWORD_LENGTH`].
///
/// # Errors
///
/// Returns [`PasswordError::TooShort`] when the password is too short.
pub fn validate_password(plaintext: &str) -> Result<(), PasswordError> {
    if plaintext.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort);
    }

    Ok(())
}

/// Derive a fresh salted hash for `plaintext`.
///
/// # Errors
///
/// Returns an error if the hasher rejects its input.
pub fn hash_password(plaintext: &str) -> Result<PasswordHash, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| PasswordHash(hash.to_string()))
        .map_err(PasswordError::Hashing)
}

/// Check `plaintext` against a stored hash.
///
/// The derived output is compared in constant time. A stored value that is not
/// a valid PHC string never matches.
pub fn verify_password(hash: &PasswordHash, plaintext: &str) -> bool {
    #[cfg(test)]
    VERIFICATIONS.with(|count| count.set(count.get() + 1));

    let Ok(parsed) = PhcString::new(&hash.0) else {
        return false;
    };

    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}

/// Check `plaintext` against a stored hash when there is one.
///
/// Without a stored hash the plaintext is still run through Argon2 against a
/// placeholder, then rejected, so the caller's response time does not reveal
/// whether the account exists.
pub fn verify_password_or_dummy(hash: Option<&PasswordHash>, plaintext: &str) -> bool {
    match hash {
        Some(hash) => verify_password(hash, plaintext),
        None => {
            if let Some(dummy) = DUMMY_HASH.as_ref() {
                let _ignored = verify_password(dummy, plaintext);
            }

            false
        }
    }
}

/// Number of Argon2 verifications run on the current thread.
#[cfg(test)]
pub(crate) fn verifications_on_this_thread() -> usize {
    VERIFICATIONS.with(std::cell::Cell::get)
}
