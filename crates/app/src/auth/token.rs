//! Signed access tokens.
//!
//! Tokens are HS256 JWTs carrying the user UUID as the subject plus issue and
//! expiry times in whole seconds. Verification is performed against a
//! caller-supplied clock so expiry behaviour is testable.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::{Error as JwtError, ErrorKind},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroize;

use crate::domain::users::records::UserUuid;

/// Default access token lifetime.
pub const DEFAULT_TOKEN_TTL: SignedDuration = SignedDuration::from_hours(8);

/// Shortest signing secret accepted, in bytes.
pub const MIN_SIGNING_SECRET_LEN: usize = 32;

/// Reasons a token cannot be issued or accepted.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("failed to sign token")]
    Signing(#[source] JwtError),

    #[error("token lifetime is out of range")]
    OutOfRange(#[source] jiff::Error),
}

/// Rejected signing secret.
#[derive(Debug, Error)]
pub enum SigningSecretError {
    #[error("signing secret must be at least {MIN_SIGNING_SECRET_LEN} bytes")]
    TooShort,
}

/// Process-wide token signing secret. Wiped from memory on drop.
#[derive(Clone)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    /// Wrap raw secret bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SigningSecretError::TooShort`] for secrets under
    /// [`MIN_SIGNING_SECRET_LEN`] bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, SigningSecretError> {
        let mut bytes = bytes.into();

        if bytes.len() < MIN_SIGNING_SECRET_LEN {
            bytes.zeroize();

            return Err(SigningSecretError::TooShort);
        }

        Ok(Self(bytes))
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Debug for SigningSecret {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("SigningSecret(<redacted>)")
    }
}

impl Drop for SigningSecret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    iat: i64,
    exp: i64,
}

/// A freshly signed token and the instant it stops being accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Compact JWT.
    pub token: String,
    pub expires_at: Timestamp,
}

/// Issues and verifies access tokens with a single signing secret.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    secret: SigningSecret,
    ttl: SignedDuration,
}

impl TokenIssuer {
    /// Issuer signing with `secret` and handing out tokens that live for `ttl`.
    #[must_use]
    pub fn new(secret: SigningSecret, ttl: SignedDuration) -> Self {
        Self { secret, ttl }
    }

    /// Configured token lifetime.
    #[must_use]
    pub fn ttl(&self) -> SignedDuration {
        self.ttl
    }

    /// Sign a token for `user`, valid from `now` for the configured lifetime.
    ///
    /// Issue time is truncated to whole seconds.
    ///
    /// # Errors
    ///
    /// Returns an error if the expiry cannot be represented or signing fails.
    pub fn issue(&self, user: UserUuid, now: Timestamp) -> Result<IssuedToken, TokenError> {
        let issued_at = now.as_second();
        let expires_at = issued_at.saturating_add(self.ttl.as_secs());

        let claims = Claims {
            sub: user.into_uuid(),
            iat: issued_at,
            exp: expires_at,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(TokenError::Signing)?;

        Ok(IssuedToken {
            token,
            expires_at: Timestamp::from_second(expires_at).map_err(TokenError::OutOfRange)?,
        })
    }

    /// Check a token's signature and expiry, returning the user it was issued for.
    ///
    /// A token is rejected from its expiry second onwards.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidSignature`] when the token was not signed
    /// with this issuer's secret, [`TokenError::Expired`] once `now` reaches the
    /// expiry, and [`TokenError::Malformed`] for anything that does not decode.
    pub fn verify(&self, token: &str, now: Timestamp) -> Result<UserUuid, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);

        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(classify)?;

        if now.as_second() >= data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(UserUuid::from_uuid(data.claims.sub))
    }
}

fn classify(error: JwtError) -> TokenError {
    match error.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed,
    }
}
