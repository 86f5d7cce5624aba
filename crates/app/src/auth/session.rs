//! Signed session tokens.

use std::fmt;

use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroize;

use crate::{
    auth::IdentityContext,
    domain::users::records::{Role, UserRecord, UserUuid},
};

/// Shortest signing secret accepted, in bytes.
pub const MIN_SESSION_SECRET_BYTES: usize = 32;

/// Seconds of clock skew tolerated when checking expiry.
const EXPIRY_LEEWAY_SECONDS: u64 = 5;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session secret must be at least {MIN_SESSION_SECRET_BYTES} bytes")]
    SecretTooShort,

    #[error("session lifetime must be positive")]
    InvalidLifetime,

    #[error("session expiry is out of range")]
    Expiry(#[source] jiff::Error),

    #[error("failed to sign session token")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("session token rejected")]
    Decode(#[source] jsonwebtoken::errors::Error),
}

/// HMAC key material for session tokens.
#[derive(Clone)]
pub struct SessionSecret {
    bytes: Vec<u8>,
}

impl SessionSecret {
    /// Wrap raw key material.
    ///
    /// # Errors
    ///
    /// Returns an error when the secret is shorter than
    /// [`MIN_SESSION_SECRET_BYTES`].
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, SessionError> {
        let mut bytes = secret.into();

        if bytes.len() < MIN_SESSION_SECRET_BYTES {
            bytes.zeroize();

            return Err(SessionError::SecretTooShort);
        }

        Ok(Self { bytes })
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for SessionSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionSecret(**redacted**)")
    }
}

impl Drop for SessionSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: Uuid,
    role: Role,
    name: String,
    iat: i64,
    exp: i64,
}

/// A freshly signed session and the user it was issued to.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: Timestamp,
    pub user: UserRecord,
}

/// Issues and verifies HS256 session tokens.
#[derive(Clone)]
pub struct SessionSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    lifetime: SignedDuration,
}

impl SessionSigner {
    /// Build a signer whose tokens live for `lifetime`.
    ///
    /// # Errors
    ///
    /// Returns an error when `lifetime` is zero or negative.
    pub fn new(secret: &SessionSecret, lifetime: SignedDuration) -> Result<Self, SessionError> {
        if !lifetime.is_positive() {
            return Err(SessionError::InvalidLifetime);
        }

        let mut validation = Validation::new(Algorithm::HS256);

        validation.leeway = EXPIRY_LEEWAY_SECONDS;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lifetime,
        })
    }

    /// Sign a session for `user`, valid from `issued_at`.
    ///
    /// # Errors
    ///
    /// Returns an error when the expiry overflows or signing fails.
    pub fn issue(
        &self,
        user: &UserRecord,
        issued_at: Timestamp,
    ) -> Result<(String, Timestamp), SessionError> {
        let expires_at = issued_at
            .checked_add(self.lifetime)
            .map_err(SessionError::Expiry)?;

        let claims = SessionClaims {
            sub: user.uuid.into_uuid(),
            role: user.role,
            name: user.full_name.clone(),
            iat: issued_at.as_second(),
            exp: expires_at.as_second(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(SessionError::Encode)?;

        Ok((token, expires_at))
    }

    /// Check the signature and expiry of `token` and extract the caller.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed, tampered, foreign or expired tokens.
    pub fn verify(&self, token: &str) -> Result<IdentityContext, SessionError> {
        let claims = decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map_err(SessionError::Decode)?
            .claims;

        Ok(IdentityContext::new(UserUuid::from_uuid(claims.sub), claims.role))
    }
}

impl fmt::Debug for SessionSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionSigner")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    fn signer(secret: &[u8]) -> Result<SessionSigner, SessionError> {
        SessionSigner::new(&SessionSecret::new(secret)?, SignedDuration::from_hours(1))
    }

    fn user(role: Role) -> UserRecord {
        UserRecord {
            uuid: UserUuid::new(),
            full_name: "Sales Person".to_owned(),
            email: "sales@example.com".to_owned(),
            role,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn issued_token_resolves_to_the_same_identity() -> TestResult {
        let signer = signer(SECRET)?;
        let user = user(Role::Salesperson);

        let (token, expires_at) = signer.issue(&user, Timestamp::now())?;
        let identity = signer.verify(&token)?;

        assert_eq!(identity, IdentityContext::new(user.uuid, Role::Salesperson));
        assert!(expires_at > Timestamp::now(), "expiry should be in the future");

        Ok(())
    }

    #[test]
    fn expired_token_is_rejected() -> TestResult {
        let signer = signer(SECRET)?;
        let issued_at = Timestamp::now().checked_sub(SignedDuration::from_hours(3))?;

        let (token, _) = signer.issue(&user(Role::Admin), issued_at)?;

        assert!(signer.verify(&token).is_err(), "expired token must fail");

        Ok(())
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() -> TestResult {
        let (token, _) =
            signer(b"ffffffffffffffffffffffffffffffff")?.issue(&user(Role::Admin), Timestamp::now())?;

        assert!(signer(SECRET)?.verify(&token).is_err());

        Ok(())
    }

    #[test]
    fn tampered_payload_is_rejected() -> TestResult {
        let signer = signer(SECRET)?;
        let (token, _) = signer.issue(&user(Role::Salesperson), Timestamp::now())?;

        let mut parts: Vec<String> = token.split('.').map(str::to_owned).collect();
        if let Some(payload) = parts.get_mut(1) {
            payload.push('A');
        }

        assert!(signer.verify(&parts.join(".")).is_err());

        Ok(())
    }

    #[test]
    fn garbage_is_rejected() -> TestResult {
        assert!(signer(SECRET)?.verify("not-a-token").is_err());

        Ok(())
    }

    #[test]
    fn short_secret_is_refused() {
        assert!(matches!(
            SessionSecret::new("too-short"),
            Err(SessionError::SecretTooShort)
        ));
    }

    #[test]
    fn secret_debug_is_redacted() -> TestResult {
        let secret = SessionSecret::new(SECRET)?;

        assert_eq!(format!("{secret:?}"), "SessionSecret(**redacted**)");

        Ok(())
    }
}
