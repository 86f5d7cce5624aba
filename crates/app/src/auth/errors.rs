//! Auth service errors.

use argon2::password_hash::Error as PasswordHashError;
use sqlx::Error;
use thiserror::Error;

use crate::auth::session::SessionError;

/// The request carried no usable session credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("authentication required")]
pub struct Unauthenticated;

#[derive(Debug, Error)]
pub enum AuthServiceError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("storage error")]
    Sql(#[source] Error),

    #[error("stored password hash is unreadable")]
    Password(#[source] PasswordHashError),

    #[error("session error")]
    Session(#[from] SessionError),
}

impl From<Error> for AuthServiceError {
    fn from(error: Error) -> Self {
        Self::Sql(error)
    }
}

impl From<PasswordHashError> for AuthServiceError {
    fn from(error: PasswordHashError) -> Self {
        Self::Password(error)
    }
}
