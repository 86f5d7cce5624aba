//! Users service errors.

use argon2::password_hash::Error as PasswordHashError;
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum UsersServiceError {
    #[error("a user with this email already exists")]
    AlreadyExists,

    #[error("invalid user: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("password hashing failed")]
    Password(#[source] PasswordHashError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for UsersServiceError {
    fn from(error: Error) -> Self {
        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::CheckViolation) => {
                Self::Validation(ValidationErrors::single("role", "is not a known role"))
            }
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

impl From<PasswordHashError> for UsersServiceError {
    fn from(error: PasswordHashError) -> Self {
        Self::Password(error)
    }
}
