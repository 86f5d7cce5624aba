//! Users Data

use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::domain::{
    users::records::{Role, UserUuid},
    validation::ValidationErrors,
};

/// Shortest password accepted when creating a user.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// New User Data
#[derive(Clone, PartialEq)]
pub struct NewUser {
    pub uuid: UserUuid,
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl NewUser {
    /// Trim and check the payload.
    ///
    /// # Errors
    ///
    /// Returns every rejected field when the payload is incomplete.
    pub fn validate(self) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let full_name = errors.require("full_name", &self.full_name);
        let email = errors.require("email", &self.email);

        if !email.is_empty() && !email.contains('@') {
            errors.push("email", "must be an email address");
        }

        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.push(
                "password",
                format!("must be at least {MIN_PASSWORD_LENGTH} characters"),
            );
        }

        errors.into_result(Self {
            full_name,
            email,
            ..self
        })
    }
}

impl Debug for NewUser {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("NewUser")
            .field("uuid", &self.uuid)
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("password", &"**redacted**")
            .field("role", &self.role)
            .finish()
    }
}

/// Validated user row ready for insertion.
#[derive(Debug, Clone)]
pub(crate) struct UserInsert {
    pub uuid: UserUuid,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(password: &str) -> NewUser {
        NewUser {
            uuid: UserUuid::new(),
            full_name: " Admin User ".to_owned(),
            email: "admin@example.com".to_owned(),
            password: password.to_owned(),
            role: Role::Admin,
        }
    }

    #[test]
    fn validate_trims_names() -> Result<(), ValidationErrors> {
        let user = new_user("password123").validate()?;

        assert_eq!(user.full_name, "Admin User");

        Ok(())
    }

    #[test]
    fn validate_rejects_short_password_and_bad_email() {
        let mut user = new_user("short");
        user.email = "not-an-email".to_owned();

        let errors = user.validate().err().unwrap_or_default();

        assert!(errors.contains("password"), "short password must be flagged");
        assert!(errors.contains("email"), "malformed email must be flagged");
    }

    #[test]
    fn debug_output_hides_password() {
        let rendered = format!("{:?}", new_user("hunter2hunter2"));

        assert!(!rendered.contains("hunter2"), "password leaked: {rendered}");
    }
}
