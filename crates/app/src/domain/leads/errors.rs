//! Leads service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
    postgres::PgDatabaseError,
};
use thiserror::Error;

use crate::domain::{leads::access::AccessDenied, validation::ValidationErrors};

#[derive(Debug, Error)]
pub enum LeadsServiceError {
    #[error("not permitted to access this lead")]
    Forbidden,

    #[error("lead not found")]
    NotFound,

    #[error("invalid lead: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<AccessDenied> for LeadsServiceError {
    fn from(_: AccessDenied) -> Self {
        Self::Forbidden
    }
}

impl From<Error> for LeadsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        let Some(database_error) = error.as_database_error() else {
            return Self::Sql(error);
        };

        let rejected = match database_error.kind() {
            ErrorKind::CheckViolation => check_violation(database_error.constraint()),
            ErrorKind::NotNullViolation => not_null_violation(database_error),
            ErrorKind::ForeignKeyViolation => {
                Some(("created_by", "does not reference a known user"))
            }
            _ => None,
        };

        match rejected {
            Some((field, message)) => Self::Validation(ValidationErrors::single(field, message)),
            None => Self::Sql(error),
        }
    }
}

fn check_violation(constraint: Option<&str>) -> Option<(&'static str, &'static str)> {
    match constraint? {
        "leads_full_name_check" => Some(("full_name", "is required")),
        "leads_email_check" => Some(("email", "is required")),
        "leads_phone_check" => Some(("phone", "is required")),
        "leads_status_check" => Some(("status", "is not a valid status")),
        "leads_created_by_check" => Some(("created_by", "cannot be changed")),
        _ => None,
    }
}

fn not_null_violation(error: &dyn DatabaseError) -> Option<(&'static str, &'static str)> {
    let column = error.try_downcast_ref::<PgDatabaseError>()?.column()?;

    let field = match column {
        "full_name" => "full_name",
        "email" => "email",
        "phone" => "phone",
        "status" => "status",
        "created_by" => "created_by",
        _ => return None,
    };

    Some((field, "is required"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_row_is_not_found() {
        assert!(matches!(
            LeadsServiceError::from(Error::RowNotFound),
            LeadsServiceError::NotFound
        ));
    }

    #[test]
    fn access_denied_is_forbidden() {
        assert!(matches!(
            LeadsServiceError::from(AccessDenied),
            LeadsServiceError::Forbidden
        ));
    }

    #[test]
    fn other_errors_are_storage_errors() {
        assert!(matches!(
            LeadsServiceError::from(Error::PoolTimedOut),
            LeadsServiceError::Sql(_)
        ));
    }

    #[test]
    fn known_constraints_name_their_field() {
        assert_eq!(
            check_violation(Some("leads_status_check")),
            Some(("status", "is not a valid status"))
        );
        assert_eq!(
            check_violation(Some("leads_created_by_check")).map(|(field, _)| field),
            Some("created_by")
        );
        assert_eq!(check_violation(Some("something_else")), None);
        assert_eq!(check_violation(None), None);
    }
}
