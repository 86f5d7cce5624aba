//! Lead Errors

use salvo::http::StatusError;
use tracing::error;

use leadbook_app::domain::leads::LeadsServiceError;

use crate::observability::{LeadRejection, record_lead_rejection};

pub(crate) fn into_status_error(error: LeadsServiceError) -> StatusError {
    match error {
        LeadsServiceError::Forbidden => {
            record_lead_rejection(LeadRejection::Forbidden);

            StatusError::forbidden().brief("You are not permitted to access this resource")
        }
        LeadsServiceError::NotFound => {
            record_lead_rejection(LeadRejection::NotFound);

            StatusError::not_found().brief("Lead not found")
        }
        LeadsServiceError::Validation(errors) => {
            record_lead_rejection(LeadRejection::Invalid);

            StatusError::bad_request()
                .brief("Invalid lead request")
                .detail(errors.to_string())
        }
        LeadsServiceError::Sql(source) => {
            error!("lead storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use leadbook_app::domain::validation::ValidationErrors;
    use salvo::http::StatusCode;

    use crate::observability::lead_rejections;

    use super::*;

    #[test]
    fn validation_detail_names_fields() {
        let mut errors = ValidationErrors::new();

        errors.push("email", "is required");
        errors.push("status", "must be one of New, Won");

        let status = into_status_error(LeadsServiceError::Validation(errors));

        assert_eq!(status.code, StatusCode::BAD_REQUEST);
        assert_eq!(
            status.detail.as_deref(),
            Some("email: is required; status: must be one of New, Won")
        );
    }

    #[test]
    fn refusals_are_counted_by_reason() {
        let forbidden = lead_rejections(LeadRejection::Forbidden);
        let invalid = lead_rejections(LeadRejection::Invalid);

        into_status_error(LeadsServiceError::Forbidden);
        into_status_error(LeadsServiceError::Validation(ValidationErrors::single(
            "phone",
            "is required",
        )));

        assert!(lead_rejections(LeadRejection::Forbidden) > forbidden, "forbidden should count");
        assert!(lead_rejections(LeadRejection::Invalid) > invalid, "invalid should count");
    }

    #[test]
    fn access_errors_map_to_403_and_404() {
        assert_eq!(
            into_status_error(LeadsServiceError::Forbidden).code,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            into_status_error(LeadsServiceError::NotFound).code,
            StatusCode::NOT_FOUND
        );
    }
}
