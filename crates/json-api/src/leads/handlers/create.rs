//! Create Lead Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use leadbook_app::domain::leads::{data::NewLead, records::LeadUuid};

use crate::{
    extensions::*,
    leads::{errors::into_status_error, get::LeadResponse},
    state::State,
};

/// Create Lead Request
///
/// The creator is always the caller; any `created_by` in the body is ignored.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub(crate) struct CreateLeadRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub source: Option<String>,

    /// Defaults to `New`
    pub status: Option<String>,

    pub notes: Option<String>,
}

impl CreateLeadRequest {
    fn into_new_lead(self, uuid: LeadUuid) -> NewLead {
        NewLead {
            uuid,
            full_name: self.full_name,
            email: self.email,
            phone: self.phone,
            company: self.company,
            source: self.source,
            status: self.status,
            notes: self.notes,
        }
    }
}

/// Create Lead Handler
#[endpoint(
    tags("leads"),
    summary = "Create Lead",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Lead created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateLeadRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<LeadResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;

    let lead = state
        .app
        .leads
        .create_lead(identity, json.into_inner().into_new_lead(LeadUuid::new()))
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/leads/{}", lead.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(lead.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use leadbook_app::domain::{
        leads::{LeadsServiceError, MockLeadsService},
        validation::ValidationErrors,
    };

    use crate::test_helpers::{TEST_ADMIN, TEST_SALESPERSON, leads_service_as, make_lead};

    use super::*;

    fn make_service(leads: MockLeadsService) -> Service {
        leads_service_as(
            TEST_SALESPERSON,
            leads,
            Router::with_path("leads").post(handler),
        )
    }

    #[tokio::test]
    async fn test_create_lead_success() -> TestResult {
        let mut leads = MockLeadsService::new();

        leads
            .expect_create_lead()
            .once()
            .withf(|identity, lead| {
                *identity == TEST_SALESPERSON
                    && lead.full_name == "Jane Doe"
                    && lead.email == "jane@example.com"
                    && lead.status.as_deref() == Some("New")
                    && lead.company.is_none()
            })
            .return_once(|_, lead| Ok(make_lead(lead.uuid, TEST_SALESPERSON)));

        let mut res = TestClient::post("http://example.com/leads")
            .json(&json!({
                "full_name": "Jane Doe",
                "email": "jane@example.com",
                "phone": "555-0100",
                "status": "New",
            }))
            .send(&make_service(leads))
            .await;

        let body: LeadResponse = res.take_json().await?;
        let location = res.headers().get(LOCATION).and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/leads/{}", body.uuid).as_str()));
        assert_eq!(body.created_by.uuid, TEST_SALESPERSON.user.into_uuid());

        Ok(())
    }

    #[tokio::test]
    async fn test_create_lead_ignores_supplied_owner() -> TestResult {
        let mut leads = MockLeadsService::new();

        leads
            .expect_create_lead()
            .once()
            .withf(|identity, _| *identity == TEST_SALESPERSON)
            .return_once(|_, lead| Ok(make_lead(lead.uuid, TEST_SALESPERSON)));

        let mut res = TestClient::post("http://example.com/leads")
            .json(&json!({
                "full_name": "Jane Doe",
                "email": "jane@example.com",
                "phone": "555-0100",
                "created_by": TEST_ADMIN.user.to_string(),
            }))
            .send(&make_service(leads))
            .await;

        let body: LeadResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(body.created_by.uuid, TEST_SALESPERSON.user.into_uuid());

        Ok(())
    }

    #[tokio::test]
    async fn test_create_lead_validation_error_returns_400() {
        let mut leads = MockLeadsService::new();

        leads
            .expect_create_lead()
            .once()
            .withf(|_, lead| lead.full_name.is_empty())
            .return_once(|_, _| {
                Err(LeadsServiceError::Validation(ValidationErrors::single(
                    "full_name",
                    "is required",
                )))
            });

        let res = TestClient::post("http://example.com/leads")
            .json(&json!({ "email": "jane@example.com", "phone": "555-0100" }))
            .send(&make_service(leads))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn test_create_lead_malformed_json_returns_400() {
        let mut leads = MockLeadsService::new();

        leads.expect_create_lead().never();

        let res = TestClient::post("http://example.com/leads")
            .raw_json("{not json")
            .send(&make_service(leads))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }
}
