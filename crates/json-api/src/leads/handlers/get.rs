//! Get Lead Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use leadbook_app::domain::leads::records::{LeadOwner, LeadRecord};

use crate::{extensions::*, leads::errors::into_status_error, state::State};

/// Lead creator
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LeadOwnerResponse {
    /// The user who created the lead
    pub uuid: Uuid,

    /// Their display name
    pub full_name: String,
}

impl From<LeadOwner> for LeadOwnerResponse {
    fn from(owner: LeadOwner) -> Self {
        Self {
            uuid: owner.uuid.into(),
            full_name: owner.full_name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LeadResponse {
    /// The unique identifier of the lead
    pub uuid: Uuid,

    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub source: Option<String>,

    /// One of `New`, `Contacted`, `In Progress`, `Won`, `Lost`
    pub status: String,

    pub notes: Option<String>,

    /// Who created the lead. Never changes.
    pub created_by: LeadOwnerResponse,

    /// The date and time the lead was created
    pub created_at: String,

    /// The date and time the lead was last updated
    pub updated_at: String,
}

impl From<LeadRecord> for LeadResponse {
    fn from(lead: LeadRecord) -> Self {
        LeadResponse {
            uuid: lead.uuid.into(),
            full_name: lead.full_name,
            email: lead.email,
            phone: lead.phone,
            company: lead.company,
            source: lead.source,
            status: lead.status.to_string(),
            notes: lead.notes,
            created_by: lead.created_by.into(),
            created_at: lead.created_at.to_string(),
            updated_at: lead.updated_at.to_string(),
        }
    }
}

/// Get Lead Handler
///
/// Returns a lead the caller created, or any lead for admins.
#[endpoint(
    tags("leads"),
    summary = "Get Lead",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Lead found"),
        (status_code = StatusCode::FORBIDDEN, description = "Lead belongs to someone else"),
        (status_code = StatusCode::NOT_FOUND, description = "Lead not found"),
    ),
)]
pub(crate) async fn handler(
    lead: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<LeadResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;

    let lead = state
        .app
        .leads
        .get_lead(identity, lead.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(lead.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use leadbook_app::domain::leads::{LeadsServiceError, MockLeadsService, records::LeadUuid};

    use crate::test_helpers::{TEST_SALESPERSON, leads_service_as, make_lead};

    use super::*;

    fn make_service(leads: MockLeadsService) -> Service {
        leads_service_as(
            TEST_SALESPERSON,
            leads,
            Router::with_path("leads/{lead}").get(handler),
        )
    }

    #[tokio::test]
    async fn test_get_lead_returns_lead() -> TestResult {
        let uuid = LeadUuid::new();
        let lead = make_lead(uuid, TEST_SALESPERSON);

        let mut leads = MockLeadsService::new();

        leads
            .expect_get_lead()
            .once()
            .withf(move |identity, u| *identity == TEST_SALESPERSON && *u == uuid)
            .return_once(move |_, _| Ok(lead));

        let mut res = TestClient::get(format!("http://example.com/leads/{uuid}"))
            .send(&make_service(leads))
            .await;

        let body: LeadResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.uuid, uuid.into_uuid());
        assert_eq!(body.status, "New");
        assert_eq!(body.created_by.uuid, TEST_SALESPERSON.user.into_uuid());
        assert_eq!(body.created_by.full_name, "Sam Seller");

        Ok(())
    }

    #[tokio::test]
    async fn test_get_someone_elses_lead_returns_403() {
        let mut leads = MockLeadsService::new();

        leads
            .expect_get_lead()
            .once()
            .return_once(|_, _| Err(LeadsServiceError::Forbidden));

        let res = TestClient::get(format!("http://example.com/leads/{}", LeadUuid::new()))
            .send(&make_service(leads))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));
    }

    #[tokio::test]
    async fn test_get_missing_lead_returns_404() {
        let mut leads = MockLeadsService::new();

        leads
            .expect_get_lead()
            .once()
            .return_once(|_, _| Err(LeadsServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/leads/{}", LeadUuid::new()))
            .send(&make_service(leads))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_get_lead_invalid_uuid_returns_400() {
        let res = TestClient::get("http://example.com/leads/123")
            .send(&make_service(MockLeadsService::new()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }
}
