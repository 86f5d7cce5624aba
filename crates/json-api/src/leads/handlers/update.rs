//! Update Lead Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use leadbook_app::domain::leads::data::LeadUpdate;

use crate::{
    extensions::*,
    leads::{errors::into_status_error, get::LeadResponse},
    state::State,
};

/// Update Lead Request
///
/// Absent fields keep their current value. An empty `company`, `source` or
/// `notes` clears it.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub(crate) struct UpdateLeadRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub source: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

impl From<UpdateLeadRequest> for LeadUpdate {
    fn from(request: UpdateLeadRequest) -> Self {
        LeadUpdate {
            full_name: request.full_name,
            email: request.email,
            phone: request.phone,
            company: request.company,
            source: request.source,
            status: request.status,
            notes: request.notes,
        }
    }
}

/// Update Lead Handler
#[endpoint(
    tags("leads"),
    summary = "Update Lead",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Lead updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Lead belongs to someone else"),
        (status_code = StatusCode::NOT_FOUND, description = "Lead not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "leads.update",
    skip(lead, json, depot),
    fields(
        user_uuid = tracing::field::Empty,
        lead_uuid = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    lead: PathParam<Uuid>,
    json: JsonBody<UpdateLeadRequest>,
    depot: &mut Depot,
) -> Result<Json<LeadResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;
    let lead = lead.into_inner();

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(identity.user));
    span.record("lead_uuid", tracing::field::display(lead));

    let lead = state
        .app
        .leads
        .update_lead(identity, lead.into(), json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(lead.into()))
}
