//! Delete Lead Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, leads::errors::into_status_error, state::State};

/// Delete Lead Handler
#[endpoint(
    tags("leads"),
    summary = "Delete Lead",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Lead deleted"),
        (status_code = StatusCode::FORBIDDEN, description = "Lead belongs to someone else"),
        (status_code = StatusCode::NOT_FOUND, description = "Lead not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    lead: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;

    state
        .app
        .leads
        .delete_lead(identity, lead.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::OK)
}
