//! Lead Stats Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use leadbook_app::domain::leads::records::LeadStats;

use crate::{extensions::*, leads::errors::into_status_error, state::State};

/// Lead counts across every salesperson
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct StatsResponse {
    pub total: u64,
    pub new: u64,
    pub contacted: u64,
    pub in_progress: u64,
    pub won: u64,
    pub lost: u64,
}

impl From<LeadStats> for StatsResponse {
    fn from(stats: LeadStats) -> Self {
        Self {
            total: stats.total,
            new: stats.new,
            contacted: stats.contacted,
            in_progress: stats.in_progress,
            won: stats.won,
            lost: stats.lost,
        }
    }
}

/// Lead Stats Handler
///
/// Admin only.
#[endpoint(
    tags("dashboard"),
    summary = "Lead Stats",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Lead counts by status"),
        (status_code = StatusCode::FORBIDDEN, description = "Caller is not an admin"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<StatsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;

    let stats = state
        .app
        .leads
        .lead_stats(identity)
        .await
        .map_err(into_status_error)?;

    Ok(Json(stats.into()))
}
