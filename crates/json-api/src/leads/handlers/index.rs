//! Lead Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use leadbook_app::domain::leads::data::{LeadFilters, LeadPage};

use crate::{
    extensions::*,
    leads::{errors::into_status_error, get::LeadResponse},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LeadsResponse {
    /// This page of leads, newest first
    pub leads: Vec<LeadResponse>,

    /// Leads matching the filters across all pages
    pub total: u64,

    pub total_pages: u64,
    pub current_page: u64,
    pub limit: u32,
}

impl From<LeadPage> for LeadsResponse {
    fn from(page: LeadPage) -> Self {
        Self {
            leads: page.leads.into_iter().map(Into::into).collect(),
            total: page.total,
            total_pages: page.total_pages,
            current_page: page.page,
            limit: page.limit,
        }
    }
}

/// Lead Index Handler
///
/// Salespeople see only the leads they created; admins see every lead.
#[endpoint(
    tags("leads"),
    summary = "List Leads",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Page of leads"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid filters"),
    ),
)]
pub(crate) async fn handler(
    page: QueryParam<i64, false>,
    limit: QueryParam<i64, false>,
    status: QueryParam<String, false>,
    query: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<LeadsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;

    let filters = LeadFilters {
        status: status.into_inner(),
        query: query.into_inner(),
        page: page.into_inner(),
        limit: limit.into_inner(),
    };

    let page = state
        .app
        .leads
        .list_leads(identity, filters)
        .await
        .map_err(into_status_error)?;

    Ok(Json(page.into()))
}
