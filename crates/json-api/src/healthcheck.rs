//! Healthcheck Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct HealthResponse {
    /// `ok` when every dependency answered, otherwise `degraded`
    pub status: String,

    /// `ok` or `unavailable`
    pub database: String,
}

/// Healthcheck Handler
///
/// Answers 503 while the database is unreachable, so load balancers stop
/// routing here.
#[endpoint(
    tags("health"),
    summary = "Health check",
    responses(
        (status_code = StatusCode::OK, description = "Ready"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Database unreachable"),
    ),
)]
pub(crate) async fn handler(
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<HealthResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let response = if state.app.health.check().await.is_ok() {
        HealthResponse {
            status: "ok".to_owned(),
            database: "ok".to_owned(),
        }
    } else {
        res.status_code(StatusCode::SERVICE_UNAVAILABLE);

        HealthResponse {
            status: "degraded".to_owned(),
            database: "unavailable".to_owned(),
        }
    };

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use leadbook_app::database::{MockHealthCheck, StoreUnavailable};

    use crate::test_helpers::health_service;

    use super::*;

    fn make_service(health: MockHealthCheck) -> Service {
        health_service(health, Router::with_path("healthcheck").get(handler))
    }

    #[tokio::test]
    async fn test_healthy_database_reports_ok() -> TestResult {
        let mut health = MockHealthCheck::new();

        health.expect_check().once().return_once(|| Ok(()));

        let mut res = TestClient::get("http://example.com/healthcheck")
            .send(&make_service(health))
            .await;

        let body: HealthResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.status, "ok");
        assert_eq!(body.database, "ok");

        Ok(())
    }

    #[tokio::test]
    async fn test_unreachable_database_reports_503() -> TestResult {
        let mut health = MockHealthCheck::new();

        health
            .expect_check()
            .once()
            .return_once(|| Err(StoreUnavailable));

        let mut res = TestClient::get("http://example.com/healthcheck")
            .send(&make_service(health))
            .await;

        let body: HealthResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::SERVICE_UNAVAILABLE));
        assert_eq!(body.status, "degraded");
        assert_eq!(body.database, "unavailable");

        Ok(())
    }
}
