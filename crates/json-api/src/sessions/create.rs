//! Create Session Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use leadbook_app::auth::{AuthServiceError, IssuedSession};

use crate::{
    extensions::*,
    observability::{LoginOutcome, record_login},
    state::State,
};

/// Login credentials
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub(crate) struct CreateSessionRequest {
    pub email: String,
    pub password: String,
}

/// The signed-in user
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SessionUserResponse {
    pub uuid: Uuid,
    pub full_name: String,
    pub email: String,

    /// `admin` or `salesperson`
    pub role: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SessionResponse {
    /// Send as `Authorization: Bearer <token>`
    pub token: String,

    pub token_type: String,

    /// When the token stops being accepted
    pub expires_at: String,

    pub user: SessionUserResponse,
}

impl From<IssuedSession> for SessionResponse {
    fn from(session: IssuedSession) -> Self {
        Self {
            token: session.token,
            token_type: "Bearer".to_owned(),
            expires_at: session.expires_at.to_string(),
            user: SessionUserResponse {
                uuid: session.user.uuid.into(),
                full_name: session.user.full_name,
                email: session.user.email,
                role: session.user.role.to_string(),
            },
        }
    }
}

/// Create Session Handler
///
/// Exchange an email and password for a bearer token.
#[endpoint(
    tags("sessions"),
    summary = "Log In",
    responses(
        (status_code = StatusCode::CREATED, description = "Session created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid email or password"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateSessionRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<SessionResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let credentials = json.into_inner();

    let session = state
        .app
        .auth
        .login(&credentials.email, &credentials.password)
        .await
        .map_err(into_status_error)?;

    record_login(LoginOutcome::Success);

    res.status_code(StatusCode::CREATED);

    Ok(Json(session.into()))
}

fn into_status_error(error: AuthServiceError) -> StatusError {
    match error {
        AuthServiceError::InvalidCredentials => {
            record_login(LoginOutcome::InvalidCredentials);

            StatusError::unauthorized().brief("Invalid email or password")
        }
        error => {
            record_login(LoginOutcome::Failed);
            error!("login failed: {error}");

            StatusError::internal_server_error()
        }
    }
}
