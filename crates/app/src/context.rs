//! App Context

use std::sync::Arc;

use jiff::SignedDuration;
use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService, SessionError, SessionSecret, SessionSigner},
    database::{Db, HealthCheck},
    domain::leads::{LeadsService, PgLeadsService},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("invalid session configuration")]
    Session(#[from] SessionError),
}

/// Services shared by every request handler.
#[derive(Clone)]
pub struct AppContext {
    pub health: Arc<dyn HealthCheck>,
    pub leads: Arc<dyn LeadsService>,
    pub auth: Arc<dyn AuthService>,
}

impl AppContext {
    /// Wire the services onto an open database.
    ///
    /// # Errors
    ///
    /// Returns an error when the session lifetime is not positive.
    pub fn new(
        db: &Db,
        session_secret: &SessionSecret,
        session_lifetime: SignedDuration,
    ) -> Result<Self, AppInitError> {
        let sessions = SessionSigner::new(session_secret, session_lifetime)?;

        Ok(Self {
            leads: Arc::new(PgLeadsService::new(db.clone())),
            auth: Arc::new(PgAuthService::new(db.clone(), sessions)),
            health: Arc::new(db.clone()),
        })
    }
}
