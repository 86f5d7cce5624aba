//! Auth service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{debug, info};

use crate::{
    auth::{
        AuthServiceError, IdentityContext, Unauthenticated,
        password::{verify_absent_account, verify_password},
        session::{IssuedSession, SessionSigner},
    },
    database::Db,
    domain::users::repository::PgUsersRepository,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    db: Db,
    users: PgUsersRepository,
    sessions: SessionSigner,
}

impl PgAuthService {
    #[must_use]
    pub fn new(db: Db, sessions: SessionSigner) -> Self {
        Self {
            db,
            users: PgUsersRepository::new(),
            sessions,
        }
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    fn resolve_identity(&self, token: &str) -> Result<IdentityContext, Unauthenticated> {
        self.sessions.verify(token).map_err(|error| {
            debug!(%error, "session token rejected");

            Unauthenticated
        })
    }

    async fn login(&self, email: &str, password: &str) -> Result<IssuedSession, AuthServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let credentials = self
            .users
            .find_credentials_by_email(&mut tx, email.trim())
            .await?;

        tx.commit().await?;

        let Some(credentials) = credentials else {
            verify_absent_account(password);

            return Err(AuthServiceError::InvalidCredentials);
        };

        if !verify_password(password, &credentials.password_hash)? {
            return Err(AuthServiceError::InvalidCredentials);
        }

        let (token, expires_at) = self.sessions.issue(&credentials.user, Timestamp::now())?;

        info!(user = %credentials.user.uuid, role = %credentials.user.role, "session issued");

        Ok(IssuedSession {
            token,
            expires_at,
            user: credentials.user,
        })
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Derive the caller from a session token. Never touches storage.
    fn resolve_identity(&self, token: &str) -> Result<IdentityContext, Unauthenticated>;

    /// Exchange an email and password for a signed session.
    async fn login(&self, email: &str, password: &str) -> Result<IssuedSession, AuthServiceError>;
}
