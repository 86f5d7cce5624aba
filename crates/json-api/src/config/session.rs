//! Session Config

use clap::Args;
use jiff::SignedDuration;
use leadbook_app::auth::{SessionError, SessionSecret};

/// Session token settings.
#[derive(Args)]
pub struct SessionConfig {
    /// HMAC secret used to sign session tokens (at least 32 bytes)
    #[arg(long, env = "SESSION_SECRET", hide_env_values = true)]
    pub session_secret: String,

    /// Session lifetime in seconds
    #[arg(long, env = "SESSION_TTL_SECONDS", default_value_t = 86_400_u32)]
    pub session_ttl_seconds: u32,
}

impl SessionConfig {
    /// Signing secret for session tokens.
    pub(crate) fn secret(&self) -> Result<SessionSecret, SessionError> {
        SessionSecret::new(self.session_secret.as_bytes())
    }

    /// How long an issued session stays valid.
    pub(crate) fn lifetime(&self) -> SignedDuration {
        SignedDuration::from_secs(i64::from(self.session_ttl_seconds))
    }
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("session_secret", &"**redacted**")
            .field("session_ttl_seconds", &self.session_ttl_seconds)
            .finish()
    }
}
