//! Database Config

use clap::Args;

/// Database settings. The pool is opened once at start-up and closed on shutdown.
#[derive(Debug, Args)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,
}
