//! Database connection management

use async_trait::async_trait;
use mockall::automock;
use sqlx::{PgPool, Postgres, Transaction, migrate::MigrateError};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("database unavailable")]
pub struct StoreUnavailable;

/// Whether the store can serve requests right now.
#[automock]
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn check(&self) -> Result<(), StoreUnavailable>;
}

/// Shared PostgreSQL handle.
///
/// Opened once at process start with [`Db::connect`], handed to every service
/// that needs it, and closed with [`Db::close`] during shutdown. Cloning is
/// cheap and shares the underlying pool.
#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to `PostgreSQL`.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPool::connect(database_url).await?;

        info!("database connection pool established");

        Ok(Self::new(pool))
    }

    /// Round-trip a trivial query.
    ///
    /// # Errors
    ///
    /// Returns an error when the database cannot be reached.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;

        Ok(())
    }

    /// Begin a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error when a connection cannot be acquired or the transaction
    /// cannot be started.
    pub async fn begin_transaction(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    /// Begin a `REPEATABLE READ` transaction, so every statement in it reads
    /// the same snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error when the transaction cannot be started.
    pub async fn begin_snapshot(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }

    /// Apply pending migrations from the workspace `migrations` directory.
    ///
    /// # Errors
    ///
    /// Returns an error if a migration fails to apply.
    pub async fn migrate(&self) -> Result<(), MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    /// Close every pooled connection. Calling this more than once is harmless.
    pub async fn close(&self) {
        if self.pool.is_closed() {
            return;
        }

        self.pool.close().await;

        info!("database connection pool closed");
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl HealthCheck for Db {
    async fn check(&self) -> Result<(), StoreUnavailable> {
        self.ping().await.map_err(|source| {
            warn!("database ping failed: {source}");

            StoreUnavailable
        })
    }
}
