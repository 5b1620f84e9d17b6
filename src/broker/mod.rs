//! Broker connection pool and health check.
//!
//! The durable queue is pgmq over Postgres. One shared connection pool
//! serves the dispatcher, the stats aggregator, and the worker.

pub mod queue;

use crate::error::Result;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Broker handle. Owns the connection pool shared across all modules.
pub struct Broker {
    pool: PgPool,
}

impl Broker {
    /// Connect to Postgres and create a connection pool.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(url)
            .await?;
        Ok(Self { pool })
    }

    /// Simple health check — run a SELECT 1.
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Get a reference to the connection pool (for the worker's listener).
    pub(crate) fn pool(&self) -> &PgPool {
        &self.pool
    }
}
