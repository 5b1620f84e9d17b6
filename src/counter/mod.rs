//! Valkey-backed counter store.
//!
//! A single shared counter incremented once per processed task, plus the
//! sizing query the stats endpoint reports. All mutation goes through
//! atomic INCR; there is no read-modify-write anywhere.

use crate::error::Result;
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;

/// Counter store handle.
///
/// Holds a [`MultiplexedConnection`], which is designed to be cloned
/// cheaply — all clones share the same underlying TCP connection.
#[derive(Clone)]
pub struct CounterStore {
    conn: MultiplexedConnection,
    counter_key: String,
}

impl CounterStore {
    /// Connect to Valkey. Fails fast if the connection cannot be
    /// established.
    pub async fn connect(url: &str, counter_key: impl Into<String>) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(Self {
            conn,
            counter_key: counter_key.into(),
        })
    }

    /// Atomically increment the processed-task counter. Returns the new
    /// value.
    pub async fn increment(&self) -> Result<i64> {
        let mut conn = self.conn.clone();
        let value: i64 = conn.incr(&self.counter_key, 1i64).await?;
        Ok(value)
    }

    /// Current counter value. The key has no existence until the first
    /// increment; an absent key reads as 0.
    pub async fn processed_count(&self) -> Result<i64> {
        let mut conn = self.conn.clone();
        let value: Option<i64> = conn.get(&self.counter_key).await?;
        Ok(value.unwrap_or(0))
    }

    /// Total number of keys currently in the store.
    pub async fn key_count(&self) -> Result<i64> {
        let mut conn = self.conn.clone();
        let count: i64 = redis::cmd("DBSIZE").query_async(&mut conn).await?;
        Ok(count)
    }
}
