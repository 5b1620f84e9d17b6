//! Error types for conveyor-rs.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("broker unavailable: {0}")]
    Broker(#[from] sqlx::Error),

    #[error("counter store unavailable: {0}")]
    CounterStore(#[from] redis::RedisError),

    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("handler failed: {0}")]
    Handler(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
