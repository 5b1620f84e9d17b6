//! Typed configuration from environment variables.
//!
//! Loads once at startup, fails fast if required vars are missing.
//! Connection URLs wrapped in secrecy::SecretString to prevent log leaks.

pub mod secrets;

use crate::error::{Error, Result};
use secrecy::SecretString;

#[derive(Debug)]
pub struct Config {
    /// Postgres connection URL for the pgmq-backed broker.
    pub broker_url: SecretString,
    /// Valkey connection URL for the counter store.
    pub valkey_url: SecretString,
    /// Name of the durable task queue.
    pub queue_name: String,
    /// Valkey key holding the processed-task counter.
    pub processed_count_key: String,
    /// Service name reported in telemetry signals.
    pub service_name: String,
    /// Deployment environment label (e.g. "production", "staging").
    pub deployment_environment: String,
    /// Optional OTLP endpoint. Task processing never depends on it.
    pub otel_endpoint: Option<String>,
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    /// In production, systemd EnvironmentFile provides the vars.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            broker_url: SecretString::from(required_var("BROKER_URL")?),
            valkey_url: SecretString::from(required_var("VALKEY_URL")?),
            queue_name: required_var("QUEUE_NAME")?,
            processed_count_key: required_var("PROCESSED_COUNT_KEY")?,
            service_name: std::env::var("SERVICE_NAME")
                .unwrap_or_else(|_| "conveyor".to_string()),
            deployment_environment: std::env::var("DEPLOYMENT_ENVIRONMENT")
                .unwrap_or_else(|_| "unknown".to_string()),
            otel_endpoint: std::env::var("OTEL_ENDPOINT").ok(),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn required_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| Error::Config(format!("required environment variable {name} is not set")))
}
