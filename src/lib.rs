//! # conveyor-rs
//!
//! Durable task pipeline: HTTP intake, pgmq-backed dispatch, and traced
//! asynchronous workers.
//!
//! Tasks arrive over HTTP, are durably enqueued via pgmq (Postgres), and are
//! drained by a consumer loop bounded to one in-flight message per instance.
//! W3C trace context rides the queue in message headers, and a Valkey counter
//! tracks aggregate throughput.

pub mod broker;
pub mod config;
pub mod counter;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod model;
pub mod stats;
pub mod telemetry;
pub mod worker;
