//! Core data model.
//!
//! An envelope is the unit stored in the queue: the caller's opaque task
//! payload plus the string headers that carry causal context across the
//! asynchronous boundary. Broker delivery metadata (message id, delivery
//! count) belongs to the read side, not to the envelope.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A queued unit of work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    /// Correlation id assigned at publish time.
    pub id: Uuid,

    /// String headers carrying the serialized causal context.
    /// Foreign producers may omit them entirely.
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// The caller's payload. The pipeline doesn't interpret it.
    pub task: serde_json::Value,
}

impl Envelope {
    pub fn new(headers: HashMap<String, String>, task: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            headers,
            task,
        }
    }
}

/// Broker acceptance of a durable publish.
///
/// This is a publish acknowledgment, not a processing one — the dispatcher
/// never waits for execution.
#[derive(Debug, Clone, Copy)]
pub struct PublishAck {
    /// Broker message id, the delivery tag used for ack on the consumer side.
    pub msg_id: i64,
    /// The envelope id assigned at publish time.
    pub task_id: Uuid,
}

/// Point-in-time operational snapshot.
///
/// The three numbers come from three independent reads and are not mutually
/// consistent at a single instant.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Stats {
    /// Total entries currently in the counter store.
    pub key_count: i64,
    /// Messages currently sitting in the queue.
    pub queue_depth: i64,
    /// Value of the shared processed-task counter (0 when unset).
    pub processed_count: i64,
}
