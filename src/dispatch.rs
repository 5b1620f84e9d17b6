//! Producer-side dispatcher: durable, fire-and-forget publish.

use crate::broker::Broker;
use crate::error::Result;
use crate::model::{Envelope, PublishAck};
use crate::telemetry::{metrics, propagation, task};
use opentelemetry::KeyValue;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{Instrument, info};

/// Accepts a task payload and appends it durably to the queue tail.
///
/// `enqueue` returns once the broker has committed the message — a publish
/// acknowledgment, never a processing one. Callers needing completion
/// notification must observe the counter out of band.
pub struct Dispatcher {
    broker: Arc<Broker>,
    queue: String,
}

impl Dispatcher {
    pub fn new(broker: Arc<Broker>, queue: impl Into<String>) -> Self {
        Self {
            broker,
            queue: queue.into(),
        }
    }

    /// Durably enqueue one task.
    ///
    /// The producer's active causal context is injected into the envelope
    /// headers at the moment of publish, so the consumer can parent its
    /// processing span on the producer's span. Broker failure surfaces as
    /// an error with nothing queued; no retry is attempted here.
    pub async fn enqueue(&self, payload: serde_json::Value) -> Result<PublishAck> {
        self.broker.ensure_queue(&self.queue).await?;

        let span = task::start_publish_span(&self.queue);
        async {
            let mut headers = HashMap::new();
            propagation::inject(&mut headers);

            let envelope = Envelope::new(headers, payload);
            let task_id = envelope.id;

            let msg_id = match self.broker.publish(&self.queue, &envelope).await {
                Ok(id) => id,
                Err(e) => {
                    metrics::tasks_published().add(
                        1,
                        &[
                            KeyValue::new("queue", self.queue.clone()),
                            KeyValue::new("result", "error"),
                        ],
                    );
                    return Err(e);
                }
            };

            task::record_message_id(&tracing::Span::current(), msg_id);
            info!(%task_id, msg_id, "task queued");
            metrics::tasks_published().add(
                1,
                &[
                    KeyValue::new("queue", self.queue.clone()),
                    KeyValue::new("result", "ok"),
                ],
            );
            Ok(PublishAck { msg_id, task_id })
        }
        .instrument(span)
        .await
    }
}
