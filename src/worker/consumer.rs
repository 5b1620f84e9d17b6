//! The consumer loop: read one message, process it to completion under a
//! span parented on the producer's context, then acknowledge.

use crate::broker::Broker;
use crate::broker::queue::Delivery;
use crate::counter::CounterStore;
use crate::error::{Error, Result};
use crate::model::Envelope;
use crate::telemetry::{metrics, propagation, task};
use opentelemetry::KeyValue;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Notify;
use tracing::{Instrument, error, info, warn};
use tracing_opentelemetry::OpenTelemetrySpanExt as _;

use super::handler::TaskHandler;

/// Configuration for the consumer loop.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Visibility timeout (seconds) for queue reads. A message unresolved
    /// past this window becomes visible again and is redelivered.
    pub visibility_timeout: i32,
    /// Poll interval fallback when no NOTIFY arrives.
    pub poll_interval: Duration,
    /// Upper bound on a single task execution. On expiry the message is
    /// negative-acknowledged instead of hanging the loop.
    pub handler_timeout: Duration,
    /// Deliveries after which a failing message is dead-lettered.
    pub max_deliveries: i32,
    /// Listener reconnect attempts before giving up.
    pub max_reconnect_attempts: u32,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            visibility_timeout: 30,
            poll_interval: Duration::from_secs(5),
            handler_timeout: Duration::from_secs(25),
            max_deliveries: 3,
            max_reconnect_attempts: 5,
        }
    }
}

/// How one delivered message was resolved. Every message ends in exactly
/// one of these — nothing is left permanently unacknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    Acked,
    Requeued,
    DeadLettered,
}

/// The consumer loop.
///
/// One instance holds at most one unacknowledged message at a time; the
/// next read happens only after the current delivery is resolved. Scale-out
/// is more instances competing on the same queue.
pub struct Worker {
    broker: Arc<Broker>,
    counter: CounterStore,
    handler: Arc<dyn TaskHandler>,
    queue: String,
    config: WorkerConfig,
    shutdown: Arc<Notify>,
}

impl Worker {
    pub fn new(
        broker: Arc<Broker>,
        counter: CounterStore,
        handler: Arc<dyn TaskHandler>,
        queue: impl Into<String>,
        config: WorkerConfig,
    ) -> Self {
        Self {
            broker,
            counter,
            handler,
            queue: queue.into(),
            config,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Handle for signalling shutdown from another task.
    pub fn shutdown_handle(&self) -> Arc<Notify> {
        Arc::clone(&self.shutdown)
    }

    /// Run until shutdown or unrecoverable connection loss.
    ///
    /// Wakes on NOTIFY task_ready or the poll interval, then drains the
    /// queue one message at a time. Returns Err only when the broker
    /// connection is lost and reconnection fails within the configured
    /// budget, so the process can exit non-zero for supervisor restart.
    pub async fn run(&self) -> Result<()> {
        self.broker.ensure_queue(&self.queue).await?;

        let mut listener = self.connect_listener().await?;
        info!(queue = %self.queue, "worker started, waiting for tasks");

        loop {
            // Wait for: shutdown, notification, or poll timeout
            tokio::select! {
                _ = self.shutdown.notified() => {
                    info!("worker shutting down");
                    return Ok(());
                }
                notif = listener.recv() => {
                    match notif {
                        Ok(n) => {
                            info!(queue = n.payload(), "notified of new task");
                        }
                        Err(e) => {
                            warn!("listener lost: {e}");
                            listener = self.reconnect_listener().await?;
                        }
                    }
                }
                _ = tokio::time::sleep(self.config.poll_interval) => {}
            }

            // Drain available work one message at a time. A processing
            // error leaves the current message invisible until its
            // visibility timeout lapses, then the broker redelivers it.
            loop {
                match self.process_next().await {
                    Ok(true) => continue,
                    Ok(false) => break,
                    Err(e) => {
                        error!("processing error: {e}");
                        break;
                    }
                }
            }
        }
    }

    async fn connect_listener(&self) -> Result<sqlx::postgres::PgListener> {
        let mut listener = sqlx::postgres::PgListener::connect_with(self.broker.pool()).await?;
        listener.listen("task_ready").await?;
        Ok(listener)
    }

    /// Reconnect with exponential backoff, bounded by
    /// `max_reconnect_attempts`.
    async fn reconnect_listener(&self) -> Result<sqlx::postgres::PgListener> {
        let mut backoff = Duration::from_secs(1);
        for attempt in 1..=self.config.max_reconnect_attempts {
            tokio::time::sleep(backoff).await;
            match self.connect_listener().await {
                Ok(listener) => {
                    info!(attempt, "listener reconnected");
                    return Ok(listener);
                }
                Err(e) => {
                    warn!(attempt, "reconnect failed: {e}");
                    backoff = (backoff * 2).min(Duration::from_secs(30));
                }
            }
        }
        Err(Error::Other(format!(
            "broker connection lost and {} reconnect attempts failed",
            self.config.max_reconnect_attempts
        )))
    }

    /// Read and fully resolve at most one message. Returns whether a
    /// message was taken.
    async fn process_next(&self) -> Result<bool> {
        let delivery = match self
            .broker
            .read_next(&self.queue, self.config.visibility_timeout)
            .await?
        {
            Some(delivery) => delivery,
            None => return Ok(false),
        };

        let envelope: Envelope = match serde_json::from_value(delivery.message.clone()) {
            Ok(envelope) => envelope,
            Err(e) => {
                // Poison message: acknowledging as success would silently
                // lose it, leaving it unacknowledged would block the loop.
                warn!(
                    msg_id = delivery.msg_id,
                    "malformed payload, dead-lettering: {e}"
                );
                self.broker.dead_letter(&self.queue, delivery.msg_id).await?;
                metrics::tasks_processed().add(
                    1,
                    &[
                        KeyValue::new("queue", self.queue.clone()),
                        KeyValue::new("outcome", "malformed"),
                    ],
                );
                return Ok(true);
            }
        };

        // Parent the processing span on the producer's context. Absent or
        // malformed headers degrade to a parentless span.
        let span = task::start_process_span(&self.queue, delivery.msg_id);
        span.set_parent(propagation::extract(&envelope.headers));

        self.execute(&delivery, &envelope).instrument(span).await?;
        Ok(true)
    }

    /// Run the handler and resolve the delivery: ack on success, requeue
    /// or dead-letter on failure.
    async fn execute(&self, delivery: &Delivery, envelope: &Envelope) -> Result<Resolution> {
        let start = Instant::now();
        info!(
            task_id = %envelope.id,
            read_ct = delivery.read_ct,
            "task delivered"
        );

        let result = tokio::time::timeout(
            self.config.handler_timeout,
            self.handler.handle(&envelope.task),
        )
        .await;

        metrics::operation_duration_ms().record(
            start.elapsed().as_millis() as f64,
            &[KeyValue::new("operation", "task.process")],
        );

        let (outcome, resolution) = match result {
            Ok(Ok(())) => {
                // Counter before ack: if the increment fails the message
                // stays unacknowledged and the broker redelivers it after
                // the visibility timeout lapses.
                let processed = self.counter.increment().await?;
                self.broker.ack(&self.queue, delivery.msg_id).await?;
                info!(task_id = %envelope.id, processed, "task completed");
                ("ok", Resolution::Acked)
            }
            Ok(Err(e)) => {
                error!(task_id = %envelope.id, error = %e, "handler failed");
                ("failed", self.nack(delivery).await?)
            }
            Err(_) => {
                error!(
                    task_id = %envelope.id,
                    timeout = ?self.config.handler_timeout,
                    "handler timed out"
                );
                ("timeout", self.nack(delivery).await?)
            }
        };

        metrics::tasks_processed().add(
            1,
            &[
                KeyValue::new("queue", self.queue.clone()),
                KeyValue::new("outcome", outcome),
            ],
        );
        Ok(resolution)
    }

    /// Failure policy: requeue while the delivery budget lasts, then
    /// dead-letter.
    async fn nack(&self, delivery: &Delivery) -> Result<Resolution> {
        if delivery.read_ct >= self.config.max_deliveries {
            warn!(
                msg_id = delivery.msg_id,
                read_ct = delivery.read_ct,
                "delivery budget exhausted, dead-lettering"
            );
            self.broker.dead_letter(&self.queue, delivery.msg_id).await?;
            Ok(Resolution::DeadLettered)
        } else {
            self.broker.requeue(&self.queue, delivery.msg_id).await?;
            Ok(Resolution::Requeued)
        }
    }
}
