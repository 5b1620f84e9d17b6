//! pgmq queue operations via direct SQLx.
//!
//! Calls pgmq's SQL functions: pgmq.create, pgmq.send, pgmq.read,
//! pgmq.delete, pgmq.archive, pgmq.set_vt, pgmq.metrics. Messages live in
//! Postgres, so a committed publish is durable by construction; the
//! visibility timeout on reads models the delivered-but-unacknowledged
//! window, delete is the positive ack, and archive is the dead-letter path.

use crate::error::Result;
use crate::model::Envelope;
use crate::telemetry::metrics;
use opentelemetry::KeyValue;

/// A message read from the queue: raw body plus broker delivery metadata.
#[derive(Debug, Clone)]
pub struct Delivery {
    /// Delivery tag; names this message in ack/requeue/dead_letter calls.
    pub msg_id: i64,
    /// How many times this message has been delivered (1 on first read).
    pub read_ct: i32,
    pub enqueued_at: chrono::DateTime<chrono::Utc>,
    pub vt: chrono::DateTime<chrono::Utc>,
    /// Raw message body — an [`Envelope`] in JSON form.
    pub message: serde_json::Value,
}

impl super::Broker {
    /// Declare the queue. Idempotent — safe to call on every publish, never
    /// alters messages already queued.
    pub async fn ensure_queue(&self, queue_name: &str) -> Result<()> {
        sqlx::query("SELECT pgmq.create($1)")
            .bind(queue_name)
            .execute(&self.pool)
            .await?;
        metrics::queue_operations().add(
            1,
            &[
                KeyValue::new("queue", queue_name.to_string()),
                KeyValue::new("operation", "declare"),
            ],
        );
        Ok(())
    }

    /// Durably publish an envelope. Returns the broker message id once the
    /// insert has committed.
    ///
    /// The commit also fires NOTIFY task_ready so idle workers wake without
    /// waiting out their poll interval.
    pub async fn publish(&self, queue_name: &str, envelope: &Envelope) -> Result<i64> {
        let payload = serde_json::to_value(envelope)?;

        let mut tx = self.pool.begin().await?;
        let row: (i64,) = sqlx::query_as("SELECT pgmq.send($1, $2, $3)")
            .bind(queue_name)
            .bind(&payload)
            .bind(0i32)
            .fetch_one(&mut *tx)
            .await?;

        // NOTIFY is transactional — only fires on commit
        sqlx::query("SELECT pg_notify('task_ready', $1)")
            .bind(queue_name)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        metrics::queue_operations().add(
            1,
            &[
                KeyValue::new("queue", queue_name.to_string()),
                KeyValue::new("operation", "publish"),
            ],
        );
        Ok(row.0)
    }

    /// Read the next message, making it invisible for `vt_seconds`.
    ///
    /// At most one message is taken per call; the caller must resolve it
    /// (ack, requeue, or dead-letter) before reading again. Returns None if
    /// the queue is empty.
    pub async fn read_next(&self, queue_name: &str, vt_seconds: i32) -> Result<Option<Delivery>> {
        let row = sqlx::query_as::<
            _,
            (
                i64,
                i32,
                chrono::DateTime<chrono::Utc>,
                chrono::DateTime<chrono::Utc>,
                serde_json::Value,
            ),
        >(
            "SELECT msg_id, read_ct, enqueued_at, vt, message FROM pgmq.read($1, $2, 1)"
        )
        .bind(queue_name)
        .bind(vt_seconds)
        .fetch_optional(&self.pool)
        .await?;

        let delivery = row.map(|(msg_id, read_ct, enqueued_at, vt, message)| Delivery {
            msg_id,
            read_ct,
            enqueued_at,
            vt,
            message,
        });

        metrics::queue_operations().add(
            1,
            &[
                KeyValue::new("queue", queue_name.to_string()),
                KeyValue::new(
                    "operation",
                    if delivery.is_some() { "read" } else { "read_empty" },
                ),
            ],
        );

        Ok(delivery)
    }

    /// Positively acknowledge a delivery: permanently remove the message.
    pub async fn ack(&self, queue_name: &str, msg_id: i64) -> Result<()> {
        sqlx::query("SELECT pgmq.delete($1, $2)")
            .bind(queue_name)
            .bind(msg_id)
            .execute(&self.pool)
            .await?;
        metrics::queue_operations().add(
            1,
            &[
                KeyValue::new("queue", queue_name.to_string()),
                KeyValue::new("operation", "ack"),
            ],
        );
        Ok(())
    }

    /// Negative-acknowledge with requeue: clear the visibility timeout so
    /// the message is redelivered immediately.
    pub async fn requeue(&self, queue_name: &str, msg_id: i64) -> Result<()> {
        sqlx::query("SELECT pgmq.set_vt($1, $2, $3)")
            .bind(queue_name)
            .bind(msg_id)
            .bind(0i32)
            .execute(&self.pool)
            .await?;
        metrics::queue_operations().add(
            1,
            &[
                KeyValue::new("queue", queue_name.to_string()),
                KeyValue::new("operation", "requeue"),
            ],
        );
        Ok(())
    }

    /// Dead-letter a delivery: move the message to the archive table for
    /// inspection instead of silent loss or infinite redelivery.
    pub async fn dead_letter(&self, queue_name: &str, msg_id: i64) -> Result<()> {
        sqlx::query("SELECT pgmq.archive($1, $2)")
            .bind(queue_name)
            .bind(msg_id)
            .execute(&self.pool)
            .await?;
        metrics::queue_operations().add(
            1,
            &[
                KeyValue::new("queue", queue_name.to_string()),
                KeyValue::new("operation", "dead_letter"),
            ],
        );
        Ok(())
    }

    /// Current queue depth. Passive inspection — never creates the queue,
    /// never consumes or mutates messages.
    pub async fn depth(&self, queue_name: &str) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT queue_length FROM pgmq.metrics($1)")
            .bind(queue_name)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }
}
