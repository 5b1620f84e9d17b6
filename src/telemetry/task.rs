//! Task pipeline span helpers.
//!
//! Uses OpenTelemetry messaging semantic conventions:
//! - `messaging.system`
//! - `messaging.operation.name`
//! - `messaging.destination.name`
//! - `messaging.message.id`

use tracing::Span;

/// Start a span for a durable publish.
///
/// The message id is unknown until the broker accepts the publish; the
/// field is declared empty and filled via [`record_message_id`].
pub fn start_publish_span(queue: &str) -> Span {
    tracing::info_span!(
        "task.publish",
        "messaging.system" = "pgmq",
        "messaging.operation.name" = "publish",
        "messaging.destination.name" = queue,
        "messaging.message.id" = tracing::field::Empty,
    )
}

/// Start a span for processing one delivered message.
///
/// The caller parents this span on the context extracted from the message
/// headers, linking processing back to the producer's publish.
pub fn start_process_span(queue: &str, msg_id: i64) -> Span {
    tracing::info_span!(
        "task.process",
        "messaging.system" = "pgmq",
        "messaging.operation.name" = "process",
        "messaging.destination.name" = queue,
        "messaging.message.id" = msg_id,
    )
}

/// Record the broker-assigned message id on a publish span.
pub fn record_message_id(span: &Span, msg_id: i64) {
    span.record("messaging.message.id", msg_id);
}
