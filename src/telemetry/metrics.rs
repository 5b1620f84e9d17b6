//! Metric instrument factories for conveyor-rs.
//!
//! Uses the OTel Meter API with the globally-registered `MeterProvider`.
//! All instruments are created lazily from the `"conveyor-rs"` meter.

use opentelemetry::metrics::{Counter, Histogram, Meter};

/// Returns the shared meter for conveyor-rs instruments.
fn meter() -> Meter {
    opentelemetry::global::meter("conveyor-rs")
}

/// Counter: tasks accepted for durable publish.
/// Labels: `queue`, `result` ("ok" | "error").
pub fn tasks_published() -> Counter<u64> {
    meter()
        .u64_counter("conveyor.tasks.published")
        .with_description("Number of tasks accepted for durable publish")
        .build()
}

/// Counter: delivered messages resolved by the worker.
/// Labels: `queue`, `outcome` ("ok" | "malformed" | "failed" | "timeout").
pub fn tasks_processed() -> Counter<u64> {
    meter()
        .u64_counter("conveyor.tasks.processed")
        .with_description("Number of delivered messages resolved by the worker")
        .build()
}

/// Counter: queue-level operations (declare, publish, read, ack, requeue,
/// dead_letter).
/// Labels: `queue`, `operation`.
pub fn queue_operations() -> Counter<u64> {
    meter()
        .u64_counter("conveyor.queue.operations")
        .with_description("Number of queue operations")
        .build()
}

/// Histogram: operation duration in milliseconds.
/// Labels: `operation`.
pub fn operation_duration_ms() -> Histogram<f64> {
    meter()
        .f64_histogram("conveyor.operation.duration_ms")
        .with_description("Operation duration in milliseconds")
        .with_unit("ms")
        .build()
}
