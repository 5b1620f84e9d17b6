//! Causal context propagation across the queue boundary.
//!
//! Pure inject/extract over a string-keyed header map using the W3C trace
//! context format. No I/O, deterministic given the context; context flows
//! through these functions explicitly rather than via a process-global
//! propagator.

use opentelemetry::Context;
use opentelemetry::propagation::TextMapPropagator;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use std::collections::HashMap;
use tracing_opentelemetry::OpenTelemetrySpanExt as _;

/// Serialize the current span's causal context into the carrier.
///
/// Captures the producer's active context at the moment of the call. With
/// no active sampled span the carrier is left untouched, which extraction
/// treats as "no parent".
pub fn inject(carrier: &mut HashMap<String, String>) {
    inject_context(&tracing::Span::current().context(), carrier);
}

/// Serialize an explicit causal context into the carrier.
pub fn inject_context(cx: &Context, carrier: &mut HashMap<String, String>) {
    TraceContextPropagator::new().inject_context(cx, carrier);
}

/// Reconstruct the causal context serialized in the carrier.
///
/// Absent or malformed headers degrade to an empty context — never an
/// error — so the consumer falls back to a parentless span.
pub fn extract(carrier: &HashMap<String, String>) -> Context {
    TraceContextPropagator::new().extract(carrier)
}
