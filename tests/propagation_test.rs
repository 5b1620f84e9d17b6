//! Context continuity: inject at publish time, extract at consume time,
//! and the reconstructed context must reference the producer's span.

use conveyor_rs::telemetry::propagation;
use opentelemetry::Context;
use opentelemetry::trace::{
    SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState,
};
use std::collections::HashMap;

fn remote_context(trace_id: u128, span_id: u64) -> Context {
    let span_context = SpanContext::new(
        TraceId::from(trace_id),
        SpanId::from(span_id),
        TraceFlags::SAMPLED,
        false,
        TraceState::default(),
    );
    Context::new().with_remote_span_context(span_context)
}

#[test]
fn inject_then_extract_preserves_trace_and_span_ids() {
    let cx = remote_context(0xdead_beef_cafe, 0x42);
    let mut carrier = HashMap::new();
    propagation::inject_context(&cx, &mut carrier);

    assert!(carrier.contains_key("traceparent"));

    let extracted = propagation::extract(&carrier);
    let span_context = extracted.span().span_context().clone();
    assert_eq!(span_context.trace_id(), TraceId::from(0xdead_beef_cafe_u128));
    assert_eq!(span_context.span_id(), SpanId::from(0x42_u64));
    assert!(span_context.is_remote());
    assert!(span_context.is_sampled());
}

#[test]
fn extract_from_empty_carrier_degrades_to_no_parent() {
    let carrier = HashMap::new();
    let extracted = propagation::extract(&carrier);
    assert!(!extracted.span().span_context().is_valid());
}

#[test]
fn extract_from_malformed_traceparent_degrades_to_no_parent() {
    let mut carrier = HashMap::new();
    carrier.insert("traceparent".to_string(), "not-a-traceparent".to_string());

    let extracted = propagation::extract(&carrier);
    assert!(!extracted.span().span_context().is_valid());
}

#[test]
fn inject_without_active_context_leaves_carrier_untouched() {
    let mut carrier = HashMap::new();
    propagation::inject_context(&Context::new(), &mut carrier);
    assert!(!carrier.contains_key("traceparent"));
}
