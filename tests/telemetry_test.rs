//! Integration tests for telemetry initialization and span helpers.

#[test]
fn telemetry_initializes_without_endpoint() {
    // Note: tracing subscriber can only be set once per process.
    // Using try_init() in the implementation avoids panics if another
    // test already initialized a subscriber.
    let config = conveyor_rs::telemetry::TelemetryConfig {
        endpoint: None,
        service_name: "conveyor-test".to_string(),
        deployment_environment: "test".to_string(),
    };
    // This may return Err if a global subscriber was already set by
    // another test in this process; that is acceptable.
    let _guard = conveyor_rs::telemetry::init_telemetry(config);
}

#[test]
fn publish_span_creates_and_records_message_id() {
    let span = conveyor_rs::telemetry::task::start_publish_span("tasks");
    conveyor_rs::telemetry::task::record_message_id(&span, 42);
}

#[test]
fn process_span_creates() {
    let _span = conveyor_rs::telemetry::task::start_process_span("tasks", 7);
}
