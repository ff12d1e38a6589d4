//! Bridge metric recording helpers
//!
//! The single home for the Prometheus series names. The delivery loop and
//! the stream transport record through these, so every dashboard sees one
//! series per concern no matter which layer produced the sample.

use metrics::counter;

/// Record a detection fetched from the upstream queue
pub fn record_detection_received() {
    counter!("bridge_messages_fetched_total").increment(1);
}

/// Record a message dropped because it did not parse as a detection
pub fn record_parse_failure() {
    counter!("bridge_parse_failures_total").increment(1);
}

/// Record a detection dropped because encoding failed
pub fn record_encode_failure() {
    counter!("bridge_encode_failures_total").increment(1);
}

/// Record a delivery attempt outcome on a transport
pub fn record_event_delivered(transport: &str, success: bool) {
    if success {
        counter!("bridge_events_sent_total", "transport" => transport.to_string()).increment(1);
    } else {
        counter!("bridge_send_failures_total", "transport" => transport.to_string()).increment(1);
    }
}

/// Record an upstream fetch error that will be retried
pub fn record_fetch_error() {
    counter!("bridge_fetch_errors_total").increment(1);
}

/// Record a TCP stream reconnect attempt
pub fn record_stream_reconnect(success: bool) {
    counter!(
        "bridge_stream_reconnects_total",
        "outcome" => if success { "ok" } else { "failed" }
    )
    .increment(1);
}
