//! # Transport
//!
//! Outbound delivery channels for encoded CoT events.
//!
//! Responsibilities:
//! - The three channel variants: multicast, direct unicast, reliable stream
//! - Mode-dispatch construction from configuration
//! - Per-transport send/failure/reconnect counters
//!
//! Construction failures (unresolvable address, failed initial connection)
//! are fatal; send failures are per-message results handled by the caller.

mod factory;
mod metrics;
mod multicast;
mod stream;
mod unicast;

pub use contracts::{BoxedTransport, BridgeError, Transport};
pub use factory::build_transport;
pub use metrics::{MetricsSnapshot, TransportMetrics};
pub use multicast::MulticastTransport;
pub use stream::StreamTransport;
pub use unicast::UnicastTransport;
