//! # Bridge
//!
//! The delivery loop: pulls detections from the upstream source, encodes
//! each one, hands it to the configured transport, and acknowledges the
//! upstream message.
//!
//! Responsibilities:
//! - Strictly sequential fetch / parse / encode / send / commit cycle
//! - Commit-regardless-of-send-outcome policy (at-most-once delivery)
//! - Drain-on-cancel shutdown, never aborting an in-flight message

mod delivery;
mod sources;
mod stats;

pub use contracts::{DetectionSource, QueueMessage};
pub use delivery::{BridgeLoop, LoopState};
pub use sources::{MemorySource, StdinSource};
pub use stats::BridgeStats;
