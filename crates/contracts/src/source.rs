//! DetectionSource trait - upstream queue abstraction
//!
//! Decouples the delivery loop from the concrete queue client. The real
//! deployment fronts a message broker; tests and the stdin mode implement
//! the same seam.

use bytes::Bytes;

use crate::BridgeError;

/// One message pulled from the upstream queue.
///
/// The payload is the raw JSON bytes of a detection record; `offset` is an
/// opaque per-source cursor used for commit bookkeeping and diagnostics.
#[derive(Debug, Clone)]
pub struct QueueMessage {
    /// Raw detection payload
    pub payload: Bytes,

    /// Source-assigned position of this message
    pub offset: u64,
}

/// Upstream detection source trait
///
/// # Contract
///
/// - `fetch` is the delivery loop's sole suspension point; it blocks until
///   a message is available or the stream ends (`Ok(None)`).
/// - `commit` advances the upstream cursor past the given message. The
///   loop calls it exactly once per fetched message, after local
///   processing finishes, successful or not.
#[trait_variant::make(DetectionSource: Send)]
pub trait LocalDetectionSource {
    /// Fetch the next message, or `None` when the stream is exhausted
    ///
    /// # Errors
    /// Fetch failures are recoverable; the loop logs, pauses, and retries.
    async fn fetch(&mut self) -> Result<Option<QueueMessage>, BridgeError>;

    /// Acknowledge the message upstream
    async fn commit(&mut self, message: &QueueMessage) -> Result<(), BridgeError>;
}
