//! Detection sources
//!
//! The production deployment fronts a message broker behind the
//! `DetectionSource` seam; that client lives outside this repository.
//! Here: an NDJSON stdin source for piping a simulator or capture into
//! the binary, and an in-memory source for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use contracts::{BridgeError, DetectionSource, QueueMessage};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::debug;

/// Reads line-delimited JSON detections from stdin.
///
/// Used with the detection simulator:
/// `python simulate_drones.py | cot-bridge run`
pub struct StdinSource {
    lines: Lines<BufReader<Stdin>>,
    offset: u64,
    committed: u64,
}

impl StdinSource {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            offset: 0,
            committed: 0,
        }
    }

    /// Offset of the last acknowledged line.
    pub fn committed(&self) -> u64 {
        self.committed
    }
}

impl Default for StdinSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectionSource for StdinSource {
    async fn fetch(&mut self) -> Result<Option<QueueMessage>, BridgeError> {
        loop {
            match self.lines.next_line().await {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    self.offset += 1;
                    return Ok(Some(QueueMessage {
                        payload: Bytes::from(line),
                        offset: self.offset,
                    }));
                }
                Ok(None) => return Ok(None),
                Err(e) => return Err(BridgeError::source_fetch(format!("stdin read: {e}"))),
            }
        }
    }

    async fn commit(&mut self, message: &QueueMessage) -> Result<(), BridgeError> {
        self.committed = message.offset;
        debug!(offset = message.offset, "Stdin cursor advanced");
        Ok(())
    }
}

/// One queued item in a [`MemorySource`].
enum MemoryItem {
    Payload(Bytes),
    FetchError(String),
}

/// In-memory source seeded with payloads, tracking commits.
///
/// Test double for the broker client; `push_front_error` injects a fetch
/// failure ahead of the remaining payloads.
pub struct MemorySource {
    queue: VecDeque<MemoryItem>,
    offset: u64,
    commits: Arc<AtomicU64>,
}

impl MemorySource {
    pub fn new(payloads: Vec<Bytes>) -> Self {
        Self {
            queue: payloads.into_iter().map(MemoryItem::Payload).collect(),
            offset: 0,
            commits: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Handle observing how many commits the loop issued.
    pub fn commit_count(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.commits)
    }

    /// Queue a fetch error before the remaining payloads.
    pub fn push_front_error(&mut self, message: impl Into<String>) {
        self.queue
            .push_front(MemoryItem::FetchError(message.into()));
    }
}

impl DetectionSource for MemorySource {
    async fn fetch(&mut self) -> Result<Option<QueueMessage>, BridgeError> {
        match self.queue.pop_front() {
            Some(MemoryItem::Payload(payload)) => {
                self.offset += 1;
                Ok(Some(QueueMessage {
                    payload,
                    offset: self.offset,
                }))
            }
            Some(MemoryItem::FetchError(message)) => Err(BridgeError::source_fetch(message)),
            None => Ok(None),
        }
    }

    async fn commit(&mut self, _message: &QueueMessage) -> Result<(), BridgeError> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
