//! BridgeLoop - sequential fetch/encode/send/commit cycle
//!
//! One worker drives the loop; the transport is exclusively owned here and
//! never shared. Events go out in exactly the order they were fetched.
//!
//! The commit policy is deliberate: the upstream message is acknowledged
//! after local processing finishes, whether or not the transport delivered
//! the event. The feed is real time; retransmitting a stale position has
//! no value, so delivery is at-most-once by design. Do not "fix" this to
//! redeliver on send failure without changing the operational contract.

use std::time::{Duration, Instant};

use chrono::{SecondsFormat, Utc};
use contracts::{
    BoxedTransport, BridgeError, DetectionRecord, DetectionSource, LoopConfig, QueueMessage,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::stats::BridgeStats;

/// Delivery loop lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Transport and source are ready; no message processed yet
    Idle,
    /// Steady-state processing
    Running,
    /// Cancellation observed; finishing the in-flight message
    Draining,
    /// Terminal; transport released
    Stopped,
}

/// The delivery loop, owning the source and the transport.
pub struct BridgeLoop<S> {
    source: S,
    transport: BoxedTransport,
    config: LoopConfig,
    state: LoopState,
    stats: BridgeStats,
}

impl<S: DetectionSource> BridgeLoop<S> {
    /// Create an idle loop around a source and a constructed transport.
    pub fn new(source: S, transport: BoxedTransport, config: LoopConfig) -> Self {
        Self {
            source,
            transport,
            config,
            state: LoopState::Idle,
            stats: BridgeStats::default(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Run until the source is exhausted or `cancel` fires.
    ///
    /// Cancellation drains: the message being processed (if any) completes,
    /// including its commit, before the loop stops fetching and releases
    /// the transport.
    #[instrument(name = "bridge_loop_run", skip(self, cancel))]
    pub async fn run(&mut self, cancel: CancellationToken) -> BridgeStats {
        let started = Instant::now();
        self.state = LoopState::Running;
        info!(transport = self.transport.name(), "Bridge loop started");

        loop {
            let message = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    self.state = LoopState::Draining;
                    info!("Cancellation observed, draining");
                    break;
                }
                fetched = self.source.fetch() => fetched,
            };

            match message {
                Ok(Some(message)) => {
                    self.stats.messages_fetched += 1;
                    self.process_message(&message).await;
                    self.commit(&message).await;

                    if cancel.is_cancelled() {
                        self.state = LoopState::Draining;
                        info!("Cancellation observed, draining");
                        break;
                    }
                }
                Ok(None) => {
                    info!("Upstream source exhausted");
                    break;
                }
                Err(e) => {
                    self.stats.fetch_errors += 1;
                    observability::record_fetch_error();
                    error!(error = %e, "Fetch failed, pausing before retry");

                    let pause = Duration::from_secs(self.config.fetch_retry_secs);
                    tokio::select! {
                        biased;
                        () = cancel.cancelled() => {
                            self.state = LoopState::Draining;
                            break;
                        }
                        () = tokio::time::sleep(pause) => {}
                    }
                }
            }
        }

        if let Err(e) = self.transport.close().await {
            warn!(error = %e, "Transport close failed");
        }
        self.state = LoopState::Stopped;
        self.stats.duration = started.elapsed();

        info!(
            fetched = self.stats.messages_fetched,
            sent = self.stats.sends_ok,
            send_failures = self.stats.send_failures,
            "Bridge loop stopped"
        );
        self.stats.clone()
    }

    /// Decode and deliver one message. Every failure mode here is local:
    /// log, count, and move on so the loop never stalls on bad input.
    async fn process_message(&mut self, message: &QueueMessage) {
        observability::record_detection_received();

        let mut record: DetectionRecord = match serde_json::from_slice(&message.payload) {
            Ok(record) => record,
            Err(e) => {
                self.stats.parse_failures += 1;
                observability::record_parse_failure();
                warn!(offset = message.offset, error = %e, "Malformed detection, skipping");
                return;
            }
        };

        if record.timestamp.is_none() {
            record.timestamp = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }

        let document = match cot::encode(&record) {
            Ok(document) => document,
            Err(e) => {
                self.stats.encode_failures += 1;
                observability::record_encode_failure();
                error!(uas_id = %record.uas_id, error = %e, "Encode failed, skipping");
                return;
            }
        };

        match self.transport.send(&document).await {
            Ok(()) => {
                self.stats.sends_ok += 1;
                observability::record_event_delivered(self.transport.name(), true);
                debug!(
                    uas_id = %record.uas_id,
                    transport = self.transport.name(),
                    bytes = document.len(),
                    "Event sent"
                );
            }
            Err(e) => {
                self.stats.send_failures += 1;
                observability::record_event_delivered(self.transport.name(), false);
                warn!(uas_id = %record.uas_id, error = %e, "Send failed, event lost");
            }
        }
    }

    /// Acknowledge upstream, exactly once per fetched message.
    async fn commit(&mut self, message: &QueueMessage) {
        match self.source.commit(message).await {
            Ok(()) => {
                self.stats.commits += 1;
            }
            Err(e) => {
                // The message will be redelivered by the broker; log only
                warn!(offset = message.offset, error = %e, "Commit failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::MemorySource;
    use contracts::Transport;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    /// Transport double recording every delivered document.
    struct CaptureTransport {
        name: String,
        sent: Arc<AtomicU64>,
        documents: Arc<std::sync::Mutex<Vec<Vec<u8>>>>,
        fail_all: bool,
    }

    impl CaptureTransport {
        fn new(fail_all: bool) -> (Self, Arc<AtomicU64>, Arc<std::sync::Mutex<Vec<Vec<u8>>>>) {
            let sent = Arc::new(AtomicU64::new(0));
            let documents = Arc::new(std::sync::Mutex::new(Vec::new()));
            (
                Self {
                    name: "capture".to_string(),
                    sent: Arc::clone(&sent),
                    documents: Arc::clone(&documents),
                    fail_all,
                },
                sent,
                documents,
            )
        }
    }

    impl Transport for CaptureTransport {
        fn name(&self) -> &str {
            &self.name
        }

        async fn send(&mut self, document: &[u8]) -> Result<(), BridgeError> {
            if self.fail_all {
                return Err(BridgeError::transport_send(&self.name, "induced failure"));
            }
            self.sent.fetch_add(1, Ordering::SeqCst);
            self.documents
                .lock()
                .unwrap()
                .push(document.to_vec());
            Ok(())
        }

        async fn close(&mut self) -> Result<(), BridgeError> {
            Ok(())
        }
    }

    fn detection_json(uas_id: &str) -> String {
        format!(
            r#"{{"SN": "N1", "UASID": "{uas_id}", "DroneType": "Quad",
                "Latitude": 10.0, "Longitude": 20.0, "Height": 50.0,
                "Direction": 90, "SpeedHorizontal": 5.0,
                "OperatorLatitude": 0, "OperatorLongitude": 0}}"#
        )
    }

    #[tokio::test]
    async fn test_loop_processes_in_order_and_commits() {
        let source = MemorySource::new(vec![
            detection_json("DJI0001").into(),
            detection_json("DJI0002").into(),
        ]);
        let commits = source.commit_count();
        let (transport, sent, documents) = CaptureTransport::new(false);

        let mut bridge = BridgeLoop::new(source, Box::new(transport), LoopConfig::default());
        assert_eq!(bridge.state(), LoopState::Idle);

        let stats = bridge.run(CancellationToken::new()).await;

        assert_eq!(bridge.state(), LoopState::Stopped);
        assert_eq!(stats.messages_fetched, 2);
        assert_eq!(stats.sends_ok, 2);
        assert_eq!(sent.load(Ordering::SeqCst), 2);
        assert_eq!(commits.load(Ordering::SeqCst), 2);

        // Order preserved: first document carries the first identifier
        let docs = documents.lock().unwrap();
        let first = String::from_utf8(docs[0].clone()).unwrap();
        assert!(first.contains("DJI0001"));
    }

    #[tokio::test]
    async fn test_send_failure_still_commits() {
        let source = MemorySource::new(vec![detection_json("DJI0003").into()]);
        let commits = source.commit_count();
        let (transport, _, _) = CaptureTransport::new(true);

        let mut bridge = BridgeLoop::new(source, Box::new(transport), LoopConfig::default());
        let stats = bridge.run(CancellationToken::new()).await;

        assert_eq!(stats.send_failures, 1);
        assert_eq!(stats.commits, 1);
        assert_eq!(commits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_malformed_message_skipped_and_committed() {
        let source = MemorySource::new(vec![
            bytes::Bytes::from_static(b"this is not json"),
            detection_json("DJI0004").into(),
        ]);
        let commits = source.commit_count();
        let (transport, sent, _) = CaptureTransport::new(false);

        let mut bridge = BridgeLoop::new(source, Box::new(transport), LoopConfig::default());
        let stats = bridge.run(CancellationToken::new()).await;

        assert_eq!(stats.parse_failures, 1);
        assert_eq!(sent.load(Ordering::SeqCst), 1);
        // Both the bad and the good message were acknowledged
        assert_eq!(commits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cancel_before_fetch_stops_cleanly() {
        let source = MemorySource::new(vec![detection_json("DJI0005").into()]);
        let (transport, sent, _) = CaptureTransport::new(false);

        let cancel = CancellationToken::new();
        cancel.cancel();

        let mut bridge = BridgeLoop::new(source, Box::new(transport), LoopConfig::default());
        let stats = bridge.run(cancel).await;

        assert_eq!(bridge.state(), LoopState::Stopped);
        assert_eq!(stats.messages_fetched, 0);
        assert_eq!(sent.load(Ordering::SeqCst), 0);
    }

    /// Recorder capturing the name of every incremented counter.
    #[derive(Default)]
    struct CapturingRecorder {
        incremented: Arc<std::sync::Mutex<Vec<String>>>,
    }

    struct CapturingCounter {
        name: String,
        incremented: Arc<std::sync::Mutex<Vec<String>>>,
    }

    impl metrics::CounterFn for CapturingCounter {
        fn increment(&self, _value: u64) {
            self.incremented.lock().unwrap().push(self.name.clone());
        }

        fn absolute(&self, _value: u64) {}
    }

    impl metrics::Recorder for CapturingRecorder {
        fn describe_counter(
            &self,
            _: metrics::KeyName,
            _: Option<metrics::Unit>,
            _: metrics::SharedString,
        ) {
        }
        fn describe_gauge(
            &self,
            _: metrics::KeyName,
            _: Option<metrics::Unit>,
            _: metrics::SharedString,
        ) {
        }
        fn describe_histogram(
            &self,
            _: metrics::KeyName,
            _: Option<metrics::Unit>,
            _: metrics::SharedString,
        ) {
        }

        fn register_counter(
            &self,
            key: &metrics::Key,
            _: &metrics::Metadata<'_>,
        ) -> metrics::Counter {
            metrics::Counter::from_arc(Arc::new(CapturingCounter {
                name: key.name().to_string(),
                incremented: Arc::clone(&self.incremented),
            }))
        }

        fn register_gauge(&self, _: &metrics::Key, _: &metrics::Metadata<'_>) -> metrics::Gauge {
            metrics::Gauge::noop()
        }

        fn register_histogram(
            &self,
            _: &metrics::Key,
            _: &metrics::Metadata<'_>,
        ) -> metrics::Histogram {
            metrics::Histogram::noop()
        }
    }

    // Plain #[test] with a local runtime so the loop runs on the thread
    // that holds the local recorder.
    #[test]
    fn test_loop_records_prometheus_series() {
        let recorder = CapturingRecorder::default();
        let incremented = Arc::clone(&recorder.incremented);

        metrics::with_local_recorder(&recorder, || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let source = MemorySource::new(vec![
                    detection_json("DJI0007").into(),
                    bytes::Bytes::from_static(b"not json"),
                ]);
                let (transport, _, _) = CaptureTransport::new(false);
                let mut bridge =
                    BridgeLoop::new(source, Box::new(transport), LoopConfig::default());
                bridge.run(CancellationToken::new()).await;
            });
        });

        let names = incremented.lock().unwrap();
        for expected in [
            "bridge_messages_fetched_total",
            "bridge_events_sent_total",
            "bridge_parse_failures_total",
        ] {
            assert!(
                names.iter().any(|n| n == expected),
                "missing series {expected}"
            );
        }
    }

    #[tokio::test]
    async fn test_fetch_error_is_retried() {
        let mut source = MemorySource::new(vec![detection_json("DJI0006").into()]);
        source.push_front_error("broker hiccup");
        let commits = source.commit_count();
        let (transport, sent, _) = CaptureTransport::new(false);

        let mut bridge = BridgeLoop::new(
            source,
            Box::new(transport),
            LoopConfig {
                fetch_retry_secs: 1,
            },
        );

        // Virtual clock so the retry pause costs nothing
        tokio::time::pause();
        let stats = bridge.run(CancellationToken::new()).await;

        assert_eq!(stats.fetch_errors, 1);
        assert_eq!(sent.load(Ordering::SeqCst), 1);
        assert_eq!(commits.load(Ordering::SeqCst), 1);
    }
}
