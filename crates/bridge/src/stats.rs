//! Delivery loop statistics.

use std::time::Duration;

/// Statistics from a bridge run
#[derive(Debug, Clone, Default)]
pub struct BridgeStats {
    /// Total messages fetched from the upstream source
    pub messages_fetched: u64,

    /// Messages that failed to parse as a detection record
    pub parse_failures: u64,

    /// Detections that failed to encode (defensive path)
    pub encode_failures: u64,

    /// Events delivered to the transport successfully
    pub sends_ok: u64,

    /// Events the transport reported as failed (after its retry policy)
    pub send_failures: u64,

    /// Upstream commits issued (one per fetched message)
    pub commits: u64,

    /// Upstream fetch errors that were retried
    pub fetch_errors: u64,

    /// Total duration of the run
    pub duration: Duration,
}

impl BridgeStats {
    /// Events per second over the whole run
    pub fn throughput(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.sends_ok as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Send failure rate as percentage
    pub fn failure_rate(&self) -> f64 {
        let attempted = self.sends_ok + self.send_failures;
        if attempted > 0 {
            (self.send_failures as f64 / attempted as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n=== Bridge Statistics ===\n");
        println!("  Duration: {:.2}s", self.duration.as_secs_f64());
        println!("  Messages fetched: {}", self.messages_fetched);
        println!("  Events sent: {}", self.sends_ok);
        println!("  Send failures: {}", self.send_failures);
        println!("  Parse failures: {}", self.parse_failures);
        println!("  Encode failures: {}", self.encode_failures);
        println!("  Commits: {}", self.commits);
        println!("  Fetch errors retried: {}", self.fetch_errors);
        println!("  Throughput: {:.2} events/s", self.throughput());
        println!("  Failure rate: {:.2}%", self.failure_rate());
        println!();
    }
}
