//! StreamTransport - TCP connection to a CoT server, reconnect-once policy
//!
//! The live connection is an owned slot replaced only from the single
//! owning task; the delivery loop is the sole sender, so no locking exists
//! around it. On a write failure `send` makes exactly one reconnect attempt
//! and one retried write, then reports failure. A later `send` starts the
//! same one-shot recovery fresh.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use contracts::{BridgeError, Transport};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

use crate::metrics::TransportMetrics;
use crate::unicast::resolve;

/// Timeout for the initial connection at construction.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for the single in-band reconnect attempt.
const RECONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Transport writing events over a held TCP connection.
pub struct StreamTransport {
    name: String,
    addr: SocketAddr,
    // Owned connection slot; replaced wholesale on reconnect
    conn: TcpStream,
    metrics: Arc<TransportMetrics>,
}

impl StreamTransport {
    /// Resolve the server address and open the initial connection.
    ///
    /// # Errors
    /// Resolution or connection failure here is fatal; the bridge refuses
    /// to start against an unreachable server.
    #[instrument(name = "stream_transport_connect", skip(host))]
    pub async fn connect(host: &str, port: u16) -> Result<Self, BridgeError> {
        let addr = resolve(host, port, "stream").await?;
        let conn = dial(addr, CONNECT_TIMEOUT)
            .await
            .map_err(|e| BridgeError::transport_setup("stream", format!("connect {addr}: {e}")))?;

        debug!(server = %addr, "StreamTransport connected");

        Ok(Self {
            name: "stream".to_string(),
            addr,
            conn,
            metrics: Arc::new(TransportMetrics::new()),
        })
    }

    /// Remote server address.
    pub fn server_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Shared counters for this transport.
    pub fn metrics(&self) -> &Arc<TransportMetrics> {
        &self.metrics
    }

    async fn write_document(&mut self, document: &[u8]) -> std::io::Result<()> {
        self.conn.write_all(document).await?;
        self.conn.flush().await
    }

    /// One reconnect attempt, replacing the held connection on success.
    async fn reconnect(&mut self) -> std::io::Result<()> {
        self.metrics.inc_reconnect_count();
        let fresh = dial(self.addr, RECONNECT_TIMEOUT).await?;
        // Old connection is dropped here, closing it
        self.conn = fresh;
        Ok(())
    }
}

impl Transport for StreamTransport {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "stream_transport_send",
        skip(self, document),
        fields(transport = %self.name, bytes = document.len())
    )]
    async fn send(&mut self, document: &[u8]) -> Result<(), BridgeError> {
        let first_err = match self.write_document(document).await {
            Ok(()) => {
                self.metrics.inc_send_count();
                return Ok(());
            }
            Err(e) => e,
        };

        warn!(
            transport = %self.name,
            server = %self.addr,
            error = %first_err,
            "Write failed, attempting one reconnect"
        );

        if let Err(reconnect_err) = self.reconnect().await {
            observability::record_stream_reconnect(false);
            self.metrics.inc_failure_count();
            return Err(BridgeError::transport_send(
                &self.name,
                format!("send failed ({first_err}) and reconnect failed ({reconnect_err})"),
            ));
        }
        observability::record_stream_reconnect(true);

        match self.write_document(document).await {
            Ok(()) => {
                self.metrics.inc_send_count();
                debug!(transport = %self.name, "Retried write after reconnect succeeded");
                Ok(())
            }
            Err(retry_err) => {
                self.metrics.inc_failure_count();
                Err(BridgeError::transport_send(
                    &self.name,
                    format!("retried write after reconnect failed: {retry_err}"),
                ))
            }
        }
    }

    #[instrument(name = "stream_transport_close", skip(self))]
    async fn close(&mut self) -> Result<(), BridgeError> {
        if let Err(e) = self.conn.shutdown().await {
            debug!(transport = %self.name, error = %e, "Shutdown on close failed");
        }
        debug!(transport = %self.name, "StreamTransport closed");
        Ok(())
    }
}

async fn dial(addr: SocketAddr, limit: Duration) -> std::io::Result<TcpStream> {
    match timeout(limit, TcpStream::connect(addr)).await {
        Ok(result) => result,
        Err(_) => Err(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            format!("connect to {addr} timed out after {limit:?}"),
        )),
    }
}
