//! UnicastTransport - UDP fire-and-forget to a caller-supplied endpoint

use std::net::SocketAddr;
use std::sync::Arc;

use contracts::{BridgeError, Transport};
use tokio::net::{lookup_host, UdpSocket};
use tracing::{debug, instrument};

use crate::metrics::TransportMetrics;

/// Transport that sends each event as one UDP datagram to a fixed
/// host:port. A single best-effort write per event, never retried.
pub struct UnicastTransport {
    name: String,
    target: SocketAddr,
    socket: Option<UdpSocket>,
    metrics: Arc<TransportMetrics>,
}

impl UnicastTransport {
    /// Resolve the target and bind a connected UDP socket.
    ///
    /// # Errors
    /// Resolution or bind failure is a fatal setup error; the bridge must
    /// not start without a working channel.
    #[instrument(name = "unicast_transport_new", skip(host))]
    pub async fn new(host: &str, port: u16) -> Result<Self, BridgeError> {
        let target = resolve(host, port, "unicast").await?;
        let socket = connect_udp(target, "unicast").await?;

        debug!(target = %target, "UnicastTransport connected");

        Ok(Self {
            name: "unicast".to_string(),
            target,
            socket: Some(socket),
            metrics: Arc::new(TransportMetrics::new()),
        })
    }

    /// Remote endpoint this transport is bound to.
    pub fn target(&self) -> SocketAddr {
        self.target
    }

    /// Shared counters for this transport.
    pub fn metrics(&self) -> &Arc<TransportMetrics> {
        &self.metrics
    }

    fn socket(&self) -> Result<&UdpSocket, BridgeError> {
        self.socket
            .as_ref()
            .ok_or_else(|| BridgeError::transport_send(&self.name, "socket closed"))
    }
}

impl Transport for UnicastTransport {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "unicast_transport_send",
        skip(self, document),
        fields(transport = %self.name, bytes = document.len())
    )]
    async fn send(&mut self, document: &[u8]) -> Result<(), BridgeError> {
        let socket = self.socket()?;
        match socket.send(document).await {
            Ok(sent) => {
                self.metrics.inc_send_count();
                debug!(transport = %self.name, bytes = sent, "Sent");
                Ok(())
            }
            Err(e) => {
                self.metrics.inc_failure_count();
                Err(BridgeError::transport_send(&self.name, e.to_string()))
            }
        }
    }

    #[instrument(name = "unicast_transport_close", skip(self))]
    async fn close(&mut self) -> Result<(), BridgeError> {
        self.socket = None;
        debug!(transport = %self.name, "UnicastTransport closed");
        Ok(())
    }
}

/// Resolve `host:port` to the first usable address.
pub(crate) async fn resolve(
    host: &str,
    port: u16,
    transport: &str,
) -> Result<SocketAddr, BridgeError> {
    let query = format!("{host}:{port}");
    let addr = lookup_host(&query)
        .await
        .map_err(|e| BridgeError::transport_setup(transport, format!("resolve '{query}': {e}")))?
        .next()
        .ok_or_else(|| {
            BridgeError::transport_setup(transport, format!("'{query}' resolved to no addresses"))
        });
    addr
}

/// Bind an ephemeral local port and connect it to the target.
pub(crate) async fn connect_udp(
    target: SocketAddr,
    transport: &str,
) -> Result<UdpSocket, BridgeError> {
    let bind_addr = if target.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
    let socket = UdpSocket::bind(bind_addr)
        .await
        .map_err(|e| BridgeError::transport_setup(transport, format!("bind: {e}")))?;
    socket
        .connect(target)
        .await
        .map_err(|e| BridgeError::transport_setup(transport, format!("connect {target}: {e}")))?;
    Ok(socket)
}
