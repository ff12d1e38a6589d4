//! MulticastTransport - UDP to the fixed well-known group

use std::net::SocketAddr;
use std::sync::Arc;

use contracts::{BridgeError, Transport, MULTICAST_GROUP, MULTICAST_PORT};
use tokio::net::UdpSocket;
use tracing::{debug, instrument};

use crate::metrics::TransportMetrics;
use crate::unicast::connect_udp;

/// Transport broadcasting each event to the well-known situational-
/// awareness multicast group. Same fire-and-forget semantics as unicast;
/// the group address is a protocol constant, not configuration.
pub struct MulticastTransport {
    name: String,
    group: SocketAddr,
    socket: Option<UdpSocket>,
    metrics: Arc<TransportMetrics>,
}

impl MulticastTransport {
    /// Bind a connected UDP socket to the fixed group.
    #[instrument(name = "multicast_transport_new")]
    pub async fn new() -> Result<Self, BridgeError> {
        let group: SocketAddr = format!("{MULTICAST_GROUP}:{MULTICAST_PORT}")
            .parse()
            .map_err(|e| {
                BridgeError::transport_setup("multicast", format!("group address: {e}"))
            })?;
        let socket = connect_udp(group, "multicast").await?;

        debug!(group = %group, "MulticastTransport connected");

        Ok(Self {
            name: "multicast".to_string(),
            group,
            socket: Some(socket),
            metrics: Arc::new(TransportMetrics::new()),
        })
    }

    /// The fixed group endpoint.
    pub fn group(&self) -> SocketAddr {
        self.group
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

impl Transport for MulticastTransport {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "multicast_transport_send",
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

    #[instrument(name = "multicast_transport_close", skip(self))]
    async fn close(&mut self) -> Result<(), BridgeError> {
        self.socket = None;
        debug!(transport = %self.name, "MulticastTransport closed");
        Ok(())
    }
}
