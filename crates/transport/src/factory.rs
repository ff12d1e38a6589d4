//! Transport construction from configuration

use contracts::{BoxedTransport, BridgeError, TransportConfig, TransportMode};
use tracing::instrument;

use crate::{MulticastTransport, StreamTransport, UnicastTransport};

/// Build the configured transport variant.
///
/// The mode set is closed; configuration validation has already rejected
/// unknown selectors and missing endpoint parameters, but the host check
/// is repeated here so the factory is safe to call with a hand-built
/// config.
///
/// # Errors
/// Any failure here is a fatal startup error; the bridge never runs
/// with a transport it could not construct.
#[instrument(
    name = "transport_build",
    skip(config),
    fields(mode = %config.mode)
)]
pub async fn build_transport(config: &TransportConfig) -> Result<BoxedTransport, BridgeError> {
    match config.mode {
        TransportMode::Multicast => {
            let transport = MulticastTransport::new().await?;
            Ok(Box::new(transport))
        }
        TransportMode::DirectUnicast => {
            let host = require_host(config)?;
            let transport = UnicastTransport::new(host, config.effective_port()).await?;
            Ok(Box::new(transport))
        }
        TransportMode::ReliableStream => {
            let host = require_host(config)?;
            let transport = StreamTransport::connect(host, config.effective_port()).await?;
            Ok(Box::new(transport))
        }
    }
}

fn require_host(config: &TransportConfig) -> Result<&str, BridgeError> {
    match config.host.as_deref() {
        Some(host) if !host.is_empty() => Ok(host),
        _ => Err(BridgeError::config_validation(
            "transport.host",
            format!("host is required for mode '{}'", config.mode),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_multicast() {
        let config = TransportConfig {
            mode: TransportMode::Multicast,
            host: None,
            port: None,
        };
        let transport = build_transport(&config).await.unwrap();
        assert_eq!(transport.name(), "multicast");
    }

    #[tokio::test]
    async fn test_build_unicast_with_default_port() {
        let config = TransportConfig {
            mode: TransportMode::DirectUnicast,
            host: Some("127.0.0.1".to_string()),
            port: None,
        };
        let transport = build_transport(&config).await.unwrap();
        assert_eq!(transport.name(), "unicast");
    }

    #[tokio::test]
    async fn test_build_without_host_fails() {
        let config = TransportConfig {
            mode: TransportMode::DirectUnicast,
            host: None,
            port: None,
        };
        let result = build_transport(&config).await;
        assert!(matches!(result, Err(BridgeError::ConfigValidation { .. })));
    }
}
