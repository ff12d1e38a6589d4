//! Configuration validation module
//!
//! Validation rules:
//! - reliable-stream / direct-unicast require a host
//! - multicast takes no host/port overrides (group is fixed)
//! - port, when given, must be non-zero
//! - fetch_retry_secs must be non-zero

use contracts::{BridgeConfig, BridgeError, TransportMode};

/// Validate a BridgeConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &BridgeConfig) -> Result<(), BridgeError> {
    validate_transport(config)?;
    validate_loop(config)?;
    Ok(())
}

/// Validate the transport selection
fn validate_transport(config: &BridgeConfig) -> Result<(), BridgeError> {
    let transport = &config.transport;

    match transport.mode {
        TransportMode::ReliableStream | TransportMode::DirectUnicast => {
            match transport.host.as_deref() {
                Some(host) if !host.is_empty() => {}
                _ => {
                    return Err(BridgeError::config_validation(
                        "transport.host",
                        format!("host is required for mode '{}'", transport.mode),
                    ));
                }
            }
        }
        TransportMode::Multicast => {
            // The group address and port are fixed; rejecting overrides
            // keeps a stale host line from silently doing nothing.
            if transport.host.is_some() {
                return Err(BridgeError::config_validation(
                    "transport.host",
                    "multicast mode uses the fixed group address, host must not be set",
                ));
            }
            if transport.port.is_some() {
                return Err(BridgeError::config_validation(
                    "transport.port",
                    "multicast mode uses the fixed group port, port must not be set",
                ));
            }
        }
    }

    if let Some(port) = transport.port {
        if port == 0 {
            return Err(BridgeError::config_validation(
                "transport.port",
                "port must be non-zero",
            ));
        }
    }

    Ok(())
}

/// Validate delivery loop tuning
fn validate_loop(config: &BridgeConfig) -> Result<(), BridgeError> {
    if config.bridge.fetch_retry_secs == 0 {
        return Err(BridgeError::config_validation(
            "bridge.fetch_retry_secs",
            "fetch_retry_secs must be >= 1",
        ));
    }
    Ok(())
}
