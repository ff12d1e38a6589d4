//! BridgeConfig - Config Loader output
//!
//! Describes the complete bridge configuration: transport selection with
//! mode-specific endpoint parameters, plus loop tuning.

use serde::{Deserialize, Serialize};

/// Fixed multicast group used by the `multicast` transport mode.
///
/// Well-known situational-awareness group; deliberately not configurable.
pub const MULTICAST_GROUP: &str = "239.2.3.1";

/// Fixed multicast port paired with [`MULTICAST_GROUP`].
pub const MULTICAST_PORT: u16 = 6969;

/// Default TCP port for the reliable-stream mode.
pub const DEFAULT_STREAM_PORT: u16 = 8088;

/// Default UDP port for the direct-unicast mode.
pub const DEFAULT_UNICAST_PORT: u16 = 6969;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete bridge configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Outbound transport selection
    pub transport: TransportConfig,

    /// Delivery loop tuning
    #[serde(default)]
    pub bridge: LoopConfig,
}

/// Transport mode selector
///
/// Closed set; an unrecognized or missing value fails configuration
/// parsing before any I/O is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransportMode {
    /// TCP connection to a CoT server, reconnect-once on send failure
    ReliableStream,
    /// UDP to a caller-supplied host:port, fire-and-forget
    DirectUnicast,
    /// UDP to the fixed well-known multicast group, fire-and-forget
    Multicast,
}

impl TransportMode {
    /// Default port for modes with a configurable endpoint.
    pub fn default_port(self) -> Option<u16> {
        match self {
            Self::ReliableStream => Some(DEFAULT_STREAM_PORT),
            Self::DirectUnicast => Some(DEFAULT_UNICAST_PORT),
            Self::Multicast => None,
        }
    }
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::ReliableStream => "reliable-stream",
            Self::DirectUnicast => "direct-unicast",
            Self::Multicast => "multicast",
        };
        write!(f, "{name}")
    }
}

/// Transport endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Mode selector; required
    pub mode: TransportMode,

    /// Remote host for reliable-stream / direct-unicast
    #[serde(default)]
    pub host: Option<String>,

    /// Remote port; defaults per mode (8088 stream, 6969 unicast)
    #[serde(default)]
    pub port: Option<u16>,
}

impl TransportConfig {
    /// The effective port after applying the mode default.
    pub fn effective_port(&self) -> u16 {
        self.port
            .or_else(|| self.mode.default_port())
            .unwrap_or(MULTICAST_PORT)
    }
}

/// Delivery loop tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopConfig {
    /// Pause between retries after an upstream fetch error (seconds)
    #[serde(default = "default_fetch_retry_secs")]
    pub fetch_retry_secs: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            fetch_retry_secs: default_fetch_retry_secs(),
        }
    }
}

fn default_fetch_retry_secs() -> u64 {
    1
}
