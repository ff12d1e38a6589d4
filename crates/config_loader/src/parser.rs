//! Configuration parsing module
//!
//! Supports TOML (primary) and JSON (optional) formats.

use contracts::{BridgeConfig, BridgeError};

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML format (recommended)
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    /// Infer format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parse TOML-format configuration
pub fn parse_toml(content: &str) -> Result<BridgeConfig, BridgeError> {
    toml::from_str(content).map_err(|e| BridgeError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse JSON-format configuration
pub fn parse_json(content: &str) -> Result<BridgeConfig, BridgeError> {
    serde_json::from_str(content).map_err(|e| BridgeError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse configuration according to format
pub fn parse(content: &str, format: ConfigFormat) -> Result<BridgeConfig, BridgeError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::TransportMode;

    #[test]
    fn test_parse_toml_minimal() {
        let content = r#"
[transport]
mode = "multicast"
"#;
        let result = parse_toml(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.transport.mode, TransportMode::Multicast);
        assert!(config.transport.host.is_none());
        assert_eq!(config.bridge.fetch_retry_secs, 1);
    }

    #[test]
    fn test_parse_json_minimal() {
        let content = r#"{
            "transport": {
                "mode": "direct-unicast",
                "host": "10.1.2.3",
                "port": 6970
            }
        }"#;
        let result = parse_json(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.transport.mode, TransportMode::DirectUnicast);
        assert_eq!(config.transport.port, Some(6970));
    }

    #[test]
    fn test_parse_unknown_mode_fails() {
        let content = r#"
[transport]
mode = "smoke-signals"
"#;
        assert!(parse_toml(content).is_err());
    }

    #[test]
    fn test_parse_loop_tuning() {
        let content = r#"
[transport]
mode = "multicast"

[bridge]
fetch_retry_secs = 5
"#;
        let config = parse_toml(content).unwrap();
        assert_eq!(config.bridge.fetch_retry_secs, 5);
    }
}
