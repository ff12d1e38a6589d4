//! Layered error definitions
//!
//! Categorized by source: config / input / encode / transport / source

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum BridgeError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Input Errors =====
    /// Upstream message failed to parse as a detection record
    #[error("detection parse error: {message}")]
    DetectionParse { message: String },

    // ===== Encoder Errors =====
    /// CoT serialization error (defensive path, should not occur for
    /// well-formed records)
    #[error("cot encode error for '{uas_id}': {message}")]
    Encode { uas_id: String, message: String },

    // ===== Transport Errors =====
    /// Transport could not be constructed (unresolvable address, failed
    /// initial connection). Fatal at startup.
    #[error("transport '{transport}' setup error: {message}")]
    TransportSetup { transport: String, message: String },

    /// Per-message send failure, reported upward, never fatal
    #[error("transport '{transport}' send error: {message}")]
    TransportSend { transport: String, message: String },

    // ===== Source Errors =====
    /// Upstream queue fetch failure (excluding cancellation)
    #[error("source fetch error: {message}")]
    SourceFetch { message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl BridgeError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create detection parse error
    pub fn detection_parse(message: impl Into<String>) -> Self {
        Self::DetectionParse {
            message: message.into(),
        }
    }

    /// Create encode error
    pub fn encode(uas_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Encode {
            uas_id: uas_id.into(),
            message: message.into(),
        }
    }

    /// Create transport setup error
    pub fn transport_setup(transport: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TransportSetup {
            transport: transport.into(),
            message: message.into(),
        }
    }

    /// Create transport send error
    pub fn transport_send(transport: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TransportSend {
            transport: transport.into(),
            message: message.into(),
        }
    }

    /// Create source fetch error
    pub fn source_fetch(message: impl Into<String>) -> Self {
        Self::SourceFetch {
            message: message.into(),
        }
    }

    /// True for errors that must abort startup rather than be skipped
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ConfigParse { .. } | Self::ConfigValidation { .. } | Self::TransportSetup { .. }
        )
    }
}
