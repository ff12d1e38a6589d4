//! DetectionRecord - one sensor-reported drone observation
//!
//! Deserialized from the upstream queue's JSON payload. The wire field
//! names (`SN`, `UASID`, ...) come from the sensor-node firmware and are
//! fixed; everything downstream uses the Rust names.

use serde::{Deserialize, Serialize};

use crate::UasId;

/// One observed drone position/identity sample.
///
/// Immutable once handed to the encoder; the encoder never mutates its
/// input. Latitude/longitude 0.0 is a valid "unknown" sentinel, and
/// operator coordinates of exactly 0.0/0.0 mean "no operator location
/// known".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionRecord {
    /// Sensor-node serial number
    #[serde(rename = "SN")]
    pub sn: String,

    /// Unique aerial-system identifier (length varies by vendor)
    #[serde(rename = "UASID")]
    pub uas_id: UasId,

    /// Free-text drone type label
    #[serde(rename = "DroneType", default)]
    pub drone_type: String,

    /// Course over ground in integer degrees, 0-359
    #[serde(rename = "Direction", default)]
    pub direction: i32,

    /// Horizontal speed (m/s, non-negative)
    #[serde(rename = "SpeedHorizontal", default)]
    pub speed_horizontal: f64,

    /// Vertical speed (m/s, signed)
    #[serde(rename = "SpeedVertical", default)]
    pub speed_vertical: f64,

    /// Latitude in signed degrees (0.0 = unknown sentinel)
    #[serde(rename = "Latitude", default)]
    pub latitude: f64,

    /// Longitude in signed degrees (0.0 = unknown sentinel)
    #[serde(rename = "Longitude", default)]
    pub longitude: f64,

    /// Height above ellipsoid (meters)
    #[serde(rename = "Height", default)]
    pub height: f64,

    /// Operator latitude (0.0/0.0 pair = no operator location)
    #[serde(rename = "OperatorLatitude", default)]
    pub operator_latitude: f64,

    /// Operator longitude (0.0/0.0 pair = no operator location)
    #[serde(rename = "OperatorLongitude", default)]
    pub operator_longitude: f64,

    /// Optional payload signature from the sensor node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,

    /// Optional reporting node identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,

    /// Optional detection timestamp, ISO-8601. Filled with "now" by the
    /// delivery loop when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl DetectionRecord {
    /// True when the record carries a usable operator position.
    pub fn has_operator_position(&self) -> bool {
        self.operator_latitude != 0.0 && self.operator_longitude != 0.0
    }

    /// The identifier to report as the detecting node: `node_id` when the
    /// packet carries one, otherwise the sensor serial number.
    pub fn reporting_node(&self) -> &str {
        match self.node_id.as_deref() {
            Some(node) if !node.is_empty() => node,
            _ => &self.sn,
        }
    }
}
