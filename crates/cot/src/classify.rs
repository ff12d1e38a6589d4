//! Track type classification
//!
//! Provisional policy: a detection with no known operator position is
//! classified "unknown, airborne"; one with an operator position is
//! classified hostile. This is a stand-in for an authorization-database
//! lookup and is deliberately the only place the rule lives.

use contracts::DetectionRecord;

/// CoT affiliation/category assigned to a detected track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackClassification {
    /// Unknown affiliation, airborne
    UnknownAirborne,
    /// Hostile unmanned aerial system
    HostileUas,
}

impl TrackClassification {
    /// The CoT type string carried in the event's `type` attribute.
    pub fn as_cot_type(self) -> &'static str {
        match self {
            // a = atom, u = unknown, A = air
            Self::UnknownAirborne => "a-u-A",
            // a = atom, h = hostile, A = air, M = military,
            // F = fixed wing, Q = unmanned aerial system
            Self::HostileUas => "a-h-A-M-F-Q",
        }
    }
}

/// Classify a detection.
///
/// TODO: replace the operator-coordinate heuristic with the authorization
/// registry lookup once the registry service is deployed.
pub fn classify_track(record: &DetectionRecord) -> TrackClassification {
    if record.has_operator_position() {
        TrackClassification::HostileUas
    } else {
        TrackClassification::UnknownAirborne
    }
}
