//! Public encode entry points
//!
//! `encode` stamps the current wall clock; `encode_at` takes an explicit
//! clock reading so tests and replays stay deterministic.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use contracts::{BridgeError, DetectionRecord};

use crate::event::CotEvent;
use crate::xml;

/// Encode a detection into CoT wire bytes, stamped with the current time.
///
/// # Errors
/// Only when serialization itself fails, which for a well-formed record
/// should never happen; the error path exists so a malformed document can
/// be skipped instead of taking the loop down.
pub fn encode(record: &DetectionRecord) -> Result<Bytes, BridgeError> {
    encode_at(record, Utc::now())
}

/// Encode a detection at an explicit clock reading.
pub fn encode_at(record: &DetectionRecord, now: DateTime<Utc>) -> Result<Bytes, BridgeError> {
    let event = CotEvent::from_detection(record, now);
    xml::serialize(&event).map_err(|e| BridgeError::encode(record.uas_id.as_str(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_record(op_lat: f64, op_lon: f64) -> DetectionRecord {
        serde_json::from_str(&format!(
            r#"{{
                "SN": "N1", "UASID": "DJI0001", "DroneType": "Quad",
                "Latitude": 10.0, "Longitude": 20.0, "Height": 50.0,
                "Direction": 90, "SpeedHorizontal": 5.0,
                "OperatorLatitude": {op_lat}, "OperatorLongitude": {op_lon}
            }}"#
        ))
        .unwrap()
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_scenario_without_operator() {
        let bytes = encode_at(&sample_record(0.0, 0.0), fixed_now()).unwrap();
        let text = std::str::from_utf8(&bytes).unwrap();

        assert!(!text.contains("<link"));
        assert!(text.contains("<track course=\"90\" speed=\"5\"/>"));
        assert!(text.contains("type=\"a-u-A\""));
        assert!(text.contains("callsign=\"UAS-0001\""));
    }

    #[test]
    fn test_scenario_with_operator() {
        let bytes = encode_at(&sample_record(11.0, 21.0), fixed_now()).unwrap();
        let text = std::str::from_utf8(&bytes).unwrap();

        assert!(text.contains("<link uid=\"Corvus.OP.DJI0001\""));
        assert!(text.contains("lat=\"11\" lon=\"21\""));
        assert!(text.contains("type=\"a-h-A-M-F-Q\""));
    }

    #[test]
    fn test_encode_is_deterministic_at_fixed_clock() {
        let record = sample_record(0.0, 0.0);
        let a = encode_at(&record, fixed_now()).unwrap();
        let b = encode_at(&record, fixed_now()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_encode_does_not_mutate_input() {
        let record = sample_record(0.0, 0.0);
        let before = format!("{record:?}");
        let _ = encode_at(&record, fixed_now()).unwrap();
        assert_eq!(before, format!("{record:?}"));
    }
}
