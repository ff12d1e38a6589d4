//! CotEvent - typed event model and derivation rules
//!
//! `CotEvent::from_detection` is where every field of the wire document is
//! decided; serialization in [`crate::xml`] is mechanical after this.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use contracts::DetectionRecord;

use crate::classify::classify_track;

/// Event schema version carried in the `version` attribute.
pub const EVENT_VERSION: &str = "2.0";

/// UID namespace for detected aerial systems.
pub const UID_NAMESPACE: &str = "Corvus.UAS.";

/// UID namespace for linked ground operators.
pub const OPERATOR_UID_NAMESPACE: &str = "Corvus.OP.";

/// `how` attribute: machine-generated position.
pub const HOW_MACHINE_GENERATED: &str = "m-g";

/// Event validity window; receivers discard the event past `stale`.
pub const VALIDITY_SECONDS: i64 = 120;

/// Circular error of the primary position block (meters).
pub const POSITION_CE: f64 = 10.0;

/// Linear error of the primary position block (meters).
pub const POSITION_LE: f64 = 15.0;

/// Uncertainty radii of the operator position block (meters).
pub const OPERATOR_CE_LE: f64 = 20.0;

/// Relation code of the operator link: parent-point.
pub const OPERATOR_RELATION: &str = "p-p";

/// CoT type of the operator link entity: neutral, ground.
pub const OPERATOR_TYPE: &str = "a-n-G";

/// A complete CoT event document, ready for serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct CotEvent {
    pub uid: String,
    pub cot_type: &'static str,
    pub time: String,
    pub start: String,
    pub stale: String,
    pub point: CotPoint,
    pub detail: CotDetail,
}

/// Position block with fixed uncertainty radii.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CotPoint {
    pub lat: f64,
    pub lon: f64,
    pub hae: f64,
    pub ce: f64,
    pub le: f64,
}

/// Detail block: contact, remarks, optional motion, optional operator link.
#[derive(Debug, Clone, PartialEq)]
pub struct CotDetail {
    pub callsign: String,
    pub remarks: String,
    pub track: Option<CotTrack>,
    pub link: Option<CotLink>,
}

/// Motion block; present only for moving tracks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CotTrack {
    pub course: f64,
    pub speed: f64,
}

/// Linked ground-operator entity.
#[derive(Debug, Clone, PartialEq)]
pub struct CotLink {
    pub uid: String,
    pub link_type: &'static str,
    pub relation: &'static str,
    pub point: CotPoint,
}

impl CotEvent {
    /// Derive an event from a detection at the given clock reading.
    ///
    /// Timestamps are always `now`; the record's own timestamp is not
    /// replayed. The UID depends on the aerial-system identifier alone,
    /// so re-detections of the same airframe update one track.
    pub fn from_detection(record: &DetectionRecord, now: DateTime<Utc>) -> Self {
        let stale = now + Duration::seconds(VALIDITY_SECONDS);
        let issue = format_cot_time(now);

        let track = (record.speed_horizontal > 0.0).then(|| CotTrack {
            course: f64::from(record.direction),
            speed: record.speed_horizontal,
        });

        let link = record.has_operator_position().then(|| CotLink {
            uid: format!("{OPERATOR_UID_NAMESPACE}{}", record.uas_id),
            link_type: OPERATOR_TYPE,
            relation: OPERATOR_RELATION,
            point: CotPoint {
                lat: record.operator_latitude,
                lon: record.operator_longitude,
                hae: 0.0,
                ce: OPERATOR_CE_LE,
                le: OPERATOR_CE_LE,
            },
        });

        Self {
            uid: format!("{UID_NAMESPACE}{}", record.uas_id),
            cot_type: classify_track(record).as_cot_type(),
            time: issue.clone(),
            start: issue,
            stale: format_cot_time(stale),
            point: CotPoint {
                lat: record.latitude,
                lon: record.longitude,
                hae: record.height,
                ce: POSITION_CE,
                le: POSITION_LE,
            },
            detail: CotDetail {
                callsign: format!("UAS-{}", record.uas_id.suffix()),
                remarks: build_remarks(record),
                track,
                link,
            },
        }
    }
}

/// RFC 3339 with seconds precision and a Z suffix, the form CoT receivers
/// expect.
fn format_cot_time(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Fixed-order human-readable remarks shown on the receiving display.
fn build_remarks(record: &DetectionRecord) -> String {
    format!(
        "Remote-ID Detection\n\
         Node: {node}\n\
         UAS: {uas}\n\
         Type: {drone_type}\n\
         Speed: {speed:.1} m/s @ {direction}\u{b0}\n\
         Height: {height:.0} m",
        node = record.reporting_node(),
        uas = record.uas_id,
        drone_type = record.drone_type,
        speed = record.speed_horizontal,
        direction = record.direction,
        height = record.height,
    )
}
