//! # CoT Encoder
//!
//! Pure translation from a `DetectionRecord` to a Cursor-on-Target event
//! document. No I/O, no shared state: given the same record and the same
//! clock reading, the output bytes are identical.
//!
//! The split mirrors the event's own shape:
//! - [`classify`] - the (provisional) type-classification decision
//! - [`event`] - the typed event model and all derivation rules
//! - [`xml`] - quick-xml serialization with the standalone declaration
//! - [`encoder`] - the public encode entry points

pub mod classify;
pub mod encoder;
pub mod event;
pub mod xml;

pub use classify::TrackClassification;
pub use encoder::{encode, encode_at};
pub use event::{CotDetail, CotEvent, CotLink, CotPoint, CotTrack};
