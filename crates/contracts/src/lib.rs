//! # Contracts
//!
//! Frozen interface contracts, defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - CoT timestamps are always wall-clock UTC at encode time
//! - A `DetectionRecord`'s own timestamp is metadata, never replayed into events

mod config;
mod detection;
mod error;
mod source;
mod transport;
mod uas_id;

pub use config::*;
pub use detection::*;
pub use error::*;
pub use source::{DetectionSource, QueueMessage};
pub use transport::*;
pub use uas_id::UasId;
