//! Meridian Core - Fundamental types and primitives
//!
//! This crate defines the core types used throughout Meridian:
//! - Identifiers (SlotId, ZoneId)
//! - Network time signals (NitzData, NitzSignal, TimestampedUtc)
//! - Country code tri-state
//! - Zone lookup result types and quality classification
//! - Time / time zone suggestions
//! - Error types

pub mod country;
pub mod error;
pub mod id;
pub mod lookup;
pub mod signal;
pub mod suggestion;

pub use country::*;
pub use error::*;
pub use id::*;
pub use lookup::*;
pub use signal::*;
pub use suggestion::*;
