//! Meridian NITZ Engine - Time and time zone detection from network signals
//!
//! This crate implements the detection core:
//! - Signal input filter (trivalent predicate chain with rate limiting)
//! - Time resolver (rate-limited clock suggestions)
//! - Time zone resolver (prioritized lookup cascade)
//! - Event-driven detection state machine
//! - Collaborator traits for the host platform

pub mod device;
pub mod filter;
pub mod log;
pub mod machine;
pub mod service;
pub mod time;
pub mod zone;

pub use device::*;
pub use filter::*;
pub use log::*;
pub use machine::*;
pub use service::*;
pub use time::*;
pub use zone::*;

#[cfg(test)]
pub(crate) mod testutil;
