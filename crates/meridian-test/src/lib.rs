//! Meridian Test Harness - Fakes and end-to-end scenarios
//!
//! This crate provides:
//! - Controllable device clock and wake lock fakes
//! - Scriptable zone lookup tables
//! - Recording time service and SMS network fakes
//! - End-to-end detection and dispatch scenario tests

pub mod device;
pub mod lookup;
pub mod network;
pub mod service;
pub mod scenario;

pub use device::*;
pub use lookup::*;
pub use network::*;
pub use scenario::*;
pub use service::*;
