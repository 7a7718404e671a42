//! Meridian SMS - Message dispatch over IMS
//!
//! This crate implements the outbound message dispatcher:
//! - Token-keyed tracking of in-flight messages
//! - Bounded retry and circuit-switched fallback policy
//! - Status report reconciliation and acknowledgement
//! - Availability gating on service / registration / capability state

pub mod dispatcher;
pub mod tracker;
pub mod transport;

pub use dispatcher::*;
pub use tracker::*;
pub use transport::*;
