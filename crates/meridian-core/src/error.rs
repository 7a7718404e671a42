//! Error types for Meridian

use thiserror::Error;

/// Core Meridian errors
#[derive(Error, Debug)]
pub enum MeridianError {
    // Transport errors
    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Transport connection is not available")]
    TransportUnavailable,

    // Dispatcher protocol-integrity errors
    #[error("No in-flight message for token {0}")]
    UnknownToken(u32),

    #[error("No in-flight message for message reference {0}")]
    UnknownMessageRef(u8),

    #[error("Acknowledgement failed: {0}")]
    AckFailed(String),
}

/// Result type for Meridian operations
pub type MeridianResult<T> = Result<T, MeridianError>;
