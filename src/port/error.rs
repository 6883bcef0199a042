//! Transport-level error types.
//!
//! Errors for the serial transport seam, kept separate from the
//! controller-level errors so the two layers stay independently testable.

use thiserror::Error;

/// Errors that can occur on the serial transport.
#[derive(Debug, Error)]
pub enum PortError {
    /// The named serial port does not exist on this system.
    #[error("serial port not found: {0}")]
    NotFound(String),

    /// An I/O error occurred while talking to the port.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A read did not produce a byte within its timeout.
    #[error("read timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The transport is not open.
    #[error("port is not open")]
    NotOpen,

    /// A serialport-specific error occurred.
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

impl PortError {
    /// Create a NotFound error from a port name.
    pub fn not_found(port_name: impl Into<String>) -> Self {
        Self::NotFound(port_name.into())
    }

    /// Create a Timeout error from a duration.
    pub fn timeout(duration: std::time::Duration) -> Self {
        Self::Timeout(duration)
    }
}
