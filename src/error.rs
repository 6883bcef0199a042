//! Controller-level error taxonomy.
//!
//! Every failure is surfaced to the caller immediately; there is no retry
//! or suppression anywhere in the protocol layer. The caller decides
//! whether to retry the whole operation.

use crate::port::PortError;
use thiserror::Error;

/// Errors produced by the relay controller.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The transport did not report open after a connect attempt.
    #[error("device did not report open after connecting to {port}")]
    Connect { port: String },

    /// The transport still reports open after a close attempt.
    #[error("device still reports open after closing {port}")]
    Close { port: String },

    /// Open or set-port was attempted on an already-connected controller.
    #[error("port is already open")]
    AlreadyOpen,

    /// A transport read or write failed.
    #[error("transport I/O failed: {0}")]
    Io(#[from] PortError),

    /// A write reported a byte count other than one.
    #[error("write completed {written} bytes instead of 1")]
    ShortWrite { written: usize },

    /// A step of the identification handshake failed.
    #[error("handshake failed: {source}")]
    Handshake {
        #[source]
        source: Box<RelayError>,
    },

    /// A per-relay state slice did not match the board's relay count.
    #[error("expected {expected} relay states, got {actual}")]
    RelayCount { expected: usize, actual: usize },
}

impl RelayError {
    /// Wrap an I/O-class failure as a handshake failure.
    ///
    /// Lifecycle errors pass through unchanged so a caller can still tell
    /// a closed port from a board that went silent mid-handshake.
    pub(crate) fn into_handshake(self) -> Self {
        match self {
            e @ (Self::Io(_) | Self::ShortWrite { .. }) => Self::Handshake {
                source: Box::new(e),
            },
            other => other,
        }
    }
}

/// Convenient result alias for controller operations.
pub type RelayResult<T> = Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = RelayError::Connect {
            port: "/dev/ttyACM0".into(),
        };
        assert!(err.to_string().contains("/dev/ttyACM0"));

        let err = RelayError::RelayCount {
            expected: 8,
            actual: 4,
        };
        assert_eq!(err.to_string(), "expected 8 relay states, got 4");
    }

    #[test]
    fn test_into_handshake_wraps_io() {
        let err = RelayError::Io(PortError::NotOpen).into_handshake();
        assert!(matches!(err, RelayError::Handshake { .. }));
    }

    #[test]
    fn test_into_handshake_passes_lifecycle_through() {
        let err = RelayError::AlreadyOpen.into_handshake();
        assert!(matches!(err, RelayError::AlreadyOpen));
    }

    #[test]
    fn test_handshake_source_chain() {
        use std::error::Error;

        let err = RelayError::Io(PortError::NotOpen).into_handshake();
        let source = err.source().expect("handshake error carries a source");
        assert!(source.to_string().contains("not open"));
    }
}
