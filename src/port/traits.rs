//! Core trait for the serial transport seam.
//!
//! Defines the `SerialTransport` trait that allows both real serial ports
//! and mock implementations to be used interchangeably by the controller.

use super::error::PortError;
use std::time::Duration;

/// Byte-oriented serial transport.
///
/// The relay protocol exchanges single-byte commands and responses over a
/// half-duplex link, so the transport surface is deliberately narrow: write
/// one byte, read one byte with a timeout, and report open/closed state.
pub trait SerialTransport: Send + std::fmt::Debug {
    /// Write a single byte to the port.
    ///
    /// Returns the number of bytes actually written; the caller is
    /// responsible for treating anything other than 1 as a failure.
    fn write_byte(&mut self, byte: u8) -> Result<usize, PortError>;

    /// Read a single byte, waiting at most `timeout` for it to arrive.
    fn read_byte(&mut self, timeout: Duration) -> Result<u8, PortError>;

    /// Whether the transport currently holds an open handle.
    fn is_open(&self) -> bool;

    /// Release the underlying handle.
    ///
    /// After a successful close, `is_open` must report `false`. A driver
    /// that fails to release the handle is reported through `is_open`
    /// staying `true`, not through the returned `Result`.
    fn close(&mut self) -> Result<(), PortError>;

    /// Get the name/path of this transport.
    fn name(&self) -> &str;
}
