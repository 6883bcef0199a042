//! Mock serial transport for testing.
//!
//! Provides a `MockTransport` that simulates a relay board's serial link
//! without hardware. Reads are scripted, writes are logged, and the common
//! failure modes (write error, read timeout, handle that refuses to close)
//! can be injected.

use super::error::PortError;
use super::traits::SerialTransport;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Inner state of the mock, protected by a mutex for interior mutability.
#[derive(Debug, Default)]
struct MockState {
    /// Bytes to be returned by subsequent reads.
    read_queue: VecDeque<u8>,
    /// Every byte successfully written, in order.
    write_log: Vec<u8>,
    /// Whether the transport reports itself open.
    open: bool,
    /// Fail the next write with a broken-pipe error.
    fail_next_write: bool,
    /// Make `close` keep the handle "open" (simulates a stuck driver).
    refuse_close: bool,
}

/// Mock transport implementation for testing.
///
/// Cloning shares the underlying state, so a test can keep one handle for
/// scripting and inspection while the controller owns the other as a boxed
/// trait object.
///
/// # Example
/// ```
/// use usbrelay_ctl::port::{MockTransport, SerialTransport};
/// use std::time::Duration;
///
/// let mut port = MockTransport::new("MOCK0");
/// port.enqueue_read(&[0xAC]);
///
/// let byte = port.read_byte(Duration::from_millis(500)).unwrap();
/// assert_eq!(byte, 0xAC);
///
/// port.write_byte(0x50).unwrap();
/// assert_eq!(port.write_log(), vec![0x50]);
/// ```
#[derive(Clone)]
pub struct MockTransport {
    /// The port name/identifier.
    name: String,
    /// Shared state.
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Create a new mock transport that reports itself open.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(MockState {
                open: true,
                ..Default::default()
            })),
        }
    }

    /// Create a mock that never reports itself open.
    ///
    /// Useful for exercising the controller's post-open verification.
    pub fn closed(name: impl Into<String>) -> Self {
        let mock = Self::new(name);
        mock.state.lock().unwrap().open = false;
        mock
    }

    /// Enqueue bytes to be returned by subsequent reads.
    pub fn enqueue_read(&mut self, data: &[u8]) {
        let mut state = self.state.lock().unwrap();
        state.read_queue.extend(data);
    }

    /// Get a copy of every byte written so far.
    pub fn write_log(&self) -> Vec<u8> {
        let state = self.state.lock().unwrap();
        state.write_log.clone()
    }

    /// Get the most recently written byte.
    pub fn last_written(&self) -> Option<u8> {
        let state = self.state.lock().unwrap();
        state.write_log.last().copied()
    }

    /// Clear the write log.
    pub fn clear_write_log(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.write_log.clear();
    }

    /// Make the next write fail with a broken-pipe I/O error.
    pub fn fail_next_write(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.fail_next_write = true;
    }

    /// Make `close` leave the handle reporting open.
    pub fn refuse_close(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.refuse_close = true;
    }

    /// Number of scripted bytes not yet consumed.
    pub fn available_bytes(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.read_queue.len()
    }
}

impl SerialTransport for MockTransport {
    fn write_byte(&mut self, byte: u8) -> Result<usize, PortError> {
        let mut state = self.state.lock().unwrap();

        if !state.open {
            return Err(PortError::NotOpen);
        }

        if state.fail_next_write {
            state.fail_next_write = false;
            return Err(PortError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "simulated write failure",
            )));
        }

        state.write_log.push(byte);
        Ok(1)
    }

    fn read_byte(&mut self, timeout: Duration) -> Result<u8, PortError> {
        let mut state = self.state.lock().unwrap();

        if !state.open {
            return Err(PortError::NotOpen);
        }

        // An empty script behaves like a silent device: the read times out.
        state
            .read_queue
            .pop_front()
            .ok_or(PortError::Timeout(timeout))
    }

    fn is_open(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.open
    }

    fn close(&mut self) -> Result<(), PortError> {
        let mut state = self.state.lock().unwrap();
        if !state.refuse_close {
            state.open = false;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("name", &self.name)
            .field("available_bytes", &self.available_bytes())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enqueue_and_read() {
        let mut port = MockTransport::new("MOCK0");
        port.enqueue_read(&[0xAD, 0x01]);

        assert_eq!(port.read_byte(Duration::from_millis(500)).unwrap(), 0xAD);
        assert_eq!(port.read_byte(Duration::from_millis(500)).unwrap(), 0x01);
    }

    #[test]
    fn test_write_logging() {
        let mut port = MockTransport::new("MOCK0");
        port.write_byte(0x50).unwrap();
        port.write_byte(0xFF).unwrap();

        assert_eq!(port.write_log(), vec![0x50, 0xFF]);
        assert_eq!(port.last_written(), Some(0xFF));
    }

    #[test]
    fn test_empty_read_times_out() {
        let mut port = MockTransport::new("MOCK0");
        let result = port.read_byte(Duration::from_millis(500));
        assert!(matches!(result, Err(PortError::Timeout(_))));
    }

    #[test]
    fn test_fail_next_write_is_one_shot() {
        let mut port = MockTransport::new("MOCK0");
        port.fail_next_write();

        assert!(port.write_byte(0x50).is_err());
        assert!(port.write_byte(0x50).is_ok());
        // The failed write must not appear in the log.
        assert_eq!(port.write_log(), vec![0x50]);
    }

    #[test]
    fn test_close_marks_not_open() {
        let mut port = MockTransport::new("MOCK0");
        assert!(port.is_open());
        port.close().unwrap();
        assert!(!port.is_open());
    }

    #[test]
    fn test_refuse_close_keeps_open() {
        let mut port = MockTransport::new("MOCK0");
        port.refuse_close();
        port.close().unwrap();
        assert!(port.is_open());
    }

    #[test]
    fn test_clone_shares_state() {
        let mut writer = MockTransport::new("MOCK0");
        let reader = writer.clone();

        writer.write_byte(0x51).unwrap();
        assert_eq!(reader.write_log(), vec![0x51]);
    }

    #[test]
    fn test_closed_constructor() {
        let port = MockTransport::closed("MOCK0");
        assert!(!port.is_open());
    }

    #[test]
    fn test_read_after_close_fails() {
        let mut port = MockTransport::new("MOCK0");
        port.enqueue_read(&[0x01]);
        port.close().unwrap();

        let result = port.read_byte(Duration::from_millis(500));
        assert!(matches!(result, Err(PortError::NotOpen)));
    }
}
