//! Relay board controller.
//!
//! `RelayController` owns the serial transport for one board and drives
//! the byte protocol: the identification handshake, state commands, and
//! the raw send/receive primitives they are built from. Every operation
//! blocks the calling thread for the protocol's mandated settle or timeout
//! duration; there is no retry and no cancellation. A controller is not
//! safe for concurrent use without external serialization.

use crate::error::{RelayError, RelayResult};
use crate::history::HistoryBuffer;
use crate::port::{PortError, SerialTransport, SyncSerialPort};
use crate::protocol::{self, BoardVariant};
use std::thread;
use std::time::Duration;
use tracing::{debug, trace};

/// Bytes retained per traffic direction.
const HISTORY_CAPACITY: usize = 16;

/// Controller for a single USB relay board.
///
/// Created with a port path and a relay-count guess; the guess is replaced
/// by the real variant once [`init_board`](Self::init_board) recognizes
/// the board. "Current state" is always derived from the last transmitted
/// command byte, never cached separately.
pub struct RelayController {
    port_path: String,
    baud_rate: u32,
    variant: BoardVariant,
    transport: Option<Box<dyn SerialTransport>>,
    tx_history: HistoryBuffer,
    rx_history: HistoryBuffer,
}

impl RelayController {
    /// Create a disconnected controller bound to `port_path`.
    ///
    /// `variant` is the caller's guess at the board model; it stays in
    /// effect until the handshake identifies the board.
    pub fn new(port_path: impl Into<String>, variant: BoardVariant) -> Self {
        Self {
            port_path: port_path.into(),
            baud_rate: protocol::BAUD_RATE,
            variant,
            transport: None,
            tx_history: HistoryBuffer::new(HISTORY_CAPACITY),
            rx_history: HistoryBuffer::new(HISTORY_CAPACITY),
        }
    }

    // ----- connection lifecycle -----

    /// Open the configured port and let the board settle.
    pub fn open(&mut self) -> RelayResult<()> {
        if self.transport.is_some() {
            return Err(RelayError::AlreadyOpen);
        }
        let transport = SyncSerialPort::open(&self.port_path, self.baud_rate)
            .map_err(RelayError::Io)?;
        self.open_with(Box::new(transport))
    }

    /// Adopt an already-constructed transport.
    ///
    /// Runs the same settle delay and open verification as [`open`]
    /// (Self::open). This is the injection point for tests and for
    /// alternative transport backends.
    pub fn open_with(&mut self, transport: Box<dyn SerialTransport>) -> RelayResult<()> {
        if self.transport.is_some() {
            return Err(RelayError::AlreadyOpen);
        }

        thread::sleep(protocol::OPEN_SETTLE);
        if !transport.is_open() {
            return Err(RelayError::Connect {
                port: self.port_path.clone(),
            });
        }

        debug!(port = %self.port_path, baud = self.baud_rate, "port opened");
        self.transport = Some(transport);
        Ok(())
    }

    /// Close the transport and release the handle.
    pub fn close(&mut self) -> RelayResult<()> {
        let transport = self
            .transport
            .as_mut()
            .ok_or(RelayError::Io(PortError::NotOpen))?;

        transport.close().map_err(RelayError::Io)?;
        if transport.is_open() {
            return Err(RelayError::Close {
                port: self.port_path.clone(),
            });
        }

        self.transport = None;
        debug!(port = %self.port_path, "port closed");
        Ok(())
    }

    /// Point the controller at a different port.
    ///
    /// Only valid while disconnected.
    pub fn set_port(&mut self, port_path: impl Into<String>) -> RelayResult<()> {
        if self.transport.is_some() {
            return Err(RelayError::AlreadyOpen);
        }
        self.port_path = port_path.into();
        Ok(())
    }

    // ----- raw I/O primitives -----

    /// Write one byte, then block for the board's processing delay.
    ///
    /// The byte is logged at the head of the transmit history before the
    /// write is attempted, so a failed write is still visible there. The
    /// delay elapses whether or not the write succeeded.
    pub fn send(&mut self, byte: u8, delay: Duration) -> RelayResult<()> {
        self.tx_history.push(byte);

        let transport = self
            .transport
            .as_mut()
            .ok_or(RelayError::Io(PortError::NotOpen))?;

        trace!(byte = format_args!("{byte:#04x}"), ?delay, "tx");
        let status = transport.write_byte(byte);
        thread::sleep(delay);

        let written = status.map_err(RelayError::Io)?;
        if written != 1 {
            return Err(RelayError::ShortWrite { written });
        }
        Ok(())
    }

    /// Read `n` bytes one at a time into the receive history.
    ///
    /// Each byte gets its own fixed timeout. The first failed read aborts
    /// the remainder; it still inserts a placeholder entry, so the history
    /// gained exactly as many entries as reads were attempted.
    pub fn receive(&mut self, n: usize) -> RelayResult<()> {
        let transport = self
            .transport
            .as_mut()
            .ok_or(RelayError::Io(PortError::NotOpen))?;

        for _ in 0..n {
            match transport.read_byte(protocol::READ_TIMEOUT) {
                Ok(byte) => {
                    trace!(byte = format_args!("{byte:#04x}"), "rx");
                    self.rx_history.push(byte);
                }
                Err(e) => {
                    self.rx_history.push(0x00);
                    return Err(RelayError::Io(e));
                }
            }
        }
        Ok(())
    }

    /// The most recently received byte, if any traffic has arrived.
    pub fn last_received(&self) -> Option<u8> {
        self.rx_history.front()
    }

    // ----- handshake -----

    /// Identify the board and put it into its default all-off state.
    ///
    /// Sends the probe, reads the single identification byte, and on a
    /// recognized response stores the variant and sends the two
    /// configuration bytes. An unrecognized response returns
    /// `Ok(BoardVariant::Unknown)` and leaves the stored variant alone:
    /// the board answered, it just was not understood. Callers that need
    /// a trustworthy relay count must check for `Unknown` themselves.
    pub fn init_board(&mut self) -> RelayResult<BoardVariant> {
        debug!(port = %self.port_path, "probing relay board");

        self.send(protocol::PROBE, protocol::PROBE_DELAY)
            .map_err(RelayError::into_handshake)?;
        self.receive(1).map_err(RelayError::into_handshake)?;

        let sentinel = self.last_received().unwrap_or_default();
        match BoardVariant::from_sentinel(sentinel) {
            BoardVariant::Unknown => {
                debug!(
                    sentinel = format_args!("{sentinel:#04x}"),
                    "unrecognized identification byte, keeping configured variant"
                );
                Ok(BoardVariant::Unknown)
            }
            variant => {
                self.variant = variant;
                self.send(protocol::SETUP, protocol::SETUP_DELAY)
                    .map_err(RelayError::into_handshake)?;
                self.send(protocol::ALL_OFF, protocol::SETUP_DELAY)
                    .map_err(RelayError::into_handshake)?;
                debug!(%variant, "relay board identified");
                Ok(variant)
            }
        }
    }

    // ----- relay state -----

    /// Switch relays according to a logical bitmask (bit 1 = ON, bit 0 =
    /// relay 1).
    pub fn set_state(&mut self, mask: u8) -> RelayResult<()> {
        let wire = protocol::encode_mask(self.variant, mask);
        trace!(
            mask = format_args!("{mask:#010b}"),
            wire = format_args!("{wire:#010b}"),
            "set state"
        );
        self.send(wire, protocol::COMMAND_DELAY)
    }

    /// Switch relays according to one boolean per relay, index 0 first.
    ///
    /// The slice length must match the board's relay count. Produces the
    /// same wire byte as the equivalent [`set_state`](Self::set_state)
    /// call.
    pub fn set_relays(&mut self, relays: &[bool]) -> RelayResult<()> {
        let expected = self.variant.relay_count() as usize;
        if relays.len() != expected {
            return Err(RelayError::RelayCount {
                expected,
                actual: relays.len(),
            });
        }
        self.set_state(protocol::mask_from_relays(relays))
    }

    /// Logical relay state implied by the last transmitted command byte.
    ///
    /// This is a pure decode of the transmit history head, not a device
    /// query; `None` until something has been sent.
    pub fn state(&self) -> Option<u8> {
        self.tx_history
            .front()
            .map(|wire| protocol::decode_state(self.variant, wire))
    }

    // ----- accessors -----

    /// The board variant currently in effect (guess or handshake result).
    pub fn variant(&self) -> BoardVariant {
        self.variant
    }

    /// Number of relays on the current variant.
    pub fn relay_count(&self) -> u8 {
        self.variant.relay_count()
    }

    /// Configured line speed.
    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    /// Configured port path.
    pub fn port(&self) -> &str {
        &self.port_path
    }

    /// Whether a transport handle is currently held.
    pub fn is_open(&self) -> bool {
        self.transport.is_some()
    }

    /// Raw transmit history, most-recent-first.
    pub fn tx_history(&self) -> &HistoryBuffer {
        &self.tx_history
    }

    /// Raw receive history, most-recent-first.
    pub fn rx_history(&self) -> &HistoryBuffer {
        &self.rx_history
    }
}

impl std::fmt::Debug for RelayController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayController")
            .field("port", &self.port_path)
            .field("baud_rate", &self.baud_rate)
            .field("variant", &self.variant)
            .field("open", &self.is_open())
            .finish()
    }
}
