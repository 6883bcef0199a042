//! Synchronous serial port implementation.
//!
//! Wraps the `serialport` crate with our own `SerialTransport` trait for
//! dependency injection and testing. The relay protocol assumes the
//! default 8N1 framing with no flow control, so the configuration surface
//! is just the port name and baud rate.

use super::error::PortError;
use super::traits::SerialTransport;
use std::io::Read;
use std::time::Duration;

/// Initial read/write timeout applied at open time.
///
/// Every protocol read replaces this with its own per-byte timeout, so the
/// value only matters for traffic issued outside the controller.
const OPEN_TIMEOUT: Duration = Duration::from_millis(500);

/// Synchronous serial transport wrapping `serialport::SerialPort`.
///
/// The handle is held in an `Option` so that `close` can release it while
/// the transport object itself stays around for `is_open` queries.
pub struct SyncSerialPort {
    /// The underlying serial port; `None` once closed.
    port: Option<Box<dyn serialport::SerialPort>>,
    /// The port name/path for identification.
    name: String,
}

impl SyncSerialPort {
    /// Open a serial port at the given baud rate with 8N1 framing.
    ///
    /// # Arguments
    /// * `port_name` - The system path to the serial port (e.g., "/dev/ttyACM0" or "COM3")
    /// * `baud_rate` - Line speed in bits per second
    ///
    /// # Example
    /// ```no_run
    /// use usbrelay_ctl::port::SyncSerialPort;
    ///
    /// let port = SyncSerialPort::open("/dev/ttyACM0", 9600)?;
    /// # Ok::<(), usbrelay_ctl::port::PortError>(())
    /// ```
    pub fn open(port_name: &str, baud_rate: u32) -> Result<Self, PortError> {
        let port = serialport::new(port_name, baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .flow_control(serialport::FlowControl::None)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .timeout(OPEN_TIMEOUT)
            .open()
            .map_err(|e| match e.kind() {
                serialport::ErrorKind::NoDevice => PortError::not_found(port_name),
                _ => PortError::Serial(e),
            })?;

        Ok(Self {
            port: Some(port),
            name: port_name.to_string(),
        })
    }

    fn port_mut(&mut self) -> Result<&mut Box<dyn serialport::SerialPort>, PortError> {
        self.port.as_mut().ok_or(PortError::NotOpen)
    }
}

impl SerialTransport for SyncSerialPort {
    fn write_byte(&mut self, byte: u8) -> Result<usize, PortError> {
        use std::io::Write;
        self.port_mut()?.write(&[byte]).map_err(PortError::Io)
    }

    fn read_byte(&mut self, timeout: Duration) -> Result<u8, PortError> {
        let port = self.port_mut()?;
        port.set_timeout(timeout).map_err(PortError::Serial)?;

        let mut buf = [0u8; 1];
        match port.read(&mut buf) {
            Ok(1) => Ok(buf[0]),
            Ok(_) => Err(PortError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "port returned no data",
            ))),
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => {
                Err(PortError::timeout(timeout))
            }
            Err(e) => Err(PortError::Io(e)),
        }
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn close(&mut self) -> Result<(), PortError> {
        // Dropping the handle releases the OS resource.
        self.port.take();
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for SyncSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncSerialPort")
            .field("name", &self.name)
            .field("open", &self.is_open())
            .finish()
    }
}
