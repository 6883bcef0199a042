//! USB Relay Board Controller Library
//!
//! Drives a family of USB-attached relay boards (2, 4, or 8 relay
//! variants) over a serial link using a single-byte command protocol.
//!
//! # Modules
//!
//! - `protocol`: wire constants, board variants, state encoding
//! - `controller`: `RelayController` — lifecycle, handshake, state ops
//! - `port`: transport seam (`serialport`-backed impl plus a mock)
//! - `history`: bounded most-recent-first byte logs
//! - `discovery`: candidate-port scanning
//! - `config`: TOML configuration with env overrides
//! - `error`: controller-level error taxonomy
//!
//! # Example
//!
//! ```no_run
//! use usbrelay_ctl::{BoardVariant, RelayController};
//!
//! let mut board = RelayController::new("/dev/ttyACM0", BoardVariant::TwoRelay);
//! board.open()?;
//! let variant = board.init_board()?;
//! println!("found a {variant} board");
//!
//! // Switch relay 2 on, relay 1 off.
//! board.set_state(0b10)?;
//! board.close()?;
//! # Ok::<(), usbrelay_ctl::RelayError>(())
//! ```

pub mod config;
pub mod controller;
pub mod discovery;
pub mod error;
pub mod history;
pub mod port;
pub mod protocol;

// Re-export commonly used types for convenience
pub use config::{Config, ConfigError, ConfigLoader, ConfigResult};
pub use controller::RelayController;
pub use error::{RelayError, RelayResult};
pub use history::HistoryBuffer;
pub use port::{MockTransport, PortError, SerialTransport, SyncSerialPort};
pub use protocol::BoardVariant;
