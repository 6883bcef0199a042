//! Configuration for the relay CLI.
//!
//! TOML-based configuration with environment variable overrides.
//!
//! # Configuration Resolution
//!
//! Configuration is loaded from the following locations (in order of
//! priority):
//!
//! 1. `USBRELAY_CONFIG` environment variable (explicit path)
//! 2. `./usbrelay.toml` (current directory)
//! 3. The platform config directory (XDG on Linux/macOS, AppData on
//!    Windows)
//! 4. Built-in defaults (no file required)
//!
//! # Environment Overrides
//!
//! Any configuration value can be overridden via environment variables
//! following the pattern `USBRELAY_<SECTION>_<KEY>`:
//!
//! - `USBRELAY_SERIAL_PORT=/dev/ttyACM1`
//! - `USBRELAY_SERIAL_RELAY_COUNT=8`
//! - `USBRELAY_LOGGING_LEVEL=debug`
//!
//! # Example
//!
//! ```rust,ignore
//! use usbrelay_ctl::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load()?;
//! let config = loader.config();
//!
//! println!("Default port: {:?}", config.serial.port);
//! ```

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{resolve_config_path, ConfigLoader};
pub use schema::{Config, DiscoveryConfig, LoggingConfig, SerialConfig};
