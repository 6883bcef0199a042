//! Configuration loader with file resolution and environment overrides.

use super::error::{ConfigError, ConfigResult};
use super::schema::Config;
use std::path::{Path, PathBuf};

/// Environment variable prefix for overrides
const ENV_PREFIX: &str = "USBRELAY";

/// Config file name
const CONFIG_FILE_NAME: &str = "usbrelay.toml";

/// Environment variable for an explicit config path
const CONFIG_PATH_ENV: &str = "USBRELAY_CONFIG";

/// Configuration loader with resolution and override logic.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Resolved config file path (if any)
    pub config_path: Option<PathBuf>,
    /// The loaded configuration
    pub config: Config,
}

impl ConfigLoader {
    /// Load configuration using standard resolution order.
    ///
    /// Resolution priority (highest to lowest):
    /// 1. `USBRELAY_CONFIG` environment variable (explicit path)
    /// 2. `./usbrelay.toml` (current directory)
    /// 3. The platform config directory (XDG on Linux/macOS, AppData on
    ///    Windows)
    /// 4. Built-in defaults (no file required)
    ///
    /// Environment variables can override values from any source.
    pub fn load() -> ConfigResult<Self> {
        let config_path = resolve_config_path();

        let mut config = if let Some(ref path) = config_path {
            load_from_file(path)?
        } else {
            Config::default()
        };

        apply_env_overrides(&mut config)?;
        config.validate()?;

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut config = load_from_file(&path)?;
        apply_env_overrides(&mut config)?;
        config.validate()?;

        Ok(Self {
            config_path: Some(path),
            config,
        })
    }

    /// Create a loader with default configuration (no file).
    pub fn with_defaults() -> Self {
        let mut config = Config::default();
        // Env overrides apply even without a file.
        let _ = apply_env_overrides(&mut config);

        Self {
            config_path: None,
            config,
        }
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Consume the loader and return the configuration.
    pub fn into_config(self) -> Config {
        self.config
    }
}

/// Resolve the configuration file path using standard locations.
pub fn resolve_config_path() -> Option<PathBuf> {
    // 1. Explicit environment variable
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. Current directory
    let cwd_config = PathBuf::from(CONFIG_FILE_NAME);
    if cwd_config.exists() {
        return Some(cwd_config);
    }

    // 3. Platform config directory
    if let Some(dirs) = directories::ProjectDirs::from("", "", "usbrelay-ctl") {
        let app_config = dirs.config_dir().join(CONFIG_FILE_NAME);
        if app_config.exists() {
            return Some(app_config);
        }
    }

    // 4. No config file found - defaults apply
    None
}

/// Load configuration from a file.
fn load_from_file(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(ConfigError::ParseError)
}

/// Apply environment variable overrides to the configuration.
///
/// Variables follow the pattern `USBRELAY_<SECTION>_<KEY>`, for example:
/// - `USBRELAY_SERIAL_PORT=/dev/ttyACM1`
/// - `USBRELAY_SERIAL_RELAY_COUNT=8`
/// - `USBRELAY_LOGGING_LEVEL=debug`
fn apply_env_overrides(config: &mut Config) -> ConfigResult<()> {
    if let Ok(val) = std::env::var(format!("{ENV_PREFIX}_SERIAL_PORT")) {
        config.serial.port = Some(val);
    }
    if let Ok(val) = std::env::var(format!("{ENV_PREFIX}_SERIAL_RELAY_COUNT")) {
        config.serial.relay_count = val.parse().map_err(|_| {
            ConfigError::env_parse(
                format!("{ENV_PREFIX}_SERIAL_RELAY_COUNT"),
                "invalid relay count",
            )
        })?;
    }
    if let Ok(val) = std::env::var(format!("{ENV_PREFIX}_DISCOVERY_PROBE_BAUD")) {
        config.discovery.probe_baud = val.parse().map_err(|_| {
            ConfigError::env_parse(
                format!("{ENV_PREFIX}_DISCOVERY_PROBE_BAUD"),
                "invalid baud rate",
            )
        })?;
    }
    if let Ok(val) = std::env::var(format!("{ENV_PREFIX}_LOGGING_LEVEL")) {
        config.logging.level = val;
    }

    Ok(())
}
