//! Configuration module for serial-sniff.
//!
//! This module provides TOML-based configuration with environment variable overrides.
//!
//! # Configuration Resolution
//!
//! Configuration is loaded from the following locations (in order of priority):
//!
//! 1. `--config <PATH>` on the command line
//! 2. `SERIAL_SNIFF_CONFIG` environment variable (explicit path)
//! 3. `./serial-sniff.toml` (current directory)
//! 4. `serial-sniff.toml` in the platform config directory
//!    (`~/.config/serial-sniff/` on Linux)
//! 5. Built-in defaults (no file required)
//!
//! # Environment Overrides
//!
//! The pattern is: `SERIAL_SNIFF_<SECTION>_<KEY>`
//!
//! Examples:
//! - `SERIAL_SNIFF_SERIAL_BAUD_RATE=9600`
//! - `SERIAL_SNIFF_OUTPUT_STYLE=bytes`
//! - `SERIAL_SNIFF_LOGGING_LEVEL=debug`
//!
//! Command-line flags win over both.
//!
//! # Example
//!
//! ```toml
//! [serial]
//! baud_rate = 115200
//! port_aliases = { bridge_tx = "/dev/ttyUSB0", bridge_rx = "/dev/ttyUSB1" }
//!
//! [output]
//! style = "bytes"
//! separator = "\\r\\n"
//! color = true
//!
//! [logging]
//! level = "info"
//! ```

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{
    get_default_config_dir, get_default_config_path, resolve_config_path, ConfigLoader,
};
pub use schema::{Config, LogFormat, LoggingConfig, OutputConfig, SerialConfig};
