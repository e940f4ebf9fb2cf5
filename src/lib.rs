//! Serial Sniff Library
//!
//! Watches the transmit and receive lines of a UART bridge at the same time,
//! splits each byte stream into frames on a configurable separator, and
//! prints every frame as one color-tagged console line.
//!
//! # Modules
//!
//! - `port`: Serial transport abstraction (real and mock)
//! - `framer`: Separator-delimited frame accumulation
//! - `separator`: Separator type and escape-string decoding
//! - `render`: Output styles, colors and line sinks
//! - `shutdown`: Cooperative cancellation token
//! - `monitor`: Per-channel connect/read/frame loop
//! - `controller`: Runs the `tx`/`rx` pair until interrupted
//! - `config`: Configuration management with TOML support
//! - `logging`: Diagnostic subscriber setup
//! - `error`: Unified error handling

pub mod config;
pub mod controller;
pub mod error;
pub mod framer;
pub mod logging;
pub mod monitor;
pub mod port;
pub mod render;
pub mod separator;
pub mod shutdown;

// Re-export commonly used types for convenience
pub use config::{Config, ConfigError, ConfigLoader, ConfigResult};
pub use controller::{Controller, ControllerConfig, SessionSummary, RX_LABEL, TX_LABEL};
pub use error::{AppError, AppResult};
pub use framer::Framer;
pub use monitor::{ChannelConfig, ChannelMonitor, MonitorHandle, MonitorStats};
pub use port::{
    MockConnector, MockSerialPort, PortConfiguration, PortConnector, PortError,
    SerialConnector, SerialPortAdapter, SyncSerialPort,
};
pub use render::{Color, FrameRenderer, FrameSink, MemorySink, OutputStyle, StdoutSink};
pub use separator::Separator;
pub use shutdown::CancellationToken;
