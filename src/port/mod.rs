//! Serial transport layer.
//!
//! Provides the traits a channel monitor reads through, the real
//! `serialport`-backed implementation, and a scripted mock for tests.

pub mod error;
pub mod mock;
pub mod sync_port;
pub mod traits;

pub use error::PortError;
pub use mock::{MockConnector, MockSerialPort};
pub use sync_port::{SerialConnector, SyncSerialPort};
pub use traits::*;
