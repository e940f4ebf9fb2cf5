//! Core traits for the serial transport.
//!
//! A channel monitor never talks to `serialport` directly. It asks a
//! [`PortConnector`] for a [`SerialPortAdapter`] and reads from that, which
//! lets tests drive the monitor with scripted mock ports.

use super::error::PortError;
use serialport::{DataBits, FlowControl, Parity, StopBits};
use std::time::Duration;

/// Baud rate used for both lines of the bridge unless overridden.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Per-read timeout handed to the transport.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Line parameters for a monitored port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortConfiguration {
    /// Baud rate (bits per second).
    pub baud_rate: u32,

    /// Number of data bits per character.
    pub data_bits: DataBits,

    /// Flow control mode.
    pub flow_control: FlowControl,

    /// Parity checking mode.
    pub parity: Parity,

    /// Number of stop bits.
    pub stop_bits: StopBits,

    /// Upper bound on a single blocking read.
    pub timeout: Duration,
}

impl PortConfiguration {
    /// 8N1 with no RTS/CTS or XON/XOFF at the given baud rate.
    ///
    /// A sniffer only listens, so it must never assert flow control lines
    /// on the bridge it is attached to.
    pub fn receive_only(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            ..Self::default()
        }
    }

    /// Override the per-read timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for PortConfiguration {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            data_bits: DataBits::Eight,
            flow_control: FlowControl::None,
            parity: Parity::None,
            stop_bits: StopBits::One,
            timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

/// An open, readable serial connection.
pub trait SerialPortAdapter: Send + std::fmt::Debug {
    /// Read bytes from the serial port into the provided buffer.
    ///
    /// Returns the number of bytes actually read. `Ok(0)` means the read
    /// timeout elapsed with nothing on the line; it is not an error.
    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError>;

    /// Get the name/path of this serial port.
    fn name(&self) -> &str;
}

/// Opens serial connections by device name.
pub trait PortConnector: Send + Sync + std::fmt::Debug {
    /// Open `port_name` with the given line parameters.
    fn connect(
        &self,
        port_name: &str,
        config: &PortConfiguration,
    ) -> Result<Box<dyn SerialPortAdapter>, PortError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configuration() {
        let config = PortConfiguration::default();
        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.data_bits, DataBits::Eight);
        assert_eq!(config.flow_control, FlowControl::None);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.stop_bits, StopBits::One);
        assert_eq!(config.timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_receive_only_keeps_line_settings() {
        let config = PortConfiguration::receive_only(9600).with_timeout(Duration::from_millis(20));
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.flow_control, FlowControl::None);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.timeout, Duration::from_millis(20));
    }
}
