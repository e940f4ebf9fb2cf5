//! Mock serial transport for testing.
//!
//! Provides a `MockSerialPort` that replays queued bytes and can simulate a
//! disconnect, and a `MockConnector` that hands out mock ports and can be
//! told to fail a number of open attempts.

use super::error::PortError;
use super::traits::{PortConfiguration, PortConnector, SerialPortAdapter};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

/// Inner state of the mock port, shared by all clones.
#[derive(Debug, Default)]
struct MockPortState {
    /// Queue of bytes to be returned by read operations.
    read_queue: VecDeque<u8>,
    /// Number of upcoming reads that fail with a disconnect.
    pending_failures: usize,
    /// Once the queue drains, report a disconnect instead of timing out.
    hangup_when_drained: bool,
    /// Configured timeout duration.
    timeout: Duration,
    /// Total number of read calls, successful or not.
    reads: usize,
    /// Largest buffer ever passed to a read call.
    largest_request: usize,
}

/// Mock serial port implementation for testing.
///
/// Clones share state, so a test can keep one handle to feed bytes while the
/// monitor owns another.
///
/// # Example
/// ```
/// use serial_sniff::port::{MockSerialPort, SerialPortAdapter};
///
/// let mut port = MockSerialPort::new("MOCK0");
/// port.enqueue_read(b"Hi\n");
///
/// let mut buffer = [0u8; 1];
/// assert_eq!(port.read_bytes(&mut buffer).unwrap(), 1);
/// assert_eq!(buffer[0], b'H');
/// assert_eq!(port.available_bytes(), 2);
/// ```
#[derive(Clone)]
pub struct MockSerialPort {
    /// The port name/identifier.
    name: String,
    state: Arc<Mutex<MockPortState>>,
}

impl MockSerialPort {
    /// Create a new mock serial port with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(MockPortState {
                timeout: Duration::from_millis(5),
                ..Default::default()
            })),
        }
    }

    /// Enqueue bytes to be returned by subsequent read operations.
    pub fn enqueue_read(&mut self, data: &[u8]) {
        self.state.lock().read_queue.extend(data);
    }

    /// Make the next `count` reads fail as if the device was unplugged.
    pub fn fail_next_reads(&mut self, count: usize) {
        self.state.lock().pending_failures += count;
    }

    /// Report a disconnect once every queued byte has been read.
    pub fn hangup_when_drained(&mut self, hangup: bool) {
        self.state.lock().hangup_when_drained = hangup;
    }

    /// Set the simulated read timeout.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.state.lock().timeout = timeout;
    }

    /// Get the number of bytes still waiting to be read.
    pub fn available_bytes(&self) -> usize {
        self.state.lock().read_queue.len()
    }

    /// Total number of `read_bytes` calls made on this port.
    pub fn read_calls(&self) -> usize {
        self.state.lock().reads
    }

    /// Largest buffer length any caller asked to fill.
    pub fn largest_read_request(&self) -> usize {
        self.state.lock().largest_request
    }
}

impl SerialPortAdapter for MockSerialPort {
    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        let timeout = {
            let mut state = self.state.lock();
            state.reads += 1;
            state.largest_request = state.largest_request.max(buffer.len());

            if state.pending_failures > 0 {
                state.pending_failures -= 1;
                return Err(PortError::disconnected(&self.name));
            }

            let mut bytes_read = 0;
            for byte in buffer.iter_mut() {
                match state.read_queue.pop_front() {
                    Some(queued) => {
                        *byte = queued;
                        bytes_read += 1;
                    }
                    None => break,
                }
            }

            if bytes_read > 0 {
                return Ok(bytes_read);
            }
            if state.hangup_when_drained {
                return Err(PortError::disconnected(&self.name));
            }
            state.timeout
        };

        // Nothing on the line: behave like a real port and block for the timeout.
        std::thread::sleep(timeout);
        Ok(0)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for MockSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSerialPort")
            .field("name", &self.name)
            .field("available_bytes", &self.available_bytes())
            .finish()
    }
}

#[derive(Debug, Default)]
struct ConnectorState {
    ports: HashMap<String, MockSerialPort>,
    /// Remaining open failures per port name; `usize::MAX` never runs out.
    open_failures: HashMap<String, usize>,
    attempts: HashMap<String, usize>,
    last_config: Option<PortConfiguration>,
}

/// Connector that hands out registered [`MockSerialPort`]s.
///
/// Unknown port names fail to open with [`PortError::NotFound`], just like
/// a device that is not plugged in.
#[derive(Debug, Clone, Default)]
pub struct MockConnector {
    state: Arc<Mutex<ConnectorState>>,
}

impl MockConnector {
    /// Create a connector with no ports attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a port; it becomes openable under its own name.
    pub fn attach(&self, port: MockSerialPort) {
        self.state.lock().ports.insert(port.name.clone(), port);
    }

    /// Fail the next `count` open attempts for `port_name`.
    pub fn fail_opens(&self, port_name: &str, count: usize) {
        self.state
            .lock()
            .open_failures
            .insert(port_name.to_string(), count);
    }

    /// Fail every open attempt for `port_name`.
    pub fn fail_always(&self, port_name: &str) {
        self.fail_opens(port_name, usize::MAX);
    }

    /// Number of open attempts made for `port_name`.
    pub fn attempts(&self, port_name: &str) -> usize {
        self.state
            .lock()
            .attempts
            .get(port_name)
            .copied()
            .unwrap_or(0)
    }

    /// Line parameters passed to the most recent open attempt.
    pub fn last_config(&self) -> Option<PortConfiguration> {
        self.state.lock().last_config.clone()
    }
}

impl PortConnector for MockConnector {
    fn connect(
        &self,
        port_name: &str,
        config: &PortConfiguration,
    ) -> Result<Box<dyn SerialPortAdapter>, PortError> {
        let mut state = self.state.lock();
        *state.attempts.entry(port_name.to_string()).or_insert(0) += 1;
        state.last_config = Some(config.clone());

        if let Some(remaining) = state.open_failures.get_mut(port_name) {
            if *remaining > 0 {
                if *remaining != usize::MAX {
                    *remaining -= 1;
                }
                return Err(PortError::not_found(port_name));
            }
        }

        let mut port = state
            .ports
            .get(port_name)
            .cloned()
            .ok_or_else(|| PortError::not_found(port_name))?;
        port.set_timeout(config.timeout);
        Ok(Box::new(port))
    }
}
