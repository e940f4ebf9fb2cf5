//! Shared test utilities for serial-sniff integration tests.
//!
//! This module provides:
//! - Channel and session configs with millisecond timings
//! - A mock bridge with `tx`/`rx` ports already attached
//! - Polling helpers for asserting on concurrently produced output

#![allow(dead_code)]

use serial_sniff::{
    ChannelConfig, ControllerConfig, MemorySink, MockConnector, MockSerialPort, OutputStyle,
    PortConfiguration,
};
use std::time::{Duration, Instant};

pub const TX_PORT: &str = "MOCK_TX";
pub const RX_PORT: &str = "MOCK_RX";

/// Backoff used by all integration tests.
pub const TEST_BACKOFF: Duration = Duration::from_millis(20);

/// Read timeout used by all integration tests.
pub const TEST_READ_TIMEOUT: Duration = Duration::from_millis(2);

pub fn fast_line() -> PortConfiguration {
    PortConfiguration::default().with_timeout(TEST_READ_TIMEOUT)
}

/// Single-channel config with test timings and `bytes` output.
pub fn fast_channel(port: &str, label: &str) -> ChannelConfig {
    ChannelConfig::new(port, label)
        .with_line(fast_line())
        .with_style(OutputStyle::Bytes)
        .with_backoff(TEST_BACKOFF)
}

/// Two-channel config with test timings, `bytes` output and no color.
pub fn fast_session() -> ControllerConfig {
    let mut config = ControllerConfig::new(TX_PORT, RX_PORT);
    config.line = fast_line();
    config.backoff = TEST_BACKOFF;
    config.style = OutputStyle::Bytes;
    config.tx_color = None;
    config.rx_color = None;
    config
}

/// A connector with both bridge ports attached, plus feeder handles.
pub struct MockBridge {
    pub connector: MockConnector,
    pub tx: MockSerialPort,
    pub rx: MockSerialPort,
}

impl MockBridge {
    pub fn new() -> Self {
        let connector = MockConnector::new();
        let tx = MockSerialPort::new(TX_PORT);
        let rx = MockSerialPort::new(RX_PORT);
        connector.attach(tx.clone());
        connector.attach(rx.clone());
        Self { connector, tx, rx }
    }
}

/// Poll `condition` until it holds or `timeout` elapses.
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    condition()
}

/// Async variant of [`wait_until`] that yields to the runtime between polls.
pub async fn wait_until_async(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    condition()
}

/// Lines from `sink` that start with `label: `, in order.
pub fn lines_for(sink: &MemorySink, label: &str) -> Vec<String> {
    let prefix = format!("{}: ", label);
    sink.lines()
        .into_iter()
        .filter(|line| line.starts_with(&prefix))
        .collect()
}
