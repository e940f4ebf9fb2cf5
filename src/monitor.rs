//! Per-channel connect / read / frame / emit loop.
//!
//! A [`ChannelMonitor`] owns one serial connection and one frame buffer.
//! It runs on its own blocking thread until its [`CancellationToken`] is
//! cancelled. Transport failures never end the loop: they are logged,
//! followed by a backoff, and the port is opened again.

use crate::framer::Framer;
use crate::port::{PortConfiguration, PortConnector, SerialPortAdapter};
use crate::render::{Color, FrameRenderer, FrameSink, OutputStyle};
use crate::separator::Separator;
use crate::shutdown::CancellationToken;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info, warn};

/// Delay before retrying after a failed open or a failed read.
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

/// Everything one channel needs to know about itself.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Device path, e.g. `/dev/ttyUSB0`.
    pub port_name: String,
    /// Role tag printed in front of every frame.
    pub label: String,
    pub color: Option<Color>,
    pub line: PortConfiguration,
    pub separator: Separator,
    pub style: OutputStyle,
    pub backoff: Duration,
}

impl ChannelConfig {
    pub fn new(port_name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            label: label.into(),
            color: None,
            line: PortConfiguration::default(),
            separator: Separator::default(),
            style: OutputStyle::default(),
            backoff: DEFAULT_BACKOFF,
        }
    }

    pub fn with_color(mut self, color: Option<Color>) -> Self {
        self.color = color;
        self
    }

    pub fn with_line(mut self, line: PortConfiguration) -> Self {
        self.line = line;
        self
    }

    pub fn with_separator(mut self, separator: Separator) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_style(mut self, style: OutputStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }
}

/// Counters reported when a monitor exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorStats {
    pub frames: u64,
    pub bytes: u64,
    pub connects: u64,
    pub connect_failures: u64,
    pub read_failures: u64,
    /// Frames completed but lost because the sink refused the line.
    pub write_failures: u64,
}

/// State machine for one monitored line.
pub struct ChannelMonitor {
    config: ChannelConfig,
    connector: Arc<dyn PortConnector>,
    sink: Arc<dyn FrameSink>,
    token: CancellationToken,
    renderer: FrameRenderer,
    framer: Framer,
    port: Option<Box<dyn SerialPortAdapter>>,
    stats: MonitorStats,
}

impl ChannelMonitor {
    pub fn new(
        config: ChannelConfig,
        connector: Arc<dyn PortConnector>,
        sink: Arc<dyn FrameSink>,
        token: CancellationToken,
    ) -> Self {
        let renderer = FrameRenderer::new(config.label.clone(), config.style, config.color);
        let framer = Framer::new(config.separator.clone());
        Self {
            config,
            connector,
            sink,
            token,
            renderer,
            framer,
            port: None,
            stats: MonitorStats::default(),
        }
    }

    fn is_connected(&self) -> bool {
        self.port.is_some()
    }

    /// Run the loop on the blocking pool of the current tokio runtime.
    pub fn start(self) -> MonitorHandle {
        let token = self.token.clone();
        let label = self.config.label.clone();
        let task = tokio::task::spawn_blocking(move || self.run());
        MonitorHandle { label, token, task }
    }

    /// Run the loop on the calling thread until cancelled.
    pub fn run(mut self) -> MonitorStats {
        info!(
            channel = %self.config.label,
            port = %self.config.port_name,
            baud = self.config.line.baud_rate,
            "monitor started"
        );

        while !self.token.is_cancelled() {
            if self.port.is_none() {
                self.connect();
            } else {
                self.read_once();
            }
        }

        if !self.framer.pending().is_empty() {
            debug!(
                channel = %self.config.label,
                pending = self.framer.pending().len(),
                "discarding incomplete frame"
            );
            self.framer.reset();
        }
        self.port = None;

        info!(
            channel = %self.config.label,
            frames = self.stats.frames,
            bytes = self.stats.bytes,
            "monitor stopped"
        );
        self.stats
    }

    fn connect(&mut self) {
        match self
            .connector
            .connect(&self.config.port_name, &self.config.line)
        {
            Ok(port) => {
                info!(channel = %self.config.label, port = %port.name(), "connected");
                self.stats.connects += 1;
                self.port = Some(port);
            }
            Err(e) => {
                warn!(
                    channel = %self.config.label,
                    port = %self.config.port_name,
                    "cannot open port: {}",
                    e
                );
                self.stats.connect_failures += 1;
                self.token.sleep(self.config.backoff);
            }
        }
    }

    fn read_once(&mut self) {
        let Some(port) = self.port.as_mut() else {
            return;
        };

        let mut byte = [0u8; 1];
        let result = port.read_bytes(&mut byte);
        match result {
            Ok(0) => {}
            Ok(_) => self.accept(byte[0]),
            Err(e) => {
                error!(
                    channel = %self.config.label,
                    port = %self.config.port_name,
                    "serial exception: {}",
                    e
                );
                self.port = None;
                self.stats.read_failures += 1;
                self.token.sleep(self.config.backoff);
            }
        }
    }

    fn accept(&mut self, byte: u8) {
        self.stats.bytes += 1;
        if let Some(frame) = self.framer.push(byte) {
            self.emit(&frame);
        }
    }

    fn emit(&mut self, frame: &[u8]) {
        let line = self.renderer.render_line(frame);
        match self.sink.write_line(&line) {
            Ok(()) => self.stats.frames += 1,
            Err(e) => {
                error!(channel = %self.config.label, "failed to write frame: {}", e);
                self.stats.write_failures += 1;
            }
        }
    }
}

impl std::fmt::Debug for ChannelMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelMonitor")
            .field("label", &self.config.label)
            .field("port", &self.config.port_name)
            .field("connected", &self.is_connected())
            .field("pending", &self.framer.pending().len())
            .finish()
    }
}

/// Handle to a running monitor.
#[derive(Debug)]
pub struct MonitorHandle {
    label: String,
    token: CancellationToken,
    task: JoinHandle<MonitorStats>,
}

impl MonitorHandle {
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Ask the monitor to stop. Returns immediately.
    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Wait for the loop to exit.
    pub async fn join(self) -> Result<MonitorStats, JoinError> {
        self.task.await
    }
}
