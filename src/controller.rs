//! Two-channel session control.
//!
//! The controller builds the `tx` and `rx` monitors and starts them. It then
//! waits until either both have exited or the interrupt future fires. On
//! interrupt it cancels both monitors and waits for them to unwind.

use crate::config::{Config, ConfigResult};
use crate::error::{AppError, AppResult};
use crate::monitor::{ChannelConfig, ChannelMonitor, MonitorStats, DEFAULT_BACKOFF};
use crate::port::{PortConfiguration, PortConnector};
use crate::render::{Color, FrameSink, OutputStyle};
use crate::separator::Separator;
use crate::shutdown::CancellationToken;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Role label of the transmit line.
pub const TX_LABEL: &str = "tx";
/// Role label of the receive line.
pub const RX_LABEL: &str = "rx";

/// Settings shared by both channels plus the two device names.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub tx_port: String,
    pub rx_port: String,
    pub line: PortConfiguration,
    pub separator: Separator,
    pub style: OutputStyle,
    pub tx_color: Option<Color>,
    pub rx_color: Option<Color>,
    pub backoff: Duration,
}

impl ControllerConfig {
    /// Defaults: 115200 8N1, newline separator, `pybytes`, green tx, yellow rx.
    pub fn new(tx_port: impl Into<String>, rx_port: impl Into<String>) -> Self {
        Self {
            tx_port: tx_port.into(),
            rx_port: rx_port.into(),
            line: PortConfiguration::default(),
            separator: Separator::default(),
            style: OutputStyle::default(),
            tx_color: Some(Color::Green),
            rx_color: Some(Color::Yellow),
            backoff: DEFAULT_BACKOFF,
        }
    }

    /// Validate the loaded configuration and resolve port aliases.
    ///
    /// Fails on an unknown output style or an undecodable separator, which
    /// is the point where the binary exits with status 1.
    pub fn from_config(config: &Config, tx_port: &str, rx_port: &str) -> ConfigResult<Self> {
        let style: OutputStyle = config.output.style.parse()?;
        let separator = Separator::decode(&config.output.separator)?;
        config.validate()?;

        let (tx_color, rx_color) = if config.output.color {
            (Some(config.output.tx_color), Some(config.output.rx_color))
        } else {
            (None, None)
        };

        Ok(Self {
            tx_port: config.serial.resolve_port(tx_port),
            rx_port: config.serial.resolve_port(rx_port),
            line: PortConfiguration::receive_only(config.serial.baud_rate),
            separator,
            style,
            tx_color,
            rx_color,
            backoff: DEFAULT_BACKOFF,
        })
    }

    /// Per-channel configurations, `tx` first.
    pub fn channels(&self) -> [ChannelConfig; 2] {
        let build = |port: &str, label: &str, color: Option<Color>| {
            ChannelConfig::new(port, label)
                .with_color(color)
                .with_line(self.line.clone())
                .with_separator(self.separator.clone())
                .with_style(self.style)
                .with_backoff(self.backoff)
        };
        [
            build(&self.tx_port, TX_LABEL, self.tx_color),
            build(&self.rx_port, RX_LABEL, self.rx_color),
        ]
    }
}

/// What happened during a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub tx: MonitorStats,
    pub rx: MonitorStats,
    /// True when the session ended because of the interrupt.
    pub interrupted: bool,
}

/// Owns the two monitors of a session.
pub struct Controller {
    config: ControllerConfig,
    connector: Arc<dyn PortConnector>,
    sink: Arc<dyn FrameSink>,
}

impl Controller {
    pub fn new(
        config: ControllerConfig,
        connector: Arc<dyn PortConnector>,
        sink: Arc<dyn FrameSink>,
    ) -> Self {
        Self {
            config,
            connector,
            sink,
        }
    }

    /// Start both monitors and run until they exit or `interrupt` completes.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn run_until<F>(self, interrupt: F) -> AppResult<SessionSummary>
    where
        F: Future<Output = ()>,
    {
        let [tx_config, rx_config] = self.config.channels();
        let tokens = [CancellationToken::new(), CancellationToken::new()];

        info!(
            tx = %tx_config.port_name,
            rx = %rx_config.port_name,
            style = %self.config.style,
            separator = ?self.config.separator,
            "starting monitors"
        );

        let tx = ChannelMonitor::new(
            tx_config,
            Arc::clone(&self.connector),
            Arc::clone(&self.sink),
            tokens[0].clone(),
        )
        .start();
        let rx = ChannelMonitor::new(
            rx_config,
            Arc::clone(&self.connector),
            Arc::clone(&self.sink),
            tokens[1].clone(),
        )
        .start();

        let both = async { tokio::join!(tx.join(), rx.join()) };
        tokio::pin!(both);
        tokio::pin!(interrupt);

        let finished = tokio::select! {
            results = &mut both => Some(results),
            _ = &mut interrupt => None,
        };

        let interrupted = finished.is_none();
        let (tx_result, rx_result) = match finished {
            Some(results) => results,
            None => {
                info!("interrupt received, stopping monitors");
                for token in &tokens {
                    token.cancel();
                }
                both.await
            }
        };

        let tx = tx_result.map_err(|e| AppError::task(TX_LABEL, e))?;
        let rx = rx_result.map_err(|e| AppError::task(RX_LABEL, e))?;
        debug!(?tx, ?rx, interrupted, "session finished");

        Ok(SessionSummary {
            tx,
            rx,
            interrupted,
        })
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("config", &self.config)
            .finish()
    }
}
