//! Diagnostic logging setup.
//!
//! Diagnostics go to stderr so they never interleave with frame lines on
//! stdout. `RUST_LOG` wins over the configured level when set.

use crate::config::{Config, ConfigError, ConfigResult, LogFormat, LoggingConfig};
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Level filter for a given number of `-v` flags.
///
/// Zero keeps the configured level. Each additional flag goes one step more
/// verbose, up to `trace`.
pub fn level_for(config: &LoggingConfig, verbosity: u8) -> String {
    match verbosity {
        0 => config.level.clone(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install the global subscriber, writing to stderr.
///
/// ANSI styling follows `output.color`, so `--no-color` and `NO_COLOR`
/// apply to diagnostics as well as frame lines.
pub fn init(config: &Config, verbosity: u8) -> ConfigResult<()> {
    let subscriber = build(config, verbosity, std::io::stderr)?;
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| ConfigError::validation("logging", e.to_string()))
}

fn build<W>(
    config: &Config,
    verbosity: u8,
    writer: W,
) -> ConfigResult<Box<dyn Subscriber + Send + Sync>>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let level = level_for(&config.logging, verbosity);
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&level)
            .map_err(|e| ConfigError::validation("logging.level", e.to_string()))?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(config.output.color)
        .with_target(false);

    Ok(match config.logging.format {
        LogFormat::Compact => Box::new(builder.compact().finish()),
        LogFormat::Pretty => Box::new(builder.pretty().finish()),
        LogFormat::Full => Box::new(builder.finish()),
    })
}
