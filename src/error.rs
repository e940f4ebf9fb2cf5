use crate::config::ConfigError;
use std::fmt;

/// A specialized `Result` type for session-level operations.
pub type AppResult<T> = Result<T, AppError>;

/// Unified application error type.
///
/// Transport problems never surface here; monitors absorb them. What is
/// left is bad configuration, console I/O, and a monitor task that died.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    IoError(std::io::Error),
    /// A monitor task panicked or was aborted.
    TaskFailed {
        channel: String,
        source: tokio::task::JoinError,
    },
}

impl AppError {
    pub fn task(channel: impl Into<String>, source: tokio::task::JoinError) -> Self {
        Self::TaskFailed {
            channel: channel.into(),
            source,
        }
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 1,
            Self::IoError(_) | Self::TaskFailed { .. } => 2,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "{e}"),
            Self::IoError(e) => write!(f, "An I/O error occurred: {e}"),
            Self::TaskFailed { channel, source } => {
                write!(f, "Monitor for channel '{channel}' failed: {source}")
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::IoError(e) => Some(e),
            Self::TaskFailed { source, .. } => Some(source),
        }
    }
}

// Implement `From` conversions to allow the `?` operator to work seamlessly.
impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err)
    }
}
