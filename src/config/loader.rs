//! Configuration loader with file resolution and environment override support.

use super::error::{ConfigError, ConfigResult};
use super::schema::{Config, LogFormat};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Environment variable prefix for overrides
const ENV_PREFIX: &str = "SERIAL_SNIFF";

/// Config file name
const CONFIG_FILE_NAME: &str = "serial-sniff.toml";

/// Environment variable for explicit config path
const CONFIG_PATH_ENV: &str = "SERIAL_SNIFF_CONFIG";

/// Configuration loader with resolution and override logic.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Resolved config file path (if any)
    pub config_path: Option<PathBuf>,
    /// The loaded configuration
    pub config: Config,
}

impl ConfigLoader {
    /// Load configuration using standard resolution order.
    ///
    /// Resolution priority (highest to lowest):
    /// 1. `SERIAL_SNIFF_CONFIG` environment variable (explicit path)
    /// 2. `./serial-sniff.toml` (current directory)
    /// 3. `serial-sniff.toml` in the platform config directory
    /// 4. Built-in defaults (no file required)
    ///
    /// Environment variables can override any config file values.
    pub fn load() -> ConfigResult<Self> {
        let config_path = resolve_config_path();

        let mut config = if let Some(ref path) = config_path {
            load_from_file(path)?
        } else {
            Config::default()
        };

        apply_env_overrides(&mut config)?;

        Ok(Self { config_path, config })
    }

    /// Load configuration from a specific file path.
    ///
    /// Unlike [`load`](Self::load), a missing file is an error here.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(ConfigError::NotFound(path));
        }
        let mut config = load_from_file(&path)?;
        apply_env_overrides(&mut config)?;

        Ok(Self {
            config_path: Some(path),
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Consume the loader and return the configuration.
    pub fn into_config(self) -> Config {
        self.config
    }
}

/// Resolve the configuration file path using standard locations.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    let cwd_config = PathBuf::from(CONFIG_FILE_NAME);
    if cwd_config.exists() {
        return Some(cwd_config);
    }

    get_default_config_path().filter(|path| path.exists())
}

/// Get the default config directory for this platform.
pub fn get_default_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "serial-sniff").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the default config file path for this platform.
pub fn get_default_config_path() -> Option<PathBuf> {
    get_default_config_dir().map(|d| d.join(CONFIG_FILE_NAME))
}

/// Load configuration from a file.
fn load_from_file(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(ConfigError::ParseError)
}

/// Apply environment variable overrides to the configuration.
///
/// Environment variables follow the pattern: `SERIAL_SNIFF_<SECTION>_<KEY>`
/// For example:
/// - `SERIAL_SNIFF_SERIAL_BAUD_RATE=9600`
/// - `SERIAL_SNIFF_OUTPUT_STYLE=bytes`
/// - `SERIAL_SNIFF_LOGGING_LEVEL=debug`
///
/// `NO_COLOR` (any non-empty value) also turns color off.
fn apply_env_overrides(config: &mut Config) -> ConfigResult<()> {
    apply_overrides_from(config, |name| std::env::var(name).ok())
}

fn apply_overrides_from<F>(config: &mut Config, lookup: F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| format!("{}_{}", ENV_PREFIX, key);

    // Serial overrides
    if let Some(val) = lookup(&var("SERIAL_BAUD_RATE")) {
        config.serial.baud_rate = val
            .parse()
            .map_err(|_| ConfigError::env_parse(var("SERIAL_BAUD_RATE"), "Invalid baud rate"))?;
    }

    // Output overrides
    if let Some(val) = lookup(&var("OUTPUT_STYLE")) {
        config.output.style = val;
    }
    if let Some(val) = lookup(&var("OUTPUT_SEPARATOR")) {
        config.output.separator = val;
    }
    if let Some(val) = lookup(&var("OUTPUT_COLOR")) {
        config.output.color = parse_bool(&val)
            .ok_or_else(|| ConfigError::env_parse(var("OUTPUT_COLOR"), "Expected true or false"))?;
    }
    if lookup("NO_COLOR").is_some_and(|val| !val.is_empty()) {
        config.output.color = false;
    }

    // Logging overrides
    if let Some(val) = lookup(&var("LOGGING_LEVEL")) {
        config.logging.level = val;
    }
    if let Some(val) = lookup(&var("LOGGING_FORMAT")) {
        config.logging.format = match val.to_lowercase().as_str() {
            "compact" => LogFormat::Compact,
            "pretty" => LogFormat::Pretty,
            "full" => LogFormat::Full,
            _ => {
                return Err(ConfigError::env_parse(
                    var("LOGGING_FORMAT"),
                    "Expected compact, pretty or full",
                ))
            }
        };
    }

    Ok(())
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
