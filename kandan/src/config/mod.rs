//! Configuration system for the `Kandan` board.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/kandan/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::PathBuf;
use std::time::Duration;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    remote: RemoteFileConfig,
    ui: UiFileConfig,
    board: BoardFileConfig,
}

/// `[remote]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct RemoteFileConfig {
    failure_probability: Option<f64>,
    min_delay_ms: Option<u64>,
    max_delay_ms: Option<u64>,
}

/// `[ui]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct UiFileConfig {
    toast_duration_ms: Option<u64>,
    timestamp_format: Option<String>,
}

/// `[board]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct BoardFileConfig {
    event_buffer: Option<usize>,
    seed: Option<bool>,
}

// ---------------------------------------------------------------------------
// Resolved configuration (concrete types, all fields populated)
// ---------------------------------------------------------------------------

/// Fully resolved board configuration.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    // -- Remote --
    /// Probability in `[0, 1]` that a simulated remote call fails.
    pub failure_probability: f64,
    /// Lower bound of the simulated latency window.
    pub min_delay: Duration,
    /// Upper bound of the simulated latency window.
    pub max_delay: Duration,

    // -- UI --
    /// How long a toast stays on screen.
    pub toast_duration: Duration,
    /// Timestamp display format string (chrono).
    pub timestamp_format: String,

    // -- Board --
    /// Buffer size for the board event channel.
    pub event_buffer: usize,
    /// Whether to start from the demo seed board instead of empty.
    pub seed: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            failure_probability: 0.2,
            min_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(2000),
            toast_duration: Duration::from_millis(4000),
            timestamp_format: "%H:%M".to_string(),
            event_buffer: 64,
            seed: true,
        }
    }
}

impl BoardConfig {
    /// Load configuration by merging CLI args and a TOML file.
    ///
    /// If `--config` is given and the file does not exist, returns an
    /// error. If no `--config` is given, the default path
    /// (`~/.config/kandan/config.toml`) is tried and silently ignored if
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit config file cannot be read
    /// or parsed.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    /// Resolve a `BoardConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default. This is separated from `load()` to
    /// enable unit testing without CLI parsing.
    #[must_use]
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            failure_probability: cli
                .failure_probability
                .or(file.remote.failure_probability)
                .unwrap_or(defaults.failure_probability),
            min_delay: file
                .remote
                .min_delay_ms
                .map_or(defaults.min_delay, Duration::from_millis),
            max_delay: file
                .remote
                .max_delay_ms
                .map_or(defaults.max_delay, Duration::from_millis),
            toast_duration: file
                .ui
                .toast_duration_ms
                .map_or(defaults.toast_duration, Duration::from_millis),
            timestamp_format: file
                .ui
                .timestamp_format
                .clone()
                .unwrap_or(defaults.timestamp_format),
            event_buffer: file.board.event_buffer.unwrap_or(defaults.event_buffer),
            seed: cli
                .no_seed
                .then_some(false)
                .or(file.board.seed)
                .unwrap_or(defaults.seed),
        }
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Task board with optimistic updates and rollback")]
pub struct CliArgs {
    /// Display name to log in with.
    #[arg(long, env = "KANDAN_USER")]
    pub user: Option<String>,

    /// Probability in [0, 1] that a simulated remote call fails.
    #[arg(long)]
    pub failure_probability: Option<f64>,

    /// Start from an empty board instead of the demo tasks.
    #[arg(long)]
    pub no_seed: bool,

    /// Path to config file (default: `~/.config/kandan/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "KANDAN_LOG")]
    pub log_level: String,
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Load and parse a TOML config file.
///
/// If `explicit_path` is `Some`, the file must exist (error if not).
/// If `explicit_path` is `None`, the default path is tried and missing file
/// is treated as empty config.
fn load_config_file(explicit_path: Option<&std::path::Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            // No config dir available — use defaults.
            return Ok(ConfigFile::default());
        };
        config_dir.join("kandan").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
