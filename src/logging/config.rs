//! Logging settings, read from the `[logging]` section of the app config

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// Log verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive spelling understood by `EnvFilter`
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Where events are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Console,
    File,
    Both,
}

/// How often the log file rolls over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RotationStrategy {
    #[default]
    Daily,
    Hourly,
    Never,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level for everything without a module override
    pub level: LogLevel,
    pub format: LogFormat,
    pub output: LogOutput,
    /// Log file directory; the platform data dir when unset
    pub directory: Option<PathBuf>,
    pub rotation: RotationStrategy,
    /// Per-target overrides, e.g. `"myelin_planner::media" = "trace"`
    pub module_levels: HashMap<String, LogLevel>,
    /// Print the event target (module path)
    pub show_target: bool,
    /// Print thread ids and source locations
    pub show_source: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        // HTTP client internals are noisy below warn
        let module_levels = [("hyper", LogLevel::Warn), ("reqwest", LogLevel::Warn)]
            .into_iter()
            .map(|(module, level)| (module.to_string(), level))
            .collect();

        Self {
            level: LogLevel::Info,
            format: LogFormat::Text,
            output: LogOutput::Console,
            directory: None,
            rotation: RotationStrategy::Daily,
            module_levels,
            show_target: true,
            show_source: false,
        }
    }
}

impl LoggingConfig {
    /// Verbose console logging for debug builds
    pub fn development() -> Self {
        Self {
            level: LogLevel::Debug,
            rotation: RotationStrategy::Never,
            show_source: true,
            ..Self::default()
        }
    }

    /// Directory the file layer writes to
    pub fn resolved_directory(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(default_log_directory)
    }
}

/// Platform log directory for the planner
pub fn default_log_directory() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("myelin-planner").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}
