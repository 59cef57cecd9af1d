//! Logging system for the planner
//!
//! Wires `tracing` output to the console and/or a rolling log file with
//! configurable verbosity and text or JSON formatting.

mod config;


pub use config::{
    default_log_directory, LogFormat, LogLevel, LogOutput, LoggingConfig, RotationStrategy,
};

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// File name prefix of rolled log files
const LOG_FILE_PREFIX: &str = "planner.log";

/// Logging system errors
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to initialize logging: {0}")]
    InitializationError(String),

    #[error("Failed to create log directory: {0}")]
    DirectoryCreationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for logging operations
pub type LoggingResult<T> = Result<T, LoggingError>;

/// Installed logging system. Keep it alive for the lifetime of the process so
/// buffered file output is flushed on drop.
pub struct LoggingSystem {
    _guards: Vec<WorkerGuard>,
}

impl LoggingSystem {
    /// Initialize the global subscriber with the given configuration
    pub fn init(config: LoggingConfig) -> LoggingResult<Self> {
        let mut guards = Vec::new();
        let env_filter = build_env_filter(&config);
        let registry = tracing_subscriber::registry();

        match config.output {
            LogOutput::Console => {
                registry
                    .with(env_filter)
                    .with(console_layer(&config))
                    .try_init()
                    .map_err(|e| LoggingError::InitializationError(e.to_string()))?;
            }
            LogOutput::File => {
                let (file_layer, guard) = file_layer(&config)?;
                guards.push(guard);
                registry
                    .with(env_filter)
                    .with(file_layer)
                    .try_init()
                    .map_err(|e| LoggingError::InitializationError(e.to_string()))?;
            }
            LogOutput::Both => {
                let (file_layer, guard) = file_layer(&config)?;
                guards.push(guard);
                registry
                    .with(env_filter)
                    .with(console_layer(&config))
                    .with(file_layer)
                    .try_init()
                    .map_err(|e| LoggingError::InitializationError(e.to_string()))?;
            }
        }

        Ok(Self { _guards: guards })
    }
}

/// Build the env filter: `RUST_LOG` wins when set, the config otherwise
pub(crate) fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    filter_from_config(config)
}

pub(crate) fn filter_from_config(config: &LoggingConfig) -> EnvFilter {
    let mut filter = EnvFilter::new(config.level.as_str());

    for (module, level) in &config.module_levels {
        match format!("{}={}", module, level).parse() {
            Ok(directive) => filter = filter.add_directive(directive),
            Err(e) => eprintln!("Ignoring invalid log directive for {}: {}", module, e),
        }
    }

    filter
}

fn console_layer<S>(config: &LoggingConfig) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    let layer = fmt::layer()
        .with_target(config.show_target)
        .with_thread_ids(config.show_source)
        .with_file(config.show_source)
        .with_line_number(config.show_source);

    if config.format == LogFormat::Json {
        layer.json().boxed()
    } else {
        layer.boxed()
    }
}

fn file_layer<S>(
    config: &LoggingConfig,
) -> LoggingResult<(Box<dyn Layer<S> + Send + Sync>, WorkerGuard)>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    let log_dir = config.resolved_directory();

    std::fs::create_dir_all(&log_dir).map_err(|e| {
        LoggingError::DirectoryCreationError(format!(
            "Failed to create log directory {:?}: {}",
            log_dir, e
        ))
    })?;

    let rotation = match config.rotation {
        RotationStrategy::Daily => Rotation::DAILY,
        RotationStrategy::Hourly => Rotation::HOURLY,
        RotationStrategy::Never => Rotation::NEVER,
    };

    let file_appender = RollingFileAppender::new(rotation, &log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let layer = fmt::layer()
        .with_writer(non_blocking)
        .with_target(config.show_target)
        .with_thread_ids(config.show_source)
        .with_file(config.show_source)
        .with_line_number(config.show_source)
        .with_ansi(false);

    if config.format == LogFormat::Json {
        Ok((layer.json().boxed(), guard))
    } else {
        Ok((layer.boxed(), guard))
    }
}

/// Initialize logging with the given configuration, falling back to a plain
/// console subscriber when the configured one cannot be installed.
pub fn init_logging(config: LoggingConfig) -> Option<LoggingSystem> {
    match LoggingSystem::init(config) {
        Ok(system) => Some(system),
        Err(e) => {
            eprintln!("Failed to initialize logging system: {}. Using basic logging.", e);
            let _ = tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::new(LogLevel::Info.as_str()))
                .try_init();
            None
        }
    }
}
