use clap::ValueEnum;
use std::fs::OpenOptions;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Overrides the whole filter when set, e.g. `connect4_client=trace`.
pub const LOG_FILTER_ENV: &str = "CONNECT4_LOG";

#[derive(Clone, Copy, Debug, Default, ValueEnum, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Clone, Debug)]
pub struct LogConfig {
    pub level: LogLevel,
    pub file: PathBuf,
}

#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error("failed to open log file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to configure logger: {0}")]
    Configure(String),
}

/// The terminal belongs to the board, so logs go to a file.
/// Keep the returned guard alive until exit or buffered lines are lost.
pub fn init(config: &LogConfig) -> Result<WorkerGuard, InitError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)
        .map_err(|source| InitError::Io {
            path: config.file.clone(),
            source,
        })?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(config.level))
        .with_target(config.level >= LogLevel::Debug)
        .with_ansi(false)
        .with_writer(writer)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|err| InitError::Configure(err.to_string()))?;
    Ok(guard)
}

fn build_env_filter(level: LogLevel) -> EnvFilter {
    if let Ok(filter) = std::env::var(LOG_FILTER_ENV) {
        return EnvFilter::new(filter);
    }
    default_filter(level)
}

/// tungstenite is chatty below info
fn default_filter(level: LogLevel) -> EnvFilter {
    let level = level.to_filter();
    let deps = std::cmp::min(level, LevelFilter::INFO);
    EnvFilter::new(format!(
        "{level},tokio_tungstenite={deps},tungstenite={deps}"
    ))
}
