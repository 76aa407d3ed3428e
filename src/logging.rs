use std::io;
use std::path::Path;
use thiserror::Error;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::{self, time::ChronoUtc};
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

/// Prefix of the daily-rotated log files in the data directory.
pub const LOG_FILE_PREFIX: &str = "movie-explorer.log";

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("failed to create log directory {}: {source}", dir.display())]
    CreateDir {
        dir: std::path::PathBuf,
        source: io::Error,
    },

    #[error("failed to install log subscriber: {0}")]
    Install(#[from] tracing_subscriber::util::TryInitError),
}

/// Filter for a `-v` count: 0 = info, 1 = debug with hyper quieted, 2+ = trace.
/// `RUST_LOG` wins when set.
fn filter_for(verbose_level: u8) -> EnvFilter {
    let default = match verbose_level {
        0 => "info",
        1 => "debug,hyper_util=warn,hyper::proto::h1=warn",
        _ => "trace",
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install the global subscriber. With a `log_dir` (the TUI owns the
/// terminal) records go to a daily rolling file; otherwise to stderr.
pub fn init_logging(verbose_level: u8, log_dir: Option<&Path>) -> Result<(), LoggingError> {
    let registry = Registry::default().with(filter_for(verbose_level));

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDir {
                dir: dir.to_path_buf(),
                source,
            })?;
            let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
            let fmt_layer = fmt::layer()
                .with_timer(ChronoUtc::rfc_3339())
                .with_ansi(false) // Disable ANSI codes when writing to file
                .with_writer(file_appender);
            registry.with(fmt_layer).try_init()?;
        }
        None => {
            let fmt_layer = fmt::layer()
                .with_timer(ChronoUtc::rfc_3339())
                .with_writer(io::stderr);
            registry.with(fmt_layer).try_init()?;
        }
    }

    Ok(())
}
