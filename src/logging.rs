use std::fs;
use std::path::Path;

use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{Error, Result};

pub const LOG_FILE_NAME: &str = "typetrial.log";
pub const DEFAULT_DIRECTIVE: &str = "info";

/// `RUST_LOG` wins over the configured directive.
pub fn env_filter(default_directive: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(default_directive)?),
    }
}

/// Like [`env_filter`], but a directive that does not parse falls back to
/// [`DEFAULT_DIRECTIVE`]. The parse error is handed back so it can be logged
/// once a subscriber is installed.
pub fn env_filter_or_default(directive: &str) -> (EnvFilter, Option<Error>) {
    match env_filter(directive) {
        Ok(filter) => (filter, None),
        Err(err) => (EnvFilter::new(DEFAULT_DIRECTIVE), Some(err)),
    }
}

/// Install a file-backed subscriber. Keep the guard alive for the lifetime
/// of the program or buffered lines are lost.
pub fn init(dir: &Path, filter: EnvFilter) -> Result<WorkerGuard> {
    fs::create_dir_all(dir)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_NAME)
        .build(dir)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()?;

    Ok(guard)
}
