use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("passage must not be empty")]
    EmptyPassage,

    #[error("invalid log filter: {0}")]
    LogFilter(#[from] tracing_subscriber::filter::ParseError),

    #[error("failed to open log file: {0}")]
    LogFile(#[from] tracing_appender::rolling::InitError),

    #[error("failed to install log subscriber: {0}")]
    LogInit(#[from] tracing_subscriber::util::TryInitError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
