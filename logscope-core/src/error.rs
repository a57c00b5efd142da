use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogscopeError {
    #[error("Log file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("Cannot analyze an empty set of log entries")]
    EmptyInput,
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<anyhow::Error> for LogscopeError {
    fn from(err: anyhow::Error) -> Self {
        LogscopeError::Config(format!("{:#}", err))
    }
}

pub type Result<T> = std::result::Result<T, LogscopeError>;
