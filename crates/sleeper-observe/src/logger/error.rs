use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("unknown log format: {0} (expected: text|json|journald)")]
    InvalidFormat(String),

    #[error("invalid log level filter: {0}")]
    InvalidLevel(String),

    #[error("invalid {var}: {source}")]
    InvalidEnv {
        var: &'static str,
        #[source]
        source: Box<LoggerError>,
    },

    #[error("journald is not supported on this platform")]
    JournaldNotSupported,

    #[error("failed to connect to journald: {0}")]
    JournaldInitFailed(String),

    #[error("global logger already installed")]
    AlreadyInitialized,
}

pub type LoggerResult<T> = Result<T, LoggerError>;
