use thiserror::Error;

use sleeper_model::ModelError;

#[derive(Debug, Error)]
pub enum TimerError {
    #[error("invalid timer duration: {0}")]
    InvalidDuration(#[from] ModelError),

    #[error("invalid timer configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to spawn timer worker: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("timer plugin is already active")]
    AlreadyActive,

    #[error("timer plugin is not active")]
    NotActive,

    #[error("timer worker panicked")]
    WorkerPanicked,
}
