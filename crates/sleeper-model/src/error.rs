use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error(
        "timer value out of range: {0} (expected {min}..={max})",
        min = crate::TIMER_MIN,
        max = crate::TIMER_MAX
    )]
    OutOfRange(i64),

    #[error("invalid preset label: {0:?} (expected \"<minutes>m\")")]
    InvalidPreset(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
