mod format;
pub use format::LoggerFormat;

mod level;
pub use level::LoggerLevel;

mod timestamp;
pub(crate) use timestamp::UtcRfc3339;
