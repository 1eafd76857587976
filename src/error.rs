use thiserror::Error;

/// Invocation problems. These are reported before any log file is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    #[error("invalid date {0:?}: use YYYY-MM-DD or 'today'")]
    InvalidDate(String),

    #[error("invalid slot {0:?}: expected one of 10:00, 16:00, 16:15, 16:30")]
    InvalidSlot(String),

    #[error("unknown area {name:?}: configured areas are {known}")]
    UnknownArea { name: String, known: String },
}
