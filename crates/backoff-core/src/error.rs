use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackoffError {
    #[error("backoff table must have at least one entry")]
    EmptyTable,
    #[error("backoff table entry {index} is zero; wait times must be at least one minute")]
    ZeroMinutes { index: usize },
}
