use thiserror::Error;

/// Result type for dashboard aggregation operations.
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Input-contract violations raised by the aggregation core.
///
/// These are caller errors, not transient failures: the core does no I/O,
/// so nothing here is retryable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DashboardError {
    /// A record timestamp falls outside the bucketed range. Callers must
    /// pre-filter rows to the requested window.
    #[error("timestamp {ts} outside bucket range [{start}, {end})")]
    OutOfRange { ts: i64, start: i64, end: i64 },

    /// The interval is inverted.
    #[error("start interval {start} is after end interval {end}")]
    InvalidInterval { start: i64, end: i64 },
}
