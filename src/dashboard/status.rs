/// Statuses counted as successful.
pub const SUCCESS_STATUSES: &[&str] = &["SUCCESS"];

/// Statuses counted as failed.
pub const FAILED_STATUSES: &[&str] = &["FAILED", "ABORTED", "EXPIRED"];

/// Statuses of executions still making progress.
pub const ACTIVE_STATUSES: &[&str] = &["RUNNING", "PAUSED"];

/// Statuses of executions waiting on something external.
pub const PENDING_STATUSES: &[&str] = &["INTERVENTIONWAITING", "APPROVALWAITING", "WAITING"];

/// Dashboard bucket a raw execution status falls into. The mapping is a
/// closed enumeration: anything outside the four tables above is `Ignored`
/// and contributes to totals only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCategory {
    Success,
    Failure,
    Active,
    Pending,
    Ignored,
}

pub fn classify(status: &str) -> StatusCategory {
    if SUCCESS_STATUSES.contains(&status) {
        StatusCategory::Success
    } else if FAILED_STATUSES.contains(&status) {
        StatusCategory::Failure
    } else if ACTIVE_STATUSES.contains(&status) {
        StatusCategory::Active
    } else if PENDING_STATUSES.contains(&status) {
        StatusCategory::Pending
    } else {
        StatusCategory::Ignored
    }
}
