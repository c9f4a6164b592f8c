use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Queued,
    Sent,
    Delivered,
    Read,
    Failed,
    Undelivered,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "QUEUED",
            JobStatus::Sent => "SENT",
            JobStatus::Delivered => "DELIVERED",
            JobStatus::Read => "READ",
            JobStatus::Failed => "FAILED",
            JobStatus::Undelivered => "UNDELIVERED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "QUEUED" => Some(JobStatus::Queued),
            "SENT" => Some(JobStatus::Sent),
            "DELIVERED" => Some(JobStatus::Delivered),
            "READ" => Some(JobStatus::Read),
            "FAILED" => Some(JobStatus::Failed),
            "UNDELIVERED" => Some(JobStatus::Undelivered),
            _ => None,
        }
    }

    /// Maps the gateway's lowercase callback statuses. Transient states the
    /// pipeline does not track ("sending", "accepted") map to None.
    pub fn parse_delivery(s: &str) -> Option<Self> {
        match s {
            "queued" => Some(JobStatus::Queued),
            "sent" => Some(JobStatus::Sent),
            "delivered" => Some(JobStatus::Delivered),
            "read" => Some(JobStatus::Read),
            "failed" => Some(JobStatus::Failed),
            "undelivered" => Some(JobStatus::Undelivered),
            _ => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, JobStatus::Failed | JobStatus::Undelivered)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAdvance {
    Advance,
    Duplicate,
    Regression,
}

/// Job status is strictly monotonic: a replayed callback is a duplicate and
/// a move backwards (or out of a settled state) is a regression. A job never
/// returns to QUEUED; manual retry creates a fresh job instead.
pub fn advance(current: JobStatus, incoming: JobStatus) -> StatusAdvance {
    use JobStatus::*;

    if current == incoming {
        return StatusAdvance::Duplicate;
    }

    let ok = matches!(
        (current, incoming),
        (Queued, Sent)
            | (Queued, Delivered)
            | (Queued, Read)
            | (Queued, Failed)
            | (Queued, Undelivered)
            | (Sent, Delivered)
            | (Sent, Read)
            | (Sent, Failed)
            | (Sent, Undelivered)
            | (Delivered, Read)
    );

    if ok {
        StatusAdvance::Advance
    } else {
        StatusAdvance::Regression
    }
}
