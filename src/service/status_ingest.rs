use crate::domain::job::{JobStatus, StatusAdvance};
use crate::notify::metrics::DeliveryMetrics;
use crate::notify::templates;
use crate::notify::AdminNotifier;
use crate::repo::jobs_repo::JobsRepo;
use serde::Deserialize;
use std::sync::Arc;

/// Form-encoded delivery-status callback from the messaging gateway. Older
/// gateway accounts still post the Sms* field names.
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryCallback {
    #[serde(rename = "MessageSid", alias = "SmsSid")]
    pub message_sid: Option<String>,
    #[serde(rename = "MessageStatus", alias = "SmsStatus")]
    pub message_status: Option<String>,
    #[serde(rename = "To")]
    pub to: Option<String>,
    #[serde(rename = "ErrorCode")]
    pub error_code: Option<String>,
    #[serde(rename = "ErrorMessage")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    Applied(StatusAdvance),
    UnknownMessage,
    Ignored,
}

#[derive(Clone)]
pub struct StatusIngest {
    pub jobs: JobsRepo,
    pub metrics: Arc<DeliveryMetrics>,
    pub admin: AdminNotifier,
    pub admin_phone: String,
}

impl StatusIngest {
    /// Idempotent: the monotonic job-status advance means a replayed
    /// callback lands as Duplicate and touches no metric. Terminal failures
    /// for non-admin recipients raise a best-effort admin alert.
    pub async fn ingest(&self, cb: DeliveryCallback) -> anyhow::Result<IngestOutcome> {
        let Some(message_id) = cb.message_sid.as_deref().filter(|s| !s.is_empty()) else {
            return Ok(IngestOutcome::Ignored);
        };
        let Some(status) = cb
            .message_status
            .as_deref()
            .and_then(JobStatus::parse_delivery)
        else {
            // transient gateway states ("sending", "accepted") are not tracked
            return Ok(IngestOutcome::Ignored);
        };

        let advanced = self
            .jobs
            .advance_by_external_id(
                message_id,
                status,
                cb.error_code.as_deref(),
                cb.error_message.as_deref(),
            )
            .await?;

        let Some(advanced) = advanced else {
            tracing::info!(message_id, "delivery callback for unknown message");
            return Ok(IngestOutcome::UnknownMessage);
        };

        match advanced.advance {
            StatusAdvance::Advance => {
                match status {
                    JobStatus::Delivered => self.metrics.mark_delivered(),
                    JobStatus::Read => self.metrics.mark_read(),
                    JobStatus::Failed | JobStatus::Undelivered => self.metrics.mark_failed(),
                    JobStatus::Queued | JobStatus::Sent => {}
                }

                let recipient = cb.to.clone().unwrap_or(advanced.recipient);
                if status.is_failure() && !self.is_admin_recipient(&recipient) {
                    let admin = self.admin.clone();
                    let alert = templates::delivery_failure_alert(
                        &recipient,
                        status.as_str(),
                        cb.error_code.as_deref(),
                        cb.error_message.as_deref(),
                    );
                    tokio::spawn(async move { admin.notify(alert).await });
                }
            }
            StatusAdvance::Duplicate => {
                tracing::debug!(message_id, "duplicate delivery callback ignored");
            }
            StatusAdvance::Regression => {
                tracing::warn!(
                    message_id,
                    incoming = status.as_str(),
                    current = advanced.previous.as_str(),
                    "out-of-order delivery callback ignored"
                );
            }
        }

        Ok(IngestOutcome::Applied(advanced.advance))
    }

    fn is_admin_recipient(&self, to: &str) -> bool {
        let digits: String = to.chars().filter(|c| c.is_ascii_digit()).collect();
        let admin_digits: String = self
            .admin_phone
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();
        !admin_digits.is_empty() && digits.ends_with(&admin_digits)
    }
}
