use crate::domain::record::StoredRecord;
use crate::notify::templates;
use crate::notify::{
    AdminNotifier, Channel, ChannelSender, OrgProfile, OutboundMessage, Priority, SendOutcome,
};
use crate::repo::jobs_repo::{JobsRepo, NewJob};
use futures::future::join_all;
use std::sync::Arc;
use uuid::Uuid;

/// Persistence seam for notification jobs, so the fan-out logic stays
/// independent of the backing store.
#[async_trait::async_trait]
pub trait JobStore: Send + Sync {
    async fn create(&self, job: NewJob) -> anyhow::Result<()>;

    async fn record_attempt(&self, job_id: Uuid, outcome: &SendOutcome) -> anyhow::Result<()>;
}

#[async_trait::async_trait]
impl JobStore for JobsRepo {
    async fn create(&self, job: NewJob) -> anyhow::Result<()> {
        self.insert_queued(&job).await
    }

    async fn record_attempt(&self, job_id: Uuid, outcome: &SendOutcome) -> anyhow::Result<()> {
        match outcome {
            SendOutcome::Sent { message_id } => self.mark_sent(job_id, message_id).await,
            other => {
                self.mark_failed(
                    job_id,
                    other.error_code().as_deref(),
                    other.error_message().as_deref(),
                )
                .await
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChannelOutcome {
    pub channel: Channel,
    pub job_id: Option<Uuid>,
    pub outcome: SendOutcome,
}

#[derive(Debug, Clone)]
pub struct DispatchReport {
    pub per_channel: Vec<ChannelOutcome>,
}

impl DispatchReport {
    pub fn any_sent(&self) -> bool {
        self.per_channel.iter().any(|c| c.outcome.is_sent())
    }

    pub fn total_failure(&self) -> bool {
        !self.per_channel.is_empty() && !self.any_sent()
    }
}

#[derive(Clone)]
pub struct NotificationDispatcher {
    pub senders: Vec<Arc<dyn ChannelSender>>,
    pub jobs: Arc<dyn JobStore>,
    pub admin: AdminNotifier,
    pub org: OrgProfile,
}

impl NotificationDispatcher {
    /// Fans one record out to every configured channel concurrently and
    /// reports each outcome. A failing channel never cancels or delays its
    /// siblings, and the call itself never errors; only a failure across
    /// every channel escalates, as an admin alert rather than an error.
    pub async fn dispatch(&self, record: &StoredRecord) -> DispatchReport {
        let mut attempts = Vec::new();

        for sender in &self.senders {
            let channel = sender.channel();
            let Some(message) = build_message(channel, record, &self.org) else {
                tracing::info!(
                    channel = channel.as_str(),
                    receipt = %record.receipt_number,
                    "no usable recipient, skipping channel"
                );
                continue;
            };

            let job_id = Uuid::new_v4();
            let job = NewJob {
                job_id,
                record_id: record.record_id,
                channel,
                recipient: message.recipient.clone(),
                priority: message.priority,
            };
            let job_id = match self.jobs.create(job).await {
                Ok(()) => Some(job_id),
                Err(err) => {
                    tracing::error!("failed to persist notification job: {err:#}");
                    None
                }
            };

            attempts.push((Arc::clone(sender), channel, job_id, message));
        }

        let sends = attempts.into_iter().map(|(sender, channel, job_id, message)| async move {
            let outcome = sender.send(&message).await;
            (channel, job_id, outcome)
        });
        let results = join_all(sends).await;

        let mut per_channel = Vec::new();
        for (channel, job_id, outcome) in results {
            if let Some(id) = job_id {
                if let Err(err) = self.jobs.record_attempt(id, &outcome).await {
                    tracing::error!("failed to record job attempt: {err:#}");
                }
            }
            per_channel.push(ChannelOutcome {
                channel,
                job_id,
                outcome,
            });
        }

        let report = DispatchReport { per_channel };

        if record.details.notifies_admin() {
            self.admin
                .notify(templates::admin_message(record, &self.org))
                .await;
        }

        if report.total_failure() {
            tracing::error!(
                receipt = %record.receipt_number,
                "all notification channels failed"
            );
            self.admin
                .notify(templates::all_channels_failed_alert(
                    &record.receipt_number,
                    &record.payer_name,
                ))
                .await;
        }

        report
    }
}

fn build_message(
    channel: Channel,
    record: &StoredRecord,
    org: &OrgProfile,
) -> Option<OutboundMessage> {
    match channel {
        Channel::Whatsapp => Some(OutboundMessage {
            recipient: record.payer_phone.clone(),
            subject: None,
            body: templates::receipt_message(record, org),
            media_url: record.certificate_url.clone(),
            priority: Priority::High,
        }),
        Channel::Email => record.payer_email.clone().map(|email| OutboundMessage {
            recipient: email,
            subject: Some(templates::receipt_subject(record)),
            body: templates::receipt_email_html(record, org),
            media_url: record.certificate_url.clone(),
            priority: Priority::Normal,
        }),
    }
}
