use crate::certificate::{CertificateClient, CertificateRequest};
use crate::domain::event::ServiceDetails;
use crate::notify::dispatcher::NotificationDispatcher;
use crate::repo::records_repo::RecordsRepo;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NotifyTask {
    pub record_id: Uuid,
}

pub type NotifyQueue = mpsc::Sender<NotifyTask>;

pub fn queue(capacity: usize) -> (NotifyQueue, mpsc::Receiver<NotifyTask>) {
    mpsc::channel(capacity)
}

/// Fixed-size pool draining the shared notification queue. The orchestrator
/// only ever enqueues; everything slow (certificate rendering, gateway
/// calls) happens here, off the payment-confirmation path.
#[derive(Clone)]
pub struct NotifyWorkerPool {
    pub records: RecordsRepo,
    pub dispatcher: NotificationDispatcher,
    pub certificates: CertificateClient,
}

impl NotifyWorkerPool {
    pub fn spawn(self, workers: usize, receiver: mpsc::Receiver<NotifyTask>) {
        let shared = Arc::new(tokio::sync::Mutex::new(receiver));

        for worker_id in 0..workers.max(1) {
            let pool = self.clone();
            let rx = Arc::clone(&shared);
            tokio::spawn(async move {
                loop {
                    let task = { rx.lock().await.recv().await };
                    let Some(task) = task else {
                        break;
                    };
                    if let Err(err) = pool.handle(task).await {
                        tracing::error!(worker_id, "notification task failed: {err:#}");
                    }
                }
            });
        }
    }

    async fn handle(&self, task: NotifyTask) -> anyhow::Result<()> {
        let Some(mut record) = self.records.find_by_id(task.record_id).await? else {
            anyhow::bail!("record {} not found", task.record_id);
        };

        // Donation receipts carry a certificate when the renderer cooperates;
        // a failed render degrades to notifying without the artifact.
        if matches!(record.details, ServiceDetails::Donation { .. })
            && record.certificate_url.is_none()
        {
            let resp = self
                .certificates
                .request(&CertificateRequest::for_record(&record))
                .await;
            if resp.success {
                if let Some(url) = resp.download_url {
                    if let Err(err) = self.records.set_certificate_url(record.record_id, &url).await
                    {
                        tracing::warn!("could not store certificate url: {err:#}");
                    }
                    record.certificate_url = Some(url);
                }
            } else {
                tracing::warn!(
                    receipt = %record.receipt_number,
                    "certificate generation failed: {}",
                    resp.error.unwrap_or_default()
                );
            }
        }

        let report = self.dispatcher.dispatch(&record).await;
        for channel in &report.per_channel {
            if !channel.outcome.is_sent() {
                tracing::warn!(
                    channel = channel.channel.as_str(),
                    receipt = %record.receipt_number,
                    "notification attempt failed: {:?}",
                    channel.outcome
                );
            }
        }

        Ok(())
    }
}
