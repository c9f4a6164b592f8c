use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use temple_receipts::domain::event::ServiceDetails;
use temple_receipts::domain::record::{RecordStatus, StoredRecord};
use temple_receipts::notify::dispatcher::{JobStore, NotificationDispatcher};
use temple_receipts::notify::{
    AdminNotifier, Channel, ChannelSender, OrgProfile, OutboundMessage, SendOutcome,
};
use temple_receipts::repo::jobs_repo::NewJob;
use uuid::Uuid;

struct FixedSender {
    channel: Channel,
    outcome: SendOutcome,
    calls: AtomicUsize,
}

impl FixedSender {
    fn new(channel: Channel, outcome: SendOutcome) -> Arc<Self> {
        Arc::new(Self {
            channel,
            outcome,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ChannelSender for FixedSender {
    fn channel(&self) -> Channel {
        self.channel
    }

    async fn send(&self, _message: &OutboundMessage) -> SendOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

#[derive(Default)]
struct MemoryJobs {
    created: Mutex<Vec<NewJob>>,
    attempts: Mutex<Vec<(Uuid, SendOutcome)>>,
}

#[async_trait]
impl JobStore for MemoryJobs {
    async fn create(&self, job: NewJob) -> anyhow::Result<()> {
        self.created.lock().unwrap().push(job);
        Ok(())
    }

    async fn record_attempt(&self, job_id: Uuid, outcome: &SendOutcome) -> anyhow::Result<()> {
        self.attempts.lock().unwrap().push((job_id, outcome.clone()));
        Ok(())
    }
}

fn dispatcher(
    senders: Vec<Arc<dyn ChannelSender>>,
    jobs: Arc<MemoryJobs>,
    admin_sender: Arc<FixedSender>,
) -> NotificationDispatcher {
    NotificationDispatcher {
        senders,
        jobs,
        admin: AdminNotifier {
            sender: admin_sender,
            admin_phone: "+918310408797".to_string(),
        },
        org: OrgProfile {
            name: "Shri Raghavendra Swamy Brundavana Sannidhi".to_string(),
            subtitle: "Service to Humanity is Service to God".to_string(),
            contact_phone: "+918310408797".to_string(),
        },
    }
}

fn donation_record(email: Option<&str>) -> StoredRecord {
    StoredRecord {
        record_id: Uuid::new_v4(),
        receipt_number: "DN-161024-0001".to_string(),
        category: temple_receipts::domain::receipt::ReceiptCategory::Donation,
        payer_name: "Ramesh Kumar".to_string(),
        payer_phone: "+919876543210".to_string(),
        payer_email: email.map(str::to_string),
        amount_minor: 110_000,
        order_ref: "order_abc".to_string(),
        payment_ref: "pay_xyz".to_string(),
        status: RecordStatus::Success,
        details: ServiceDetails::Donation {
            donation_type: "General Donation".to_string(),
            donation_purpose: "Temple maintenance".to_string(),
        },
        certificate_url: None,
        created_at: Utc.with_ymd_and_hms(2024, 10, 16, 9, 30, 0).unwrap(),
    }
}

#[tokio::test]
async fn one_failing_channel_never_suppresses_the_other() {
    let whatsapp = FixedSender::new(
        Channel::Whatsapp,
        SendOutcome::GatewayError {
            code: Some("HTTP_500".to_string()),
            message: "boom".to_string(),
        },
    );
    let email = FixedSender::new(
        Channel::Email,
        SendOutcome::Sent {
            message_id: "sg_1".to_string(),
        },
    );
    let admin = FixedSender::new(
        Channel::Whatsapp,
        SendOutcome::Sent {
            message_id: "SM_admin".to_string(),
        },
    );
    let jobs = Arc::new(MemoryJobs::default());

    let dispatcher = dispatcher(
        vec![whatsapp.clone() as _, email.clone() as _],
        jobs.clone(),
        admin.clone(),
    );
    let report = dispatcher.dispatch(&donation_record(Some("ramesh@example.com"))).await;

    assert_eq!(report.per_channel.len(), 2);
    assert_eq!(whatsapp.calls.load(Ordering::SeqCst), 1);
    assert_eq!(email.calls.load(Ordering::SeqCst), 1);

    let by_channel: Vec<_> = report
        .per_channel
        .iter()
        .map(|c| (c.channel, c.outcome.is_sent()))
        .collect();
    assert!(by_channel.contains(&(Channel::Whatsapp, false)));
    assert!(by_channel.contains(&(Channel::Email, true)));
    assert!(!report.total_failure());
}

#[tokio::test]
async fn every_attempt_is_persisted_as_a_job_with_its_outcome() {
    let whatsapp = FixedSender::new(
        Channel::Whatsapp,
        SendOutcome::Sent {
            message_id: "SM_1".to_string(),
        },
    );
    let email = FixedSender::new(Channel::Email, SendOutcome::RateLimited);
    let admin = FixedSender::new(
        Channel::Whatsapp,
        SendOutcome::Sent {
            message_id: "SM_admin".to_string(),
        },
    );
    let jobs = Arc::new(MemoryJobs::default());

    let dispatcher = dispatcher(vec![whatsapp as _, email as _], jobs.clone(), admin);
    dispatcher.dispatch(&donation_record(Some("ramesh@example.com"))).await;

    let created = jobs.created.lock().unwrap();
    assert_eq!(created.len(), 2);

    let attempts = jobs.attempts.lock().unwrap();
    assert_eq!(attempts.len(), 2);
    assert!(attempts.iter().any(|(_, o)| o.is_sent()));
    assert!(attempts.iter().any(|(_, o)| *o == SendOutcome::RateLimited));
}

#[tokio::test]
async fn channel_without_a_recipient_is_skipped() {
    let whatsapp = FixedSender::new(
        Channel::Whatsapp,
        SendOutcome::Sent {
            message_id: "SM_1".to_string(),
        },
    );
    let email = FixedSender::new(
        Channel::Email,
        SendOutcome::Sent {
            message_id: "sg_1".to_string(),
        },
    );
    let admin = FixedSender::new(
        Channel::Whatsapp,
        SendOutcome::Sent {
            message_id: "SM_admin".to_string(),
        },
    );
    let jobs = Arc::new(MemoryJobs::default());

    let dispatcher = dispatcher(vec![whatsapp as _, email.clone() as _], jobs.clone(), admin);
    let report = dispatcher.dispatch(&donation_record(None)).await;

    assert_eq!(report.per_channel.len(), 1);
    assert_eq!(report.per_channel[0].channel, Channel::Whatsapp);
    assert_eq!(email.calls.load(Ordering::SeqCst), 0);
    assert_eq!(jobs.created.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn total_failure_raises_an_admin_alert_without_erroring() {
    let whatsapp = FixedSender::new(
        Channel::Whatsapp,
        SendOutcome::GatewayError {
            code: Some("TIMEOUT".to_string()),
            message: "messaging gateway timeout".to_string(),
        },
    );
    let email = FixedSender::new(
        Channel::Email,
        SendOutcome::GatewayError {
            code: Some("HTTP_503".to_string()),
            message: "unavailable".to_string(),
        },
    );
    let admin = FixedSender::new(
        Channel::Whatsapp,
        SendOutcome::Sent {
            message_id: "SM_admin".to_string(),
        },
    );
    let jobs = Arc::new(MemoryJobs::default());

    let dispatcher = dispatcher(vec![whatsapp as _, email as _], jobs, admin.clone());
    let report = dispatcher.dispatch(&donation_record(Some("ramesh@example.com"))).await;

    assert!(report.total_failure());
    // the routine admin copy plus the all-channels-failed alert
    assert_eq!(admin.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn admin_copy_goes_out_after_the_payer_sends() {
    let whatsapp = FixedSender::new(
        Channel::Whatsapp,
        SendOutcome::Sent {
            message_id: "SM_1".to_string(),
        },
    );
    let admin = FixedSender::new(
        Channel::Whatsapp,
        SendOutcome::Sent {
            message_id: "SM_admin".to_string(),
        },
    );
    let jobs = Arc::new(MemoryJobs::default());

    let dispatcher = dispatcher(vec![whatsapp as _], jobs, admin.clone());
    let report = dispatcher.dispatch(&donation_record(None)).await;

    assert!(report.any_sent());
    assert_eq!(admin.calls.load(Ordering::SeqCst), 1);
}
