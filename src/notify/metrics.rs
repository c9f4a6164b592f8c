use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// Process-wide delivery counters. Never decremented; reset only when the
/// process restarts. Senders bump sent/failed, the status ingest bumps
/// delivered/read/failed.
#[derive(Default)]
pub struct DeliveryMetrics {
    sent: AtomicU64,
    delivered: AtomicU64,
    failed: AtomicU64,
    read: AtomicU64,
    last_sent_unix: AtomicI64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub sent: u64,
    pub delivered: u64,
    pub failed: u64,
    pub read: u64,
    pub last_sent_at: Option<DateTime<Utc>>,
}

impl DeliveryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_sent(&self) {
        self.sent.fetch_add(1, Ordering::Relaxed);
        self.last_sent_unix.store(Utc::now().timestamp(), Ordering::Relaxed);
    }

    pub fn mark_delivered(&self) {
        self.delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn mark_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn mark_read(&self) {
        self.read.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let last_sent = self.last_sent_unix.load(Ordering::Relaxed);
        MetricsSnapshot {
            sent: self.sent.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            read: self.read.load(Ordering::Relaxed),
            last_sent_at: if last_sent > 0 {
                Utc.timestamp_opt(last_sent, 0).single()
            } else {
                None
            },
        }
    }
}
