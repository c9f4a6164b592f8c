pub mod certificate;
pub mod config;
pub mod domain {
    pub mod event;
    pub mod job;
    pub mod receipt;
    pub mod record;
}
pub mod http {
    pub mod handlers {
        pub mod admin;
        pub mod ops;
        pub mod payments;
        pub mod webhook;
    }
    pub mod middleware {
        pub mod admin_auth;
    }
}
pub mod notify;
pub mod repo {
    pub mod jobs_repo;
    pub mod records_repo;
    pub mod sequence_repo;
}
pub mod service {
    pub mod payment_flow;
    pub mod status_ingest;
    pub mod verifier;
}

#[derive(Clone)]
pub struct AppState {
    pub payment_flow: service::payment_flow::PaymentFlow,
    pub ingest: service::status_ingest::StatusIngest,
    pub records_repo: repo::records_repo::RecordsRepo,
    pub queue: notify::worker::NotifyQueue,
    pub certificates: certificate::CertificateClient,
    pub metrics: std::sync::Arc<notify::metrics::DeliveryMetrics>,
    pub whatsapp: std::sync::Arc<notify::whatsapp::TwilioWhatsAppSender>,
    pub webhook_token: Option<String>,
    pub pool: sqlx::PgPool,
}
