use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use temple_receipts::certificate::CertificateClient;
use temple_receipts::config::AppConfig;
use temple_receipts::notify::dispatcher::NotificationDispatcher;
use temple_receipts::notify::email::SendGridEmailSender;
use temple_receipts::notify::metrics::DeliveryMetrics;
use temple_receipts::notify::rate_limit::SendRateLimiter;
use temple_receipts::notify::whatsapp::TwilioWhatsAppSender;
use temple_receipts::notify::worker::{queue, NotifyWorkerPool};
use temple_receipts::notify::{AdminNotifier, ChannelSender, OrgProfile};
use temple_receipts::repo::jobs_repo::JobsRepo;
use temple_receipts::repo::records_repo::RecordsRepo;
use temple_receipts::service::payment_flow::PaymentFlow;
use temple_receipts::service::status_ingest::StatusIngest;
use temple_receipts::service::verifier::HmacSha256Verifier;
use temple_receipts::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&cfg.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let metrics = Arc::new(DeliveryMetrics::new());
    let limiter = Arc::new(SendRateLimiter::new(
        cfg.rate_limit_per_second,
        cfg.rate_limit_burst,
        cfg.rate_limit_per_minute,
    ));

    let whatsapp = Arc::new(TwilioWhatsAppSender {
        base_url: cfg.twilio_base_url.clone(),
        account_sid: cfg.twilio_account_sid.clone(),
        auth_token: cfg.twilio_auth_token.clone(),
        from_number: cfg.twilio_whatsapp_number.clone(),
        status_callback_url: cfg.status_callback_url.clone(),
        timeout_ms: cfg.gateway_timeout_ms,
        limiter: Arc::clone(&limiter),
        metrics: Arc::clone(&metrics),
        client: reqwest::Client::new(),
    });
    let email = Arc::new(SendGridEmailSender {
        base_url: cfg.sendgrid_base_url.clone(),
        api_key: cfg.sendgrid_api_key.clone(),
        from_email: cfg.sendgrid_from_email.clone(),
        timeout_ms: cfg.gateway_timeout_ms,
        metrics: Arc::clone(&metrics),
        client: reqwest::Client::new(),
    });

    let org = OrgProfile {
        name: cfg.org_name.clone(),
        subtitle: cfg.org_subtitle.clone(),
        contact_phone: cfg.admin_phone.clone(),
    };
    let admin = AdminNotifier {
        sender: Arc::clone(&whatsapp) as Arc<dyn ChannelSender>,
        admin_phone: cfg.admin_phone.clone(),
    };

    let records_repo = RecordsRepo { pool: pool.clone() };
    let jobs_repo = JobsRepo { pool: pool.clone() };

    let dispatcher = NotificationDispatcher {
        senders: vec![
            Arc::clone(&whatsapp) as Arc<dyn ChannelSender>,
            email as Arc<dyn ChannelSender>,
        ],
        jobs: Arc::new(jobs_repo.clone()),
        admin: admin.clone(),
        org,
    };

    let certificates = CertificateClient {
        base_url: cfg.certificate_base_url.clone(),
        timeout_ms: cfg.certificate_timeout_ms,
        org_name: cfg.org_name.clone(),
        org_subtitle: cfg.org_subtitle.clone(),
        client: reqwest::Client::new(),
    };

    let (notify_queue, notify_rx) = queue(cfg.notify_queue_capacity);
    NotifyWorkerPool {
        records: records_repo.clone(),
        dispatcher,
        certificates: certificates.clone(),
    }
    .spawn(cfg.notify_workers, notify_rx);

    let payment_flow = PaymentFlow {
        pool: pool.clone(),
        verifier: Arc::new(HmacSha256Verifier {
            key_secret: cfg.payment_key_secret.clone(),
        }),
        queue: notify_queue.clone(),
        admin: admin.clone(),
    };
    let ingest = StatusIngest {
        jobs: jobs_repo,
        metrics: Arc::clone(&metrics),
        admin,
        admin_phone: cfg.admin_phone.clone(),
    };

    let state = AppState {
        payment_flow,
        ingest,
        records_repo,
        queue: notify_queue,
        certificates,
        metrics,
        whatsapp,
        webhook_token: cfg.webhook_token.clone(),
        pool,
    };

    let admin_routes = Router::new()
        .route(
            "/admin/records/:receipt_number/status",
            post(temple_receipts::http::handlers::admin::transition_status),
        )
        .route(
            "/admin/records/:receipt_number/notifications/resend",
            post(temple_receipts::http::handlers::admin::resend_notifications),
        )
        .route(
            "/admin/records/:receipt_number/certificate",
            post(temple_receipts::http::handlers::admin::regenerate_certificate),
        )
        .layer(from_fn_with_state(
            cfg.admin_api_key.clone(),
            temple_receipts::http::middleware::admin_auth::require_admin_api_key,
        ));

    let app = Router::new()
        .route("/health", get(temple_receipts::http::handlers::payments::health))
        .route(
            "/payments/verify",
            post(temple_receipts::http::handlers::payments::verify_payment),
        )
        .route(
            "/webhooks/whatsapp",
            post(temple_receipts::http::handlers::webhook::delivery_status)
                .get(temple_receipts::http::handlers::webhook::verification_challenge),
        )
        .route("/ops/readiness", get(temple_receipts::http::handlers::ops::readiness))
        .route("/ops/status", get(temple_receipts::http::handlers::ops::status))
        .merge(admin_routes)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
