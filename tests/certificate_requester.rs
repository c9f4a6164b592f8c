use std::time::{Duration, Instant};
use temple_receipts::certificate::{CertificateClient, CertificateRequest};

fn client(base_url: &str, timeout_ms: u64) -> CertificateClient {
    CertificateClient {
        base_url: base_url.to_string(),
        timeout_ms,
        org_name: "Shri Raghavendra Swamy Brundavana Sannidhi".to_string(),
        org_subtitle: "Service to Humanity is Service to God".to_string(),
        client: reqwest::Client::new(),
    }
}

fn request() -> CertificateRequest {
    CertificateRequest {
        donor_name: "Ramesh Kumar".to_string(),
        amount: "1100".to_string(),
        receipt_number: "DN-161024-0001".to_string(),
        date: "2024-10-16".to_string(),
    }
}

#[tokio::test]
async fn unreachable_renderer_fails_within_the_timeout_bound() {
    // nothing listens on this port; connection errors must surface as a
    // failed response, never a hang
    let client = client("http://127.0.0.1:9", 1500);

    let started = Instant::now();
    let resp = client.request(&request()).await;

    assert!(!resp.success);
    assert!(resp.error.is_some());
    assert!(started.elapsed() < Duration::from_secs(6));
}

#[tokio::test]
async fn health_check_reports_unreachable_service_as_down() {
    let client = client("http://127.0.0.1:9", 1000);
    assert!(!client.health_check().await);
}
