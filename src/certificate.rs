use crate::domain::record::{display_amount, StoredRecord};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

#[derive(Clone)]
pub struct CertificateClient {
    pub base_url: String,
    pub timeout_ms: u64,
    pub org_name: String,
    pub org_subtitle: String,
    pub client: reqwest::Client,
}

#[derive(Debug, Clone, Serialize)]
pub struct CertificateRequest {
    pub donor_name: String,
    pub amount: String,
    pub receipt_number: String,
    pub date: String,
}

impl CertificateRequest {
    pub fn for_record(record: &StoredRecord) -> Self {
        Self {
            donor_name: record.payer_name.clone(),
            amount: display_amount(record.amount_minor),
            receipt_number: record.receipt_number.clone(),
            date: record.created_at.format("%Y-%m-%d").to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CertificateResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl CertificateClient {
    /// Synchronous variant for callers that want the artifact inline.
    /// Bounded by the configured timeout, no retry here; every failure mode
    /// comes back as `success: false` rather than an error.
    pub async fn request(&self, data: &CertificateRequest) -> CertificateResponse {
        let body = json!({
            "donor_name": data.donor_name,
            "amount": data.amount,
            "donation_id": data.receipt_number,
            "donation_date": data.date,
            "organization_name": self.org_name,
            "organization_subtitle": self.org_subtitle,
        });

        let resp = self
            .client
            .post(format!("{}/generate", self.base_url))
            .json(&body)
            .timeout(Duration::from_millis(self.timeout_ms))
            .send()
            .await;

        match resp {
            Ok(r) if r.status().is_success() => match r.json::<CertificateResponse>().await {
                Ok(parsed) => parsed,
                Err(err) => failed(format!("invalid renderer response: {err}")),
            },
            Ok(r) => failed(format!("renderer returned HTTP {}", r.status().as_u16())),
            Err(err) if err.is_timeout() => failed("renderer timeout".to_string()),
            Err(err) => failed(err.to_string()),
        }
    }

    /// Fire-and-forget. Rendering must never delay or fail the payment
    /// confirmation path, so failures are logged and swallowed.
    pub fn request_async(&self, data: CertificateRequest) {
        let client = self.clone();
        tokio::spawn(async move {
            let resp = client.request(&data).await;
            if !resp.success {
                tracing::warn!(
                    receipt = %data.receipt_number,
                    "certificate generation failed: {}",
                    resp.error.unwrap_or_default()
                );
            }
        });
    }

    pub async fn health_check(&self) -> bool {
        self.client
            .get(format!("{}/health", self.base_url))
            .timeout(Duration::from_millis(self.timeout_ms))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}

fn failed(error: String) -> CertificateResponse {
    CertificateResponse {
        success: false,
        filename: None,
        download_url: None,
        error: Some(error),
    }
}
