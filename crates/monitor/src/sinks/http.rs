//! HTTP sink posting reports to the monitoring service.

use std::time::Duration;

use crate::payload::ReportPayload;
use crate::traits::{ResultSink, SinkError};

/// Path appended to the service base URL.
pub const RECORD_VALIDATION_PATH: &str = "/record-validation";

/// POSTs each [`ReportPayload`] as JSON to `{base_url}/record-validation`.
#[derive(Debug)]
pub struct HttpSink {
    /// Full endpoint URL.
    url: String,
    /// Shared HTTP client (connection pooling, per-request timeout).
    client: reqwest::Client,
}

impl HttpSink {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SinkError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(base_url, client)
    }

    /// Use a preconfigured client (proxy, TLS, timeout settings).
    pub fn with_client(base_url: &str, client: reqwest::Client) -> Result<Self, SinkError> {
        let base = base_url.trim().trim_end_matches('/');
        if base.is_empty() {
            return Err(SinkError::Unavailable("monitoring service URL is empty".into()));
        }
        Ok(Self {
            url: format!("{base}{RECORD_VALIDATION_PATH}"),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl ResultSink for HttpSink {
    async fn send(&self, payload: &ReportPayload) -> Result<(), SinkError> {
        let response = self.client.post(&self.url).json(payload).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(
                url = %self.url,
                entity = %payload.entity,
                %status,
                body = %body_text,
                "monitoring service returned non-2xx status"
            );
            return Err(SinkError::Rejected {
                status: status.as_u16(),
            });
        }

        tracing::debug!(url = %self.url, entity = %payload.entity, %status, "report delivered");
        Ok(())
    }

    fn sink_name(&self) -> &str {
        "http"
    }
}
