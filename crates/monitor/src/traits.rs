//! Collaborator traits and their error types.

use wxguard_core::{Batch, CoreError};

use crate::payload::ReportPayload;

/// Errors raised while obtaining a batch.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read batch from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse batch: {0}")]
    Parse(#[from] CoreError),

    #[error("data source unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while delivering a payload.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("sink rejected payload with status {status}")]
    Rejected { status: u16 },

    #[error("sink unavailable: {0}")]
    Unavailable(String),
}

/// Produces the current multi-entity batch.
///
/// Called once per cycle. Timeouts are the implementation's concern.
#[async_trait::async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch(&self) -> Result<Batch, SourceError>;

    /// Human-readable name for logs (e.g., "json-file").
    fn source_name(&self) -> &str;
}

/// Accepts one report per entity per cycle.
///
/// Delivery is at-most-once: a failed send is not retried within the cycle.
#[async_trait::async_trait]
pub trait ResultSink: Send + Sync {
    async fn send(&self, payload: &ReportPayload) -> Result<(), SinkError>;

    /// Human-readable name for logs (e.g., "http", "log").
    fn sink_name(&self) -> &str;
}
