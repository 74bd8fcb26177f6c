use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wxguard_validate::{ValidationVerdict, VerdictStatus};

use crate::metrics::Metrics;

/// One entity's verdict and metrics, as delivered to the sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPayload {
    #[serde(rename = "city")]
    pub entity: String,
    pub status: VerdictStatus,
    pub issues: Vec<String>,
    pub metrics: Metrics,
    /// When the report was dispatched.
    pub timestamp: DateTime<Utc>,
}

impl ReportPayload {
    pub fn new(
        entity: impl Into<String>,
        verdict: &ValidationVerdict,
        metrics: Metrics,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            entity: entity.into(),
            status: verdict.status,
            issues: verdict.issues.clone(),
            metrics,
            timestamp,
        }
    }
}
