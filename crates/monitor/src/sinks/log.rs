use crate::payload::ReportPayload;
use crate::traits::{ResultSink, SinkError};

/// Writes each report to the log instead of delivering it. Used for dry runs.
#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait::async_trait]
impl ResultSink for LogSink {
    async fn send(&self, payload: &ReportPayload) -> Result<(), SinkError> {
        tracing::info!(
            entity = %payload.entity,
            status = %payload.status,
            issues = payload.issues.len(),
            completeness = payload.metrics.data_completeness,
            "validation report (dry run)"
        );
        for issue in &payload.issues {
            tracing::info!(entity = %payload.entity, "  {issue}");
        }
        Ok(())
    }

    fn sink_name(&self) -> &str {
        "log"
    }
}
