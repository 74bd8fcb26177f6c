//! Fixed-interval loop around [`MonitoringOrchestrator::run_cycle`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::orchestrator::MonitoringOrchestrator;

/// Run cycles every `interval` until `shutdown` is notified.
///
/// The first cycle starts immediately. Shutdown is only observed between
/// cycles; a cycle in flight always runs to fan-in. Use
/// [`Notify::notify_one`] to request shutdown so a request made mid-cycle is
/// kept until the loop checks for it.
///
/// Returns the number of cycles run.
pub async fn run_monitoring(
    orchestrator: Arc<MonitoringOrchestrator>,
    interval: Duration,
    shutdown: Arc<Notify>,
) -> u64 {
    info!(interval_secs = interval.as_secs_f64(), "starting monitoring loop");

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut cycles = 0u64;

    loop {
        tokio::select! {
            biased;
            _ = shutdown.notified() => {
                info!(cycles, "monitoring loop stopped");
                return cycles;
            }
            _ = ticker.tick() => {
                let summary = orchestrator.run_cycle().await;
                cycles += 1;
                if let Some(reason) = &summary.source_error {
                    warn!(cycle = cycles, reason = %reason, "cycle skipped");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::ReportPayload;
    use crate::traits::{DataSource, ResultSink, SinkError, SourceError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wxguard_core::Batch;
    use wxguard_validate::RuleConfig;

    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl DataSource for CountingSource {
        async fn fetch(&self) -> Result<Batch, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(SourceError::Unavailable("offline".into()))
        }

        fn source_name(&self) -> &str {
            "counting"
        }
    }

    struct NullSink;

    #[async_trait::async_trait]
    impl ResultSink for NullSink {
        async fn send(&self, _payload: &ReportPayload) -> Result<(), SinkError> {
            Ok(())
        }

        fn sink_name(&self) -> &str {
            "null"
        }
    }

    #[tokio::test]
    async fn failed_cycles_keep_looping_until_shutdown() {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
        });
        let orchestrator = Arc::new(MonitoringOrchestrator::new(
            source.clone(),
            Arc::new(NullSink),
            RuleConfig::default(),
        ));
        let shutdown = Arc::new(Notify::new());

        let handle = tokio::spawn(run_monitoring(
            orchestrator,
            Duration::from_millis(10),
            shutdown.clone(),
        ));

        while source.calls.load(Ordering::SeqCst) < 3 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        shutdown.notify_one();

        let cycles = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("loop did not stop")
            .unwrap();
        assert!(cycles >= 3);
        assert_eq!(cycles as usize, source.calls.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn shutdown_before_start_runs_nothing() {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
        });
        let orchestrator = Arc::new(MonitoringOrchestrator::new(
            source.clone(),
            Arc::new(NullSink),
            RuleConfig::default(),
        ));
        let shutdown = Arc::new(Notify::new());
        shutdown.notify_one();

        let cycles = run_monitoring(orchestrator, Duration::from_secs(60), shutdown).await;
        assert_eq!(cycles, 0);
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }
}
