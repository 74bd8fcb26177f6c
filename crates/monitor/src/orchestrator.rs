//! One monitoring cycle: fetch, partition, fan out per entity, fan in.
//!
//! Each entity runs in its own tokio task: validate its slice against the
//! shared batch, compute metrics, then send one payload to the sink. A sink
//! failure or a panic inside a task is recorded against that entity only;
//! the other tasks keep running and the cycle waits for all of them.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::future::join_all;
use tracing::{debug, error, info, warn};
use wxguard_core::{Batch, EntitySlice};
use wxguard_validate::{Clock, RuleConfig, SystemClock, ValidationEngine};

use crate::metrics::compute_metrics;
use crate::payload::ReportPayload;
use crate::summary::{CycleSummary, EntityOutcome};
use crate::traits::{DataSource, ResultSink};

pub struct MonitoringOrchestrator {
    source: Arc<dyn DataSource>,
    sink: Arc<dyn ResultSink>,
    engine: ValidationEngine,
    /// Stamps payloads at dispatch time; shared with the engine.
    clock: Arc<dyn Clock>,
    rules: Arc<RuleConfig>,
    /// Entities reported on every cycle, even when absent from the batch.
    expected_entities: Vec<String>,
}

impl MonitoringOrchestrator {
    pub fn new(source: Arc<dyn DataSource>, sink: Arc<dyn ResultSink>, rules: RuleConfig) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        Self {
            source,
            sink,
            engine: ValidationEngine::with_clock(Arc::clone(&clock)),
            clock,
            rules: Arc::new(rules),
            expected_entities: Vec::new(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.engine = ValidationEngine::with_clock(Arc::clone(&clock));
        self.clock = clock;
        self
    }

    pub fn with_expected_entities(mut self, entities: Vec<String>) -> Self {
        self.expected_entities = entities;
        self
    }

    /// Run one cycle to completion. Never fails: collaborator errors end up
    /// in the returned summary.
    pub async fn run_cycle(&self) -> CycleSummary {
        let started_at = Utc::now();

        let batch = match self.source.fetch().await {
            Ok(batch) if batch.is_empty() => {
                warn!(source = self.source.source_name(), "data source returned no records, skipping cycle");
                return CycleSummary::skipped(started_at, "empty batch");
            }
            Ok(batch) => Arc::new(batch),
            Err(e) => {
                error!(source = self.source.source_name(), error = %e, "failed to fetch batch, skipping cycle");
                return CycleSummary::skipped(started_at, e.to_string());
            }
        };

        let slices = self.slices(&batch);
        info!(
            records = batch.len(),
            entities = slices.len(),
            sink = self.sink.sink_name(),
            "starting monitoring cycle"
        );

        let tasks = slices.into_iter().map(|slice| {
            let entity = slice.entity.clone();
            let pipeline = EntityPipeline {
                engine: self.engine.clone(),
                clock: Arc::clone(&self.clock),
                rules: Arc::clone(&self.rules),
                batch: Arc::clone(&batch),
                sink: Arc::clone(&self.sink),
            };
            let handle = tokio::spawn(pipeline.run(slice));
            async move { (entity, handle.await) }
        });

        let mut summary = CycleSummary::new(started_at);
        for (entity, joined) in join_all(tasks).await {
            let outcome = joined.unwrap_or_else(|e| {
                error!(entity = %entity, error = %e, "entity pipeline aborted");
                EntityOutcome::aborted(format!("entity task failed: {e}"))
            });
            summary.record(entity, outcome);
        }
        let summary = summary.finish();

        info!(
            processed = summary.processed(),
            dispatched = summary.dispatched(),
            failed = summary.failed(),
            duration_ms = summary.duration_ms(),
            "monitoring cycle complete"
        );
        summary
    }

    /// Partition the batch, then append empty slices for expected entities
    /// that sent nothing.
    fn slices(&self, batch: &Batch) -> Vec<EntitySlice> {
        let mut slices = batch.partition();
        for expected in &self.expected_entities {
            if !slices.iter().any(|s| &s.entity == expected) {
                slices.push(EntitySlice::empty(expected.clone()));
            }
        }
        slices
    }
}

/// Everything one entity task needs, owned so it can move into the task.
struct EntityPipeline {
    engine: ValidationEngine,
    clock: Arc<dyn Clock>,
    rules: Arc<RuleConfig>,
    batch: Arc<Batch>,
    sink: Arc<dyn ResultSink>,
}

impl EntityPipeline {
    async fn run(self, slice: EntitySlice) -> EntityOutcome {
        let start = Instant::now();

        if slice.is_empty() {
            warn!(entity = %slice.entity, "no data available");
            return EntityOutcome::no_data();
        }

        let verdict = self.engine.validate_slice(&slice, &self.batch, &self.rules);
        let metrics = compute_metrics(&slice.records);
        debug!(
            entity = %slice.entity,
            status = %verdict.status,
            issues = verdict.issues.len(),
            completeness = metrics.data_completeness,
            "entity validated"
        );

        let payload = ReportPayload::new(slice.entity, &verdict, metrics, self.clock.now());
        let result = self.sink.send(&payload).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(()) => {
                info!(
                    entity = %payload.entity,
                    status = %payload.status,
                    issues = payload.issues.len(),
                    duration_ms,
                    "validation report dispatched"
                );
                EntityOutcome::delivered(payload.status, duration_ms)
            }
            Err(e) => {
                warn!(
                    entity = %payload.entity,
                    sink = self.sink.sink_name(),
                    error = %e,
                    "failed to dispatch validation report"
                );
                EntityOutcome::undelivered(payload.status, e.to_string(), duration_ms)
            }
        }
    }
}
