//! Cycle results for logging and observability.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wxguard_validate::VerdictStatus;

/// What happened to one entity during a cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityOutcome {
    pub validated: bool,
    pub dispatched: bool,
    pub error: Option<String>,
    /// Verdict status, when validation produced one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<VerdictStatus>,
    pub duration_ms: u64,
}

impl EntityOutcome {
    /// Expected entity with no records in the batch.
    pub fn no_data() -> Self {
        Self {
            validated: true,
            ..Self::default()
        }
    }

    pub fn delivered(status: VerdictStatus, duration_ms: u64) -> Self {
        Self {
            validated: true,
            dispatched: true,
            error: None,
            status: Some(status),
            duration_ms,
        }
    }

    pub fn undelivered(status: VerdictStatus, error: String, duration_ms: u64) -> Self {
        Self {
            validated: true,
            dispatched: false,
            error: Some(error),
            status: Some(status),
            duration_ms,
        }
    }

    /// The entity's task died before reporting back.
    pub fn aborted(error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Result of one `run_cycle` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Set when the source failed or returned nothing, in which case
    /// `entities` is empty.
    pub source_error: Option<String>,
    pub entities: BTreeMap<String, EntityOutcome>,
}

impl CycleSummary {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            finished_at: started_at,
            source_error: None,
            entities: BTreeMap::new(),
        }
    }

    /// A cycle that never reached the fan-out.
    pub fn skipped(started_at: DateTime<Utc>, reason: impl Into<String>) -> Self {
        Self {
            source_error: Some(reason.into()),
            finished_at: Utc::now(),
            ..Self::new(started_at)
        }
    }

    pub fn record(&mut self, entity: String, outcome: EntityOutcome) {
        self.entities.insert(entity, outcome);
    }

    pub fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self
    }

    pub fn processed(&self) -> usize {
        self.entities.len()
    }

    pub fn dispatched(&self) -> usize {
        self.entities.values().filter(|o| o.dispatched).count()
    }

    pub fn failed(&self) -> usize {
        self.entities.values().filter(|o| o.failed()).count()
    }

    /// Nothing was processed this cycle.
    pub fn is_noop(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn outcome(&self, entity: &str) -> Option<&EntityOutcome> {
        self.entities.get(entity)
    }

    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}
