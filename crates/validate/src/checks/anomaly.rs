//! Stage 4: robust outlier detection across the whole batch.
//!
//! The median and MAD of each configured column come from every record in
//! the batch, since a single entity rarely has enough points to estimate
//! spread. Only the slice's own records are scored, so each anomalous cell
//! is reported once, under the entity that owns it.

use tracing::{debug, warn};
use wxguard_core::{Batch, Measurement, Record};

use crate::rules::RuleConfig;
use crate::stats::{median_and_mad, modified_z_score};

/// A value whose modified z-score exceeds its column threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Anomaly {
    pub entity: String,
    pub measurement: Measurement,
    pub value: f64,
    pub score: f64,
}

impl std::fmt::Display for Anomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Anomaly detected in {} for {}: value {:.2} has modified z-score {:.2}",
            self.measurement, self.entity, self.value, self.score
        )
    }
}

/// Score `records` against batch-wide statistics.
///
/// Falls back to the slice itself as context when `batch` is empty. Columns
/// with a degenerate MAD or an unusable threshold are skipped.
pub fn detect(records: &[Record], batch: &Batch, rules: &RuleConfig) -> Vec<Anomaly> {
    let context = if batch.is_empty() { records } else { batch.records() };
    let mut anomalies = Vec::new();

    for (&measurement, rule) in &rules.measurements {
        if !rule.has_valid_threshold() {
            warn!(%measurement, threshold = rule.anomaly_threshold, "skipping anomaly check with invalid threshold");
            continue;
        }

        let values: Vec<f64> = context.iter().filter_map(|r| r.value(measurement)).collect();
        let Some((median, mad)) = median_and_mad(&values) else {
            continue;
        };
        if mad <= f64::EPSILON {
            debug!(%measurement, points = values.len(), "no spread in column, skipping anomaly check");
            continue;
        }

        for record in records {
            let Some(value) = record.value(measurement) else {
                continue;
            };
            let Some(score) = modified_z_score(value, median, mad) else {
                continue;
            };
            if score.abs() > rule.anomaly_threshold {
                anomalies.push(Anomaly {
                    entity: record.label().to_string(),
                    measurement,
                    value,
                    score,
                });
            }
        }
    }

    anomalies
}

pub fn check(records: &[Record], batch: &Batch, rules: &RuleConfig, issues: &mut Vec<String>) {
    issues.extend(detect(records, batch, rules).iter().map(ToString::to_string));
}
