//! Validation engine: runs the check pipeline over one slice.
//!
//! Stages run in a fixed order and accumulate issues:
//! 1. [`presence`](crate::checks::presence): required fields present
//! 2. [`range`](crate::checks::range): configured closed intervals
//! 3. [`freshness`](crate::checks::freshness): newest record per entity
//! 4. [`anomaly`](crate::checks::anomaly): modified z-score, batch-wide
//! 5. [`patterns`](crate::checks::patterns): physical consistency
//!
//! The engine holds no state between calls apart from its clock.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;
use wxguard_core::{Batch, EntitySlice, Record};

use crate::checks::{anomaly, freshness, patterns, presence, range};
use crate::clock::{Clock, SystemClock};
use crate::rules::RuleConfig;
use crate::verdict::ValidationVerdict;

#[derive(Clone)]
pub struct ValidationEngine {
    clock: Arc<dyn Clock>,
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationEngine {
    /// Engine reading the wall clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Validate `records` (normally one entity's slice) with `batch` as the
    /// context for batch-wide statistics.
    ///
    /// Never fails: malformed input becomes issues on the verdict. An empty
    /// slice is a vacuous pass.
    pub fn validate(&self, records: &[Record], batch: &Batch, rules: &RuleConfig) -> ValidationVerdict {
        let now = self.clock.now();
        if records.is_empty() {
            return ValidationVerdict::empty(now);
        }

        let mut issues = Vec::new();
        presence::check(records, &mut issues);
        range::check(records, rules, &mut issues);
        freshness::check(records, now, rules, &mut issues);
        anomaly::check(records, batch, rules, &mut issues);
        patterns::check(records, rules, &mut issues);

        let entities: BTreeSet<String> = records.iter().map(|r| r.entity.clone()).collect();
        debug!(
            entities = entities.len(),
            records = records.len(),
            issues = issues.len(),
            "validation complete"
        );

        ValidationVerdict::from_issues(issues, now, records.len(), entities)
    }

    pub fn validate_slice(&self, slice: &EntitySlice, batch: &Batch, rules: &RuleConfig) -> ValidationVerdict {
        self.validate(&slice.records, batch, rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::verdict::VerdictStatus;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use wxguard_core::Measurement;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 14, 12, 0, 0).unwrap()
    }

    fn engine() -> ValidationEngine {
        ValidationEngine::with_clock(Arc::new(FixedClock(now())))
    }

    fn reading(entity: &str, temp: f64, humidity: f64, pressure: f64) -> Record {
        Record::new(entity, now())
            .with(Measurement::Temperature, temp)
            .with(Measurement::Humidity, humidity)
            .with(Measurement::Pressure, pressure)
            .with(Measurement::WindSpeed, 5.0)
            .with_condition("Clouds")
    }

    fn sample_batch() -> Batch {
        Batch::new(vec![
            reading("London", 20.5, 65.0, 1013.0),
            reading("New York", 22.0, 70.0, 1014.0),
            reading("Tokyo", 25.0, 75.0, 1012.0),
        ])
    }

    fn slice_of(batch: &Batch, entity: &str) -> Vec<Record> {
        batch.records().iter().filter(|r| r.entity == entity).cloned().collect()
    }

    #[test]
    fn empty_slice_passes_with_zero_records() {
        let verdict = engine().validate(&[], &sample_batch(), &RuleConfig::default());
        assert_eq!(verdict.status, VerdictStatus::Passed);
        assert!(verdict.issues.is_empty());
        assert_eq!(verdict.record_count, 0);
        assert!(verdict.entities.is_empty());
    }

    #[test]
    fn clean_slices_pass() {
        let batch = sample_batch();
        for entity in ["London", "New York", "Tokyo"] {
            let verdict = engine().validate(&slice_of(&batch, entity), &batch, &RuleConfig::default());
            assert!(verdict.passed(), "{entity}: {:?}", verdict.issues);
            assert_eq!(verdict.record_count, 1);
            assert_eq!(verdict.entities, BTreeSet::from([entity.to_string()]));
            assert_eq!(verdict.validated_at, now());
        }
    }

    #[test]
    fn whole_batch_validates_as_one_slice() {
        let batch = sample_batch();
        let verdict = engine().validate(batch.records(), &batch, &RuleConfig::default());
        assert!(verdict.passed());
        assert_eq!(verdict.record_count, 3);
        assert_eq!(verdict.entities.len(), 3);
    }

    #[test]
    fn validation_is_idempotent() {
        let mut records = sample_batch().records().to_vec();
        records[0].temperature = Some(100.0);
        records[1].humidity = None;
        let batch = Batch::new(records);
        let slice = slice_of(&batch, "London");

        let first = engine().validate(&slice, &batch, &RuleConfig::default());
        let second = engine().validate(&slice, &batch, &RuleConfig::default());
        assert_eq!(first, second);
    }

    #[test]
    fn outlier_scenario_reports_anomaly_for_owner() {
        let batch = Batch::new(vec![
            reading("A", 20.0, 65.0, 1013.0),
            reading("A", 100.0, 65.0, 1013.0),
            reading("B", 21.0, 65.0, 1013.0),
            reading("C", 22.0, 65.0, 1013.0),
        ]);
        let verdict = engine().validate(&slice_of(&batch, "A"), &batch, &RuleConfig::default());

        assert_eq!(verdict.status, VerdictStatus::Failed);
        let anomalies: Vec<&String> = verdict
            .issues
            .iter()
            .filter(|i| i.starts_with("Anomaly detected"))
            .collect();
        assert_eq!(anomalies.len(), 1);
        assert!(anomalies[0].contains("in temperature for A: value 100.00"));

        // Siblings see the same batch but report nothing for A's value.
        let b = engine().validate(&slice_of(&batch, "B"), &batch, &RuleConfig::default());
        assert!(b.passed(), "{:?}", b.issues);
    }

    #[test]
    fn out_of_range_value_still_feeds_anomaly_stage() {
        let mut records = sample_batch().records().to_vec();
        records[0].temperature = Some(100.0);
        let batch = Batch::new(records);
        let verdict = engine().validate(&slice_of(&batch, "London"), &batch, &RuleConfig::default());

        assert_eq!(verdict.issues.len(), 2, "{:?}", verdict.issues);
        assert!(verdict.issues[0].starts_with("temperature out of range for London"));
        assert!(verdict.issues[1].starts_with("Anomaly detected in temperature for London"));
    }

    #[test]
    fn stale_slice_gets_one_freshness_issue() {
        let stale: Vec<Record> = sample_batch()
            .records()
            .iter()
            .cloned()
            .map(|mut r| {
                r.timestamp = now() - Duration::hours(2);
                r
            })
            .collect();
        let batch = Batch::new(stale);

        for entity in ["London", "New York", "Tokyo"] {
            let verdict = engine().validate(&slice_of(&batch, entity), &batch, &RuleConfig::default());
            let fresh: Vec<_> = verdict.issues.iter().filter(|i| i.contains("minutes old")).collect();
            assert_eq!(fresh.len(), 1);
            assert!(fresh[0].contains(entity));
        }
    }

    #[test]
    fn hot_dry_scenario() {
        let batch = Batch::new(vec![
            reading("X", 40.0, 30.0, 1013.0),
            reading("X", 20.0, 5.0, 1013.0),
        ]);
        let verdict = engine().validate(batch.records(), &batch, &RuleConfig::default());
        let combos = verdict
            .issues
            .iter()
            .filter(|i| i.as_str() == "Suspicious temperature-humidity combination in X")
            .count();
        assert_eq!(combos, 1);
    }

    #[test]
    fn pressure_jump_scenario() {
        let mut later = reading("Y", 20.0, 60.0, 990.0);
        later.timestamp = now() - Duration::minutes(5);
        let mut earlier = reading("Y", 20.0, 60.0, 1013.0);
        earlier.timestamp = now() - Duration::minutes(30);
        let batch = Batch::new(vec![earlier, later]);

        let verdict = engine().validate(batch.records(), &batch, &RuleConfig::default());
        assert_eq!(verdict.issues, vec!["Suspicious rapid pressure change in Y: 23.00 hPa"]);
    }

    #[test]
    fn all_null_slice_fails_on_presence() {
        let batch = Batch::new(vec![Record::new("London", now())]);
        let verdict = engine().validate(batch.records(), &batch, &RuleConfig::default());
        assert_eq!(verdict.status, VerdictStatus::Failed);
        assert_eq!(verdict.issues.len(), 5);
        assert!(verdict.issues.iter().all(|i| i.starts_with("Missing")));
    }

    #[test]
    fn missing_and_out_of_range_cells_fail() {
        let mut records = sample_batch().records().to_vec();
        records[0].temperature = None;
        records[1].humidity = Some(150.0);
        let batch = Batch::new(records);

        let verdict = engine().validate(batch.records(), &batch, &RuleConfig::default());
        assert_eq!(verdict.status, VerdictStatus::Failed);
        assert!(verdict.issues.contains(&"Missing temperature in 1 record(s) for London".to_string()));
        assert!(verdict
            .issues
            .iter()
            .any(|i| i.starts_with("humidity out of range for New York")));
    }

    #[test]
    fn single_record_single_entity_passes() {
        let batch = Batch::new(vec![reading("Solo", 49.0, 1.0, 1089.0)]);
        let rules = RuleConfig {
            temperature_high_threshold: 50.0,
            ..RuleConfig::default()
        };
        let verdict = engine().validate(batch.records(), &batch, &rules);
        assert!(verdict.passed(), "{:?}", verdict.issues);
    }

    #[test]
    fn invalid_rules_do_not_panic() {
        let rules = RuleConfig {
            max_age_minutes: f64::NAN,
            pressure_jump_threshold: -1.0,
            temperature_high_threshold: f64::INFINITY,
            ..RuleConfig::default()
        };
        let batch = sample_batch();
        let verdict = engine().validate(batch.records(), &batch, &rules);
        assert!(verdict.passed(), "{:?}", verdict.issues);
    }
}
