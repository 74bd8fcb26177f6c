//! Stage 2: configured closed-interval bounds.

use tracing::warn;
use wxguard_core::Record;

use crate::rules::RuleConfig;

/// Flag every record whose value falls outside its measurement's interval.
///
/// Missing values are left to the presence stage. Rules with unusable
/// bounds are skipped.
pub fn check(records: &[Record], rules: &RuleConfig, issues: &mut Vec<String>) {
    for (&measurement, rule) in &rules.measurements {
        if rule.min.is_none() && rule.max.is_none() {
            continue;
        }
        if !rule.has_valid_bounds() {
            warn!(%measurement, min = ?rule.min, max = ?rule.max, "skipping range check with invalid bounds");
            continue;
        }

        let min = rule.min.unwrap_or(f64::NEG_INFINITY);
        let max = rule.max.unwrap_or(f64::INFINITY);

        for record in records {
            let Some(value) = record.value(measurement) else {
                continue;
            };
            if !rule.contains(value) {
                issues.push(format!(
                    "{measurement} out of range for {}: value {value:.2} outside [{min:.2}, {max:.2}]",
                    record.label()
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::MeasurementRule;
    use chrono::Utc;
    use wxguard_core::Measurement;

    fn rec(temp: f64, humidity: f64) -> Record {
        Record::new("A", Utc::now())
            .with(Measurement::Temperature, temp)
            .with(Measurement::Humidity, humidity)
    }

    #[test]
    fn in_range_values_pass() {
        let mut issues = Vec::new();
        check(&[rec(-50.0, 0.0), rec(50.0, 100.0)], &RuleConfig::default(), &mut issues);
        assert!(issues.is_empty());
    }

    #[test]
    fn one_issue_per_offending_record() {
        let mut issues = Vec::new();
        check(&[rec(20.0, 150.0), rec(60.0, 50.0)], &RuleConfig::default(), &mut issues);
        assert_eq!(
            issues,
            vec![
                "temperature out of range for A: value 60.00 outside [-50.00, 50.00]",
                "humidity out of range for A: value 150.00 outside [0.00, 100.00]",
            ]
        );
    }

    #[test]
    fn missing_values_are_not_range_issues() {
        let mut issues = Vec::new();
        check(&[Record::new("A", Utc::now())], &RuleConfig::default(), &mut issues);
        assert!(issues.is_empty());
    }

    #[test]
    fn inverted_bounds_are_skipped() {
        let mut rules = RuleConfig::default();
        rules
            .measurements
            .insert(Measurement::Temperature, MeasurementRule::bounded(50.0, -50.0));

        let mut issues = Vec::new();
        check(&[rec(0.0, 50.0)], &rules, &mut issues);
        assert!(issues.is_empty());
    }

    #[test]
    fn open_upper_bound() {
        let mut rules = RuleConfig::default();
        rules.measurements.insert(
            Measurement::WindSpeed,
            MeasurementRule { min: Some(0.0), max: None, anomaly_threshold: 3.0 },
        );
        let record = Record::new("A", Utc::now()).with(Measurement::WindSpeed, -1.0);

        let mut issues = Vec::new();
        check(&[record], &rules, &mut issues);
        assert_eq!(issues, vec!["wind_speed out of range for A: value -1.00 outside [0.00, inf]"]);
    }
}
