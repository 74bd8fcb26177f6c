//! Stage 3: the newest record of each entity must be recent enough.

use chrono::{DateTime, Utc};
use tracing::warn;
use wxguard_core::Record;

use crate::rules::RuleConfig;

use super::group_by_entity;

/// Age in minutes of the newest record, relative to `now`.
pub fn age_minutes(records: &[&Record], now: DateTime<Utc>) -> Option<f64> {
    let newest = records.iter().map(|r| r.timestamp).max()?;
    Some((now - newest).num_milliseconds() as f64 / 60_000.0)
}

/// One issue per entity whose newest record is older than `max_age_minutes`.
///
/// Only the freshest record counts: older stale records are ignored as long
/// as one recent record exists.
pub fn check(records: &[Record], now: DateTime<Utc>, rules: &RuleConfig, issues: &mut Vec<String>) {
    if rules.max_age_minutes.is_nan() {
        warn!("skipping freshness check: max_age_minutes is NaN");
        return;
    }
    let max_age = rules.max_age_minutes.max(0.0);

    for (entity, members) in group_by_entity(records) {
        let Some(age) = age_minutes(&members, now) else {
            continue;
        };
        if age > max_age {
            issues.push(format!(
                "Data for {entity} is {} minutes old (max allowed: {max_age})",
                age as i64
            ));
        }
    }
}
