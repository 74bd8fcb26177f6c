//! Stage 5: physical-consistency checks within each entity.

use tracing::warn;
use wxguard_core::Record;

use crate::rules::RuleConfig;

use super::group_by_entity;

/// Largest absolute change between time-adjacent pressure readings.
///
/// Pairs where either reading is missing are skipped. `None` with fewer than
/// two records.
pub fn max_pressure_jump(records: &[&Record]) -> Option<f64> {
    if records.len() < 2 {
        return None;
    }
    let mut ordered = records.to_vec();
    ordered.sort_by_key(|r| r.timestamp);

    ordered
        .windows(2)
        .filter_map(|pair| Some((pair[1].pressure? - pair[0].pressure?).abs()))
        .filter(|d| !d.is_nan())
        .reduce(f64::max)
}

pub fn check(records: &[Record], rules: &RuleConfig, issues: &mut Vec<String>) {
    let combo_enabled =
        rules.temperature_high_threshold.is_finite() && rules.humidity_low_threshold.is_finite();
    if !combo_enabled {
        warn!("skipping temperature-humidity check: thresholds are not finite");
    }
    let jump_enabled =
        rules.pressure_jump_threshold.is_finite() && rules.pressure_jump_threshold >= 0.0;
    if !jump_enabled {
        warn!(threshold = rules.pressure_jump_threshold, "skipping pressure jump check");
    }

    for (entity, members) in group_by_entity(records) {
        // Co-occurrence within the slice, not necessarily the same record.
        if combo_enabled {
            let hot = members
                .iter()
                .any(|r| r.temperature.is_some_and(|t| t > rules.temperature_high_threshold));
            let dry = members
                .iter()
                .any(|r| r.humidity.is_some_and(|h| h < rules.humidity_low_threshold));
            if hot && dry {
                issues.push(format!("Suspicious temperature-humidity combination in {entity}"));
            }
        }

        if jump_enabled {
            if let Some(jump) = max_pressure_jump(&members) {
                if jump > rules.pressure_jump_threshold {
                    issues.push(format!(
                        "Suspicious rapid pressure change in {entity}: {jump:.2} hPa"
                    ));
                }
            }
        }
    }
}
