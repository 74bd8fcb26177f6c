//! Stage 1: required fields must be present.

use wxguard_core::{Measurement, Record};

use super::group_by_entity;

/// Flag missing entity ids, measurements and condition labels.
///
/// One issue per (field, entity) pair, carrying the number of affected
/// records. Timestamps are non-optional on [`Record`] and need no check.
pub fn check(records: &[Record], issues: &mut Vec<String>) {
    let missing_entity = records.iter().filter(|r| !r.has_entity()).count();
    if missing_entity > 0 {
        issues.push(format!("Missing city in {missing_entity} record(s)"));
    }

    let groups = group_by_entity(records);

    for measurement in Measurement::ALL {
        for (entity, members) in &groups {
            let missing = members
                .iter()
                .filter(|r| r.value(measurement).is_none())
                .count();
            if missing > 0 {
                issues.push(format!(
                    "Missing {measurement} in {missing} record(s) for {entity}"
                ));
            }
        }
    }

    for (entity, members) in &groups {
        let missing = members.iter().filter(|r| !r.has_condition()).count();
        if missing > 0 {
            issues.push(format!(
                "Missing weather_condition in {missing} record(s) for {entity}"
            ));
        }
    }
}
