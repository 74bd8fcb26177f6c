//! The individual validation stages.
//!
//! Each stage appends human-readable issues to a shared list and never
//! fails; the engine runs them in a fixed order.

pub mod anomaly;
pub mod freshness;
pub mod patterns;
pub mod presence;
pub mod range;

use wxguard_core::Record;

/// Group records by entity label, in order of first appearance.
pub(crate) fn group_by_entity(records: &[Record]) -> Vec<(&str, Vec<&Record>)> {
    let mut groups: Vec<(&str, Vec<&Record>)> = Vec::new();
    for record in records {
        let label = record.label();
        match groups.iter_mut().find(|(name, _)| *name == label) {
            Some((_, members)) => members.push(record),
            None => groups.push((label, vec![record])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use wxguard_core::UNKNOWN_ENTITY;

    #[test]
    fn groups_preserve_order_and_label_blanks() {
        let now = Utc::now();
        let records = vec![
            Record::new("B", now),
            Record::new("", now),
            Record::new("B", now),
        ];
        let groups = group_by_entity(&records);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "B");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, UNKNOWN_ENTITY);
    }
}
