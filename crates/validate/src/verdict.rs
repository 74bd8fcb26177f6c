//! Outcome of validating one slice.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictStatus {
    Passed,
    Failed,
}

impl std::fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerdictStatus::Passed => write!(f, "passed"),
            VerdictStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Pass/fail outcome plus the issues found in one slice.
///
/// `status` is `Failed` exactly when `issues` is non-empty; use
/// [`ValidationVerdict::from_issues`] to keep that invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    pub status: VerdictStatus,
    pub issues: Vec<String>,
    pub validated_at: DateTime<Utc>,
    pub record_count: usize,
    pub entities: BTreeSet<String>,
}

impl ValidationVerdict {
    pub fn from_issues(
        issues: Vec<String>,
        validated_at: DateTime<Utc>,
        record_count: usize,
        entities: BTreeSet<String>,
    ) -> Self {
        let status = if issues.is_empty() {
            VerdictStatus::Passed
        } else {
            VerdictStatus::Failed
        };
        Self {
            status,
            issues,
            validated_at,
            record_count,
            entities,
        }
    }

    /// Vacuous pass for a slice with no records.
    pub fn empty(validated_at: DateTime<Utc>) -> Self {
        Self::from_issues(Vec::new(), validated_at, 0, BTreeSet::new())
    }

    pub fn passed(&self) -> bool {
        self.status == VerdictStatus::Passed
    }
}
