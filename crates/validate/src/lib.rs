//! Data-quality validation for weather record batches.
//!
//! This crate provides:
//! - [`ValidationEngine`] running presence, range, freshness, robust anomaly
//!   and physical-consistency checks over one entity's slice
//! - [`RuleConfig`] thresholds, loadable from YAML with built-in defaults
//! - [`Clock`] so freshness checks can run against a fixed "now"

pub mod checks;
pub mod clock;
pub mod engine;
pub mod rules;
pub mod stats;
pub mod verdict;

pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::ValidationEngine;
pub use rules::{MeasurementRule, RuleConfig, RuleConfigError};
pub use verdict::{ValidationVerdict, VerdictStatus};
