//! Validation thresholds.
//!
//! A [`RuleConfig`] is passed into the engine on every call rather than held
//! as shared state. Every field has a default, so a partial YAML document only
//! overrides what it names:
//!
//! ```yaml
//! max_age_minutes: 30
//! measurements:
//!   wind_speed: { min: 0, max: 60, anomaly_threshold: 3.5 }
//! ```
//!
//! A measurement listed under `measurements` replaces that measurement's
//! default rule as a whole; unlisted measurements keep their defaults.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use wxguard_core::Measurement;

/// Errors raised while loading a rule file.
#[derive(Debug, thiserror::Error)]
pub enum RuleConfigError {
    #[error("failed to read rules file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rules: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid rules: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Range and anomaly settings for one measurement column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MeasurementRule {
    /// Inclusive lower bound; `None` disables the lower check.
    pub min: Option<f64>,
    /// Inclusive upper bound; `None` disables the upper check.
    pub max: Option<f64>,
    /// Modified z-score above which a value is anomalous.
    pub anomaly_threshold: f64,
}

impl Default for MeasurementRule {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
            anomaly_threshold: DEFAULT_ANOMALY_THRESHOLD,
        }
    }
}

impl MeasurementRule {
    pub fn bounded(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            anomaly_threshold: DEFAULT_ANOMALY_THRESHOLD,
        }
    }

    /// Whether `value` lies inside the closed interval.
    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }

    /// Bounds are usable: finite where set, and `min <= max`.
    pub fn has_valid_bounds(&self) -> bool {
        let finite = self.min.map_or(true, f64::is_finite) && self.max.map_or(true, f64::is_finite);
        let ordered = match (self.min, self.max) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        };
        finite && ordered
    }

    pub fn has_valid_threshold(&self) -> bool {
        self.anomaly_threshold.is_finite() && self.anomaly_threshold > 0.0
    }
}

pub const DEFAULT_ANOMALY_THRESHOLD: f64 = 3.0;
pub const DEFAULT_MAX_AGE_MINUTES: f64 = 60.0;
pub const DEFAULT_TEMPERATURE_HIGH: f64 = 35.0;
pub const DEFAULT_HUMIDITY_LOW: f64 = 10.0;
pub const DEFAULT_PRESSURE_JUMP: f64 = 20.0;

fn default_measurements() -> BTreeMap<Measurement, MeasurementRule> {
    BTreeMap::from([
        (Measurement::Temperature, MeasurementRule::bounded(-50.0, 50.0)),
        (Measurement::Humidity, MeasurementRule::bounded(0.0, 100.0)),
        (Measurement::Pressure, MeasurementRule::bounded(870.0, 1090.0)),
    ])
}

/// Overlay the configured measurement rules on top of the defaults.
fn merge_measurements<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<Measurement, MeasurementRule>, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = BTreeMap::<Measurement, MeasurementRule>::deserialize(deserializer)?;
    let mut merged = default_measurements();
    merged.extend(overrides);
    Ok(merged)
}

/// Thresholds consumed by [`crate::ValidationEngine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuleConfig {
    /// Per-measurement range and anomaly settings. Measurements without an
    /// entry are neither range-checked nor anomaly-scored.
    #[serde(deserialize_with = "merge_measurements")]
    pub measurements: BTreeMap<Measurement, MeasurementRule>,
    /// Maximum age of an entity's newest record.
    pub max_age_minutes: f64,
    /// Temperature above which a co-occurring low humidity is suspicious.
    pub temperature_high_threshold: f64,
    /// Humidity below which a co-occurring high temperature is suspicious.
    pub humidity_low_threshold: f64,
    /// Largest tolerated change between successive pressure readings.
    pub pressure_jump_threshold: f64,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            measurements: default_measurements(),
            max_age_minutes: DEFAULT_MAX_AGE_MINUTES,
            temperature_high_threshold: DEFAULT_TEMPERATURE_HIGH,
            humidity_low_threshold: DEFAULT_HUMIDITY_LOW,
            pressure_jump_threshold: DEFAULT_PRESSURE_JUMP,
        }
    }
}

impl RuleConfig {
    /// Load rules from an optional YAML file. `None` yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, RuleConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let yaml = std::fs::read_to_string(path).map_err(|source| RuleConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_yaml(&yaml)?;
        tracing::info!(path = %path.display(), measurements = config.measurements.len(), "loaded validation rules");
        Ok(config)
    }

    /// Parse and check a YAML rule document.
    pub fn from_yaml(yaml: &str) -> Result<Self, RuleConfigError> {
        // An empty document parses as unit, not as an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.check()?;
        Ok(config)
    }

    pub fn rule(&self, measurement: Measurement) -> Option<&MeasurementRule> {
        self.measurements.get(&measurement)
    }

    /// Report every threshold the engine would have to ignore.
    pub fn check(&self) -> Result<(), RuleConfigError> {
        let mut problems = Vec::new();

        for (measurement, rule) in &self.measurements {
            if !rule.has_valid_bounds() {
                problems.push(format!(
                    "{measurement}: bounds must be finite with min <= max (got {:?}..{:?})",
                    rule.min, rule.max
                ));
            }
            if !rule.has_valid_threshold() {
                problems.push(format!(
                    "{measurement}: anomaly_threshold must be a positive number (got {})",
                    rule.anomaly_threshold
                ));
            }
        }

        if !(self.max_age_minutes.is_finite() && self.max_age_minutes >= 0.0) {
            problems.push(format!(
                "max_age_minutes must be a non-negative number (got {})",
                self.max_age_minutes
            ));
        }
        if !self.temperature_high_threshold.is_finite() {
            problems.push("temperature_high_threshold must be finite".to_string());
        }
        if !self.humidity_low_threshold.is_finite() {
            problems.push("humidity_low_threshold must be finite".to_string());
        }
        if !(self.pressure_jump_threshold.is_finite() && self.pressure_jump_threshold >= 0.0) {
            problems.push(format!(
                "pressure_jump_threshold must be a non-negative number (got {})",
                self.pressure_jump_threshold
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(RuleConfigError::Invalid(problems))
        }
    }
}
