//! Per-entity summary metrics sent alongside each verdict.

use serde::{Deserialize, Serialize};
use wxguard_core::{Measurement, Record};
use wxguard_validate::stats::mean;

/// Column means and completeness for one entity's slice.
///
/// A mean is `None` when every value in the column is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub wind_speed: Option<f64>,
    /// Percentage of present measurement cells, 0 to 100.
    pub data_completeness: f64,
}

impl Metrics {
    pub fn mean(&self, measurement: Measurement) -> Option<f64> {
        match measurement {
            Measurement::Temperature => self.temperature,
            Measurement::Humidity => self.humidity,
            Measurement::Pressure => self.pressure,
            Measurement::WindSpeed => self.wind_speed,
        }
    }

    fn set_mean(&mut self, measurement: Measurement, value: Option<f64>) {
        let slot = match measurement {
            Measurement::Temperature => &mut self.temperature,
            Measurement::Humidity => &mut self.humidity,
            Measurement::Pressure => &mut self.pressure,
            Measurement::WindSpeed => &mut self.wind_speed,
        };
        *slot = value;
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Compute metrics over `records`.
///
/// Means ignore missing cells; completeness counts them. Zero records yield
/// an empty `Metrics`.
pub fn compute_metrics(records: &[Record]) -> Metrics {
    let mut metrics = Metrics::default();
    if records.is_empty() {
        return metrics;
    }

    let mut missing = 0usize;
    for measurement in Measurement::ALL {
        let values: Vec<f64> = records.iter().filter_map(|r| r.value(measurement)).collect();
        missing += records.len() - values.len();
        metrics.set_mean(measurement, mean(&values));
    }

    let total = records.len() * Measurement::ALL.len();
    metrics.data_completeness = 100.0 * (1.0 - missing as f64 / total as f64);
    metrics
}
