//! Robust location and spread estimates for anomaly scoring.
//!
//! The modified z-score uses the median and the median absolute deviation
//! (MAD) instead of mean and standard deviation, so a single extreme value
//! cannot inflate the spread enough to hide itself.

/// Consistency constant relating MAD to the standard deviation of a normal
/// distribution (`0.6745 ≈ Φ⁻¹(0.75)`).
pub const MAD_SCALE: f64 = 0.6745;

/// Median of the values. `None` for an empty input.
///
/// NaNs must be filtered out by the caller.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Median and median absolute deviation: `mad = median(|x_i - median|)`.
pub fn median_and_mad(values: &[f64]) -> Option<(f64, f64)> {
    let center = median(values)?;
    let deviations: Vec<f64> = values.iter().map(|x| (x - center).abs()).collect();
    let mad = median(&deviations)?;
    Some((center, mad))
}

/// Modified z-score of `value`. `None` when the MAD is degenerate.
pub fn modified_z_score(value: f64, median: f64, mad: f64) -> Option<f64> {
    if mad <= f64::EPSILON {
        return None;
    }
    Some(MAD_SCALE * (value - median) / mad)
}

/// Arithmetic mean. `None` for an empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
