//! Small descriptive-statistics helpers shared by the detectors.

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance (n − 1 denominator); zero for fewer than two values.
pub fn sample_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

/// Trailing rolling mean and sample standard deviation.
///
/// Entry `i` covers the `window` values ending at (and including) `i`, or
/// fewer near the start. It is `None` until `min_periods` values exist.
pub fn rolling_mean_std(values: &[f64], window: usize, min_periods: usize) -> Vec<Option<(f64, f64)>> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            if slice.len() < min_periods.max(1) {
                None
            } else {
                Some((mean(slice), sample_variance(slice).sqrt()))
            }
        })
        .collect()
}
