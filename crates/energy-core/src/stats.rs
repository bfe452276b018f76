//! Descriptive statistics over consumption samples.

/// Arithmetic mean. Returns `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Smallest and largest value. Returns `None` for an empty slice.
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

/// Sample standard deviation (N − 1 denominator).
///
/// Undefined below two samples: returns `None` there, never `0.0`.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let avg = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - avg).powi(2)).sum();
    Some((sum_sq / (values.len() as f64 - 1.0)).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_basic() {
        assert_eq!(mean(&[10.0, 5.0]), Some(7.5));
    }

    #[test]
    fn test_mean_empty() {
        assert!(mean(&[]).is_none());
    }

    #[test]
    fn test_min_max() {
        assert_eq!(min_max(&[3.0, -1.0, 8.5, 2.0]), Some((-1.0, 8.5)));
        assert!(min_max(&[]).is_none());
    }

    #[test]
    fn test_sample_std_dev_two_values() {
        // mean 7.5, squared deviations 6.25 + 6.25, / (2 - 1)
        let std = sample_std_dev(&[10.0, 5.0]).unwrap();
        assert!((std - 12.5_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_sample_std_dev_known_series() {
        let std = sample_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((std - (32.0_f64 / 7.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_sample_std_dev_constant_series_is_zero() {
        assert_eq!(sample_std_dev(&[3.0, 3.0, 3.0]), Some(0.0));
    }

    #[test]
    fn test_sample_std_dev_single_value_is_none() {
        assert!(sample_std_dev(&[42.0]).is_none());
        assert!(sample_std_dev(&[]).is_none());
    }
}
