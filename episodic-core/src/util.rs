//! Utilities for post-processing reward series.

/// Trailing moving average.
///
/// Each value is replaced with the mean of itself and up to `window - 1`
/// preceding values. The first values average over the points available so
/// far; there is neither padding nor look-ahead.
///
/// ```rust
/// use episodic_core::util::moving_average;
///
/// let smoothed = moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
/// assert_eq!(smoothed, vec![1.0, 1.5, 2.0, 3.0, 4.0]);
/// ```
///
/// # Panics
///
/// Panics if `window == 0`.
pub fn moving_average(values: &[f32], window: usize) -> Vec<f32> {
    assert!(window > 0, "Window of moving average must be positive");
    let mut sum = 0f64;
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            sum += v as f64;
            if i >= window {
                sum -= values[i - window] as f64;
            }
            let n = (i + 1).min(window);
            (sum / n as f64) as f32
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_moving_average() {
        assert_eq!(
            moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 3),
            vec![1.0, 1.5, 2.0, 3.0, 4.0]
        );
        assert_eq!(moving_average(&[4.0, 8.0], 100), vec![4.0, 6.0]);
        assert_eq!(moving_average(&[4.0, 8.0, -2.0], 1), vec![4.0, 8.0, -2.0]);
        assert!(moving_average(&[], 10).is_empty());
    }

    #[test]
    fn test_constant_series_is_unchanged() {
        let series = vec![-200.0f32; 250];
        assert_eq!(moving_average(&series, 100), series);
        let series = vec![0.1f32; 7];
        for (a, b) in moving_average(&series, 3).iter().zip(series.iter()) {
            assert!((a - b).abs() < 1e-7);
        }
    }
}
