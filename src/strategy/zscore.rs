//! Rolling Z-Score
//!
//! Z-Score Formula: z = (value - rolling_mean) / rolling_std
//!
//! The window trails the current index and is clamped at the start of the
//! series, so early points use fewer samples instead of being skipped.
//! Standard deviation is the population form (divide by n).
//! A flat window has no spread to normalize by and scores 0.

use statrs::statistics::Statistics;

/// Relative spread below which a window is treated as constant.
///
/// The cutoff is `RELATIVE_FLAT_TOLERANCE * |mean|`, so a constant window
/// of 101.37 (std dev off zero only by rounding) scores 0 while a series
/// quoted in tiny units, like a ratio around 1e-6, still gets a z-score.
/// A window whose mean is exactly 0 is flat only when its std dev is 0.
const RELATIVE_FLAT_TOLERANCE: f64 = 1e-12;

fn is_flat(std_dev: f64, mean: f64) -> bool {
    !std_dev.is_finite() || std_dev <= RELATIVE_FLAT_TOLERANCE * mean.abs()
}

/// Z-score of the last value in a window, with the statistics behind it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZScoreResult {
    /// Current z-score value, 0 for a degenerate window
    pub z_score: f64,
    /// Rolling mean used in calculation
    pub mean: f64,
    /// Rolling population standard deviation
    pub std_dev: f64,
    /// Value being scored
    pub value: f64,
}

impl ZScoreResult {
    /// Score the last element of `window` against the whole window.
    ///
    /// Returns `None` only for an empty window.
    pub fn from_window(window: &[f64]) -> Option<Self> {
        let value = *window.last()?;

        let mean = window.iter().mean();
        let std_dev = if window.len() < 2 {
            0.0
        } else {
            window.iter().population_std_dev()
        };

        let z_score = if is_flat(std_dev, mean) {
            0.0
        } else {
            (value - mean) / std_dev
        };

        Some(Self {
            z_score,
            mean,
            std_dev,
            value,
        })
    }

    /// True when the window had no variance and the z-score fell back to 0
    pub fn is_degenerate(&self) -> bool {
        is_flat(self.std_dev, self.mean)
    }
}

/// Bounds of the trailing window ending at `index`, clamped at 0
pub(crate) fn trailing_window(index: usize, window: usize) -> std::ops::RangeInclusive<usize> {
    let start = (index + 1).saturating_sub(window.max(1));
    start..=index
}

/// Rolling z-score of every value over a trailing `window`.
///
/// Output has the same length as `values`. A `window` of 0 behaves like 1.
pub fn rolling_z_score(values: &[f64], window: usize) -> Vec<f64> {
    rolling_z_score_detailed(values, window)
        .into_iter()
        .map(|r| r.z_score)
        .collect()
}

/// Like [`rolling_z_score`] but keeps mean and standard deviation per point
pub fn rolling_z_score_detailed(values: &[f64], window: usize) -> Vec<ZScoreResult> {
    (0..values.len())
        .filter_map(|i| ZScoreResult::from_window(&values[trailing_window(i, window)]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_trailing_window_clamps_at_start() {
        assert_eq!(trailing_window(0, 3), 0..=0);
        assert_eq!(trailing_window(1, 3), 0..=1);
        assert_eq!(trailing_window(2, 3), 0..=2);
        assert_eq!(trailing_window(5, 3), 3..=5);
        assert_eq!(trailing_window(5, 0), 5..=5);
    }

    #[test]
    fn test_output_length_matches_input() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        assert_eq!(rolling_z_score(&values, 3).len(), values.len());
        assert!(rolling_z_score(&[], 3).is_empty());
    }

    #[test]
    fn test_constant_window_scores_zero() {
        let values = [2.0; 8];
        for z in rolling_z_score(&values, 3) {
            assert_eq!(z, 0.0);
        }
    }

    #[test]
    fn test_decimal_constant_window_scores_zero() {
        for &price in &[0.1, 33.3, 101.37, 1234.567, 98_765.4321] {
            let values = vec![price; 40];
            for result in rolling_z_score_detailed(&values, 20) {
                assert!(result.is_degenerate(), "flat {} window", price);
                assert_eq!(result.z_score, 0.0);
            }
        }
    }

    #[test]
    fn test_small_unit_series_still_scores() {
        // A ratio quoted around 1e-6 moves by less than 1e-12 in absolute terms
        let values = [1.0e-6, 1.0e-6 + 2e-13, 1.0e-6 - 1e-13, 1.0e-6 + 4e-13];
        let detailed = rolling_z_score_detailed(&values, 4);
        assert!(!detailed[3].is_degenerate());
        assert!(detailed[3].z_score > 1.0);
    }

    #[test]
    fn test_first_point_and_window_one_score_zero() {
        let values = [1.0, 5.0, -3.0, 8.0];
        let z = rolling_z_score(&values, 1);
        assert!(z.iter().all(|&v| v == 0.0));

        let z = rolling_z_score(&values, 10);
        assert_eq!(z[0], 0.0);
    }

    #[test]
    fn test_known_zscore() {
        // Window [1, 2, 3]: mean 2, population std sqrt(2/3)
        let z = rolling_z_score(&[1.0, 2.0, 3.0], 3);
        assert_relative_eq!(z[2], 1.0 / (2.0f64 / 3.0).sqrt(), epsilon = 1e-12);

        // Two points always sit one std dev from their mean
        assert_relative_eq!(z[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_window_rolls_forward() {
        // At index 4 the window is [10, 10, 40] regardless of the early values
        let values = [100.0, -50.0, 10.0, 10.0, 40.0];
        let detailed = rolling_z_score_detailed(&values, 3);
        assert_relative_eq!(detailed[4].mean, 20.0, epsilon = 1e-12);
        assert!(detailed[4].z_score > 0.0);
    }

    #[test]
    fn test_degenerate_flag() {
        let flat = ZScoreResult::from_window(&[3.0, 3.0, 3.0]).unwrap();
        assert!(flat.is_degenerate());
        assert_eq!(flat.z_score, 0.0);

        let moving = ZScoreResult::from_window(&[1.0, 2.0, 4.0]).unwrap();
        assert!(!moving.is_degenerate());
        assert!(moving.z_score > 0.0);

        assert!(ZScoreResult::from_window(&[]).is_none());
    }

    #[test]
    fn test_never_nan_or_infinite() {
        let values = [1e-300, 1e-300, 1e300, 0.0, -1e300, 5.0];
        for z in rolling_z_score(&values, 4) {
            assert!(z.is_finite());
        }
    }
}
