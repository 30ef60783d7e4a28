//! Rolling Hedge Ratio
//!
//! Ordinary least squares slope of leg A regressed on leg B over a trailing
//! window:
//!
//! beta = (n * sum(AB) - sum(A) * sum(B)) / (n * sum(B^2) - sum(B)^2)
//!
//! computed in the equivalent centred form sum((A - mean_A)(B - mean_B)) /
//! sum((B - mean_B)^2), which does not cancel catastrophically for prices
//! like 101.37.
//!
//! Each index is estimated from scratch over its own window. When there are
//! no samples or B does not move, there is no slope to estimate and the
//! neutral ratio 1.0 is used.

use super::zscore::trailing_window;

/// Neutral hedge ratio used when OLS is undefined
pub const NEUTRAL_HEDGE_RATIO: f64 = 1.0;

/// Outcome of a hedge ratio estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HedgeEstimate {
    /// Slope from `samples` points
    Regression { beta: f64, samples: usize },
    /// Empty window or constant B, no reliable estimate
    Fallback,
}

impl HedgeEstimate {
    /// Ratio to trade with. 1.0 for `Fallback`.
    pub fn beta(&self) -> f64 {
        match self {
            HedgeEstimate::Regression { beta, .. } => *beta,
            HedgeEstimate::Fallback => NEUTRAL_HEDGE_RATIO,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, HedgeEstimate::Fallback)
    }
}

/// Estimate the hedge ratio at `at_index` over the trailing `window`.
///
/// Only indices present in both series count; an index past the end of the
/// shorter series is an empty window.
pub fn estimate_hedge_ratio(
    prices_a: &[f64],
    prices_b: &[f64],
    at_index: usize,
    window: usize,
) -> HedgeEstimate {
    let len = prices_a.len().min(prices_b.len());
    if at_index >= len {
        return HedgeEstimate::Fallback;
    }

    let range = trailing_window(at_index, window);
    let a = &prices_a[range.clone()];
    let b = &prices_b[range];

    // Any B that repeats one price is flat, however the sums round
    if a.is_empty() || b.iter().all(|&pb| pb == b[0]) {
        return HedgeEstimate::Fallback;
    }

    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;
    let (cov_ab, var_b) = a.iter().zip(b).fold((0.0, 0.0), |(cov, var), (&pa, &pb)| {
        let db = pb - mean_b;
        (cov + (pa - mean_a) * db, var + db * db)
    });

    if !(var_b.is_finite() && var_b > 0.0) {
        return HedgeEstimate::Fallback;
    }

    HedgeEstimate::Regression {
        beta: cov_ab / var_b,
        samples: a.len(),
    }
}

/// Hedge ratio at `at_index`, 1.0 when it cannot be estimated
pub fn hedge_ratio(prices_a: &[f64], prices_b: &[f64], at_index: usize, window: usize) -> f64 {
    estimate_hedge_ratio(prices_a, prices_b, at_index, window).beta()
}
