//! Demand stability: one minus the coefficient of variation of the forecast.
//!
//! Uses population statistics (divide by N), so the result does not depend on
//! the order of the observations.

use crate::domain::DemandObservation;

use super::NEUTRAL_SCORE;

/// Minimum number of observations needed to measure dispersion.
pub const MIN_OBSERVATIONS: usize = 2;

/// Stability of a route's forecasted demand in [0, 1].
///
/// - fewer than [`MIN_OBSERVATIONS`] points → [`NEUTRAL_SCORE`]
/// - non-positive mean → 0.0 (coefficient of variation taken as 1)
/// - moments that overflow `f64` → 0.0
/// - otherwise `clamp(1 − stddev / mean, 0, 1)`
pub fn score_demand_stability(observations: &[DemandObservation]) -> f64 {
    if observations.len() < MIN_OBSERVATIONS {
        return NEUTRAL_SCORE;
    }

    // Flat series: summation error would otherwise leave a tiny residual cv.
    let first = observations[0].forecasted_demand;
    if observations.iter().all(|o| o.forecasted_demand == first) {
        return if first > 0.0 { 1.0 } else { 0.0 };
    }

    let n = observations.len() as f64;
    let mean = observations.iter().map(|o| o.forecasted_demand).sum::<f64>() / n;
    let variance = observations
        .iter()
        .map(|o| (o.forecasted_demand - mean).powi(2))
        .sum::<f64>()
        / n;

    let cv = if mean > 0.0 { variance.sqrt() / mean } else { 1.0 };
    // Overflow near f64::MAX turns the moments into inf/NaN.
    if !cv.is_finite() {
        return 0.0;
    }
    (1.0 - cv).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::{assert_approx, make_observations, DEFAULT_EPSILON};

    #[test]
    fn empty_series_is_neutral() {
        assert_eq!(score_demand_stability(&[]), NEUTRAL_SCORE);
    }

    #[test]
    fn single_point_is_neutral() {
        assert_eq!(score_demand_stability(&make_observations(&[42.0])), NEUTRAL_SCORE);
    }

    #[test]
    fn overflowing_values_stay_in_range() {
        let score = score_demand_stability(&make_observations(&[f64::MAX, f64::MAX / 2.0]));
        assert_eq!(score, 0.0);
    }

    #[test]
    fn flat_series_is_fully_stable() {
        assert_eq!(score_demand_stability(&make_observations(&[10.0, 10.0, 10.0, 10.0])), 1.0);
    }

    #[test]
    fn population_variance_is_used() {
        // mean 10, population stddev 2 → cv 0.2
        let obs = make_observations(&[8.0, 12.0, 8.0, 12.0]);
        assert_approx(score_demand_stability(&obs), 0.8, DEFAULT_EPSILON);
    }

    #[test]
    fn zero_mean_is_fully_unstable() {
        assert_eq!(score_demand_stability(&make_observations(&[0.0, 0.0, 0.0])), 0.0);
    }

    #[test]
    fn negative_mean_is_fully_unstable() {
        assert_eq!(score_demand_stability(&make_observations(&[-5.0, -1.0])), 0.0);
    }

    #[test]
    fn large_dispersion_clamps_to_zero() {
        // mean 25, stddev ≈ 43.3 → cv > 1
        let obs = make_observations(&[100.0, 0.0, 0.0, 0.0]);
        assert_eq!(score_demand_stability(&obs), 0.0);
    }

    #[test]
    fn flat_fractional_series_is_exactly_stable() {
        let obs = make_observations(&[0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1]);
        assert_eq!(score_demand_stability(&obs), 1.0);
    }

    #[test]
    fn order_does_not_matter() {
        let a = score_demand_stability(&make_observations(&[3.0, 9.0, 4.0, 7.0]));
        let b = score_demand_stability(&make_observations(&[7.0, 4.0, 9.0, 3.0]));
        assert_approx(a, b, DEFAULT_EPSILON);
    }
}
