//! The four-factor decision lens.
//!
//! Each factor reduces a slice of route or flight data to a score that is
//! normally in [0, 1]. Missing inputs resolve to [`NEUTRAL_SCORE`] so that a
//! failed lookup reads as "medium" rather than collapsing to an extreme.
//!
//! Cost exposure and delay risk are not clamped: out-of-range reference data
//! passes straight through to the classifier.

pub mod cost;
pub mod delay;
pub mod flexibility;
pub mod stability;

pub use cost::score_cost_exposure;
pub use delay::score_delay_risk;
pub use flexibility::{score_flexibility, FLEXIBLE_SCORE, RIGID_SCORE};
pub use stability::score_demand_stability;

use serde::{Deserialize, Serialize};

use crate::domain::{DemandObservation, FlightProfile};

/// Score used whenever the data needed for a factor is missing.
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Scores at or above this are banded `High`.
pub const HIGH_BAND_FLOOR: f64 = 0.7;

/// Scores at or above this (and below `HIGH_BAND_FLOOR`) are banded `Medium`.
pub const MEDIUM_BAND_FLOOR: f64 = 0.4;

/// The four factor scores for one (route, flight) evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorScores {
    pub demand_stability: f64,
    pub cost_exposure: f64,
    pub delay_risk: f64,
    pub flexibility: f64,
}

impl FactorScores {
    pub fn new(demand_stability: f64, cost_exposure: f64, delay_risk: f64, flexibility: f64) -> Self {
        Self {
            demand_stability,
            cost_exposure,
            delay_risk,
            flexibility,
        }
    }

    /// All four factors at the neutral default.
    pub fn neutral() -> Self {
        Self::new(NEUTRAL_SCORE, NEUTRAL_SCORE, NEUTRAL_SCORE, NEUTRAL_SCORE)
    }

    /// Score a route's demand series against a flight profile.
    pub fn assess(observations: &[DemandObservation], flight: Option<&FlightProfile>) -> Self {
        Self {
            demand_stability: score_demand_stability(observations),
            cost_exposure: score_cost_exposure(flight),
            delay_risk: score_delay_risk(flight),
            flexibility: score_flexibility(flight),
        }
    }

    /// Qualitative band for each factor, in field order.
    pub fn bands(&self) -> FactorBands {
        FactorBands {
            demand_stability: ScoreBand::of(self.demand_stability),
            cost_exposure: ScoreBand::of(self.cost_exposure),
            delay_risk: ScoreBand::of(self.delay_risk),
            flexibility: ScoreBand::of(self.flexibility),
        }
    }
}

/// Coarse High / Medium / Low reading of a factor score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

impl ScoreBand {
    pub fn of(score: f64) -> Self {
        if score >= HIGH_BAND_FLOOR {
            Self::High
        } else if score >= MEDIUM_BAND_FLOOR {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl std::fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-factor bands, mirroring [`FactorScores`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorBands {
    pub demand_stability: ScoreBand,
    pub cost_exposure: ScoreBand,
    pub delay_risk: ScoreBand,
    pub flexibility: ScoreBand,
}

/// Build a daily demand series starting 2026-01-01 for tests.
#[cfg(test)]
pub fn make_observations(values: &[f64]) -> Vec<DemandObservation> {
    let base = chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| DemandObservation::new(base + chrono::Duration::days(i as i64), v))
        .collect()
}

#[cfg(test)]
pub fn make_flight(fixed: f64, variable: f64, capacity: f64, delay: f64, realtime: bool) -> FlightProfile {
    FlightProfile {
        flight_id: "TEST1".into(),
        max_capacity: capacity,
        fixed_cost: fixed,
        variable_cost_per_unit: variable,
        delay_risk_score: delay,
        real_time_update_flag: realtime,
    }
}

#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, eps: f64) {
    assert!(
        (actual - expected).abs() < eps,
        "expected {expected}, got {actual} (eps {eps})"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assess_without_data_is_neutral() {
        assert_eq!(FactorScores::assess(&[], None), FactorScores::neutral());
    }

    #[test]
    fn assess_reads_every_factor() {
        let obs = make_observations(&[10.0, 10.0, 10.0, 10.0]);
        let flight = make_flight(1000.0, 1.0, 500.0, 0.2, true);
        let scores = FactorScores::assess(&obs, Some(&flight));

        assert_approx(scores.demand_stability, 1.0, DEFAULT_EPSILON);
        assert_approx(scores.cost_exposure, 1000.0 / 1500.0, DEFAULT_EPSILON);
        assert_approx(scores.delay_risk, 0.2, DEFAULT_EPSILON);
        assert_approx(scores.flexibility, 0.9, DEFAULT_EPSILON);
    }

    #[test]
    fn band_edges_are_inclusive() {
        assert_eq!(ScoreBand::of(0.7), ScoreBand::High);
        assert_eq!(ScoreBand::of(0.6999), ScoreBand::Medium);
        assert_eq!(ScoreBand::of(0.4), ScoreBand::Medium);
        assert_eq!(ScoreBand::of(0.3999), ScoreBand::Low);
        assert_eq!(ScoreBand::of(0.0), ScoreBand::Low);
    }

    #[test]
    fn bands_follow_field_order() {
        let bands = FactorScores::new(0.9, 0.5, 0.1, 0.3).bands();
        assert_eq!(bands.demand_stability, ScoreBand::High);
        assert_eq!(bands.cost_exposure, ScoreBand::Medium);
        assert_eq!(bands.delay_risk, ScoreBand::Low);
        assert_eq!(bands.flexibility, ScoreBand::Low);
    }
}
