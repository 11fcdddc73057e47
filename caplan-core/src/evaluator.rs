//! Baseline-vs-strategy evaluation.
//!
//! Replays a route's realized execution under two commitment policies:
//! - **forecast-only**: capacity committed equals the forecast exactly
//! - **strategy-driven**: the commitment that was actually flown
//!
//! Both policies are scored on the same actual net weight. The result is a
//! retrospective reporting view; it makes no new decision.

use serde::{Deserialize, Serialize};

use crate::domain::ExecutionRecord;

/// A day counts as reliable when load factor exceeds this many percent.
pub const RELIABLE_LOAD_FACTOR_PCT: f64 = 25.0;

/// What one policy would have produced on one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayOutcome {
    /// Load factor in percent.
    pub load_factor: f64,
    pub void_capacity: f64,
    /// Demand exceeded the committed capacity.
    pub delayed: bool,
    pub reliable: bool,
}

impl DayOutcome {
    /// Counterfactual where the commitment equals the forecast.
    pub fn forecast_only(record: &ExecutionRecord) -> Self {
        let forecast = record.forecasted_demand;
        let actual = record.actual_net_weight;
        let load_factor = if forecast > 0.0 { actual / forecast * 100.0 } else { 0.0 };
        Self {
            load_factor,
            void_capacity: (forecast - actual).max(0.0),
            delayed: actual > forecast,
            reliable: load_factor > RELIABLE_LOAD_FACTOR_PCT,
        }
    }

    /// What actually happened under the strategy-driven commitment.
    pub fn strategy_driven(record: &ExecutionRecord) -> Self {
        Self {
            load_factor: record.load_factor,
            void_capacity: record.void_capacity,
            delayed: record.actual_net_weight > record.committed_capacity,
            reliable: record.load_factor > RELIABLE_LOAD_FACTOR_PCT,
        }
    }
}

/// Aggregate metrics for one policy over a route's records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolicyMetrics {
    /// Percent of days where demand exceeded the commitment.
    pub delay_rate: f64,
    /// Mean load factor in percent.
    pub avg_utilization: f64,
    /// Percent of days with load factor above [`RELIABLE_LOAD_FACTOR_PCT`].
    pub reliability: f64,
    pub avg_void_capacity: f64,
    pub days: usize,
}

impl PolicyMetrics {
    /// Aggregate per-day outcomes. Returns `None` for an empty slice.
    pub fn aggregate(outcomes: &[DayOutcome]) -> Option<Self> {
        if outcomes.is_empty() {
            return None;
        }
        let n = outcomes.len() as f64;
        let delays = outcomes.iter().filter(|o| o.delayed).count() as f64;
        let reliable = outcomes.iter().filter(|o| o.reliable).count() as f64;
        Some(Self {
            delay_rate: delays / n * 100.0,
            avg_utilization: outcomes.iter().map(|o| o.load_factor).sum::<f64>() / n,
            reliability: reliable / n * 100.0,
            avg_void_capacity: outcomes.iter().map(|o| o.void_capacity).sum::<f64>() / n,
            days: outcomes.len(),
        })
    }
}

/// The two policies side by side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolicyComparison {
    pub forecast_only: PolicyMetrics,
    pub strategy_driven: PolicyMetrics,
}

impl PolicyComparison {
    pub fn improvement(&self) -> Improvement {
        let base = &self.forecast_only;
        let ours = &self.strategy_driven;
        let reliability_gain_pct = if base.reliability != 0.0 {
            Some((ours.reliability - base.reliability) / base.reliability * 100.0)
        } else {
            None
        };
        Improvement {
            reliability_gain_pct,
            utilization_difference: ours.avg_utilization - base.avg_utilization,
            delay_rate_reduction: base.delay_rate - ours.delay_rate,
            void_capacity_reduction: base.avg_void_capacity - ours.avg_void_capacity,
        }
    }
}

/// Strategy-driven results relative to the forecast-only baseline.
///
/// Positive values favour the strategy-driven policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Improvement {
    /// Relative reliability change in percent; `None` when the baseline had
    /// no reliable days.
    pub reliability_gain_pct: Option<f64>,
    /// Load-factor points gained.
    pub utilization_difference: f64,
    /// Delay-rate points removed.
    pub delay_rate_reduction: f64,
    /// Average void capacity removed.
    pub void_capacity_reduction: f64,
}

/// Evaluate both policies over a route's execution records.
///
/// Returns `None` when there are no records.
pub fn evaluate_policies(records: &[ExecutionRecord]) -> Option<PolicyComparison> {
    let forecast_only: Vec<DayOutcome> = records.iter().map(DayOutcome::forecast_only).collect();
    let strategy_driven: Vec<DayOutcome> = records.iter().map(DayOutcome::strategy_driven).collect();

    Some(PolicyComparison {
        forecast_only: PolicyMetrics::aggregate(&forecast_only)?,
        strategy_driven: PolicyMetrics::aggregate(&strategy_driven)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(forecast: f64, committed: f64, actual: f64, void: f64, lf: f64) -> ExecutionRecord {
        ExecutionRecord {
            date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            route: "DEL-FRA".into(),
            forecasted_demand: forecast,
            committed_capacity: committed,
            actual_net_weight: actual,
            void_capacity: void,
            load_factor: lf,
        }
    }

    fn approx(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "expected {b}, got {a}");
    }

    #[test]
    fn empty_input_is_no_data() {
        assert_eq!(evaluate_policies(&[]), None);
    }

    #[test]
    fn forecast_only_day_from_forecast() {
        let day = DayOutcome::forecast_only(&record(200.0, 180.0, 150.0, 30.0, 83.3));
        approx(day.load_factor, 75.0);
        approx(day.void_capacity, 50.0);
        assert!(!day.delayed);
        assert!(day.reliable);
    }

    #[test]
    fn forecast_only_overflow_is_delay_with_no_void() {
        let day = DayOutcome::forecast_only(&record(100.0, 150.0, 120.0, 30.0, 80.0));
        approx(day.load_factor, 120.0);
        assert_eq!(day.void_capacity, 0.0);
        assert!(day.delayed);
    }

    #[test]
    fn zero_forecast_has_zero_load_factor() {
        let day = DayOutcome::forecast_only(&record(0.0, 50.0, 10.0, 40.0, 20.0));
        assert_eq!(day.load_factor, 0.0);
        assert!(!day.reliable);
        assert!(day.delayed);
    }

    #[test]
    fn strategy_driven_uses_recorded_values() {
        let day = DayOutcome::strategy_driven(&record(100.0, 90.0, 95.0, 0.0, 105.5));
        assert_eq!(day.load_factor, 105.5);
        assert_eq!(day.void_capacity, 0.0);
        assert!(day.delayed);
        assert!(day.reliable);
    }

    #[test]
    fn reliability_threshold_is_strict() {
        let day = DayOutcome::strategy_driven(&record(100.0, 100.0, 25.0, 75.0, 25.0));
        assert!(!day.reliable);
    }

    #[test]
    fn aggregates_two_policies() {
        let records = vec![
            // forecast-only: lf 80, void 20, no delay; strategy: lf 90, void 10, no delay
            record(100.0, 90.0, 80.0, 10.0, 90.0),
            // forecast-only: lf 120, void 0, delay; strategy: lf 20, void 80, no delay
            record(100.0, 150.0, 120.0, 80.0, 20.0),
        ];
        let cmp = evaluate_policies(&records).unwrap();

        approx(cmp.forecast_only.delay_rate, 50.0);
        approx(cmp.forecast_only.avg_utilization, 100.0);
        approx(cmp.forecast_only.reliability, 100.0);
        approx(cmp.forecast_only.avg_void_capacity, 10.0);
        assert_eq!(cmp.forecast_only.days, 2);

        approx(cmp.strategy_driven.delay_rate, 0.0);
        approx(cmp.strategy_driven.avg_utilization, 55.0);
        approx(cmp.strategy_driven.reliability, 50.0);
        approx(cmp.strategy_driven.avg_void_capacity, 45.0);
    }

    #[test]
    fn improvement_signs_favour_strategy() {
        let records = vec![
            record(100.0, 90.0, 80.0, 10.0, 90.0),
            record(100.0, 150.0, 120.0, 80.0, 20.0),
        ];
        let imp = evaluate_policies(&records).unwrap().improvement();
        approx(imp.reliability_gain_pct.unwrap(), -50.0);
        approx(imp.utilization_difference, -45.0);
        approx(imp.delay_rate_reduction, 50.0);
        approx(imp.void_capacity_reduction, -35.0);
    }

    #[test]
    fn reliability_gain_undefined_without_baseline() {
        let records = vec![record(1000.0, 50.0, 10.0, 40.0, 20.0)];
        let imp = evaluate_policies(&records).unwrap().improvement();
        assert_eq!(imp.reliability_gain_pct, None);
    }
}
