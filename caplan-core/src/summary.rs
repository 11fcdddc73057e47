//! Route-level reporting summaries over plan, forecast and execution tables.

use serde::{Deserialize, Serialize};

use crate::domain::{ExecutionActual, ExecutionRecord, ForecastRecord};
use crate::evaluator::RELIABLE_LOAD_FACTOR_PCT;

/// Assumptions behind the cost-savings estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactAssumptions {
    /// Average variable cost of one unit of void capacity.
    pub cost_per_unit: f64,
    /// Share of void capacity assumed recoverable.
    pub efficiency_gain: f64,
}

impl Default for ImpactAssumptions {
    fn default() -> Self {
        Self {
            cost_per_unit: 3.5,
            efficiency_gain: 0.1,
        }
    }
}

/// Business impact of the strategy-driven plan on one route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactSummary {
    pub avg_load_factor: f64,
    /// Percent of days with load factor above the reliability threshold.
    pub service_reliability: f64,
    pub avg_void_capacity: f64,
    pub estimated_cost_savings: f64,
    pub total_days: usize,
}

impl ImpactSummary {
    /// Summarize planning-vs-execution records. `None` when there are none.
    pub fn compute(records: &[ExecutionRecord], assumptions: &ImpactAssumptions) -> Option<Self> {
        if records.is_empty() {
            return None;
        }
        let days = records.len() as f64;
        let avg_load_factor = records.iter().map(|r| r.load_factor).sum::<f64>() / days;
        let reliable = records
            .iter()
            .filter(|r| r.load_factor > RELIABLE_LOAD_FACTOR_PCT)
            .count() as f64;
        let avg_void_capacity = records.iter().map(|r| r.void_capacity).sum::<f64>() / days;

        Some(Self {
            avg_load_factor,
            service_reliability: reliable / days * 100.0,
            avg_void_capacity,
            estimated_cost_savings: avg_void_capacity
                * assumptions.cost_per_unit
                * days
                * assumptions.efficiency_gain,
            total_days: records.len(),
        })
    }
}

/// Realized execution quality from the raw actuals table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionSummary {
    pub avg_load_factor: f64,
    /// Percent of days with load factor above the reliability threshold.
    pub on_time_rate: f64,
    pub days: usize,
}

impl ExecutionSummary {
    /// Zeros for an empty table.
    pub fn compute(actuals: &[ExecutionActual]) -> Self {
        if actuals.is_empty() {
            return Self::default();
        }
        let n = actuals.len() as f64;
        let on_time = actuals
            .iter()
            .filter(|a| a.load_factor > RELIABLE_LOAD_FACTOR_PCT)
            .count() as f64;
        Self {
            avg_load_factor: actuals.iter().map(|a| a.load_factor).sum::<f64>() / n,
            on_time_rate: on_time / n * 100.0,
            days: actuals.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    /// Mean forecast confidence in percent.
    pub avg_confidence_pct: f64,
    pub points: usize,
}

impl ForecastSummary {
    pub fn compute(forecasts: &[ForecastRecord]) -> Self {
        if forecasts.is_empty() {
            return Self::default();
        }
        let n = forecasts.len() as f64;
        Self {
            avg_confidence_pct: forecasts.iter().map(|f| f.forecast_confidence).sum::<f64>() / n * 100.0,
            points: forecasts.len(),
        }
    }
}
