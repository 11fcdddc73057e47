//! Realized execution outcomes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of planning-vs-execution data for a route.
///
/// `committed_capacity` is the strategy-driven commitment that was actually
/// flown; `load_factor` and `void_capacity` are the realized results of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub date: NaiveDate,
    pub route: String,
    pub forecasted_demand: f64,
    pub committed_capacity: f64,
    pub actual_net_weight: f64,
    pub void_capacity: f64,
    /// Realized utilization in percent (0–100).
    pub load_factor: f64,
}

/// A row of the raw execution-actuals table (no plan columns).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionActual {
    pub date: NaiveDate,
    pub route: String,
    pub actual_net_weight: f64,
    pub load_factor: f64,
    pub void_capacity: f64,
}
