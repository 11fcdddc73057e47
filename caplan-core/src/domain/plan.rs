//! Business and weekly capacity plans.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::classifier::Strategy;

/// Long-range planned capacity for a route and date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessPlanEntry {
    pub date: NaiveDate,
    pub route: String,
    pub planned_capacity: f64,
    pub planned_net_weight: f64,
}

/// Weekly commitment for a route and date, tagged with the strategy that
/// produced it when the source recorded one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPlanEntry {
    pub date: NaiveDate,
    pub route: String,
    pub committed_capacity: f64,
    pub max_capacity: f64,
    pub utilization_strategy: Option<Strategy>,
}

impl WeeklyPlanEntry {
    /// Fraction of the aircraft committed, or `None` for a zero-capacity row.
    pub fn commitment_ratio(&self) -> Option<f64> {
        if self.max_capacity > 0.0 {
            Some(self.committed_capacity / self.max_capacity)
        } else {
            None
        }
    }
}
