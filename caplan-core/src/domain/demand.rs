//! Forecasted demand series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One forecasted-demand point, the input to demand-stability scoring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DemandObservation {
    pub period: NaiveDate,
    pub forecasted_demand: f64,
}

impl DemandObservation {
    pub fn new(period: NaiveDate, forecasted_demand: f64) -> Self {
        Self {
            period,
            forecasted_demand,
        }
    }
}

/// A full row of the forecast table for one route and period.
///
/// The forecast itself is never modified downstream; the decision layer only
/// changes how much capacity is committed against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub period: NaiveDate,
    pub route: String,
    pub base_demand: f64,
    pub forecasted_demand: f64,
    /// Forecast confidence as a fraction in [0, 1].
    pub forecast_confidence: f64,
}

impl ForecastRecord {
    pub fn observation(&self) -> DemandObservation {
        DemandObservation::new(self.period, self.forecasted_demand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observation_carries_period_and_forecast() {
        let rec = ForecastRecord {
            period: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            route: "DEL-FRA".into(),
            base_demand: 90.0,
            forecasted_demand: 104.5,
            forecast_confidence: 0.82,
        };
        let obs = rec.observation();
        assert_eq!(obs.period, rec.period);
        assert_eq!(obs.forecasted_demand, 104.5);
    }
}
