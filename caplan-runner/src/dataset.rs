//! In-memory planning dataset and per-route / per-day views of it.
//!
//! The loader produces one [`PlanningDataset`] holding every table. Callers
//! slice it by route with [`PlanningDataset::route_data`] and by date with
//! [`RouteData::day`], then hand the slices to the decision core.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use caplan_core::{
    BusinessPlanEntry, DemandObservation, ExecutionActual, ExecutionRecord, FlightProfile,
    ForecastRecord, WeeklyPlanEntry,
};

/// All tables of a planning dataset, already parsed and coerced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanningDataset {
    pub forecasts: Vec<ForecastRecord>,
    pub flights: Vec<FlightProfile>,
    pub business_plan: Vec<BusinessPlanEntry>,
    pub weekly_plan: Vec<WeeklyPlanEntry>,
    pub execution: Vec<ExecutionActual>,
    pub planning_summary: Vec<ExecutionRecord>,
}

impl PlanningDataset {
    /// Distinct routes in first-seen order.
    ///
    /// Forecast routes come first, followed by routes that only appear in the
    /// plan or execution tables.
    pub fn routes(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let all = self
            .forecasts
            .iter()
            .map(|r| r.route.as_str())
            .chain(self.weekly_plan.iter().map(|r| r.route.as_str()))
            .chain(self.business_plan.iter().map(|r| r.route.as_str()))
            .chain(self.execution.iter().map(|r| r.route.as_str()))
            .chain(self.planning_summary.iter().map(|r| r.route.as_str()));
        all.filter(|r| seen.insert(*r)).collect()
    }

    /// Distinct forecast periods, ascending.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.forecasts.iter().map(|r| r.period).collect();
        dates.sort_unstable();
        dates.dedup();
        dates
    }

    pub fn flight_ids(&self) -> Vec<&str> {
        self.flights.iter().map(|f| f.flight_id.as_str()).collect()
    }

    /// Look up a flight profile by identifier. First match wins.
    pub fn flight(&self, flight_id: &str) -> Option<&FlightProfile> {
        self.flights.iter().find(|f| f.flight_id == flight_id)
    }

    /// Every table filtered to one route.
    pub fn route_data(&self, route: &str) -> RouteData {
        RouteData {
            route: route.to_string(),
            forecasts: filter_route(&self.forecasts, route, |r| &r.route),
            business_plan: filter_route(&self.business_plan, route, |r| &r.route),
            weekly_plan: filter_route(&self.weekly_plan, route, |r| &r.route),
            execution: filter_route(&self.execution, route, |r| &r.route),
            planning_summary: filter_route(&self.planning_summary, route, |r| &r.route),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.forecasts.is_empty()
            && self.flights.is_empty()
            && self.business_plan.is_empty()
            && self.weekly_plan.is_empty()
            && self.execution.is_empty()
            && self.planning_summary.is_empty()
    }
}

fn filter_route<T: Clone>(rows: &[T], route: &str, key: impl Fn(&T) -> &String) -> Vec<T> {
    rows.iter().filter(|r| key(r) == route).cloned().collect()
}

/// One route's slice of every table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteData {
    pub route: String,
    pub forecasts: Vec<ForecastRecord>,
    pub business_plan: Vec<BusinessPlanEntry>,
    pub weekly_plan: Vec<WeeklyPlanEntry>,
    pub execution: Vec<ExecutionActual>,
    pub planning_summary: Vec<ExecutionRecord>,
}

impl RouteData {
    /// The forecast series in the shape the stability factor expects.
    pub fn demand_observations(&self) -> Vec<DemandObservation> {
        self.forecasts.iter().map(ForecastRecord::observation).collect()
    }

    /// True when no table has a row for this route.
    pub fn is_empty(&self) -> bool {
        self.forecasts.is_empty()
            && self.business_plan.is_empty()
            && self.weekly_plan.is_empty()
            && self.execution.is_empty()
            && self.planning_summary.is_empty()
    }

    /// First row of each table on `date`.
    pub fn day(&self, date: NaiveDate) -> RouteDay<'_> {
        RouteDay {
            date,
            forecast: self.forecasts.iter().find(|r| r.period == date),
            business_plan: self.business_plan.iter().find(|r| r.date == date),
            weekly_plan: self.weekly_plan.iter().find(|r| r.date == date),
            execution: self.execution.iter().find(|r| r.date == date),
            planning_summary: self.planning_summary.iter().find(|r| r.date == date),
        }
    }
}

/// A single route-day across every table; any entry may be missing.
#[derive(Debug, Clone, Copy)]
pub struct RouteDay<'a> {
    pub date: NaiveDate,
    pub forecast: Option<&'a ForecastRecord>,
    pub business_plan: Option<&'a BusinessPlanEntry>,
    pub weekly_plan: Option<&'a WeeklyPlanEntry>,
    pub execution: Option<&'a ExecutionActual>,
    pub planning_summary: Option<&'a ExecutionRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, n).unwrap()
    }

    fn forecast(route: &str, d: u32, demand: f64) -> ForecastRecord {
        ForecastRecord {
            period: day(d),
            route: route.into(),
            base_demand: demand,
            forecasted_demand: demand,
            forecast_confidence: 0.8,
        }
    }

    fn sample() -> PlanningDataset {
        PlanningDataset {
            forecasts: vec![
                forecast("DEL-FRA", 2, 100.0),
                forecast("BOM-LHR", 1, 50.0),
                forecast("DEL-FRA", 1, 110.0),
            ],
            weekly_plan: vec![WeeklyPlanEntry {
                date: day(1),
                route: "MAA-SIN".into(),
                committed_capacity: 10.0,
                max_capacity: 20.0,
                utilization_strategy: None,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn routes_are_distinct_in_first_seen_order() {
        assert_eq!(sample().routes(), vec!["DEL-FRA", "BOM-LHR", "MAA-SIN"]);
    }

    #[test]
    fn dates_are_sorted_and_distinct() {
        assert_eq!(sample().dates(), vec![day(1), day(2)]);
    }

    #[test]
    fn route_data_filters_every_table() {
        let rd = sample().route_data("DEL-FRA");
        assert_eq!(rd.forecasts.len(), 2);
        assert!(rd.weekly_plan.is_empty());
        assert!(!rd.is_empty());
        assert!(sample().route_data("NOPE").is_empty());
    }

    #[test]
    fn day_finds_matching_rows() {
        let rd = sample().route_data("DEL-FRA");
        let d = rd.day(day(1));
        assert_eq!(d.forecast.map(|f| f.forecasted_demand), Some(110.0));
        assert!(d.weekly_plan.is_none());
        assert!(rd.day(day(9)).forecast.is_none());
    }

    #[test]
    fn observations_preserve_forecast_values() {
        let obs = sample().route_data("DEL-FRA").demand_observations();
        let values: Vec<f64> = obs.iter().map(|o| o.forecasted_demand).collect();
        assert_eq!(values, vec![100.0, 110.0]);
    }
}
