//! Seeded synthetic planning datasets for development and demos.
//!
//! Results computed on synthetic data are tagged `has_synthetic` and should
//! never be read as operational numbers.
//!
//! Each route gets its own flight. The weekly commitment is derived from the
//! strategy the core classifier picks for that (route, flight) pair, and the
//! realized load is the forecast plus noise.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use caplan_core::{
    classify_strategy, BusinessPlanEntry, DemandObservation, ExecutionActual, ExecutionRecord,
    FactorScores, FlightProfile, ForecastRecord, Strategy, WeeklyPlanEntry,
};

use crate::dataset::PlanningDataset;

pub const DEFAULT_ROUTES: [&str; 4] = ["DEL-FRA", "BOM-LHR", "BLR-SIN", "MAA-DXB"];

#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    pub seed: u64,
    pub routes: Vec<String>,
    pub days: u32,
    pub start: NaiveDate,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            routes: DEFAULT_ROUTES.iter().map(|r| r.to_string()).collect(),
            days: 28,
            start: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap_or_default(),
        }
    }
}

/// Flight assigned to the `index`-th synthetic route. The first is `FX366`.
pub fn flight_id_for(index: usize) -> String {
    format!("FX{}", 366 + index * 73)
}

/// Route → flight pairs matching [`generate_dataset`].
pub fn suggested_assignments(config: &SyntheticConfig) -> BTreeMap<String, String> {
    config
        .routes
        .iter()
        .enumerate()
        .map(|(i, route)| (route.clone(), flight_id_for(i)))
        .collect()
}

/// Fraction of forecast committed under each strategy.
fn commitment_multiplier(strategy: Strategy) -> f64 {
    match strategy {
        Strategy::MaximizeUtilization => 1.0,
        Strategy::DynamicBuffer => 1.1,
        Strategy::ConservativeLoading => 0.85,
        Strategy::BalancedAllocation => 0.95,
    }
}

fn route_rng(seed: u64, route: &str) -> StdRng {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&seed.to_le_bytes());
    hasher.update(route.as_bytes());
    StdRng::from_seed(*hasher.finalize().as_bytes())
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Generate a complete dataset. Same config, same dataset.
pub fn generate_dataset(config: &SyntheticConfig) -> PlanningDataset {
    let mut dataset = PlanningDataset::default();

    for (i, route) in config.routes.iter().enumerate() {
        let mut rng = route_rng(config.seed, route);

        let flight = FlightProfile {
            flight_id: flight_id_for(i),
            max_capacity: rng.gen_range(400.0..1200.0_f64).round(),
            fixed_cost: rng.gen_range(1500.0..9000.0_f64).round(),
            variable_cost_per_unit: round2(rng.gen_range(0.5..6.0)),
            delay_risk_score: round2(rng.gen_range(0.05..0.65)),
            real_time_update_flag: rng.gen_bool(0.5),
        };

        let level: f64 = rng.gen_range(0.35..0.8) * flight.max_capacity;
        let noise: f64 = rng.gen_range(0.02..0.2);

        let forecasts: Vec<ForecastRecord> = (0..config.days)
            .map(|d| {
                let period = config.start + Duration::days(i64::from(d));
                let weekly = 1.0 + 0.08 * (f64::from(period.weekday().num_days_from_monday()) - 3.0) / 3.0;
                let base_demand = round2(level * weekly);
                let forecasted_demand = round2(base_demand * (1.0 + rng.gen_range(-noise..noise)));
                ForecastRecord {
                    period,
                    route: route.clone(),
                    base_demand,
                    forecasted_demand: forecasted_demand.max(0.0),
                    forecast_confidence: round2(rng.gen_range(0.6..0.95)),
                }
            })
            .collect();

        let observations: Vec<DemandObservation> =
            forecasts.iter().map(ForecastRecord::observation).collect();
        let strategy = classify_strategy(&FactorScores::assess(&observations, Some(&flight)));
        let multiplier = commitment_multiplier(strategy);

        for fc in &forecasts {
            let committed = round2((fc.forecasted_demand * multiplier).min(flight.max_capacity));
            let actual =
                round2((fc.forecasted_demand * (1.0 + rng.gen_range(-0.15..0.15))).max(0.0));
            let load_factor = if committed > 0.0 {
                round2(actual / committed * 100.0)
            } else {
                0.0
            };
            let void_capacity = round2((committed - actual).max(0.0));

            dataset.business_plan.push(BusinessPlanEntry {
                date: fc.period,
                route: route.clone(),
                planned_capacity: flight.max_capacity,
                planned_net_weight: fc.base_demand,
            });
            dataset.weekly_plan.push(WeeklyPlanEntry {
                date: fc.period,
                route: route.clone(),
                committed_capacity: committed,
                max_capacity: flight.max_capacity,
                utilization_strategy: Some(strategy),
            });
            dataset.execution.push(ExecutionActual {
                date: fc.period,
                route: route.clone(),
                actual_net_weight: actual,
                load_factor,
                void_capacity,
            });
            dataset.planning_summary.push(ExecutionRecord {
                date: fc.period,
                route: route.clone(),
                forecasted_demand: fc.forecasted_demand,
                committed_capacity: committed,
                actual_net_weight: actual,
                void_capacity,
                load_factor,
            });
        }

        dataset.forecasts.extend(forecasts);
        dataset.flights.push(flight);
    }

    dataset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_dataset() {
        let a = generate_dataset(&SyntheticConfig::default());
        let b = generate_dataset(&SyntheticConfig::default());
        assert_eq!(a.forecasts, b.forecasts);
        assert_eq!(a.flights, b.flights);
        assert_eq!(a.planning_summary, b.planning_summary);
    }

    #[test]
    fn different_seeds_differ() {
        let a = generate_dataset(&SyntheticConfig::default());
        let b = generate_dataset(&SyntheticConfig {
            seed: 7,
            ..SyntheticConfig::default()
        });
        assert_ne!(a.forecasts, b.forecasts);
    }

    #[test]
    fn tables_cover_every_route_and_day() {
        let config = SyntheticConfig {
            days: 10,
            ..SyntheticConfig::default()
        };
        let ds = generate_dataset(&config);
        let n = config.routes.len() * 10;
        assert_eq!(ds.forecasts.len(), n);
        assert_eq!(ds.weekly_plan.len(), n);
        assert_eq!(ds.execution.len(), n);
        assert_eq!(ds.planning_summary.len(), n);
        assert_eq!(ds.flights.len(), config.routes.len());
        assert_eq!(ds.routes(), DEFAULT_ROUTES.to_vec());
    }

    #[test]
    fn first_route_flies_fx366() {
        let assignments = suggested_assignments(&SyntheticConfig::default());
        assert_eq!(assignments["DEL-FRA"], "FX366");
        assert_eq!(assignments.len(), 4);
    }

    #[test]
    fn generated_values_stay_in_range() {
        let ds = generate_dataset(&SyntheticConfig::default());
        for f in &ds.flights {
            assert!(f.range_issues().is_empty(), "{:?}", f.range_issues());
        }
        for w in &ds.weekly_plan {
            assert!(w.committed_capacity <= w.max_capacity);
            assert!(w.utilization_strategy.is_some());
        }
        for r in &ds.planning_summary {
            assert!(r.void_capacity >= 0.0);
            assert!(r.load_factor >= 0.0);
        }
    }
}
