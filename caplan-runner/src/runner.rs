//! Route runner: wires the dataset to the decision core.
//!
//! Three entry points:
//! - `decide()`: four-factor lens and strategy for one (route, flight, date).
//! - `evaluate_route()`: decision plus baseline-vs-strategy comparison,
//!   impact and execution summaries for one route.
//! - `run_batch()`: every route in the dataset, optionally on the rayon pool.
//!   `run_batch_from_config()` loads the dataset first; used by the CLI.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use caplan_core::{
    classify_with_rule, evaluate_policies, Classification, ExecutionSummary, FactorBands,
    FactorScores, FlightProfile, ForecastRecord, ForecastSummary, ImpactAssumptions,
    ImpactSummary, Improvement, PolicyComparison, Strategy,
};

use crate::config::EngineConfig;
use crate::data_loader::{load_dataset, LoadError, LoadOptions, LoadedData};
use crate::dataset::{PlanningDataset, RouteData};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("route '{0}' not found in any table")]
    UnknownRoute(String),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Strategy recommendation for one route, with everything that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDecision {
    pub route: String,
    pub flight_id: String,
    pub date: NaiveDate,
    /// False when the flight id was not in the flight table and the
    /// flight-derived factors fell back to neutral.
    pub flight_found: bool,
    pub scores: FactorScores,
    pub bands: FactorBands,
    pub classification: Classification,
    /// Forecast row for `date`, passed through unchanged.
    pub forecast: Option<ForecastRecord>,
    pub forecast_summary: ForecastSummary,
    pub observations: usize,
}

impl RouteDecision {
    pub fn strategy(&self) -> Strategy {
        self.classification.strategy
    }
}

/// A route's decision plus its retrospective evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteEvaluation {
    pub decision: RouteDecision,
    /// `None` when the route has no planning-summary rows.
    pub comparison: Option<PolicyComparison>,
    pub improvement: Option<Improvement>,
    pub impact: Option<ImpactSummary>,
    pub execution: ExecutionSummary,
}

/// Every route evaluated against one dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub generated_at: String,
    pub dataset_hash: String,
    pub has_synthetic: bool,
    pub data_quality_warnings: Vec<String>,
    pub selected_date: NaiveDate,
    /// Sorted by route.
    pub routes: Vec<RouteEvaluation>,
    pub strategy_counts: BTreeMap<Strategy, usize>,
}

impl BatchReport {
    pub fn route(&self, route: &str) -> Option<&RouteEvaluation> {
        self.routes.iter().find(|r| r.decision.route == route)
    }
}

fn route_data_checked(dataset: &PlanningDataset, route: &str) -> Result<RouteData, RunError> {
    let data = dataset.route_data(route);
    if data.is_empty() {
        return Err(RunError::UnknownRoute(route.to_string()));
    }
    Ok(data)
}

fn decide_on(data: &RouteData, flight: Option<&FlightProfile>, flight_id: &str, date: NaiveDate) -> RouteDecision {
    let observations = data.demand_observations();
    let scores = FactorScores::assess(&observations, flight);
    let classification = classify_with_rule(&scores);
    debug!(
        route = %data.route,
        flight_id,
        strategy = classification.strategy.as_str(),
        rule = classification.rule.number(),
        "classified route"
    );

    RouteDecision {
        route: data.route.clone(),
        flight_id: flight_id.to_string(),
        date,
        flight_found: flight.is_some(),
        scores,
        bands: scores.bands(),
        classification,
        forecast: data.day(date).forecast.cloned(),
        forecast_summary: ForecastSummary::compute(&data.forecasts),
        observations: observations.len(),
    }
}

fn lookup_flight<'a>(dataset: &'a PlanningDataset, flight_id: &str, route: &str) -> Option<&'a FlightProfile> {
    let flight = dataset.flight(flight_id);
    if flight.is_none() {
        warn!(route, flight_id, "flight not found; using neutral flight factors");
    }
    flight
}

/// Score and classify one route against one flight.
///
/// An unknown flight is not an error: cost exposure, delay risk and
/// flexibility fall back to neutral and `flight_found` is false.
pub fn decide(
    dataset: &PlanningDataset,
    route: &str,
    flight_id: &str,
    date: NaiveDate,
) -> Result<RouteDecision, RunError> {
    let data = route_data_checked(dataset, route)?;
    let flight = lookup_flight(dataset, flight_id, route);
    Ok(decide_on(&data, flight, flight_id, date))
}

/// Decision plus baseline-vs-strategy comparison for one route.
pub fn evaluate_route(
    dataset: &PlanningDataset,
    route: &str,
    flight_id: &str,
    date: NaiveDate,
    assumptions: &ImpactAssumptions,
) -> Result<RouteEvaluation, RunError> {
    let data = route_data_checked(dataset, route)?;
    let flight = lookup_flight(dataset, flight_id, route);
    let decision = decide_on(&data, flight, flight_id, date);
    let comparison = evaluate_policies(&data.planning_summary);

    Ok(RouteEvaluation {
        decision,
        improvement: comparison.as_ref().map(PolicyComparison::improvement),
        comparison,
        impact: ImpactSummary::compute(&data.planning_summary, assumptions),
        execution: ExecutionSummary::compute(&data.execution),
    })
}

/// Evaluate every route in the loaded dataset.
///
/// Each route uses its flight from `[assignments]`, then the pairing that came
/// with the data, else the selected flight.
pub fn run_batch(loaded: &LoadedData, config: &EngineConfig) -> Result<BatchReport, RunError> {
    let dataset = &loaded.dataset;
    let routes = dataset.routes();
    let date = config.selection.date;
    let evaluate = |route: &&str| {
        evaluate_route(dataset, route, loaded.flight_for(config, route), date, &config.impact)
    };

    let mut evaluations: Vec<RouteEvaluation> = if config.runner.parallel {
        routes
            .par_iter()
            .map(evaluate)
            .collect::<Result<Vec<_>, _>>()?
    } else {
        routes
            .iter()
            .map(evaluate)
            .collect::<Result<Vec<_>, _>>()?
    };
    evaluations.sort_by(|a, b| a.decision.route.cmp(&b.decision.route));

    let mut strategy_counts: BTreeMap<Strategy, usize> =
        Strategy::ALL.into_iter().map(|s| (s, 0)).collect();
    for e in &evaluations {
        *strategy_counts.entry(e.decision.strategy()).or_insert(0) += 1;
    }

    info!(
        routes = evaluations.len(),
        parallel = config.runner.parallel,
        synthetic = loaded.has_synthetic,
        "batch complete"
    );

    Ok(BatchReport {
        schema_version: SCHEMA_VERSION,
        generated_at: chrono::Local::now().to_rfc3339(),
        dataset_hash: loaded.dataset_hash.clone(),
        has_synthetic: loaded.has_synthetic,
        data_quality_warnings: loaded.warnings.clone(),
        selected_date: date,
        routes: evaluations,
        strategy_counts,
    })
}

/// Load the configured dataset, then run the batch.
pub fn run_batch_from_config(
    config: &EngineConfig,
    opts: &LoadOptions,
) -> Result<BatchReport, RunError> {
    let loaded = load_dataset(&config.data, opts)?;
    run_batch(&loaded, config)
}
