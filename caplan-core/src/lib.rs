//! Caplan Core: the capacity-planning decision lens.
//!
//! Given a route's forecasted demand and a flight's economics, this crate:
//! - scores four factors (demand stability, cost exposure, delay risk,
//!   real-time flexibility)
//! - maps them through an ordered decision table to one of four
//!   capacity-commitment strategies
//! - replays realized execution under a forecast-only baseline and the
//!   strategy-driven plan for comparison
//!
//! Everything here is a pure function over in-memory records. The forecast is
//! an input and is never modified; the decision is how much capacity to commit
//! against it.

pub mod classifier;
pub mod domain;
pub mod evaluator;
pub mod factors;
pub mod summary;

pub use classifier::{
    classify_strategy, classify_with_rule, Classification, DecisionRule, ParseStrategyError,
    Strategy,
};
pub use domain::{
    BusinessPlanEntry, DemandObservation, ExecutionActual, ExecutionRecord, FlightProfile,
    ForecastRecord, WeeklyPlanEntry,
};
pub use evaluator::{evaluate_policies, DayOutcome, Improvement, PolicyComparison, PolicyMetrics};
pub use factors::{
    score_cost_exposure, score_delay_risk, score_demand_stability, score_flexibility,
    FactorBands, FactorScores, ScoreBand, NEUTRAL_SCORE,
};
pub use summary::{ExecutionSummary, ForecastSummary, ImpactAssumptions, ImpactSummary};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: all core types are Send + Sync so batch evaluation
    /// can fan out across threads without wrappers.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<DemandObservation>();
        require_sync::<DemandObservation>();
        require_send::<ForecastRecord>();
        require_sync::<ForecastRecord>();
        require_send::<FlightProfile>();
        require_sync::<FlightProfile>();
        require_send::<ExecutionRecord>();
        require_sync::<ExecutionRecord>();
        require_send::<ExecutionActual>();
        require_sync::<ExecutionActual>();
        require_send::<WeeklyPlanEntry>();
        require_sync::<WeeklyPlanEntry>();
        require_send::<BusinessPlanEntry>();
        require_sync::<BusinessPlanEntry>();

        require_send::<FactorScores>();
        require_sync::<FactorScores>();
        require_send::<Strategy>();
        require_sync::<Strategy>();
        require_send::<Classification>();
        require_sync::<Classification>();
        require_send::<PolicyComparison>();
        require_sync::<PolicyComparison>();
        require_send::<ImpactSummary>();
        require_sync::<ImpactSummary>();
    }

    /// Architecture contract: classification sees only the four scores.
    ///
    /// `classify_strategy` takes `&FactorScores` and nothing else, so no route,
    /// date, or flight state can leak into the decision.
    #[test]
    fn classifier_depends_only_on_scores() {
        fn _check(scores: &FactorScores) -> Strategy {
            classify_strategy(scores)
        }
        let s = FactorScores::new(0.9, 0.2, 0.1, 0.3);
        assert_eq!(_check(&s), _check(&s));
    }
}
