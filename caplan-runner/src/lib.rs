//! Caplan Runner: data loading, batch route evaluation, reporting.
//!
//! This crate builds on `caplan-core` to provide:
//! - CSV loading of the planning tables with synthetic fallback
//! - Per-route and per-day views over the loaded dataset
//! - TOML engine configuration
//! - Single-route decisions and batch evaluation over every route
//! - JSON / CSV / Markdown artifacts with schema versioning

pub mod config;
pub mod data_loader;
pub mod dataset;
pub mod export;
pub mod runner;
pub mod synthetic;

pub use config::{ConfigError, DataConfig, EngineConfig, RunnerConfig, SelectionConfig};
pub use data_loader::{load_dataset, write_dataset, LoadError, LoadOptions, LoadedData};
pub use dataset::{PlanningDataset, RouteData, RouteDay};
pub use runner::{
    decide, evaluate_route, run_batch, run_batch_from_config, BatchReport, RouteDecision,
    RouteEvaluation, RunError, SCHEMA_VERSION,
};
pub use synthetic::{generate_dataset, suggested_assignments, SyntheticConfig};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn dataset_is_send_sync() {
        assert_send::<PlanningDataset>();
        assert_sync::<PlanningDataset>();
        assert_send::<RouteData>();
        assert_sync::<RouteData>();
    }

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<EngineConfig>();
        assert_sync::<EngineConfig>();
        assert_send::<LoadOptions>();
        assert_sync::<LoadOptions>();
    }

    #[test]
    fn results_are_send_sync() {
        assert_send::<RouteDecision>();
        assert_sync::<RouteDecision>();
        assert_send::<RouteEvaluation>();
        assert_sync::<RouteEvaluation>();
        assert_send::<BatchReport>();
        assert_sync::<BatchReport>();
    }

    #[test]
    fn errors_are_send_sync() {
        assert_send::<RunError>();
        assert_sync::<RunError>();
        assert_send::<LoadError>();
        assert_sync::<LoadError>();
    }
}
