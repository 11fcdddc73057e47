//! Engine configuration, loaded from TOML.
//!
//! Every section is optional; an empty file yields the defaults below.
//!
//! ```toml
//! [data]
//! dir = "data"
//!
//! [selection]
//! route = "DEL-FRA"
//! date = "2026-01-01"
//! flight = "FX366"
//!
//! [assignments]
//! "BOM-LHR" = "FX512"
//!
//! [impact]
//! cost_per_unit = 3.5
//! efficiency_gain = 0.1
//!
//! [runner]
//! parallel = true
//! output_dir = "results"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use caplan_core::ImpactAssumptions;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub data: DataConfig,
    pub selection: SelectionConfig,
    /// Route → flight used when evaluating every route in a batch.
    pub assignments: BTreeMap<String, String>,
    pub impact: ImpactAssumptions,
    pub runner: RunnerConfig,
}

impl EngineConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.impact.cost_per_unit < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "impact.cost_per_unit must be >= 0, got {}",
                self.impact.cost_per_unit
            )));
        }
        if !(0.0..=1.0).contains(&self.impact.efficiency_gain) {
            return Err(ConfigError::Invalid(format!(
                "impact.efficiency_gain must be in [0, 1], got {}",
                self.impact.efficiency_gain
            )));
        }
        if self.selection.route.trim().is_empty() {
            return Err(ConfigError::Invalid("selection.route is empty".into()));
        }
        Ok(())
    }

    /// Flight evaluated for `route`: its assignment, else the selected flight.
    pub fn flight_for<'a>(&'a self, route: &str) -> &'a str {
        self.assignments
            .get(route)
            .map(String::as_str)
            .unwrap_or(&self.selection.flight)
    }
}

/// Where the CSV tables live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub dir: PathBuf,
    pub forecasts: String,
    pub flights: String,
    pub business_plan: String,
    pub weekly_plan: String,
    pub execution: String,
    pub planning_summary: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            forecasts: "forecasted_demand_output.csv".into(),
            flights: "flight_capacity_master.csv".into(),
            business_plan: "business_plan_capacity.csv".into(),
            weekly_plan: "weekly_plan_capacity.csv".into(),
            execution: "execution_actuals.csv".into(),
            planning_summary: "planning_vs_execution_summary.csv".into(),
        }
    }
}

/// Route, date and flight used when a command does not name them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub route: String,
    pub date: NaiveDate,
    pub flight: String,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            route: "DEL-FRA".into(),
            date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap_or_default(),
            flight: "FX366".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Evaluate routes on the rayon pool.
    pub parallel: bool,
    pub output_dir: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            output_dir: PathBuf::from("results"),
        }
    }
}
