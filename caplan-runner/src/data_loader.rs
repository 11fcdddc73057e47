//! CSV loading for the planning tables.
//!
//! Reads each table from the configured data directory into typed rows and
//! assembles a [`PlanningDataset`]. Fallback policy:
//! 1. If the forecast and flight tables exist → load from disk
//! 2. If either is missing and `synthetic` is set → generate a seeded
//!    synthetic dataset (tagged)
//! 3. Otherwise → fail with a clear error
//!
//! The other four tables are optional; a missing one loads empty with a
//! data-quality warning. Cells are coerced here so the core never sees text:
//! empty numeric cells read as 0, flag cells read `1`/`true`/`yes` as set.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use caplan_core::{
    BusinessPlanEntry, ExecutionActual, ExecutionRecord, FlightProfile, ForecastRecord, Strategy,
    WeeklyPlanEntry,
};

use crate::config::{DataConfig, EngineConfig};
use crate::dataset::PlanningDataset;
use crate::synthetic::{generate_dataset, suggested_assignments, SyntheticConfig};

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("required table '{table}' not found at {path} (use --synthetic for synthetic data)")]
    MissingTable { table: &'static str, path: PathBuf },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Options controlling how the dataset is loaded.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Generate a synthetic dataset when required tables are missing.
    pub synthetic: bool,
    /// Seed for the synthetic fallback.
    pub seed: u64,
}

/// Result of loading, with provenance.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub dataset: PlanningDataset,
    /// BLAKE3 over the raw table bytes (or the generated dataset).
    pub dataset_hash: String,
    pub has_synthetic: bool,
    pub warnings: Vec<String>,
    /// Route → flight pairing that came with the data. Filled for synthetic
    /// datasets, empty for CSV tables.
    pub assignments: BTreeMap<String, String>,
}

impl LoadedData {
    /// Flight evaluated for `route`: a configured assignment wins, then the
    /// pairing that came with the data, then the selected flight.
    pub fn flight_for<'a>(&'a self, config: &'a EngineConfig, route: &str) -> &'a str {
        match self.assignments.get(route) {
            Some(paired) if !config.assignments.contains_key(route) => paired.as_str(),
            _ => config.flight_for(route),
        }
    }
}

// ─── Raw rows ────────────────────────────────────────────────────────

fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let s = String::deserialize(d)?;
    let s = s.trim();
    if s.is_empty() {
        return Ok(0.0);
    }
    s.parse::<f64>()
        .map_err(|_| serde::de::Error::custom(format!("invalid number '{s}'")))
}

fn lenient_flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    let s = String::deserialize(d)?;
    let s = s.trim();
    Ok(s == "1" || s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("yes"))
}

#[derive(Debug, Serialize, Deserialize)]
struct ForecastRow {
    time_period: NaiveDate,
    route: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    base_demand: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    forecasted_demand: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    forecast_confidence: f64,
}

impl From<ForecastRow> for ForecastRecord {
    fn from(r: ForecastRow) -> Self {
        Self {
            period: r.time_period,
            route: r.route,
            base_demand: r.base_demand,
            forecasted_demand: r.forecasted_demand,
            forecast_confidence: r.forecast_confidence,
        }
    }
}

impl From<&ForecastRecord> for ForecastRow {
    fn from(r: &ForecastRecord) -> Self {
        Self {
            time_period: r.period,
            route: r.route.clone(),
            base_demand: r.base_demand,
            forecasted_demand: r.forecasted_demand,
            forecast_confidence: r.forecast_confidence,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct FlightRow {
    flight_id: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    max_capacity: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    fixed_cost: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    variable_cost_per_unit: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    delay_risk_score: f64,
    #[serde(default, deserialize_with = "lenient_flag", serialize_with = "flag_as_int")]
    real_time_update_flag: bool,
}

fn flag_as_int<S: serde::Serializer>(flag: &bool, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u8(u8::from(*flag))
}

impl From<FlightRow> for FlightProfile {
    fn from(r: FlightRow) -> Self {
        Self {
            flight_id: r.flight_id,
            max_capacity: r.max_capacity,
            fixed_cost: r.fixed_cost,
            variable_cost_per_unit: r.variable_cost_per_unit,
            delay_risk_score: r.delay_risk_score,
            real_time_update_flag: r.real_time_update_flag,
        }
    }
}

impl From<&FlightProfile> for FlightRow {
    fn from(f: &FlightProfile) -> Self {
        Self {
            flight_id: f.flight_id.clone(),
            max_capacity: f.max_capacity,
            fixed_cost: f.fixed_cost,
            variable_cost_per_unit: f.variable_cost_per_unit,
            delay_risk_score: f.delay_risk_score,
            real_time_update_flag: f.real_time_update_flag,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct BusinessPlanRow {
    date: NaiveDate,
    route: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    planned_capacity: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    planned_net_weight: f64,
}

impl From<BusinessPlanRow> for BusinessPlanEntry {
    fn from(r: BusinessPlanRow) -> Self {
        Self {
            date: r.date,
            route: r.route,
            planned_capacity: r.planned_capacity,
            planned_net_weight: r.planned_net_weight,
        }
    }
}

impl From<&BusinessPlanEntry> for BusinessPlanRow {
    fn from(e: &BusinessPlanEntry) -> Self {
        Self {
            date: e.date,
            route: e.route.clone(),
            planned_capacity: e.planned_capacity,
            planned_net_weight: e.planned_net_weight,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct WeeklyPlanRow {
    date: NaiveDate,
    route: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    committed_capacity: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    max_capacity: f64,
    #[serde(default)]
    utilization_strategy: String,
}

impl From<WeeklyPlanRow> for WeeklyPlanEntry {
    fn from(r: WeeklyPlanRow) -> Self {
        let label = r.utilization_strategy.trim();
        Self {
            date: r.date,
            route: r.route,
            committed_capacity: r.committed_capacity,
            max_capacity: r.max_capacity,
            utilization_strategy: (!label.is_empty()).then(|| Strategy::from_label_lenient(label)),
        }
    }
}

impl From<&WeeklyPlanEntry> for WeeklyPlanRow {
    fn from(e: &WeeklyPlanEntry) -> Self {
        Self {
            date: e.date,
            route: e.route.clone(),
            committed_capacity: e.committed_capacity,
            max_capacity: e.max_capacity,
            utilization_strategy: e
                .utilization_strategy
                .map(|s| s.label().to_string())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ExecutionRow {
    date: NaiveDate,
    route: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    actual_net_weight: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    load_factor: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    void_capacity: f64,
}

impl From<ExecutionRow> for ExecutionActual {
    fn from(r: ExecutionRow) -> Self {
        Self {
            date: r.date,
            route: r.route,
            actual_net_weight: r.actual_net_weight,
            load_factor: r.load_factor,
            void_capacity: r.void_capacity,
        }
    }
}

impl From<&ExecutionActual> for ExecutionRow {
    fn from(a: &ExecutionActual) -> Self {
        Self {
            date: a.date,
            route: a.route.clone(),
            actual_net_weight: a.actual_net_weight,
            load_factor: a.load_factor,
            void_capacity: a.void_capacity,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SummaryRow {
    date: NaiveDate,
    route: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    forecasted_demand: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    committed_capacity: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    actual_net_weight: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    void_capacity: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    load_factor: f64,
}

impl From<SummaryRow> for ExecutionRecord {
    fn from(r: SummaryRow) -> Self {
        Self {
            date: r.date,
            route: r.route,
            forecasted_demand: r.forecasted_demand,
            committed_capacity: r.committed_capacity,
            actual_net_weight: r.actual_net_weight,
            void_capacity: r.void_capacity,
            load_factor: r.load_factor,
        }
    }
}

impl From<&ExecutionRecord> for SummaryRow {
    fn from(r: &ExecutionRecord) -> Self {
        Self {
            date: r.date,
            route: r.route.clone(),
            forecasted_demand: r.forecasted_demand,
            committed_capacity: r.committed_capacity,
            actual_net_weight: r.actual_net_weight,
            void_capacity: r.void_capacity,
            load_factor: r.load_factor,
        }
    }
}

// ─── Loading ─────────────────────────────────────────────────────────

/// Read a whole file, treating "not found" as `None`.
fn read_bytes(path: &Path) -> Result<Option<Vec<u8>>, LoadError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(LoadError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn parse_rows<R: DeserializeOwned>(bytes: &[u8], path: &Path) -> Result<Vec<R>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);
    reader
        .deserialize()
        .collect::<Result<Vec<R>, _>>()
        .map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

/// Parse one table and feed its bytes to the dataset hash.
fn load_table<R, T>(
    table: &'static str,
    path: &Path,
    bytes: Option<&[u8]>,
    hasher: &mut blake3::Hasher,
) -> Result<Vec<T>, LoadError>
where
    R: DeserializeOwned,
    T: From<R>,
{
    let Some(bytes) = bytes else {
        return Ok(Vec::new());
    };
    hasher.update(table.as_bytes());
    hasher.update(bytes);
    let rows: Vec<R> = parse_rows(bytes, path)?;
    debug!(table, rows = rows.len(), path = %path.display(), "parsed table");
    Ok(rows.into_iter().map(T::from).collect())
}

/// Load the planning dataset described by `config`.
///
/// This is the primary entry point for the runner to get planning data.
pub fn load_dataset(config: &DataConfig, opts: &LoadOptions) -> Result<LoadedData, LoadError> {
    let path_of = |name: &str| config.dir.join(name);

    let forecasts_path = path_of(&config.forecasts);
    let flights_path = path_of(&config.flights);
    let forecasts_bytes = read_bytes(&forecasts_path)?;
    let flights_bytes = read_bytes(&flights_path)?;

    let missing = match (&forecasts_bytes, &flights_bytes) {
        (None, _) => Some(("forecasts", forecasts_path.clone())),
        (_, None) => Some(("flights", flights_path.clone())),
        _ => None,
    };
    if let Some((table, path)) = missing {
        if opts.synthetic {
            return Ok(load_synthetic(opts.seed, table));
        }
        return Err(LoadError::MissingTable { table, path });
    }

    let mut hasher = blake3::Hasher::new();
    let mut warnings = Vec::new();

    let forecasts: Vec<ForecastRecord> = load_table::<ForecastRow, _>(
        "forecasts",
        &forecasts_path,
        forecasts_bytes.as_deref(),
        &mut hasher,
    )?;
    let flights: Vec<FlightProfile> =
        load_table::<FlightRow, _>("flights", &flights_path, flights_bytes.as_deref(), &mut hasher)?;

    let mut optional = |table: &'static str, name: &str| -> Result<(PathBuf, Option<Vec<u8>>), LoadError> {
        let path = path_of(name);
        let bytes = read_bytes(&path)?;
        if bytes.is_none() {
            warnings.push(format!("{table}: {} not found, table is empty", path.display()));
        }
        Ok((path, bytes))
    };
    let (bp_path, bp_bytes) = optional("business_plan", &config.business_plan)?;
    let (wp_path, wp_bytes) = optional("weekly_plan", &config.weekly_plan)?;
    let (ex_path, ex_bytes) = optional("execution", &config.execution)?;
    let (ps_path, ps_bytes) = optional("planning_summary", &config.planning_summary)?;

    let dataset = PlanningDataset {
        forecasts,
        flights,
        business_plan: load_table::<BusinessPlanRow, _>(
            "business_plan",
            &bp_path,
            bp_bytes.as_deref(),
            &mut hasher,
        )?,
        weekly_plan: load_table::<WeeklyPlanRow, _>(
            "weekly_plan",
            &wp_path,
            wp_bytes.as_deref(),
            &mut hasher,
        )?,
        execution: load_table::<ExecutionRow, _>(
            "execution",
            &ex_path,
            ex_bytes.as_deref(),
            &mut hasher,
        )?,
        planning_summary: load_table::<SummaryRow, _>(
            "planning_summary",
            &ps_path,
            ps_bytes.as_deref(),
            &mut hasher,
        )?,
    };

    warnings.extend(quality_warnings(&dataset));
    for w in &warnings {
        warn!("{w}");
    }

    let dataset_hash = hasher.finalize().to_hex().to_string();
    info!(
        dir = %config.dir.display(),
        forecasts = dataset.forecasts.len(),
        flights = dataset.flights.len(),
        routes = dataset.routes().len(),
        warnings = warnings.len(),
        "loaded planning dataset"
    );

    Ok(LoadedData {
        dataset,
        dataset_hash,
        has_synthetic: false,
        warnings,
        assignments: BTreeMap::new(),
    })
}

fn load_synthetic(seed: u64, missing_table: &str) -> LoadedData {
    warn!(
        missing_table,
        seed, "generating synthetic dataset; results will be tagged as synthetic"
    );
    let synth = SyntheticConfig {
        seed,
        ..SyntheticConfig::default()
    };
    let dataset = generate_dataset(&synth);
    let dataset_hash = match serde_json::to_vec(&dataset) {
        Ok(bytes) => blake3::hash(&bytes).to_hex().to_string(),
        Err(_) => String::new(),
    };
    LoadedData {
        dataset,
        dataset_hash,
        has_synthetic: true,
        warnings: vec![format!(
            "{missing_table} table missing; using synthetic data (seed {seed})"
        )],
        assignments: suggested_assignments(&synth),
    }
}

/// Range checks on loaded values. Values are kept as-is.
pub fn quality_warnings(dataset: &PlanningDataset) -> Vec<String> {
    let mut warnings = Vec::new();

    for f in &dataset.flights {
        warnings.extend(f.range_issues());
    }
    let mut ids: Vec<&str> = dataset.flight_ids();
    ids.sort_unstable();
    for pair in ids.windows(2) {
        if pair[0] == pair[1] {
            warnings.push(format!("{}: duplicate flight_id, first row wins", pair[0]));
        }
    }

    for r in &dataset.forecasts {
        if r.forecasted_demand < 0.0 {
            warnings.push(format!(
                "{} {}: negative forecasted_demand {}",
                r.route, r.period, r.forecasted_demand
            ));
        }
        if !(0.0..=1.0).contains(&r.forecast_confidence) {
            warnings.push(format!(
                "{} {}: forecast_confidence {} outside [0, 1]",
                r.route, r.period, r.forecast_confidence
            ));
        }
    }

    for r in &dataset.planning_summary {
        if r.committed_capacity < 0.0 || r.actual_net_weight < 0.0 {
            warnings.push(format!(
                "{} {}: negative capacity or weight in planning summary",
                r.route, r.date
            ));
        }
    }

    warnings
}

// ─── Writing ─────────────────────────────────────────────────────────

fn write_rows<R: Serialize>(path: &Path, rows: impl IntoIterator<Item = R>) -> anyhow::Result<()> {
    use anyhow::Context;

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("failed to write row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;
    Ok(())
}

/// Write every table as CSV under `config.dir`, in the layout [`load_dataset`] reads.
pub fn write_dataset(dataset: &PlanningDataset, config: &DataConfig) -> anyhow::Result<()> {
    use anyhow::Context;

    fs::create_dir_all(&config.dir)
        .with_context(|| format!("failed to create {}", config.dir.display()))?;
    let path_of = |name: &str| config.dir.join(name);

    write_rows(
        &path_of(&config.forecasts),
        dataset.forecasts.iter().map(ForecastRow::from),
    )?;
    write_rows(
        &path_of(&config.flights),
        dataset.flights.iter().map(FlightRow::from),
    )?;
    write_rows(
        &path_of(&config.business_plan),
        dataset.business_plan.iter().map(BusinessPlanRow::from),
    )?;
    write_rows(
        &path_of(&config.weekly_plan),
        dataset.weekly_plan.iter().map(WeeklyPlanRow::from),
    )?;
    write_rows(
        &path_of(&config.execution),
        dataset.execution.iter().map(ExecutionRow::from),
    )?;
    write_rows(
        &path_of(&config.planning_summary),
        dataset.planning_summary.iter().map(SummaryRow::from),
    )?;

    info!(dir = %config.dir.display(), "wrote planning dataset");
    Ok(())
}
