//! Reporting and export: JSON, CSV, and Markdown artifact generation.
//!
//! Provides three export formats for batch reports:
//! - **JSON**: full round-trip serialization with schema versioning
//! - **CSV**: one row per route decision for spreadsheets
//! - **Markdown**: human-readable batch report and per-route comparisons
//!
//! All persisted artifacts include a `schema_version` field. Unknown versions
//! are rejected on load.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use caplan_core::PolicyMetrics;

use crate::runner::{BatchReport, RouteEvaluation, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `BatchReport` to pretty JSON.
pub fn export_json(report: &BatchReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize BatchReport to JSON")
}

/// Deserialize a `BatchReport` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<BatchReport> {
    let report: BatchReport =
        serde_json::from_str(json).context("failed to deserialize BatchReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── CSV export ─────────────────────────────────────────────────────

fn metric_cells(m: Option<&PolicyMetrics>) -> [String; 4] {
    match m {
        Some(m) => [
            format!("{:.2}", m.delay_rate),
            format!("{:.2}", m.avg_utilization),
            format!("{:.2}", m.reliability),
            format!("{:.2}", m.avg_void_capacity),
        ],
        None => Default::default(),
    }
}

/// Export per-route decisions as CSV.
///
/// Columns: route, flight_id, flight_found, demand_stability, cost_exposure,
/// delay_risk, flexibility, strategy, rule, then delay rate, utilization,
/// reliability and void capacity for each policy (empty when the route has
/// no execution history).
pub fn export_decisions_csv(report: &BatchReport) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "route",
        "flight_id",
        "flight_found",
        "demand_stability",
        "cost_exposure",
        "delay_risk",
        "flexibility",
        "strategy",
        "rule",
        "baseline_delay_rate",
        "baseline_utilization",
        "baseline_reliability",
        "baseline_void_capacity",
        "strategy_delay_rate",
        "strategy_utilization",
        "strategy_reliability",
        "strategy_void_capacity",
    ])?;

    for e in &report.routes {
        let d = &e.decision;
        let base = metric_cells(e.comparison.as_ref().map(|c| &c.forecast_only));
        let ours = metric_cells(e.comparison.as_ref().map(|c| &c.strategy_driven));
        let mut record = vec![
            d.route.clone(),
            d.flight_id.clone(),
            d.flight_found.to_string(),
            format!("{:.4}", d.scores.demand_stability),
            format!("{:.4}", d.scores.cost_exposure),
            format!("{:.4}", d.scores.delay_risk),
            format!("{:.4}", d.scores.flexibility),
            d.strategy().label().to_string(),
            d.classification.rule.number().to_string(),
        ];
        record.extend(base);
        record.extend(ours);
        wtr.write_record(&record)?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for a batch run.
///
/// Creates a directory named `batch_{timestamp}/` under `output_dir`
/// containing:
/// - `report.json`: the full `BatchReport`
/// - `decisions.csv`: one row per route
/// - `report.md`: Markdown summary
///
/// Returns the path to the created directory.
pub fn save_artifacts(report: &BatchReport, output_dir: &Path) -> Result<PathBuf> {
    let dirname = format!("batch_{}", chrono::Local::now().format("%Y%m%d_%H%M%S"));
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    let json = export_json(report)?;
    std::fs::write(run_dir.join("report.json"), &json)?;

    let csv = export_decisions_csv(report)?;
    std::fs::write(run_dir.join("decisions.csv"), &csv)?;

    std::fs::write(run_dir.join("report.md"), generate_report(report))?;

    tracing::info!(dir = %run_dir.display(), "saved artifacts");
    Ok(run_dir)
}

/// Load a `BatchReport` from an artifact directory's report.json.
///
/// Rejects unknown schema versions.
pub fn load_artifacts(dir: &Path) -> Result<BatchReport> {
    let path = dir.join("report.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}

// ─── Markdown reports ───────────────────────────────────────────────

/// Generate a Markdown report for a batch run.
pub fn generate_report(report: &BatchReport) -> String {
    let mut md = String::with_capacity(4096);

    md.push_str("# Capacity Planning Report\n\n");

    md.push_str("## Metadata\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    let _ = writeln!(md, "| Generated | {} |", report.generated_at);
    let _ = writeln!(md, "| Selected Date | {} |", report.selected_date);
    let _ = writeln!(md, "| Routes | {} |", report.routes.len());
    let _ = writeln!(md, "| Dataset Hash | {} |", report.dataset_hash);
    if report.has_synthetic {
        md.push_str("| Data | **SYNTHETIC** |\n");
    }
    md.push('\n');

    md.push_str("## Strategy Distribution\n\n");
    md.push_str("| Strategy | Routes |\n");
    md.push_str("| --- | ---: |\n");
    for (strategy, count) in &report.strategy_counts {
        let _ = writeln!(md, "| {} | {} |", strategy.label(), count);
    }
    md.push('\n');

    md.push_str("## Decisions\n\n");
    md.push_str("| Route | Flight | Stability | Cost Exposure | Delay Risk | Flexibility | Strategy | Rule |\n");
    md.push_str("| --- | --- | ---: | ---: | ---: | ---: | --- | ---: |\n");
    for e in &report.routes {
        let d = &e.decision;
        let flight = if d.flight_found {
            d.flight_id.clone()
        } else {
            format!("{} (not found)", d.flight_id)
        };
        let _ = writeln!(
            md,
            "| {} | {} | {:.2} ({}) | {:.2} ({}) | {:.2} ({}) | {:.2} ({}) | {} | {} |",
            d.route,
            flight,
            d.scores.demand_stability,
            d.bands.demand_stability,
            d.scores.cost_exposure,
            d.bands.cost_exposure,
            d.scores.delay_risk,
            d.bands.delay_risk,
            d.scores.flexibility,
            d.bands.flexibility,
            d.strategy().label(),
            d.classification.rule.number(),
        );
    }
    md.push('\n');

    for e in &report.routes {
        if e.comparison.is_some() {
            md.push_str(&generate_comparison(e));
        }
    }

    if !report.data_quality_warnings.is_empty() {
        md.push_str("## Data Quality\n\n");
        for warn in &report.data_quality_warnings {
            let _ = writeln!(md, "- {warn}");
        }
        md.push('\n');
    }

    md
}

/// Forecast-only vs strategy-driven comparison for one route.
///
/// Routes without execution history get a one-line note instead of a table.
pub fn generate_comparison(evaluation: &RouteEvaluation) -> String {
    let mut md = String::with_capacity(1024);
    let d = &evaluation.decision;

    let _ = writeln!(md, "## {}: {}\n", d.route, d.strategy().label());

    let Some(cmp) = &evaluation.comparison else {
        md.push_str("No planning-vs-execution history for this route.\n\n");
        return md;
    };
    let base = &cmp.forecast_only;
    let ours = &cmp.strategy_driven;

    fn signed(v: f64) -> String {
        if v >= 0.0 {
            format!("+{v:.2}")
        } else {
            format!("{v:.2}")
        }
    }

    md.push_str("| Metric | Forecast-only | Strategy-driven | Delta |\n");
    md.push_str("| --- | ---: | ---: | ---: |\n");
    let _ = writeln!(
        md,
        "| Delay Rate | {:.1}% | {:.1}% | {}% |",
        base.delay_rate,
        ours.delay_rate,
        signed(ours.delay_rate - base.delay_rate)
    );
    let _ = writeln!(
        md,
        "| Avg Utilization | {:.1}% | {:.1}% | {}% |",
        base.avg_utilization,
        ours.avg_utilization,
        signed(ours.avg_utilization - base.avg_utilization)
    );
    let _ = writeln!(
        md,
        "| Reliability | {:.1}% | {:.1}% | {}% |",
        base.reliability,
        ours.reliability,
        signed(ours.reliability - base.reliability)
    );
    let _ = writeln!(
        md,
        "| Avg Void Capacity | {:.2} | {:.2} | {} |",
        base.avg_void_capacity,
        ours.avg_void_capacity,
        signed(ours.avg_void_capacity - base.avg_void_capacity)
    );
    let _ = writeln!(md, "| Days | {} | {} | |", base.days, ours.days);
    md.push('\n');

    if let Some(imp) = &evaluation.improvement {
        md.push_str("Improvement analysis:\n\n");
        match imp.reliability_gain_pct {
            Some(g) => {
                let _ = writeln!(md, "- Reliability improvement: {}%", signed(g));
            }
            None => md.push_str("- Reliability improvement: n/a (baseline had no reliable days)\n"),
        }
        let _ = writeln!(md, "- Utilization difference: {} pts", signed(imp.utilization_difference));
        let _ = writeln!(md, "- Delay-rate reduction: {} pts", signed(imp.delay_rate_reduction));
        let _ = writeln!(md, "- Void-capacity reduction: {}", signed(imp.void_capacity_reduction));
        md.push('\n');
    }

    if let Some(impact) = &evaluation.impact {
        let _ = writeln!(
            md,
            "Impact: avg load factor {:.1}%, service reliability {:.1}%, avg void {:.2}, est. savings {:.2} over {} days\n",
            impact.avg_load_factor,
            impact.service_reliability,
            impact.avg_void_capacity,
            impact.estimated_cost_savings,
            impact.total_days
        );
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use caplan_core::{
        classify_with_rule, evaluate_policies, ExecutionRecord, ExecutionSummary, FactorScores,
        ForecastSummary, ImpactAssumptions, ImpactSummary, PolicyComparison, Strategy,
    };
    use chrono::NaiveDate;

    use crate::runner::RouteDecision;

    // ─── Test helpers ────────────────────────────────────────────────

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, n).unwrap()
    }

    fn sample_records() -> Vec<ExecutionRecord> {
        vec![
            ExecutionRecord {
                date: day(1),
                route: "DEL-FRA".into(),
                forecasted_demand: 100.0,
                committed_capacity: 110.0,
                actual_net_weight: 95.0,
                void_capacity: 15.0,
                load_factor: 86.36,
            },
            ExecutionRecord {
                date: day(2),
                route: "DEL-FRA".into(),
                forecasted_demand: 100.0,
                committed_capacity: 110.0,
                actual_net_weight: 105.0,
                void_capacity: 5.0,
                load_factor: 95.45,
            },
        ]
    }

    fn sample_evaluation(route: &str, with_history: bool) -> RouteEvaluation {
        let scores = FactorScores::new(0.96, 0.67, 0.2, 0.9);
        let records = if with_history { sample_records() } else { vec![] };
        let comparison = evaluate_policies(&records);
        RouteEvaluation {
            decision: RouteDecision {
                route: route.into(),
                flight_id: "FX366".into(),
                date: day(1),
                flight_found: true,
                scores,
                bands: scores.bands(),
                classification: classify_with_rule(&scores),
                forecast: None,
                forecast_summary: ForecastSummary::default(),
                observations: 3,
            },
            improvement: comparison.as_ref().map(PolicyComparison::improvement),
            comparison,
            impact: ImpactSummary::compute(&records, &ImpactAssumptions::default()),
            execution: ExecutionSummary::default(),
        }
    }

    fn sample_report() -> BatchReport {
        let mut strategy_counts = BTreeMap::new();
        strategy_counts.insert(Strategy::DynamicBuffer, 2);
        BatchReport {
            schema_version: SCHEMA_VERSION,
            generated_at: "2026-01-01T00:00:00+00:00".into(),
            dataset_hash: "deadbeef".into(),
            has_synthetic: false,
            data_quality_warnings: vec!["FX512: delay_risk_score 1.2 outside [0, 1]".into()],
            selected_date: day(1),
            routes: vec![
                sample_evaluation("BOM-LHR", false),
                sample_evaluation("DEL-FRA", true),
            ],
            strategy_counts,
        }
    }

    // ─── JSON ────────────────────────────────────────────────────────

    #[test]
    fn json_roundtrip_preserves_report() {
        let report = sample_report();
        let json = export_json(&report).unwrap();
        let restored = import_json(&json).unwrap();
        assert_eq!(restored.routes, report.routes);
        assert_eq!(restored.strategy_counts, report.strategy_counts);
        assert_eq!(restored.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn json_rejects_future_schema() {
        let mut report = sample_report();
        report.schema_version = 99;
        let json = export_json(&report).unwrap();
        let err = import_json(&json).unwrap_err();
        assert!(err.to_string().contains("unsupported schema version"));
    }

    #[test]
    fn json_without_schema_version_defaults() {
        let report = sample_report();
        let mut value: serde_json::Value =
            serde_json::from_str(&export_json(&report).unwrap()).unwrap();
        value.as_object_mut().unwrap().remove("schema_version");
        let restored = import_json(&value.to_string()).unwrap();
        assert_eq!(restored.schema_version, SCHEMA_VERSION);
    }

    // ─── CSV ─────────────────────────────────────────────────────────

    #[test]
    fn decisions_csv_has_header_and_one_row_per_route() {
        let csv = export_decisions_csv(&sample_report()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("route,flight_id,flight_found"));
        assert!(lines[1].starts_with("BOM-LHR,FX366,true"));
        assert!(lines[1].contains("Dynamic Buffer"));
        // no history → empty metric cells
        assert!(lines[1].ends_with(",,,,,,,"));
        assert!(!lines[2].ends_with(','));
    }

    // ─── Markdown ────────────────────────────────────────────────────

    #[test]
    fn report_contains_sections() {
        let md = generate_report(&sample_report());
        assert!(md.contains("# Capacity Planning Report"));
        assert!(md.contains("## Strategy Distribution"));
        assert!(md.contains("| Dynamic Buffer | 2 |"));
        assert!(md.contains("## Decisions"));
        assert!(md.contains("## DEL-FRA: Dynamic Buffer"));
        assert!(md.contains("## Data Quality"));
        assert!(!md.contains("SYNTHETIC"));
    }

    #[test]
    fn synthetic_report_is_flagged() {
        let mut report = sample_report();
        report.has_synthetic = true;
        assert!(generate_report(&report).contains("**SYNTHETIC**"));
    }

    #[test]
    fn comparison_without_history_is_a_note() {
        let md = generate_comparison(&sample_evaluation("BOM-LHR", false));
        assert!(md.contains("No planning-vs-execution history"));
        assert!(!md.contains("| Metric |"));
    }

    #[test]
    fn comparison_shows_both_policies() {
        let md = generate_comparison(&sample_evaluation("DEL-FRA", true));
        assert!(md.contains("| Delay Rate | 50.0% | 0.0% | -50.00% |"));
        assert!(md.contains("Improvement analysis"));
        assert!(md.contains("Impact:"));
    }

    // ─── Artifacts ───────────────────────────────────────────────────

    #[test]
    fn save_and_load_artifacts() {
        let tmp = tempfile::tempdir().unwrap();
        let report = sample_report();
        let dir = save_artifacts(&report, tmp.path()).unwrap();

        assert!(dir.join("report.json").exists());
        assert!(dir.join("decisions.csv").exists());
        assert!(dir.join("report.md").exists());

        let loaded = load_artifacts(&dir).unwrap();
        assert_eq!(loaded.routes, report.routes);
        assert_eq!(loaded.dataset_hash, "deadbeef");
    }
}
