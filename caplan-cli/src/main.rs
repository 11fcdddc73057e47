//! Caplan CLI: capacity-planning decisions from the command line.
//!
//! Commands:
//! - `decide`: four-factor lens and recommended strategy for a route
//! - `compare`: forecast-only vs strategy-driven metrics for a route
//! - `impact`: business-impact and execution summaries for a route
//! - `batch`: evaluate every route and save JSON/CSV/Markdown artifacts
//! - `overview`: routes, dates and flights in the dataset
//! - `synth`: write a seeded synthetic CSV dataset

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use caplan_core::ForecastRecord;
use caplan_runner::export::{generate_comparison, save_artifacts};
use caplan_runner::runner::{decide, evaluate_route, run_batch, RouteDecision};
use caplan_runner::synthetic::{generate_dataset, suggested_assignments, SyntheticConfig};
use caplan_runner::{load_dataset, write_dataset, EngineConfig, LoadOptions, LoadedData};

#[derive(Parser)]
#[command(
    name = "caplan",
    about = "Caplan CLI: route-level capacity-planning decision engine"
)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the CSV tables (overrides [data].dir).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use a synthetic dataset when the CSV tables are missing.
    #[arg(long, global = true, default_value_t = false)]
    synthetic: bool,

    /// Seed for synthetic data, both the fallback and `synth`.
    #[arg(long, global = true, default_value_t = 42)]
    seed: u64,

    /// Debug-level logging (RUST_LOG overrides).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a route against a flight and recommend a strategy.
    Decide {
        /// Route, e.g. DEL-FRA. Defaults to [selection].route.
        #[arg(long)]
        route: Option<String>,

        /// Flight id. Defaults to the route's assignment, then [selection].flight.
        #[arg(long)]
        flight: Option<String>,

        /// Date (YYYY-MM-DD) whose forecast is shown. Defaults to [selection].date.
        #[arg(long)]
        date: Option<String>,
    },
    /// Compare forecast-only and strategy-driven execution for a route.
    Compare {
        #[arg(long)]
        route: Option<String>,

        #[arg(long)]
        flight: Option<String>,
    },
    /// Show the business impact of the strategy-driven plan for a route.
    Impact {
        #[arg(long)]
        route: Option<String>,
    },
    /// Evaluate every route and save artifacts.
    Batch {
        /// Output directory. Defaults to [runner].output_dir.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Evaluate routes one at a time instead of on the thread pool.
        #[arg(long, default_value_t = false)]
        sequential: bool,
    },
    /// List routes, dates and flights in the dataset.
    Overview,
    /// Write a seeded synthetic CSV dataset.
    Synth {
        /// Directory to write the tables into.
        #[arg(long, default_value = "data")]
        out_dir: PathBuf,

        /// Comma-separated routes. Defaults to DEL-FRA,BOM-LHR,BLR-SIN,MAA-DXB.
        #[arg(long, value_delimiter = ',')]
        routes: Vec<String>,

        #[arg(long, default_value_t = 28)]
        days: u32,

        /// First forecast date (YYYY-MM-DD).
        #[arg(long)]
        start: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data.dir = dir.clone();
    }
    let opts = LoadOptions {
        synthetic: cli.synthetic,
        seed: cli.seed,
    };
    tracing::debug!(?config, synthetic = opts.synthetic, "effective config");

    match cli.command {
        Commands::Decide {
            route,
            flight,
            date,
        } => run_decide(&config, &opts, route, flight, date),
        Commands::Compare { route, flight } => run_compare(&config, &opts, route, flight),
        Commands::Impact { route } => run_impact(&config, &opts, route),
        Commands::Batch {
            output_dir,
            sequential,
        } => run_batch_cmd(config, &opts, output_dir, sequential),
        Commands::Overview => run_overview(&config, &opts),
        Commands::Synth {
            out_dir,
            routes,
            days,
            start,
        } => run_synth(&config, out_dir, cli.seed, routes, days, start),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("caplan_runner={default_level},caplan={default_level},warn"))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid date '{s}'"))
}

fn load(config: &EngineConfig, opts: &LoadOptions) -> Result<LoadedData> {
    let loaded = load_dataset(&config.data, opts)?;
    if loaded.has_synthetic {
        eprintln!("WARNING: using synthetic data; results are not operational numbers");
    }
    Ok(loaded)
}

fn resolve_route(config: &EngineConfig, route: Option<String>) -> String {
    route.unwrap_or_else(|| config.selection.route.clone())
}

fn resolve_flight(
    config: &EngineConfig,
    loaded: &LoadedData,
    route: &str,
    flight: Option<String>,
) -> String {
    flight.unwrap_or_else(|| loaded.flight_for(config, route).to_string())
}

// ─── decide ─────────────────────────────────────────────────────────

fn run_decide(
    config: &EngineConfig,
    opts: &LoadOptions,
    route: Option<String>,
    flight: Option<String>,
    date: Option<String>,
) -> Result<()> {
    let loaded = load(config, opts)?;
    let route = resolve_route(config, route);
    let flight = resolve_flight(config, &loaded, &route, flight);
    let date = match date.as_deref() {
        Some(s) => parse_date(s)?,
        None => config.selection.date,
    };

    let decision = decide(&loaded.dataset, &route, &flight, date)?;
    print_decision(&decision);
    Ok(())
}

fn print_forecast(date: NaiveDate, forecast: Option<&ForecastRecord>) {
    match forecast {
        Some(f) => println!(
            "Forecast:   {:.2} on {} (base {:.2}, confidence {:.0}%)",
            f.forecasted_demand,
            date,
            f.base_demand,
            f.forecast_confidence * 100.0
        ),
        None => println!("Forecast:   none for {date}"),
    }
}

fn print_decision(d: &RouteDecision) {
    println!("Route:      {}", d.route);
    if d.flight_found {
        println!("Flight:     {}", d.flight_id);
    } else {
        println!("Flight:     {} (not found, neutral flight factors)", d.flight_id);
    }
    print_forecast(d.date, d.forecast.as_ref());
    println!(
        "History:    {} forecast points, avg confidence {:.1}%",
        d.observations, d.forecast_summary.avg_confidence_pct
    );
    println!();
    println!("  {:<22} {:>6}  Band", "Factor", "Score");
    let rows = [
        ("Demand stability", d.scores.demand_stability, d.bands.demand_stability),
        ("Cost exposure", d.scores.cost_exposure, d.bands.cost_exposure),
        ("Delay risk", d.scores.delay_risk, d.bands.delay_risk),
        ("Real-time flexibility", d.scores.flexibility, d.bands.flexibility),
    ];
    for (name, score, band) in rows {
        println!("  {name:<22} {score:>6.3}  {band}");
    }
    println!();
    println!(
        "Strategy:   {} (rule {})",
        d.strategy(),
        d.classification.rule.number()
    );
}

// ─── compare / impact ───────────────────────────────────────────────

fn run_compare(
    config: &EngineConfig,
    opts: &LoadOptions,
    route: Option<String>,
    flight: Option<String>,
) -> Result<()> {
    let loaded = load(config, opts)?;
    let route = resolve_route(config, route);
    let flight = resolve_flight(config, &loaded, &route, flight);

    let evaluation = evaluate_route(
        &loaded.dataset,
        &route,
        &flight,
        config.selection.date,
        &config.impact,
    )?;
    print!("{}", generate_comparison(&evaluation));
    Ok(())
}

fn run_impact(config: &EngineConfig, opts: &LoadOptions, route: Option<String>) -> Result<()> {
    let loaded = load(config, opts)?;
    let route = resolve_route(config, route);
    let flight = resolve_flight(config, &loaded, &route, None);

    let evaluation = evaluate_route(
        &loaded.dataset,
        &route,
        &flight,
        config.selection.date,
        &config.impact,
    )?;

    println!("Route:      {route}");
    println!("Strategy:   {}", evaluation.decision.strategy());
    match &evaluation.impact {
        Some(i) => {
            println!("Avg load factor:        {:.1}%", i.avg_load_factor);
            println!("Service reliability:    {:.1}%", i.service_reliability);
            println!("Avg void capacity:      {:.2}", i.avg_void_capacity);
            println!(
                "Est. cost savings:      {:.2}  ({} days, {} per unit, {:.0}% recoverable)",
                i.estimated_cost_savings,
                i.total_days,
                config.impact.cost_per_unit,
                config.impact.efficiency_gain * 100.0
            );
        }
        None => println!("No planning-vs-execution history for this route."),
    }
    let e = &evaluation.execution;
    println!(
        "Execution:              {} days, avg load factor {:.1}%, on-time {:.1}%",
        e.days, e.avg_load_factor, e.on_time_rate
    );
    Ok(())
}

// ─── batch ──────────────────────────────────────────────────────────

fn run_batch_cmd(
    mut config: EngineConfig,
    opts: &LoadOptions,
    output_dir: Option<PathBuf>,
    sequential: bool,
) -> Result<()> {
    if sequential {
        config.runner.parallel = false;
    }
    let output_dir = output_dir.unwrap_or_else(|| config.runner.output_dir.clone());

    let loaded = load(&config, opts)?;
    let report = run_batch(&loaded, &config)?;

    println!("{:<10} {:<8} {:<22} Rule", "Route", "Flight", "Strategy");
    for e in &report.routes {
        let d = &e.decision;
        println!(
            "{:<10} {:<8} {:<22} {}",
            d.route,
            d.flight_id,
            d.strategy().label(),
            d.classification.rule.number()
        );
    }
    println!();
    for (strategy, count) in &report.strategy_counts {
        println!("{:<22} {count}", strategy.label());
    }

    let run_dir = save_artifacts(&report, &output_dir)?;
    println!("Artifacts saved to: {}", run_dir.display());
    Ok(())
}

// ─── overview / synth ───────────────────────────────────────────────

fn run_overview(config: &EngineConfig, opts: &LoadOptions) -> Result<()> {
    let loaded = load(config, opts)?;
    let ds = &loaded.dataset;

    let routes = ds.routes();
    let dates = ds.dates();
    println!("Routes ({}): {}", routes.len(), routes.join(", "));
    match (dates.first(), dates.last()) {
        (Some(first), Some(last)) => {
            println!("Dates ({}): {first} to {last}", dates.len())
        }
        _ => println!("Dates: none"),
    }
    println!("Flights ({}): {}", ds.flights.len(), ds.flight_ids().join(", "));
    println!("Dataset hash: {}", loaded.dataset_hash);

    if !loaded.warnings.is_empty() {
        println!("\nData quality:");
        for w in &loaded.warnings {
            println!("  - {w}");
        }
    }
    Ok(())
}

fn run_synth(
    config: &EngineConfig,
    out_dir: PathBuf,
    seed: u64,
    routes: Vec<String>,
    days: u32,
    start: Option<String>,
) -> Result<()> {
    let mut synth = SyntheticConfig {
        seed,
        days,
        ..SyntheticConfig::default()
    };
    if !routes.is_empty() {
        synth.routes = routes;
    }
    if let Some(s) = start.as_deref() {
        synth.start = parse_date(s)?;
    }

    let dataset = generate_dataset(&synth);
    let mut data = config.data.clone();
    data.dir = out_dir;
    write_dataset(&dataset, &data)?;

    println!(
        "Wrote {} routes × {} days to {}",
        synth.routes.len(),
        synth.days,
        data.dir.display()
    );
    println!("\n[assignments]");
    for (route, flight) in suggested_assignments(&synth) {
        println!("\"{route}\" = \"{flight}\"");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_defaults_to_42() {
        let cli = Cli::try_parse_from(["caplan", "--synthetic", "batch"]).unwrap();
        assert_eq!(cli.seed, 42);
        assert!(cli.synthetic);
    }

    #[test]
    fn seed_is_global() {
        let cli = Cli::try_parse_from(["caplan", "--synthetic", "decide", "--seed", "7"]).unwrap();
        assert_eq!(cli.seed, 7);

        let cli = Cli::try_parse_from(["caplan", "synth", "--seed", "9", "--days", "5"]).unwrap();
        assert_eq!(cli.seed, 9);
        assert!(matches!(cli.command, Commands::Synth { days: 5, .. }));
    }
}
