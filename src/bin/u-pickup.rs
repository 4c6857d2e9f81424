use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{arg, Command};
use tracing::error;
use tracing_subscriber::EnvFilter;

use u_pickup::config::{PlannerConfig, SearchConfig};
use u_pickup::io::{format_solution, read_loads};
use u_pickup::planner::Planner;

fn cli() -> Command {
    Command::new("u-pickup")
        .about("Assigns pickup-and-delivery loads to duration-bounded driver routes")
        .arg(
            arg!(<FILE> "Load file: header line, then `<id> (<x>,<y>) (<x>,<y>)` per line")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            arg!(--"budget-ms" [MS] "Wall-clock budget for starting new runs")
                .default_value("25000")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            arg!(--"max-runs" [RUNS] "Stop after this many runs")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(arg!(--seed [SEED] "Seed for reproducible runs").value_parser(clap::value_parser!(u64)))
        .arg(
            arg!(--"max-duration" [MINUTES] "Longest allowed route")
                .default_value("720")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(arg!(--"baseline-only" "Run only the deterministic baseline"))
        .arg(arg!(--json "Print the full solution as JSON"))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every load was routed.
fn run() -> Result<bool> {
    let matches = cli().get_matches();

    let path = matches
        .get_one::<PathBuf>("FILE")
        .context("FILE is required")?;
    let loads = read_loads(path)
        .with_context(|| format!("Cannot load file [{}]", path.display()))?;

    let max_duration = *matches
        .get_one::<f64>("max-duration")
        .context("max-duration has a default")?;
    let budget_ms = *matches
        .get_one::<u64>("budget-ms")
        .context("budget-ms has a default")?;

    let mut config = PlannerConfig::default()
        .with_search(SearchConfig::default().with_max_duration(max_duration))
        .with_time_budget(Duration::from_millis(budget_ms));
    if let Some(seed) = matches.get_one::<u64>("seed") {
        config = config.with_seed(*seed);
    }
    if matches.get_flag("baseline-only") {
        config = config.with_max_runs(1);
    } else if let Some(runs) = matches.get_one::<usize>("max-runs") {
        config = config.with_max_runs(*runs);
    }

    let report = Planner::new(config).plan(&loads).context("Planning failed")?;

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&report.best)?);
    } else {
        let text = format_solution(&report.best);
        if !text.is_empty() {
            println!("{text}");
        }
    }

    if !report.best.is_complete() {
        error!(loads = ?report.best.unassigned(), "loads left unassigned");
    }
    Ok(report.best.is_complete())
}
