use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use metro_finder::config::Config;
use metro_finder::enrich::enrich_files;
use metro_finder::maintenance::{Maintenance, PrecisionReport, RunAllReport};
use metro_finder::resolver::{CachedMapSearch, CoordinateResolver, HttpMapSearch};
use metro_finder::store::FacilityStore;
use metro_finder::summary::RunSummary;

/// Maintain metro station coordinates and find the nearest station to
/// points of interest.
#[derive(Parser)]
#[command(name = "metro-finder", version)]
struct Cli {
    /// Station collection file
    #[arg(long, env = "METRO_STATIONS")]
    stations: Option<PathBuf>,

    /// Region name appended to search queries
    #[arg(long)]
    region: Option<String>,

    /// Courtesy delay between search requests, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Per-request timeout, in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Stations resolved at once
    #[arg(long)]
    concurrency: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve stations with missing or out-of-region coordinates
    Resolve,
    /// Also re-resolve stations stored with too few digits
    ForceFix,
    /// Round every stored coordinate to the configured precision
    Normalize,
    /// Check every station's coordinates without modifying anything
    Verify,
    /// Replace the collection with the built-in seed stations
    Seed,
    /// Attach the nearest station to each point in a dataset
    Enrich {
        #[arg(long, env = "PANDALS_INPUT")]
        input: Option<PathBuf>,
        #[arg(long, env = "PANDALS_OUTPUT")]
        output: Option<PathBuf>,
    },
    /// Resolve, force-fix, normalize, then verify
    RunAll,
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::default();

        if let Some(stations) = &self.stations {
            config.paths.stations = stations.clone();
        }
        if let Some(region) = &self.region {
            config.region.name = region.clone();
        }
        if let Some(ms) = self.delay_ms {
            config.resolver = config.resolver.with_request_delay(Duration::from_millis(ms));
        }
        if let Some(secs) = self.timeout {
            config.resolver = config.resolver.with_timeout(secs);
        }
        if let Some(n) = self.concurrency {
            config.resolver = config.resolver.with_max_concurrent(n);
        }
        if let Command::Enrich { input, output } = &self.command {
            if let Some(input) = input {
                config.paths.query_points = input.clone();
            }
            if let Some(output) = output {
                config.paths.enriched_output = output.clone();
            }
        }

        config
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("metro-finder: {err}");
            ExitCode::FAILURE
        }
    }
}

type Search = CachedMapSearch<HttpMapSearch>;

fn maintenance(config: &Config) -> Result<Maintenance<Search>, Box<dyn std::error::Error>> {
    let search = HttpMapSearch::new(config.resolver.timeout_secs, config.resolver.request_delay)?;
    let search = CachedMapSearch::new(search, &config.resolver.cache);
    let resolver = CoordinateResolver::new(
        search,
        &config.resolver,
        config.region.bounds,
        config.precision,
    )?;
    let store = FacilityStore::new(config.paths.stations.clone());
    Ok(Maintenance::new(store, resolver, config))
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = cli.config();

    let success = match cli.command {
        Command::Seed => {
            let store = FacilityStore::new(config.paths.stations.clone());
            let seeded = store.create_seed()?;
            println!(
                "Wrote {} seed stations to {}",
                seeded.len(),
                store.path().display()
            );
            true
        }
        Command::Enrich { .. } => {
            let summary = enrich_files(&config)?;
            print_summary("Enrich", &summary);
            println!("Output: {}", config.paths.enriched_output.display());
            summary.is_success()
        }
        Command::Resolve => {
            let summary = maintenance(&config)?.resolve_missing().await?;
            print_summary("Resolve", &summary);
            summary.is_success()
        }
        Command::ForceFix => {
            let summary = maintenance(&config)?.force_fix().await?;
            print_summary("Force-fix", &summary);
            summary.is_success()
        }
        Command::Normalize => {
            let summary = maintenance(&config)?.normalize_all()?;
            print_summary("Normalize", &summary);
            summary.is_success()
        }
        Command::Verify => {
            let report = maintenance(&config)?.verify()?;
            print_report(&report);
            report.passed()
        }
        Command::RunAll => {
            let report = maintenance(&config)?.run_all().await?;
            print_run_all(&report);
            report.is_success()
        }
    };

    Ok(exit_code(success))
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_summary(label: &str, summary: &RunSummary) {
    println!("{label}: {summary}");
    if let Some(stats) = &summary.distances {
        println!(
            "  distance (m): min {:.2}, mean {:.2}, max {:.2}",
            stats.min,
            stats.mean(),
            stats.max
        );
    }
    for failure in &summary.failures {
        println!("  FAILED {}: {}", failure.item, failure.reason);
    }
}

fn print_report(report: &PrecisionReport) {
    for check in &report.checks {
        println!(
            "{:<30} {:>12} {:>12}  {:?}",
            check.name,
            check.latitude.as_deref().unwrap_or("-"),
            check.longitude.as_deref().unwrap_or("-"),
            check.status
        );
    }
    let failing = report.failures().count();
    if failing == 0 {
        println!("All {} stations verified", report.checks.len());
    } else {
        println!("{failing} of {} stations need attention", report.checks.len());
    }
}

fn print_run_all(report: &RunAllReport) {
    print_summary("Resolve", &report.resolved);
    print_summary("Force-fix", &report.force_fixed);
    print_summary("Normalize", &report.normalized);
    print_report(&report.verification);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_config() {
        let cli = Cli::try_parse_from([
            "metro-finder",
            "--stations",
            "/tmp/stations.json",
            "--region",
            "Howrah",
            "--concurrency",
            "0",
            "enrich",
            "--input",
            "in.json",
        ])
        .unwrap();
        let config = cli.config();

        assert_eq!(config.paths.stations, PathBuf::from("/tmp/stations.json"));
        assert_eq!(config.region.name, "Howrah");
        assert_eq!(config.resolver.max_concurrent, 1);
        assert_eq!(config.paths.query_points, PathBuf::from("in.json"));
    }

    #[test]
    fn subcommands_parse() {
        for name in ["resolve", "force-fix", "normalize", "verify", "seed", "run-all"] {
            assert!(Cli::try_parse_from(["metro-finder", name]).is_ok(), "{name}");
        }
        assert!(Cli::try_parse_from(["metro-finder", "bogus"]).is_err());
    }
}
