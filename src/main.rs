//! Command line entry point: read an instance, search, print the itinerary.

use clap::{Parser, ValueEnum};
use flight_tour::config::Config;
use flight_tour::input::Instance;
use flight_tour::local_search::acceptance::AcceptancePolicy;
use flight_tour::utils::write_itinerary;
use flight_tour::TourSolver;
use log::{error, info};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Acceptance {
    Improving,
    NonWorsening,
    Annealing,
}

#[derive(Debug, Parser)]
#[command(name = "flight-tour", about = "Cheapest day-by-day itinerary through every area")]
struct Args {
    /// Instance file; standard input when omitted
    input: Option<PathBuf>,

    /// JSON configuration file, overridden by the flags below
    #[arg(long)]
    config: Option<PathBuf>,

    /// Total time limit in milliseconds (default depends on the instance size)
    #[arg(long)]
    time_limit_ms: Option<u64>,

    /// Number of refinement workers
    #[arg(long)]
    workers: Option<usize>,

    /// Random seed for reproducible refinement
    #[arg(long)]
    seed: Option<u64>,

    /// Acceptance rule for non-improving moves
    #[arg(long, value_enum)]
    acceptance: Option<Acceptance>,

    /// Starting temperature for `--acceptance annealing`
    #[arg(long, default_value_t = 100.0)]
    temperature: f64,

    /// Per-pass cooling factor for `--acceptance annealing`
    #[arg(long, default_value_t = 0.999)]
    cooling: f64,

    /// Validate every proposed tour
    #[arg(long)]
    validate: bool,

    /// Print the tour as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    fn config(&self) -> flight_tour::error::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::new(),
        };
        if let Some(ms) = self.time_limit_ms {
            config = config.with_time_limit(Duration::from_millis(ms));
        }
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(acceptance) = self.acceptance {
            config = config.with_acceptance(match acceptance {
                Acceptance::Improving => AcceptancePolicy::Improving,
                Acceptance::NonWorsening => AcceptancePolicy::NonWorsening,
                Acceptance::Annealing => AcceptancePolicy::Annealing {
                    initial_temperature: self.temperature,
                    cooling_rate: self.cooling,
                },
            });
        }
        if self.validate {
            config = config.with_validate_proposals(true);
        }
        Ok(config)
    }
}

fn run(args: &Args, started: Instant) -> flight_tour::error::Result<bool> {
    let mut config = args.config()?;
    let instance = match &args.input {
        Some(path) => Instance::from_file(path)?,
        None => Instance::from_reader(io::stdin().lock())?,
    };
    info!(
        "loaded {} areas and {} flight records in {:?}",
        instance.problem.length(),
        instance.records.len(),
        started.elapsed()
    );

    // Loading counts against the budget.
    let budget = config.time_budget(instance.problem.length());
    config.time_limit = Some(budget.saturating_sub(started.elapsed()) + config.safety_margin);

    let solver = TourSolver::new(instance.problem, &instance.records, config);
    let report = solver.run();

    let Some(tour) = report.tour else {
        error!("no itinerary found");
        return Ok(false);
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &tour).map_err(io::Error::from)?;
        writeln!(out)?;
    } else {
        write_itinerary(&mut out, &tour, &solver.problem)?;
    }
    out.flush()?;
    Ok(true)
}

fn main() -> ExitCode {
    let started = Instant::now();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let args = Args::parse();
    match run(&args, started) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
