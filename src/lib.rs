//! # flight_tour
//!
//! Anytime search for the cheapest closed flight itinerary that starts at a
//! home location on day 1, enters every other area exactly once (one flight
//! per day) and lands back in the home area on the last day.
//!
//! The search has two phases sharing one [`register::SolutionRegister`]:
//! a constructive branch-and-bound search ([`search`]) that streams every
//! improving tour it completes, and concurrent local search workers
//! ([`local_search`]) that keep refining the best tour until the deadline.
//! Small instances are searched exhaustively and return as soon as the search
//! space is covered.

pub mod config;
pub mod error;
pub mod expansion;
pub mod input;
pub mod local_search;
pub mod network;
pub mod problem;
pub mod register;
pub mod search;
pub mod tour;
pub mod utils;
pub mod validation;

use crate::config::Config;
use crate::expansion::ExpansionStats;
use crate::local_search::LocalSearch;
use crate::network::Network;
use crate::problem::{FlightRecord, Problem};
use crate::register::{SolutionRegister, SolutionSink, WaitOutcome};
use crate::search::{BranchAndBound, SearchOutcome};
use crate::tour::Tour;
use crate::validation::validate;

use log::{error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Result of one solver run.
#[derive(Debug, Clone)]
pub struct SolveReport {
    /// Best tour found, `None` when no itinerary exists or none was found in time.
    pub tour: Option<Tour>,
    /// How the constructive phase ended.
    pub search: SearchOutcome,
    /// The run ended because the search space was covered, not because of the deadline.
    pub exhausted: bool,
    pub elapsed: Duration,
}

/// Orchestrates the constructive search and the refinement workers.
pub struct TourSolver {
    pub problem: Problem,
    pub network: Network,
    pub config: Config,
    pub expansion: ExpansionStats,
}

impl TourSolver {
    /// Expand and index `records` for `problem`.
    pub fn new(problem: Problem, records: &[FlightRecord], config: Config) -> Self {
        let (flights, expansion) = expansion::expand(&problem, records);
        let network = Network::build(&problem, flights);
        TourSolver {
            problem,
            network,
            config,
            expansion,
        }
    }

    /// Run with the configured time budget, counted from now.
    pub fn run(&self) -> SolveReport {
        let budget = self.config.time_budget(self.problem.length());
        self.run_until(Instant::now() + budget)
    }

    /// Run until the search space is exhausted or `deadline` passes.
    pub fn run_until(&self, deadline: Instant) -> SolveReport {
        let start = Instant::now();
        let register =
            SolutionRegister::new(&self.problem).with_validation(self.config.validate_proposals);
        let stop = AtomicBool::new(false);

        let exhaustive = self.problem.location_count() <= self.config.exhaustive_location_limit;
        let workers = self.config.workers.max(1);
        let base_seed = self.config.seed.unwrap_or_else(rand::random);

        info!(
            "solving {} areas, {} locations, {} flights ({} search)",
            self.problem.length(),
            self.problem.location_count(),
            self.network.flight_count(),
            if exhaustive { "exhaustive" } else { "anytime" }
        );

        let (waited, search) = thread::scope(|scope| {
            let register = &register;
            let stop = &stop;

            let constructive = scope.spawn(move || {
                let outcome = BranchAndBound::new(&self.problem, &self.network)
                    .stop_on_first(!exhaustive)
                    .with_stop_flag(stop)
                    .solve(register);

                if outcome == SearchOutcome::FirstFound {
                    info!("handing over to {} refinement worker(s)", workers);
                    for worker in 0..workers {
                        let seed = base_seed.wrapping_add(worker as u64);
                        scope.spawn(move || {
                            LocalSearch::new(&self.problem, &self.network, &self.config, seed)
                                .run(register, stop)
                        });
                    }
                }
                outcome
            });

            let waited = register.wait_until(deadline);
            stop.store(true, Ordering::Relaxed);

            let search = match constructive.join() {
                Ok(outcome) => outcome,
                Err(_) => {
                    error!("constructive search panicked");
                    SearchOutcome::Cancelled
                }
            };
            (waited, search)
        });

        let best = register.snapshot();
        let tour = if best.is_infeasible() {
            info!("no itinerary found");
            None
        } else if let Err(violation) = validate(&self.problem, &best) {
            error!("best tour failed validation: {}", violation);
            None
        } else {
            Some(best)
        };

        let elapsed = start.elapsed();
        info!(
            "finished after {} with cost {}",
            utils::format_duration(elapsed),
            tour.as_ref()
                .map_or_else(|| String::from("none"), |t| t.cost.to_string())
        );

        SolveReport {
            tour,
            search,
            exhausted: waited == WaitOutcome::Exhausted,
            elapsed,
        }
    }
}
