//! Local search refinement of complete itineraries.
//!
//! Two neighborhoods are explored:
//!
//! * [`path_swap`]: exchange the locations visited on two days, reconnecting
//!   the four surrounding flights,
//! * [`area_swap`]: replace the location used in one area by another member
//!   of the same area, reconnecting the two surrounding flights.
//!
//! Every new flight is resolved through [`Network::best_edge`], so a move is
//! either backed by real flights or not applicable at all.

pub mod acceptance;
pub mod area_swap;
pub mod path_swap;

use crate::config::Config;
use crate::network::Network;
use crate::problem::{Cost, Flight, Location, Problem};
use crate::register::SolutionSink;
use crate::tour::Tour;
use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicBool, Ordering};

use self::acceptance::Acceptor;

/// A neighborhood move on a complete tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Exchange the locations occupied at positions `i < j`.
    PathSwap { i: usize, j: usize },
    /// Occupy `location` at `position` instead of its current area sibling.
    AreaSwap { position: usize, location: Location },
}

/// Flights replacing part of a tour, with the resulting total cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconnection {
    replacements: [Option<(usize, Flight)>; 4],
    pub cost: Cost,
}

impl Reconnection {
    /// `(flight index, new flight)` pairs in index order.
    pub fn replacements(&self) -> impl Iterator<Item = &(usize, Flight)> {
        self.replacements.iter().flatten()
    }
}

/// Resolve new flights for the tour `positions` (sorted, distinct flight
/// indices) once the location at every position `p` becomes `location(p)`.
pub(crate) fn reconnect(
    network: &Network,
    tour: &Tour,
    positions: &[usize],
    location: impl Fn(usize) -> Location,
) -> Option<Reconnection> {
    debug_assert!(positions.len() <= 4);
    let mut replacements = [None; 4];
    let mut removed: Cost = 0;
    let mut added: Cost = 0;

    for (slot, &k) in positions.iter().enumerate() {
        let old = &tour.flights[k];
        let new = network.best_edge(location(k), old.day, location(k + 1))?;
        removed += old.cost;
        added += new.cost;
        replacements[slot] = Some((k, *new));
    }

    Some(Reconnection {
        replacements,
        cost: tour.cost - removed + added,
    })
}

/// Statistics of one refinement worker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefineStats {
    pub passes: u64,
    pub improving_moves: u64,
    pub sideways_moves: u64,
    pub worsening_moves: u64,
    pub reseeds: u64,
}

/// Refines a private copy of a tour and reports improvements to a sink.
pub struct LocalSearch<'a> {
    problem: &'a Problem,
    network: &'a Network,
    acceptor: Acceptor,
    rng: ChaCha8Rng,
    max_evaluations: usize,
    reseed_after: usize,
    stats: RefineStats,
}

impl<'a> LocalSearch<'a> {
    /// Create a new local search instance.
    pub fn new(problem: &'a Problem, network: &'a Network, config: &Config, seed: u64) -> Self {
        LocalSearch {
            problem,
            network,
            acceptor: Acceptor::new(config.acceptance),
            rng: ChaCha8Rng::seed_from_u64(seed),
            max_evaluations: config.max_evaluations_per_pass.max(1),
            reseed_after: config.reseed_after,
            stats: RefineStats::default(),
        }
    }

    pub fn stats(&self) -> RefineStats {
        self.stats
    }

    /// Write a reconnection into `tour`.
    pub fn apply(&self, tour: &mut Tour, reconnection: &Reconnection) {
        for &(k, flight) in reconnection.replacements() {
            tour.flights[k] = flight;
        }
        tour.cost = reconnection.cost;
    }

    /// Evaluate a move without touching the tour.
    pub fn evaluate(&self, tour: &Tour, mv: Move) -> Option<Reconnection> {
        match mv {
            Move::PathSwap { i, j } => self.evaluate_path_swap(tour, i, j),
            Move::AreaSwap { position, location } => {
                self.evaluate_area_swap(tour, position, location)
            }
        }
    }

    /// Apply a move if it is applicable, returning the new cost.
    pub fn try_move(&self, tour: &mut Tour, mv: Move) -> Option<Cost> {
        let reconnection = self.evaluate(tour, mv)?;
        self.apply(tour, &reconnection);
        Some(reconnection.cost)
    }

    fn commit<S: SolutionSink + ?Sized>(
        &mut self,
        tour: &mut Tour,
        reconnection: &Reconnection,
        sink: &S,
    ) {
        match reconnection.cost.cmp(&tour.cost) {
            std::cmp::Ordering::Less => self.stats.improving_moves += 1,
            std::cmp::Ordering::Equal => self.stats.sideways_moves += 1,
            std::cmp::Ordering::Greater => self.stats.worsening_moves += 1,
        }
        self.apply(tour, reconnection);
        sink.propose(tour);
    }

    /// One refinement pass: best-improvement scans of both neighborhoods,
    /// then a sampled move offered to the acceptance policy when nothing improved.
    ///
    /// Returns true when the tour became strictly cheaper.
    pub fn pass<S: SolutionSink + ?Sized>(&mut self, tour: &mut Tour, sink: &S) -> bool {
        let before = tour.cost;
        self.stats.passes += 1;

        if let Some((_, reconnection)) = self.best_path_swap(tour) {
            if reconnection.cost < tour.cost {
                self.commit(tour, &reconnection, sink);
            }
        }
        if let Some((_, reconnection)) = self.best_area_swap(tour) {
            if reconnection.cost < tour.cost {
                self.commit(tour, &reconnection, sink);
            }
        }

        if tour.cost == before {
            let samples = [self.random_path_swap(tour), self.random_area_swap(tour)];
            for mv in samples.into_iter().flatten() {
                // Re-evaluated because the first sample may already have been applied.
                let Some(reconnection) = self.evaluate(tour, mv) else {
                    continue;
                };
                if self
                    .acceptor
                    .accept(tour.cost, reconnection.cost, &mut self.rng)
                {
                    self.commit(tour, &reconnection, sink);
                }
            }
        }

        self.acceptor.cool();
        tour.cost < before
    }

    /// Refine until `stop` is raised, starting from the sink's current best.
    pub fn run<S: SolutionSink + ?Sized>(&mut self, sink: &S, stop: &AtomicBool) -> RefineStats {
        let mut tour = sink.snapshot();
        if tour.is_infeasible() {
            debug!("refinement started without a tour, nothing to do");
            return self.stats;
        }

        let mut best_seen = tour.cost;
        let mut stale = 0usize;
        while !stop.load(Ordering::Relaxed) {
            self.pass(&mut tour, sink);

            if tour.cost < best_seen {
                best_seen = tour.cost;
                stale = 0;
            } else {
                stale += 1;
            }

            if self.reseed_after > 0 && stale >= self.reseed_after {
                let shared = sink.snapshot();
                if !shared.is_infeasible() && shared.cost <= tour.cost {
                    tour = shared;
                    best_seen = tour.cost;
                }
                self.stats.reseeds += 1;
                stale = 0;
            }
        }

        info!(
            "refinement stopped after {} passes ({} improving, {} sideways, {} worsening moves)",
            self.stats.passes,
            self.stats.improving_moves,
            self.stats.sideways_moves,
            self.stats.worsening_moves
        );
        self.stats
    }
}
