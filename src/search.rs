//! Constructive depth-first branch-and-bound search.

use crate::network::Network;
use crate::problem::{Cost, Day, Location, Problem};
use crate::register::SolutionSink;
use crate::tour::{Tour, TourState};
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};

/// Nodes expanded between two looks at the stop flag.
const STOP_CHECK_INTERVAL: u64 = 1 << 10;

/// How a constructive search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Every branch was explored or pruned.
    Exhausted,
    /// A tour matching the network lower bound was found.
    Optimal,
    /// Stopped after the first accepted tour to hand over to refinement.
    FirstFound,
    /// The stop flag was raised.
    Cancelled,
}

impl SearchOutcome {
    /// Whether the best tour found is proven optimal (or none exists).
    pub fn is_complete(self) -> bool {
        matches!(self, SearchOutcome::Exhausted | SearchOutcome::Optimal)
    }
}

/// Extends a partial itinerary one day at a time, cheapest flights first,
/// pruning every branch that cannot beat the incumbent.
pub struct BranchAndBound<'a> {
    problem: &'a Problem,
    network: &'a Network,
    incumbent: Cost,
    lower_bound: Option<Cost>,
    stop_on_first: bool,
    stop: Option<&'a AtomicBool>,
    halted: Option<SearchOutcome>,
    nodes: u64,
}

impl<'a> BranchAndBound<'a> {
    pub fn new(problem: &'a Problem, network: &'a Network) -> Self {
        BranchAndBound {
            problem,
            network,
            incumbent: Tour::INFEASIBLE,
            lower_bound: network.remaining_lower_bound(1),
            stop_on_first: false,
            stop: None,
            halted: None,
            nodes: 0,
        }
    }

    /// Stop as soon as the first complete tour is accepted by the sink.
    pub fn stop_on_first(mut self, enabled: bool) -> Self {
        self.stop_on_first = enabled;
        self
    }

    /// Abort when `flag` becomes true.
    pub fn with_stop_flag(mut self, flag: &'a AtomicBool) -> Self {
        self.stop = Some(flag);
        self
    }

    /// Only look for tours strictly cheaper than `cost`.
    pub fn with_incumbent(mut self, cost: Cost) -> Self {
        self.incumbent = cost;
        self
    }

    pub fn incumbent(&self) -> Cost {
        self.incumbent
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Run the search from the home location, streaming every improving tour into `sink`.
    pub fn solve<S: SolutionSink + ?Sized>(&mut self, sink: &S) -> SearchOutcome {
        self.halted = None;
        self.nodes = 0;
        let mut state = TourState::new(self.problem);
        self.dfs(sink, &mut state, self.problem.home, 1);

        let outcome = self.halted.unwrap_or(SearchOutcome::Exhausted);
        info!(
            "constructive search finished: {:?} after {} nodes",
            outcome, self.nodes
        );
        if outcome.is_complete() {
            sink.notify_exhausted();
        }
        outcome
    }

    fn cancelled(&mut self) -> bool {
        if self.nodes % STOP_CHECK_INTERVAL == 0 {
            if let Some(flag) = self.stop {
                if flag.load(Ordering::Relaxed) {
                    self.halted = Some(SearchOutcome::Cancelled);
                }
            }
        }
        self.halted.is_some()
    }

    fn dfs<S: SolutionSink + ?Sized>(
        &mut self,
        sink: &S,
        state: &mut TourState,
        location: Location,
        day: Day,
    ) {
        if self.cancelled() {
            return;
        }
        self.nodes += 1;

        let Some(remaining) = self.network.remaining_lower_bound(day) else {
            return;
        };
        if self.incumbent <= state.cost().saturating_add(remaining) {
            return;
        }

        let last_day = self.problem.last_day();
        if day > last_day {
            if state.is_roundtrip() {
                self.complete(sink, state);
            }
            return;
        }

        let region = self.problem.region_of(location);
        if state.has_visited(region) {
            return;
        }

        let network = self.network;
        if day == last_day {
            // Only the area list is consulted for the final hop; the flight
            // still has to leave from where the previous one landed.
            for flight in network
                .edges_from_region(region, day)
                .filter(|f| f.from == location)
            {
                state.fly(flight);
                self.dfs(sink, state, flight.to, day + 1);
                state.backtrack();
                if self.halted.is_some() {
                    return;
                }
            }
        } else {
            for flight in network.edges_from(location, day) {
                state.fly(flight);
                self.dfs(sink, state, flight.to, day + 1);
                state.backtrack();
                if self.halted.is_some() {
                    return;
                }
            }
        }
    }

    fn complete<S: SolutionSink + ?Sized>(&mut self, sink: &S, state: &TourState) {
        let cost = state.cost();
        self.incumbent = sink.propose(&state.to_tour());
        debug!("complete tour of cost {}, incumbent {}", cost, self.incumbent);

        if Some(self.incumbent) == self.lower_bound {
            self.halted = Some(SearchOutcome::Optimal);
        } else if self.stop_on_first && self.incumbent == cost {
            self.halted = Some(SearchOutcome::FirstFound);
        }
    }
}
