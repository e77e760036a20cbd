//! Best-known itinerary shared between the search phases.

use crate::problem::{Cost, Problem};
use crate::tour::Tour;
use crate::validation::validate;
use crossbeam::channel::{at, bounded, select, Receiver, Sender};
use log::{error, info};
use parking_lot::Mutex;
use std::cell::{Cell, RefCell};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Consumer of complete itineraries produced by the search phases.
pub trait SolutionSink {
    /// Offer a tour. Returns the best cost known after the offer.
    fn propose(&self, tour: &Tour) -> Cost;

    /// The constructive search covered the whole search space.
    fn notify_exhausted(&self);

    /// Independent copy of the best tour, or [`Tour::infeasible`] if none is known.
    fn snapshot(&self) -> Tour;
}

/// Why [`SolutionRegister::wait_until`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Exhausted,
    Deadline,
}

/// Thread-safe register holding the cheapest tour seen so far.
///
/// The best cost is mirrored in an atomic so that losing proposals return
/// without touching the lock. The lock itself only guards the
/// compare-and-replace of the (cost, tour) pair.
pub struct SolutionRegister<'p> {
    problem: &'p Problem,
    best: Mutex<Tour>,
    best_cost: AtomicU64,
    exhausted_tx: Sender<()>,
    exhausted_rx: Receiver<()>,
    validate_proposals: bool,
}

impl<'p> SolutionRegister<'p> {
    pub fn new(problem: &'p Problem) -> Self {
        let (exhausted_tx, exhausted_rx) = bounded(1);
        SolutionRegister {
            problem,
            best: Mutex::new(Tour::infeasible()),
            best_cost: AtomicU64::new(Tour::INFEASIBLE),
            exhausted_tx,
            exhausted_rx,
            validate_proposals: false,
        }
    }

    /// Validate every proposal before accepting it. Off by default.
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate_proposals = enabled;
        self
    }

    pub fn validates_proposals(&self) -> bool {
        self.validate_proposals
    }

    /// Best cost without taking the lock.
    pub fn peek(&self) -> Cost {
        self.best_cost.load(Ordering::Acquire)
    }

    /// Block until the search reports exhaustion or `deadline` passes.
    pub fn wait_until(&self, deadline: Instant) -> WaitOutcome {
        let timeout = at(deadline);
        select! {
            recv(self.exhausted_rx) -> _ => WaitOutcome::Exhausted,
            recv(timeout) -> _ => WaitOutcome::Deadline,
        }
    }
}

impl SolutionSink for SolutionRegister<'_> {
    fn propose(&self, tour: &Tour) -> Cost {
        let current = self.peek();
        if tour.cost >= current {
            return current;
        }

        let mut candidate = tour.clone();
        candidate.canonicalize();
        if self.validate_proposals {
            if let Err(violation) = validate(self.problem, &candidate) {
                error!("rejected corrupted tour: {}", violation);
                return self.peek();
            }
        }

        let mut best = self.best.lock();
        if candidate.cost >= best.cost {
            return best.cost;
        }

        info!("new best tour: {} (was {})", candidate.cost, display_cost(best.cost));
        self.best_cost.store(candidate.cost, Ordering::Release);
        *best = candidate;
        best.cost
    }

    fn notify_exhausted(&self) {
        // One-shot: a second notification finds the slot occupied and is dropped.
        let _ = self.exhausted_tx.try_send(());
    }

    fn snapshot(&self) -> Tour {
        self.best.lock().clone()
    }
}

fn display_cost(cost: Cost) -> String {
    if cost == Tour::INFEASIBLE {
        String::from("none")
    } else {
        cost.to_string()
    }
}

/// Single-threaded sink that keeps the cheapest tour it was offered.
#[derive(Debug)]
pub struct BestRecorder {
    best: RefCell<Tour>,
    proposals: Cell<usize>,
    exhausted: Cell<bool>,
}

impl BestRecorder {
    pub fn new() -> Self {
        BestRecorder {
            best: RefCell::new(Tour::infeasible()),
            proposals: Cell::new(0),
            exhausted: Cell::new(false),
        }
    }

    pub fn proposals(&self) -> usize {
        self.proposals.get()
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted.get()
    }

    pub fn into_best(self) -> Tour {
        self.best.into_inner()
    }
}

impl Default for BestRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl SolutionSink for BestRecorder {
    fn propose(&self, tour: &Tour) -> Cost {
        self.proposals.set(self.proposals.get() + 1);
        let mut best = self.best.borrow_mut();
        if tour.cost < best.cost {
            *best = tour.clone();
            best.canonicalize();
        }
        best.cost
    }

    fn notify_exhausted(&self) {
        self.exhausted.set(true);
    }

    fn snapshot(&self) -> Tour {
        self.best.borrow().clone()
    }
}
