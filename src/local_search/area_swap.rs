//! Area swap neighborhood: visit another location of the same area.
//!
//! ```text
//! position  0 ---- 1 ---- 2 ---- 3
//! before    A      B      C      A
//!             a->b   b->c   c->a
//! after     A      B'     C      A      (B' shares an area with B)
//!             a->b'  b'->c  c->a
//! ```
//!
//! At the final position only the incoming flight is replaced, which lets the
//! tour end in a different location of the start area.

use rand::Rng;

use super::{reconnect, LocalSearch, Move, Reconnection};
use crate::problem::Location;
use crate::tour::Tour;

impl LocalSearch<'_> {
    /// Evaluate visiting `location` at `position` instead of its current sibling.
    pub fn evaluate_area_swap(
        &self,
        tour: &Tour,
        position: usize,
        location: Location,
    ) -> Option<Reconnection> {
        let n = tour.len();
        if position == 0 || position > n {
            return None;
        }
        let current = tour.location_at(position);
        if location == current
            || location as usize >= self.problem.location_count()
            || self.problem.region_of(location) != self.problem.region_of(current)
        {
            return None;
        }

        let located = |p: usize| {
            if p == position {
                location
            } else {
                tour.location_at(p)
            }
        };
        if position < n {
            reconnect(self.network, tour, &[position - 1, position], located)
        } else {
            reconnect(self.network, tour, &[position - 1], located)
        }
    }

    /// Number of area swaps available on `tour`.
    pub fn area_swap_count(&self, tour: &Tour) -> usize {
        (1..=tour.len())
            .map(|p| self.problem.siblings(tour.location_at(p)).len() - 1)
            .sum()
    }

    /// Cheapest applicable area swap, scanning all candidates or a random sample of them.
    pub fn best_area_swap(&mut self, tour: &Tour) -> Option<(Move, Reconnection)> {
        let count = self.area_swap_count(tour);
        if count == 0 {
            return None;
        }

        let mut best: Option<(Move, Reconnection)> = None;
        let mut consider = |mv: Move, reconnection: Reconnection| {
            if best.map_or(true, |(_, b)| reconnection.cost < b.cost) {
                best = Some((mv, reconnection));
            }
        };

        if count <= self.max_evaluations {
            let problem = self.problem;
            for position in 1..=tour.len() {
                for &location in problem.siblings(tour.location_at(position)) {
                    if let Some(reconnection) = self.evaluate_area_swap(tour, position, location) {
                        consider(Move::AreaSwap { position, location }, reconnection);
                    }
                }
            }
        } else {
            for _ in 0..self.max_evaluations {
                if let Some(mv @ Move::AreaSwap { position, location }) =
                    self.random_area_swap(tour)
                {
                    if let Some(reconnection) = self.evaluate_area_swap(tour, position, location) {
                        consider(mv, reconnection);
                    }
                }
            }
        }

        best
    }

    /// A uniformly drawn area swap at a random position, if that position's area
    /// has more than one location.
    pub fn random_area_swap(&mut self, tour: &Tour) -> Option<Move> {
        let n = tour.len();
        if n == 0 {
            return None;
        }
        let position = self.rng.gen_range(1..=n);
        let current = tour.location_at(position);
        let siblings = self.problem.siblings(current);
        if siblings.len() < 2 {
            return None;
        }

        let pick = self.rng.gen_range(0..siblings.len() - 1);
        let location = siblings
            .iter()
            .copied()
            .filter(|&l| l != current)
            .nth(pick)?;
        Some(Move::AreaSwap { position, location })
    }
}
