//! Path swap neighborhood: exchange the locations visited on two days.
//!
//! ```text
//! position  0 ---- 1 ---- 2 ---- 3 ---- 4
//! before    A      B      C      D      A
//!             a->b   b->c   c->d   d->a
//! after     A      D      C      B      A
//!             a->d   d->c   c->b   b->a
//! ```
//!
//! Swapping positions `i < j` replaces the flights at indices `i - 1`, `i`,
//! `j - 1` and `j` (three flights when `j == i + 1`). The multiset of visited
//! areas is unchanged, so the move never breaks area coverage.

use itertools::Itertools;
use rand::Rng;

use super::{reconnect, LocalSearch, Move, Reconnection};
use crate::tour::Tour;

impl LocalSearch<'_> {
    /// Evaluate swapping the locations at positions `i` and `j`.
    ///
    /// Valid positions are `1..len()`; the start and the final arrival stay fixed.
    pub fn evaluate_path_swap(&self, tour: &Tour, i: usize, j: usize) -> Option<Reconnection> {
        let n = tour.len();
        if i == 0 || i >= j || j >= n {
            return None;
        }

        let at_i = tour.location_at(i);
        let at_j = tour.location_at(j);
        let location = |p: usize| {
            if p == i {
                at_j
            } else if p == j {
                at_i
            } else {
                tour.location_at(p)
            }
        };

        if j == i + 1 {
            reconnect(self.network, tour, &[i - 1, i, j], location)
        } else {
            reconnect(self.network, tour, &[i - 1, i, j - 1, j], location)
        }
    }

    /// Number of path swaps available on a tour of `n` flights.
    pub fn path_swap_count(n: usize) -> usize {
        if n < 3 {
            0
        } else {
            (n - 1) * (n - 2) / 2
        }
    }

    /// Cheapest applicable path swap, scanning all pairs or a random sample of them.
    pub fn best_path_swap(&mut self, tour: &Tour) -> Option<(Move, Reconnection)> {
        let n = tour.len();
        let count = Self::path_swap_count(n);
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
            for (i, j) in (1..n).tuple_combinations() {
                if let Some(reconnection) = self.evaluate_path_swap(tour, i, j) {
                    consider(Move::PathSwap { i, j }, reconnection);
                }
            }
        } else {
            for _ in 0..self.max_evaluations {
                if let Some(mv @ Move::PathSwap { i, j }) = self.random_path_swap(tour) {
                    if let Some(reconnection) = self.evaluate_path_swap(tour, i, j) {
                        consider(mv, reconnection);
                    }
                }
            }
        }

        best
    }

    /// A uniformly drawn path swap, applicable or not.
    pub fn random_path_swap(&mut self, tour: &Tour) -> Option<Move> {
        let n = tour.len();
        if n < 3 {
            return None;
        }
        let i = self.rng.gen_range(1..n);
        let mut j = self.rng.gen_range(1..n - 1);
        if j >= i {
            j += 1;
        }
        let (i, j) = if i < j { (i, j) } else { (j, i) };
        Some(Move::PathSwap { i, j })
    }
}
