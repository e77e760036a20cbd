//! Itinerary representations: complete tours and the partial path used by the search.

use crate::problem::{Cost, Flight, Location, Problem, Region};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A day-by-day sequence of flights together with its total cost.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tour {
    pub flights: Vec<Flight>,
    pub cost: Cost,
}

impl Tour {
    /// Cost of the sentinel tour held before any itinerary is known.
    pub const INFEASIBLE: Cost = Cost::MAX;

    /// The "no itinerary found yet" placeholder.
    pub fn infeasible() -> Self {
        Tour {
            flights: Vec::new(),
            cost: Self::INFEASIBLE,
        }
    }

    /// Build a tour from flights, sorting them by day and summing their cost.
    pub fn from_flights(mut flights: Vec<Flight>) -> Self {
        flights.sort_by_key(|f| f.day);
        let cost = flights.iter().map(|f| f.cost).sum();
        Tour { flights, cost }
    }

    pub fn is_infeasible(&self) -> bool {
        self.cost == Self::INFEASIBLE
    }

    pub fn len(&self) -> usize {
        self.flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    /// Sum of the flight prices, independent of the recorded `cost`.
    pub fn recompute_cost(&self) -> Cost {
        self.flights.iter().map(|f| f.cost).sum()
    }

    /// Location occupied at `position`: position 0 is the start, position `len()` the end.
    pub fn location_at(&self, position: usize) -> Location {
        if position < self.flights.len() {
            self.flights[position].from
        } else {
            self.flights[position - 1].to
        }
    }

    /// Order flights by day in place.
    pub fn canonicalize(&mut self) {
        self.flights.sort_by_key(|f| f.day);
    }

    /// Human readable route using location names.
    pub fn describe(&self, problem: &Problem) -> String {
        if self.flights.is_empty() {
            return String::from("<empty>");
        }
        (0..=self.flights.len())
            .map(|position| problem.location_name(self.location_at(position)))
            .join(" -> ")
    }
}

impl fmt::Debug for Tour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Tour:")?;
        if self.is_infeasible() {
            writeln!(f, "  Cost: infeasible")?;
        } else {
            writeln!(f, "  Cost: {}", self.cost)?;
        }
        for flight in &self.flights {
            writeln!(f, "  {}", flight)?;
        }
        Ok(())
    }
}

/// Mutable partial itinerary extended one day at a time by the constructive search.
///
/// `fly` and `backtrack` are both O(1). An area is marked visited when it is
/// departed from, so the home area counts as visited from the first flight on.
#[derive(Debug, Clone)]
pub struct TourState {
    flights: Vec<Flight>,
    visited: Vec<bool>,
    cost: Cost,
    length: usize,
}

impl TourState {
    pub fn new(problem: &Problem) -> Self {
        TourState {
            flights: Vec::with_capacity(problem.length()),
            visited: vec![false; problem.regions.len()],
            cost: 0,
            length: problem.length(),
        }
    }

    pub fn fly(&mut self, flight: &Flight) {
        self.visited[flight.from_region as usize] = true;
        self.flights.push(*flight);
        self.cost += flight.cost;
    }

    pub fn backtrack(&mut self) {
        if let Some(flight) = self.flights.pop() {
            self.visited[flight.from_region as usize] = false;
            self.cost -= flight.cost;
        }
    }

    pub fn cost(&self) -> Cost {
        self.cost
    }

    pub fn depth(&self) -> usize {
        self.flights.len()
    }

    pub fn last_flight(&self) -> Option<&Flight> {
        self.flights.last()
    }

    pub fn has_visited(&self, region: Region) -> bool {
        self.visited[region as usize]
    }

    /// All days used, every area departed from once and the last flight lands in the start area.
    pub fn is_roundtrip(&self) -> bool {
        let (Some(first), Some(last)) = (self.flights.first(), self.flights.last()) else {
            return false;
        };
        self.flights.len() == self.length
            && self.visited.iter().all(|&v| v)
            && last.to_region == first.from_region
    }

    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    /// Copy the current path out as a complete tour.
    pub fn to_tour(&self) -> Tour {
        Tour {
            flights: self.flights.clone(),
            cost: self.cost,
        }
    }
}
