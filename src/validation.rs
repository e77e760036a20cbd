//! Independent feasibility check for complete itineraries.
//!
//! Used by the driver once per run and by tests; the search phases never call
//! it on their hot paths.

use crate::problem::{Cost, Day, Location, Problem, Region};
use crate::tour::Tour;
use itertools::Itertools;
use thiserror::Error;

/// First invariant a tour was found to break.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TourViolation {
    #[error("tour has {actual} flights, expected {expected}")]
    WrongLength { expected: usize, actual: usize },

    #[error("tour starts at location {0} instead of home")]
    NotFromHome(Location),

    #[error("flight at position {position} is scheduled on day {day}")]
    DayMismatch { position: usize, day: Day },

    #[error("flight at position {position} does not depart where the previous one landed")]
    Disconnected { position: usize },

    #[error("flight at position {position} carries wrong area identifiers")]
    RegionMismatch { position: usize },

    #[error("area {region} is entered twice (position {position})")]
    RegionRevisited { region: Region, position: usize },

    #[error("tour ends in area {0}, not in the start area")]
    NotClosed(Region),

    #[error("recorded cost {recorded} differs from flight sum {actual}")]
    CostMismatch { recorded: Cost, actual: Cost },
}

/// Check day contiguity, connectivity, area coverage, closure and cost.
pub fn validate(problem: &Problem, tour: &Tour) -> Result<(), TourViolation> {
    let expected = problem.length();
    if tour.flights.len() != expected {
        return Err(TourViolation::WrongLength {
            expected,
            actual: tour.flights.len(),
        });
    }

    let first = &tour.flights[0];
    if first.from != problem.home {
        return Err(TourViolation::NotFromHome(first.from));
    }

    let mut entered = vec![false; problem.regions.len()];
    for (position, flight) in tour.flights.iter().enumerate() {
        if flight.day as usize != position + 1 {
            return Err(TourViolation::DayMismatch {
                position,
                day: flight.day,
            });
        }
        if flight.from_region != problem.region_of(flight.from)
            || flight.to_region != problem.region_of(flight.to)
        {
            return Err(TourViolation::RegionMismatch { position });
        }
        let seen = &mut entered[flight.to_region as usize];
        if *seen {
            return Err(TourViolation::RegionRevisited {
                region: flight.to_region,
                position,
            });
        }
        *seen = true;
    }

    if let Some(position) = tour
        .flights
        .iter()
        .tuple_windows()
        .position(|(a, b)| a.to != b.from)
    {
        return Err(TourViolation::Disconnected {
            position: position + 1,
        });
    }

    let last = &tour.flights[expected - 1];
    if last.to_region != first.from_region {
        return Err(TourViolation::NotClosed(last.to_region));
    }

    let actual = tour.recompute_cost();
    if actual != tour.cost {
        return Err(TourViolation::CostMismatch {
            recorded: tour.cost,
            actual,
        });
    }

    Ok(())
}
