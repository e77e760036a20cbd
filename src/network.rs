//! Day-indexed flight network used by both search phases.

use crate::problem::{Cost, Day, Flight, Location, Problem, Region};
use log::debug;

const NO_FLIGHT: u32 = u32::MAX;

/// Read-only lookup structures over the concrete flights of one problem.
///
/// * `(location, day)` → departing flights, cheapest first
/// * `(area, day)` → departing flights, cheapest first
/// * `(from, day, to)` → cheapest flight for that exact triple
pub struct Network {
    flights: Vec<Flight>,
    day_slots: usize,
    location_count: usize,
    by_location: Vec<Vec<u32>>,
    by_region: Vec<Vec<u32>>,
    best: Vec<Option<Box<[u32]>>>,
    day_min: Vec<Option<Cost>>,
    suffix_bound: Vec<Option<Cost>>,
}

impl Network {
    /// Index the already expanded and filtered `flights`.
    pub fn build(problem: &Problem, flights: Vec<Flight>) -> Self {
        let day_slots = problem.length() + 1;
        let location_count = problem.location_count();
        let region_count = problem.regions.len();

        let mut by_location = vec![Vec::new(); location_count * day_slots];
        let mut by_region = vec![Vec::new(); region_count * day_slots];
        let mut best: Vec<Option<Box<[u32]>>> = vec![None; location_count * day_slots];
        let mut day_min: Vec<Option<Cost>> = vec![None; day_slots];

        for (id, flight) in flights.iter().enumerate() {
            let id = id as u32;
            let day = flight.day as usize;
            by_location[flight.from as usize * day_slots + day].push(id);
            by_region[flight.from_region as usize * day_slots + day].push(id);

            let row = best[flight.from as usize * day_slots + day]
                .get_or_insert_with(|| vec![NO_FLIGHT; location_count].into_boxed_slice());
            let slot = &mut row[flight.to as usize];
            // Ties keep the first flight seen.
            if *slot == NO_FLIGHT || flights[*slot as usize].cost > flight.cost {
                *slot = id;
            }

            let min = &mut day_min[day];
            *min = Some(min.map_or(flight.cost, |m| m.min(flight.cost)));
        }

        // Stable sort keeps load order among equal costs.
        for list in by_location.iter_mut().chain(by_region.iter_mut()) {
            list.sort_by_key(|&id| flights[id as usize].cost);
        }

        let mut suffix_bound = vec![Some(0); day_slots + 1];
        for day in (1..day_slots).rev() {
            suffix_bound[day] = match (day_min[day], suffix_bound[day + 1]) {
                (Some(min), Some(rest)) => Some(min.saturating_add(rest)),
                _ => None,
            };
        }

        debug!(
            "indexed {} flights over {} locations and {} days",
            flights.len(),
            location_count,
            day_slots - 1
        );

        Network {
            flights,
            day_slots,
            location_count,
            by_location,
            by_region,
            best,
            day_min,
            suffix_bound,
        }
    }

    pub fn flight_count(&self) -> usize {
        self.flights.len()
    }

    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    fn slot(&self, key: usize, day: Day) -> Option<usize> {
        let day = day as usize;
        (day < self.day_slots).then(|| key * self.day_slots + day)
    }

    fn resolve<'a>(&'a self, ids: Option<&'a Vec<u32>>) -> impl Iterator<Item = &'a Flight> + 'a {
        ids.into_iter()
            .flatten()
            .map(move |&id| &self.flights[id as usize])
    }

    /// Flights leaving `location` on `day`, cheapest first.
    pub fn edges_from(&self, location: Location, day: Day) -> impl Iterator<Item = &Flight> + '_ {
        let ids = self
            .slot(location as usize, day)
            .and_then(|slot| self.by_location.get(slot));
        self.resolve(ids)
    }

    /// Flights leaving any location of `region` on `day`, cheapest first.
    pub fn edges_from_region(&self, region: Region, day: Day) -> impl Iterator<Item = &Flight> + '_ {
        let ids = self
            .slot(region as usize, day)
            .and_then(|slot| self.by_region.get(slot));
        self.resolve(ids)
    }

    /// Cheapest flight from `from` to `to` on `day`, if any.
    pub fn best_edge(&self, from: Location, day: Day, to: Location) -> Option<&Flight> {
        if to as usize >= self.location_count {
            return None;
        }
        let slot = self.slot(from as usize, day)?;
        let row = self.best.get(slot)?.as_ref()?;
        match row[to as usize] {
            NO_FLIGHT => None,
            id => Some(&self.flights[id as usize]),
        }
    }

    /// Cheapest price of any flight on `day`.
    pub fn day_min_cost(&self, day: Day) -> Option<Cost> {
        self.day_min.get(day as usize).copied().flatten()
    }

    /// Sum of the cheapest price of every day from `day` through the last day.
    ///
    /// `None` when some remaining day has no flight at all.
    pub fn remaining_lower_bound(&self, day: Day) -> Option<Cost> {
        match self.suffix_bound.get(day as usize) {
            Some(bound) => *bound,
            None => Some(0),
        }
    }
}
