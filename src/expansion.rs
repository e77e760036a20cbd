//! Turns raw flight records into concrete per-day flights.
//!
//! Records with day 0 are available every day and are expanded into one
//! flight per day before any filtering. Every concrete flight then has to pass
//! the load-time rules:
//!
//! * a flight leaving the home location is only usable on day 1,
//! * day 1 only admits flights leaving the home location,
//! * a flight landing in the goal area is only usable on the last day.
//!
//! Flights that can never be part of an itinerary are dropped here so the
//! network index stays small.

use crate::problem::{Day, Flight, FlightRecord, Problem, EVERY_DAY};
use log::debug;

/// Counters describing what the expansion kept and dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpansionStats {
    pub records: usize,
    pub kept: usize,
    pub dropped_home_departure: usize,
    pub dropped_first_day: usize,
    pub dropped_early_return: usize,
    pub dropped_out_of_range: usize,
    pub dropped_same_region: usize,
}

impl ExpansionStats {
    pub fn dropped(&self) -> usize {
        self.dropped_home_departure
            + self.dropped_first_day
            + self.dropped_early_return
            + self.dropped_out_of_range
            + self.dropped_same_region
    }
}

enum Verdict {
    Keep,
    HomeDeparture,
    FirstDay,
    EarlyReturn,
    SameRegion,
}

fn admit(problem: &Problem, flight: &Flight) -> Verdict {
    let last_day = problem.last_day();
    let from_home = flight.from == problem.home;

    if from_home && flight.day != 1 {
        return Verdict::HomeDeparture;
    }
    if flight.day == 1 && !from_home {
        return Verdict::FirstDay;
    }
    if flight.to_region == problem.goal_region() && flight.day != last_day {
        return Verdict::EarlyReturn;
    }
    if last_day > 1 && flight.from_region == flight.to_region {
        return Verdict::SameRegion;
    }
    Verdict::Keep
}

fn days_of(record: &FlightRecord, last_day: Day) -> std::ops::RangeInclusive<Day> {
    if record.day == EVERY_DAY {
        1..=last_day
    } else {
        record.day..=record.day
    }
}

/// Expand and filter `records`, preserving their order.
pub fn expand(problem: &Problem, records: &[FlightRecord]) -> (Vec<Flight>, ExpansionStats) {
    let last_day = problem.last_day();
    let mut stats = ExpansionStats {
        records: records.len(),
        ..ExpansionStats::default()
    };
    let mut flights = Vec::with_capacity(records.len());

    for record in records {
        if record.day > last_day {
            stats.dropped_out_of_range += 1;
            continue;
        }
        for day in days_of(record, last_day) {
            let flight = problem.flight(record, day);
            match admit(problem, &flight) {
                Verdict::Keep => {
                    flights.push(flight);
                    stats.kept += 1;
                }
                Verdict::HomeDeparture => stats.dropped_home_departure += 1,
                Verdict::FirstDay => stats.dropped_first_day += 1,
                Verdict::EarlyReturn => stats.dropped_early_return += 1,
                Verdict::SameRegion => stats.dropped_same_region += 1,
            }
        }
    }

    debug!(
        "expanded {} records into {} flights ({} dropped)",
        stats.records,
        stats.kept,
        stats.dropped()
    );
    (flights, stats)
}
