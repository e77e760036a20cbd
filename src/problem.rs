//! Problem definition: locations, areas and the flights connecting them.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Dense identifier of a single location (city).
pub type Location = u16;
/// Dense identifier of an area, a group of locations visited collectively.
pub type Region = u16;
/// Day index, 1-based. Day 0 only appears in raw records and means "every day".
pub type Day = u16;
/// Flight price and itinerary total. Single flights are bounded by
/// [`MAX_FLIGHT_COST`], so the total of any itinerary stays far below `u64::MAX`.
pub type Cost = u64;

/// Largest accepted price of a single flight.
pub const MAX_FLIGHT_COST: Cost = u32::MAX as Cost;

/// Day value of a raw record that is available on every day.
pub const EVERY_DAY: Day = 0;

/// A concrete flight, valid on exactly one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Flight {
    pub from: Location,
    pub to: Location,
    pub from_region: Region,
    pub to_region: Region,
    pub day: Day,
    pub cost: Cost,
}

impl fmt::Display for Flight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{[{}/{}]->[{}/{}]d{}:${}}}",
            self.from_region, self.from, self.to_region, self.to, self.day, self.cost
        )
    }
}

/// A tokenized, name-resolved input record. `day` may be [`EVERY_DAY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightRecord {
    pub from: Location,
    pub to: Location,
    pub day: Day,
    pub cost: Cost,
}

/// The loaded problem instance. Every search component receives it explicitly.
#[derive(Debug, Clone, Serialize)]
pub struct Problem {
    /// Location names, indexed by [`Location`].
    pub locations: Vec<String>,
    /// Area names, indexed by [`Region`].
    pub regions: Vec<String>,
    /// Area of every location.
    pub location_region: Vec<Region>,
    /// Locations of every area, in declaration order.
    pub region_locations: Vec<Vec<Location>>,
    /// Start location. Its area is the goal area.
    pub home: Location,
    #[serde(skip)]
    location_ids: HashMap<String, Location>,
}

impl Problem {
    /// Number of days of the itinerary, equal to the number of areas.
    pub fn length(&self) -> usize {
        self.regions.len()
    }

    /// Last day of the itinerary.
    pub fn last_day(&self) -> Day {
        self.regions.len() as Day
    }

    /// The area the itinerary must start and end in.
    pub fn goal_region(&self) -> Region {
        self.location_region[self.home as usize]
    }

    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    pub fn region_of(&self, location: Location) -> Region {
        self.location_region[location as usize]
    }

    /// Locations sharing an area with `location`, including itself.
    pub fn siblings(&self, location: Location) -> &[Location] {
        &self.region_locations[self.region_of(location) as usize]
    }

    pub fn location_id(&self, name: &str) -> Option<Location> {
        self.location_ids.get(name).copied()
    }

    pub fn location_name(&self, location: Location) -> &str {
        &self.locations[location as usize]
    }

    pub fn region_name(&self, region: Region) -> &str {
        &self.regions[region as usize]
    }

    /// Resolve a tokenized record against the declared locations.
    pub fn resolve(&self, from: &str, to: &str, day: Day, cost: Cost) -> Result<FlightRecord> {
        if cost > MAX_FLIGHT_COST {
            return Err(Error::CostTooLarge(cost));
        }
        let from = self
            .location_id(from)
            .ok_or_else(|| Error::UnknownLocation(from.to_string()))?;
        let to = self
            .location_id(to)
            .ok_or_else(|| Error::UnknownLocation(to.to_string()))?;
        Ok(FlightRecord { from, to, day, cost })
    }

    /// Build a concrete flight on `day` from a resolved record.
    pub fn flight(&self, record: &FlightRecord, day: Day) -> Flight {
        Flight {
            from: record.from,
            to: record.to,
            from_region: self.region_of(record.from),
            to_region: self.region_of(record.to),
            day,
            cost: record.cost,
        }
    }
}

/// Incrementally declares areas and their locations.
#[derive(Debug, Clone)]
pub struct ProblemBuilder {
    home: String,
    regions: Vec<(String, Vec<String>)>,
}

impl ProblemBuilder {
    /// Start a problem whose itinerary begins at the location named `home`.
    pub fn new(home: impl Into<String>) -> Self {
        ProblemBuilder {
            home: home.into(),
            regions: Vec::new(),
        }
    }

    /// Declare an area and its member locations.
    pub fn region<I, S>(mut self, name: impl Into<String>, locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_region(name, locations);
        self
    }

    pub fn add_region<I, S>(&mut self, name: impl Into<String>, locations: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions
            .push((name.into(), locations.into_iter().map(Into::into).collect()));
    }

    /// Assign dense ids and check that every location belongs to exactly one area.
    pub fn build(self) -> Result<Problem> {
        if self.regions.is_empty() {
            return Err(Error::NoRegions);
        }
        if self.regions.len() > Day::MAX as usize {
            return Err(Error::TooLarge("areas"));
        }

        // Home always receives id 0.
        let mut locations = vec![self.home.clone()];
        let mut location_ids = HashMap::from([(self.home.clone(), 0 as Location)]);
        let mut owner: Vec<Option<Region>> = vec![None];
        let mut regions = Vec::with_capacity(self.regions.len());
        let mut region_locations = Vec::with_capacity(self.regions.len());

        for (region_name, members) in self.regions {
            if regions.contains(&region_name) {
                return Err(Error::DuplicateRegion(region_name));
            }
            if members.is_empty() {
                return Err(Error::EmptyRegion(region_name));
            }
            let region = regions.len() as Region;
            let mut ids = Vec::with_capacity(members.len());

            for member in members {
                let id = match location_ids.get(&member) {
                    Some(&id) => id,
                    None => {
                        if locations.len() > Location::MAX as usize {
                            return Err(Error::TooLarge("locations"));
                        }
                        let id = locations.len() as Location;
                        locations.push(member.clone());
                        location_ids.insert(member.clone(), id);
                        owner.push(None);
                        id
                    }
                };
                if let Some(first) = owner[id as usize] {
                    return Err(Error::DuplicateLocation {
                        location: member,
                        first: regions[first as usize].clone(),
                        second: region_name,
                    });
                }
                owner[id as usize] = Some(region);
                ids.push(id);
            }

            regions.push(region_name);
            region_locations.push(ids);
        }

        let location_region = owner
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| Error::UnknownHome(self.home.clone()))?;

        Ok(Problem {
            locations,
            regions,
            location_region,
            region_locations,
            home: 0,
            location_ids,
        })
    }
}
