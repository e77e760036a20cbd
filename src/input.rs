//! Reader for the plain-text instance format.
//!
//! ```text
//! 3 ASD           <area count> <home location>
//! Green           area name
//! ASD             its locations, space separated
//! Red
//! SKT
//! Blue
//! MXT GDO
//! ASD MXT 1 50    <from> <to> <day, 0 = every day> <cost>
//! ...
//! ```

use crate::error::{Error, Result};
use crate::problem::{Cost, Day, FlightRecord, Problem, ProblemBuilder};
use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;
use std::str::FromStr;

/// A parsed instance: the problem context and its resolved flight records.
#[derive(Debug, Clone)]
pub struct Instance {
    pub problem: Problem,
    pub records: Vec<FlightRecord>,
}

impl Instance {
    /// Load an instance from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(io::BufReader::new(file))
    }

    /// Load an instance from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = reader
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line))
            .filter(|(_, line)| line.as_ref().map_or(true, |l| !l.trim().is_empty()));

        let mut next_line = |what: &str| -> Result<(usize, String)> {
            match lines.next() {
                Some((number, line)) => Ok((number, line?)),
                None => Err(Error::Parse {
                    line: 0,
                    message: format!("unexpected end of input, expected {}", what),
                }),
            }
        };

        let (number, header) = next_line("header")?;
        let mut parts = header.split_whitespace();
        let count: usize = field(parts.next(), number, "area count")?;
        let home = parts.next().ok_or_else(|| Error::Parse {
            line: number,
            message: String::from("missing home location"),
        })?;

        let mut builder = ProblemBuilder::new(home);
        for _ in 0..count {
            let (_, name) = next_line("area name")?;
            let (_, members) = next_line("area locations")?;
            builder.add_region(name.trim(), members.split_whitespace());
        }
        let problem = builder.build()?;

        let mut records = Vec::new();
        for (number, line) in lines {
            let line = line?;
            let mut parts = line.split_whitespace();
            let (Some(from), Some(to)) = (parts.next(), parts.next()) else {
                return Err(Error::Parse {
                    line: number,
                    message: String::from("expected `FROM TO DAY COST`"),
                });
            };
            let day: Day = field(parts.next(), number, "day")?;
            // Prices are 32-bit.
            let cost: u32 = field(parts.next(), number, "cost")?;
            records.push(problem.resolve(from, to, day, Cost::from(cost))?);
        }

        Ok(Instance { problem, records })
    }
}

fn field<T: FromStr>(token: Option<&str>, line: usize, what: &str) -> Result<T> {
    let token = token.ok_or_else(|| Error::Parse {
        line,
        message: format!("missing {}", what),
    })?;
    token.parse().map_err(|_| Error::Parse {
        line,
        message: format!("invalid {} `{}`", what, token),
    })
}
