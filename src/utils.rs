//! Output helpers: itinerary formatting and duration display.

use std::io::{self, Write};
use std::time::Duration;

use crate::problem::Problem;
use crate::tour::Tour;

/// Format a duration as seconds with millisecond precision, or minutes and seconds past a minute.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    if total_seconds < 60 {
        return format!("{}.{:03}s", total_seconds, duration.subsec_millis());
    }
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;

    format!("{}m {:02}s", minutes, seconds)
}

/// Write the itinerary: total cost on the first line, then `FROM TO DAY COST` per day.
pub fn write_itinerary<W: Write>(out: &mut W, tour: &Tour, problem: &Problem) -> io::Result<()> {
    writeln!(out, "{}", tour.cost)?;
    for flight in &tour.flights {
        writeln!(
            out,
            "{} {} {} {}",
            problem.location_name(flight.from),
            problem.location_name(flight.to),
            flight.day,
            flight.cost
        )?;
    }
    Ok(())
}

/// Itinerary rendered into a string, see [`write_itinerary`].
pub fn itinerary_to_string(tour: &Tour, problem: &Problem) -> String {
    let mut buffer = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_itinerary(&mut buffer, tour, problem);
    String::from_utf8_lossy(&buffer).into_owned()
}
