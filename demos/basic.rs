//! Basic example of using the flight_tour library.

use flight_tour::config::Config;
use flight_tour::input::Instance;
use flight_tour::problem::{ProblemBuilder, EVERY_DAY};
use flight_tour::utils::{format_duration, write_itinerary};
use flight_tour::TourSolver;
use std::env;
use std::io;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Load the instance given on the command line, or build a small one inline.
    let args: Vec<String> = env::args().collect();
    let instance = if args.len() > 1 {
        println!("Loading instance from: {}", args[1]);
        Instance::from_file(&args[1])?
    } else {
        let problem = ProblemBuilder::new("ASD")
            .region("Green", ["ASD"])
            .region("Red", ["SKT"])
            .region("Blue", ["MXT", "GDO"])
            .build()?;
        let records = vec![
            problem.resolve("ASD", "MXT", 1, 50)?,
            problem.resolve("ASD", "GDO", 1, 10)?,
            problem.resolve("SKT", "ASD", EVERY_DAY, 30)?,
            problem.resolve("MXT", "SKT", 2, 20)?,
            problem.resolve("GDO", "SKT", 2, 90)?,
        ];
        Instance { problem, records }
    };
    println!(
        "Loaded {} areas, {} locations, {} flight records",
        instance.problem.length(),
        instance.problem.location_count(),
        instance.records.len()
    );

    let config = Config::new()
        .with_time_limit(Duration::from_secs(3))
        .with_workers(2);
    let solver = TourSolver::new(instance.problem, &instance.records, config);
    println!(
        "Indexed {} flights ({} dropped during expansion)",
        solver.network.flight_count(),
        solver.expansion.dropped()
    );

    let report = solver.run();
    println!(
        "Search finished in {} ({:?}, exhausted: {})",
        format_duration(report.elapsed),
        report.search,
        report.exhausted
    );

    match report.tour {
        Some(tour) => {
            println!("Route: {}", tour.describe(&solver.problem));
            write_itinerary(&mut io::stdout().lock(), &tour, &solver.problem)?;
        }
        None => println!("No itinerary exists"),
    }

    Ok(())
}
