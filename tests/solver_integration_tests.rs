//! Integration tests for the full search: constructive phase, refinement and deadline handling.

use flight_tour::config::Config;
use flight_tour::input::Instance;
use flight_tour::problem::{FlightRecord, Problem, ProblemBuilder, EVERY_DAY, MAX_FLIGHT_COST};
use flight_tour::search::SearchOutcome;
use flight_tour::utils::itinerary_to_string;
use flight_tour::validation::validate;
use flight_tour::TourSolver;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::{Duration, Instant};

const SAMPLE: &str = "\
3 ASD
Green
ASD
Red
SKT
Blue
MXT GDO
ASD MXT 1 50
ASD GDO 1 10
SKT ASD 0 30
MXT SKT 2 20
GDO SKT 2 90
";

/// Random instance with `areas` areas of `per_area` locations and a planted feasible tour.
fn create_random_instance(areas: usize, per_area: usize, seed: u64) -> (Problem, Vec<FlightRecord>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let name = |area: usize, k: usize| format!("L{}_{}", area, k);

    let mut builder = ProblemBuilder::new(name(0, 0));
    for area in 0..areas {
        builder.add_region(format!("A{}", area), (0..per_area).map(|k| name(area, k)));
    }
    let problem = builder.build().unwrap();

    let mut order: Vec<usize> = (1..areas).collect();
    order.shuffle(&mut rng);
    let mut stops = vec![name(0, 0)];
    stops.extend(order.iter().map(|&area| name(area, rng.gen_range(0..per_area))));
    stops.push(name(0, rng.gen_range(0..per_area)));

    let mut records = Vec::new();
    for (day, pair) in stops.windows(2).enumerate() {
        let cost = rng.gen_range(50..100);
        records.push(problem.resolve(&pair[0], &pair[1], day as u16 + 1, cost).unwrap());
    }

    let days = areas as u16;
    for _ in 0..areas * per_area * 6 {
        let from_area = rng.gen_range(1..areas);
        let mut to_area = rng.gen_range(1..areas);
        if to_area == from_area {
            to_area = 0;
        }
        let from = name(from_area, rng.gen_range(0..per_area));
        let to = name(to_area, rng.gen_range(0..per_area));
        let day = if rng.gen_bool(0.1) {
            EVERY_DAY
        } else {
            rng.gen_range(1..=days)
        };
        records.push(problem.resolve(&from, &to, day, rng.gen_range(1..200)).unwrap());
    }
    for _ in 0..areas {
        let to = name(rng.gen_range(1..areas), rng.gen_range(0..per_area));
        records.push(problem.resolve(&name(0, 0), &to, 1, rng.gen_range(1..200)).unwrap());
    }

    (problem, records)
}

fn quick_config() -> Config {
    Config::new()
        .with_time_limit(Duration::from_secs(2))
        .with_safety_margin(Duration::ZERO)
        .with_seed(42)
}

#[test]
fn test_sample_instance_end_to_end() {
    let instance = Instance::from_reader(SAMPLE.as_bytes()).unwrap();
    let solver = TourSolver::new(instance.problem, &instance.records, quick_config());

    let report = solver.run();

    assert!(report.exhausted);
    assert_eq!(report.search, SearchOutcome::Exhausted);
    assert!(report.elapsed < Duration::from_secs(2));
    let tour = report.tour.unwrap();
    assert_eq!(tour.cost, 100);
    assert_eq!(
        itinerary_to_string(&tour, &solver.problem),
        "100\nASD MXT 1 50\nMXT SKT 2 20\nSKT ASD 3 30\n"
    );
}

#[test]
fn test_expansion_statistics_are_reported() {
    let instance = Instance::from_reader(SAMPLE.as_bytes()).unwrap();
    let solver = TourSolver::new(instance.problem, &instance.records, quick_config());

    assert_eq!(solver.expansion.records, 5);
    assert_eq!(solver.network.flight_count(), 5);
}

#[test]
fn test_no_itinerary() {
    let input = "3 ASD\nGreen\nASD\nRed\nSKT\nBlue\nMXT GDO\nASD MXT 1 50\nMXT SKT 2 20\n";
    let instance = Instance::from_reader(input.as_bytes()).unwrap();
    let solver = TourSolver::new(instance.problem, &instance.records, quick_config());

    let report = solver.run();

    assert!(report.tour.is_none());
    assert!(report.exhausted);
}

#[test]
fn test_single_area_instance() {
    let input = "1 ASD\nGreen\nASD TMP\nASD TMP 0 7\nASD ASD 1 9\n";
    let instance = Instance::from_reader(input.as_bytes()).unwrap();
    let solver = TourSolver::new(instance.problem, &instance.records, quick_config());

    let report = solver.run();

    assert_eq!(report.search, SearchOutcome::Optimal);
    assert_eq!(report.tour.unwrap().cost, 7);
}

#[test]
fn test_largest_flight_costs() {
    let input = "\
3 ASD
Green
ASD
Red
SKT
Blue
MXT GDO
ASD MXT 1 4294967295
ASD GDO 1 4294967295
MXT SKT 0 4294967295
GDO SKT 2 4294967294
SKT ASD 3 4294967295
";
    let instance = Instance::from_reader(input.as_bytes()).unwrap();
    let solver = TourSolver::new(instance.problem, &instance.records, quick_config());

    let report = solver.run();

    assert!(report.exhausted);
    let tour = report.tour.unwrap();
    assert_eq!(tour.cost, 3 * MAX_FLIGHT_COST - 1);
    assert!(!tour.is_infeasible());
    assert_eq!(tour.describe(&solver.problem), "ASD -> GDO -> SKT -> ASD");
}

#[test]
fn test_refinement_finds_cheaper_area_member() {
    // The cheapest first flight leads into an expensive second day; the
    // first tour found (135) is improved to 60 by visiting GDO instead of MXT.
    let input = "\
3 ASD
Green
ASD
Red
SKT
Blue
MXT GDO
ASD MXT 1 5
ASD GDO 1 10
MXT SKT 2 100
GDO SKT 2 20
SKT ASD 3 30
";
    let instance = Instance::from_reader(input.as_bytes()).unwrap();
    let config = quick_config()
        .with_time_limit(Duration::from_millis(300))
        .with_exhaustive_location_limit(0);
    let solver = TourSolver::new(instance.problem, &instance.records, config);

    let report = solver.run();

    assert_eq!(report.search, SearchOutcome::FirstFound);
    assert!(!report.exhausted);
    let tour = report.tour.unwrap();
    assert_eq!(tour.cost, 60);
    assert_eq!(tour.describe(&solver.problem), "ASD -> GDO -> SKT -> ASD");
}

#[test]
fn test_anytime_never_beats_exhaustive_optimum() {
    let (problem, records) = create_random_instance(6, 1, 7);

    let exhaustive = TourSolver::new(problem.clone(), &records, quick_config());
    let optimum = exhaustive.run();
    assert!(optimum.exhausted);
    let optimum = optimum.tour.unwrap();

    let config = quick_config()
        .with_time_limit(Duration::from_millis(300))
        .with_exhaustive_location_limit(0)
        .with_workers(2);
    let anytime = TourSolver::new(problem, &records, config);
    let report = anytime.run();

    let tour = report.tour.unwrap();
    assert!(validate(&anytime.problem, &tour).is_ok());
    assert!(tour.cost >= optimum.cost);
}

#[test]
fn test_large_instance_respects_deadline() {
    let (problem, records) = create_random_instance(40, 3, 11);
    let config = Config::new().with_workers(2).with_seed(5);
    let solver = TourSolver::new(problem, &records, config);

    let started = Instant::now();
    let report = solver.run_until(started + Duration::from_millis(200));

    assert!(started.elapsed() < Duration::from_secs(2));
    if let Some(tour) = report.tour {
        assert!(validate(&solver.problem, &tour).is_ok());
        assert_eq!(tour.len(), 40);
    }
}

#[test]
fn test_refinement_keeps_tours_valid() {
    let (problem, records) = create_random_instance(12, 3, 3);
    let config = quick_config()
        .with_time_limit(Duration::from_millis(400))
        .with_workers(3)
        .with_validate_proposals(true);
    let solver = TourSolver::new(problem, &records, config);

    let report = solver.run();

    // The planted tour guarantees that an itinerary exists.
    let tour = report.tour.unwrap();
    assert!(validate(&solver.problem, &tour).is_ok());
    assert_eq!(tour.cost, tour.recompute_cost());
}
