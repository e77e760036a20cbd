//! Benchmarks for index construction, the constructive search and refinement passes.

#[cfg(feature = "bench")]
extern crate criterion;

#[cfg(feature = "bench")]
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use flight_tour::config::Config;
use flight_tour::expansion::expand;
use flight_tour::local_search::LocalSearch;
use flight_tour::network::Network;
use flight_tour::problem::{Day, FlightRecord, Problem, ProblemBuilder};
use flight_tour::register::BestRecorder;
use flight_tour::search::BranchAndBound;
use flight_tour::tour::Tour;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Create a benchmark instance with `areas` areas of two locations and dense flights.
///
/// The first `areas` records form a feasible itinerary visiting the areas in order.
fn create_benchmark_instance(areas: usize) -> (Problem, Vec<FlightRecord>) {
    let mut rng = ChaCha8Rng::seed_from_u64(areas as u64);
    let name = |area: usize, k: usize| format!("L{}_{}", area, k);

    let mut builder = ProblemBuilder::new(name(0, 0));
    for area in 0..areas {
        builder.add_region(format!("A{}", area), [name(area, 0), name(area, 1)]);
    }
    let problem = builder.build().expect("benchmark instance must be well formed");

    let mut records = Vec::new();
    let mut push = |from: String, to: String, day: Day, cost: u64| {
        if let Ok(record) = problem.resolve(&from, &to, day, cost) {
            records.push(record);
        }
    };
    for day in 1..=areas {
        let from = if day == 1 { name(0, 0) } else { name(day - 1, 0) };
        push(from, name(day % areas, 0), day as Day, rng.gen_range(200..500));
    }
    for to_area in 1..areas {
        push(name(0, 0), name(to_area, rng.gen_range(0..2)), 1, rng.gen_range(10..500));
    }
    for from_area in 1..areas {
        for to_area in 0..areas {
            if to_area == from_area {
                continue;
            }
            for k in 0..2 {
                // Every-day records for a third of the pairs.
                let day = if rng.gen_ratio(1, 3) {
                    0
                } else {
                    rng.gen_range(2..=areas as Day)
                };
                push(name(from_area, k), name(to_area, rng.gen_range(0..2)), day, rng.gen_range(10..500));
            }
        }
    }

    (problem, records)
}

fn build_network(problem: &Problem, records: &[FlightRecord]) -> Network {
    let (flights, _) = expand(problem, records);
    Network::build(problem, flights)
}

#[cfg(feature = "bench")]
fn benchmark_network_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("network_build");

    for areas in [10, 50, 150].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(areas), areas, |b, &areas| {
            let (problem, records) = create_benchmark_instance(areas);
            b.iter(|| build_network(&problem, &records));
        });
    }

    group.finish();
}

#[cfg(feature = "bench")]
fn benchmark_constructive(c: &mut Criterion) {
    let mut group = c.benchmark_group("constructive");

    for areas in [6, 8].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(areas), areas, |b, &areas| {
            let (problem, records) = create_benchmark_instance(areas);
            let network = build_network(&problem, &records);

            b.iter(|| {
                let recorder = BestRecorder::new();
                BranchAndBound::new(&problem, &network).solve(&recorder);
                recorder.into_best()
            });
        });
    }

    group.finish();
}

#[cfg(feature = "bench")]
fn benchmark_refinement_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("refinement_pass");

    for areas in [20, 50, 100].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(areas), areas, |b, &areas| {
            let (problem, records) = create_benchmark_instance(areas);
            let network = build_network(&problem, &records);

            let start = Tour::from_flights(
                records[..areas]
                    .iter()
                    .map(|record| problem.flight(record, record.day))
                    .collect(),
            );
            let recorder = BestRecorder::new();

            let config = Config::new().with_seed(1);
            let mut local_search = LocalSearch::new(&problem, &network, &config, 1);
            b.iter(|| {
                let mut tour = start.clone();
                local_search.pass(&mut tour, &recorder);
                tour
            });
        });
    }

    group.finish();
}

#[cfg(feature = "bench")]
criterion_group!(
    benches,
    benchmark_network_build,
    benchmark_constructive,
    benchmark_refinement_pass
);

#[cfg(feature = "bench")]
criterion_main!(benches);
