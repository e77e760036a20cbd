//! Tests for configuration defaults, builders and JSON loading.

use flight_tour::config::Config;
use flight_tour::error::Error;
use flight_tour::local_search::acceptance::AcceptancePolicy;
use std::time::Duration;

#[test]
fn test_default_time_budget_by_size() {
    let config = Config::new();

    assert_eq!(config.time_budget(3), Duration::from_millis(2_955));
    assert_eq!(config.time_budget(20), Duration::from_millis(2_955));
    assert_eq!(config.time_budget(21), Duration::from_millis(4_955));
    assert_eq!(config.time_budget(100), Duration::from_millis(4_955));
    assert_eq!(config.time_budget(101), Duration::from_millis(14_955));
}

#[test]
fn test_explicit_time_limit() {
    let config = Config::new()
        .with_time_limit(Duration::from_millis(500))
        .with_safety_margin(Duration::from_millis(100));
    assert_eq!(config.time_budget(300), Duration::from_millis(400));

    let tiny = Config::new().with_time_limit(Duration::from_millis(10));
    assert_eq!(tiny.time_budget(3), Duration::ZERO);
}

#[test]
fn test_builders_clamp_counts() {
    let config = Config::new()
        .with_workers(0)
        .with_max_evaluations_per_pass(0);
    assert_eq!(config.workers, 1);
    assert_eq!(config.max_evaluations_per_pass, 1);
}

#[test]
fn test_json_keeps_missing_defaults() {
    let config: Config = serde_json::from_str(
        r#"{
            "workers": 4,
            "seed": 9,
            "acceptance": { "kind": "annealing", "initial_temperature": 50.0, "cooling_rate": 0.99 }
        }"#,
    )
    .unwrap();

    assert_eq!(config.workers, 4);
    assert_eq!(config.seed, Some(9));
    assert_eq!(
        config.acceptance,
        AcceptancePolicy::Annealing {
            initial_temperature: 50.0,
            cooling_rate: 0.99
        }
    );
    assert_eq!(config.exhaustive_location_limit, 10);
    assert_eq!(config.safety_margin, Duration::from_millis(45));
    assert!(config.time_limit.is_none());
}

#[test]
fn test_missing_config_file() {
    let err = Config::from_file("/nonexistent/config.json").unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
