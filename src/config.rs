//! Configuration parameters for the itinerary search.

use crate::error::Result;
use crate::local_search::acceptance::AcceptancePolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration settings for the solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fixed time budget; when absent it is derived from the instance size
    pub time_limit: Option<Duration>,
    /// Reserved before the budget runs out for output and teardown
    pub safety_margin: Duration,
    /// Instances with at most this many locations are searched exhaustively
    pub exhaustive_location_limit: usize,
    /// Number of concurrent refinement workers
    pub workers: usize,
    /// Base seed for the refinement workers; drawn from entropy when absent
    pub seed: Option<u64>,
    /// Rule deciding whether a non-improving move is applied
    pub acceptance: AcceptancePolicy,
    /// Upper bound on moves evaluated by one best-improvement scan
    pub max_evaluations_per_pass: usize,
    /// Passes without improvement before a worker restarts from the shared best (0 disables)
    pub reseed_after: usize,
    /// Validate every proposed tour, also in release builds
    pub validate_proposals: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            time_limit: None,
            safety_margin: Duration::from_millis(45),
            exhaustive_location_limit: 10,
            workers: 1,
            seed: None,
            acceptance: AcceptancePolicy::NonWorsening,
            max_evaluations_per_pass: 100_000,
            reseed_after: 1_000,
            validate_proposals: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Config::default()
    }

    /// Read a configuration from a JSON file. Missing fields keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Set the time limit.
    pub fn with_time_limit(mut self, duration: Duration) -> Self {
        self.time_limit = Some(duration);
        self
    }

    /// Set the safety margin.
    pub fn with_safety_margin(mut self, margin: Duration) -> Self {
        self.safety_margin = margin;
        self
    }

    /// Set the location count up to which the search runs exhaustively.
    pub fn with_exhaustive_location_limit(mut self, limit: usize) -> Self {
        self.exhaustive_location_limit = limit;
        self
    }

    /// Set the number of refinement workers.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the acceptance policy.
    pub fn with_acceptance(mut self, acceptance: AcceptancePolicy) -> Self {
        self.acceptance = acceptance;
        self
    }

    /// Set the evaluation bound of one scan.
    pub fn with_max_evaluations_per_pass(mut self, evaluations: usize) -> Self {
        self.max_evaluations_per_pass = evaluations.max(1);
        self
    }

    /// Set the number of stale passes before reseeding.
    pub fn with_reseed_after(mut self, passes: usize) -> Self {
        self.reseed_after = passes;
        self
    }

    /// Enable validation of every proposal.
    pub fn with_validate_proposals(mut self, enabled: bool) -> Self {
        self.validate_proposals = enabled;
        self
    }

    /// Wall-clock budget for an instance with `length` days, margin already deducted.
    ///
    /// Small instances exhaust quickly; larger ones need the time for refinement.
    pub fn time_budget(&self, length: usize) -> Duration {
        let limit = self.time_limit.unwrap_or_else(|| match length {
            0..=20 => Duration::from_secs(3),
            21..=100 => Duration::from_secs(5),
            _ => Duration::from_secs(15),
        });
        limit.saturating_sub(self.safety_margin)
    }
}
