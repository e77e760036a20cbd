//! Acceptance rules for non-improving refinement moves.

use crate::problem::Cost;
use rand::Rng;
use serde::{Deserialize, Serialize};

const MIN_TEMPERATURE: f64 = 1e-9;

/// Decides whether a sampled move that does not improve the tour is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AcceptancePolicy {
    /// Only strictly cheaper tours.
    Improving,
    /// Cheaper or equal-cost tours (sideways moves).
    NonWorsening,
    /// Simulated annealing: a worse tour is accepted with probability
    /// `exp(-delta / temperature)`; the temperature is multiplied by
    /// `cooling_rate` after every pass.
    Annealing {
        initial_temperature: f64,
        cooling_rate: f64,
    },
}

impl Default for AcceptancePolicy {
    fn default() -> Self {
        AcceptancePolicy::NonWorsening
    }
}

/// Stateful evaluator of an [`AcceptancePolicy`].
#[derive(Debug, Clone)]
pub struct Acceptor {
    policy: AcceptancePolicy,
    temperature: f64,
}

impl Acceptor {
    pub fn new(policy: AcceptancePolicy) -> Self {
        let temperature = match policy {
            AcceptancePolicy::Annealing {
                initial_temperature,
                ..
            } => initial_temperature.max(MIN_TEMPERATURE),
            _ => 0.0,
        };
        Acceptor {
            policy,
            temperature,
        }
    }

    pub fn policy(&self) -> AcceptancePolicy {
        self.policy
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn accept<R: Rng + ?Sized>(&self, current: Cost, candidate: Cost, rng: &mut R) -> bool {
        match self.policy {
            AcceptancePolicy::Improving => candidate < current,
            AcceptancePolicy::NonWorsening => candidate <= current,
            AcceptancePolicy::Annealing { .. } => {
                if candidate <= current {
                    return true;
                }
                let delta = (candidate - current) as f64;
                rng.gen::<f64>() < (-delta / self.temperature).exp()
            }
        }
    }

    /// Lower the temperature after a pass. No-op for the greedy policies.
    pub fn cool(&mut self) {
        if let AcceptancePolicy::Annealing { cooling_rate, .. } = self.policy {
            self.temperature = (self.temperature * cooling_rate).max(MIN_TEMPERATURE);
        }
    }
}
