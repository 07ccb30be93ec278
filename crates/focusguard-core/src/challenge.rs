//! Challenge wheel.
//!
//! The random-outcome selector behind the "accept challenge" branch of the
//! intervention. The wheel picks uniformly among its challenges; what the
//! surrounding system does with the result (the "touch grass" outcome
//! chains into an external capture and notification flow) is opaque here.

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

/// Default challenge list, in wheel order.
pub const DEFAULT_CHALLENGES: [&str; 3] = ["touch grass", "shower", "exercise"];

/// Seedable uniform selector over a fixed challenge list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeWheel {
    challenges: Vec<String>,
    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
}

impl Default for ChallengeWheel {
    fn default() -> Self {
        Self {
            challenges: DEFAULT_CHALLENGES.iter().map(|s| s.to_string()).collect(),
            seed: None,
        }
    }
}

impl ChallengeWheel {
    pub fn new(challenges: Vec<String>, seed: Option<u64>) -> Self {
        Self { challenges, seed }
    }

    /// Default challenges with a fixed seed.
    pub fn with_seed(seed: Option<u64>) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    pub fn challenges(&self) -> &[String] {
        &self.challenges
    }

    /// Spin the wheel. Panics never: an empty wheel falls back to the
    /// default list.
    pub fn spin(&self) -> String {
        let mut rng = match self.seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        if self.challenges.is_empty() {
            return DEFAULT_CHALLENGES
                .choose(&mut rng)
                .unwrap_or(&DEFAULT_CHALLENGES[0])
                .to_string();
        }
        self.challenges
            .choose(&mut rng)
            .cloned()
            .unwrap_or_else(|| DEFAULT_CHALLENGES[0].to_string())
    }
}
