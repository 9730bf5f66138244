// src/rng.rs

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{SystemTime, UNIX_EPOCH};

/// Generator used for weight initialization.
///
/// `Some(seed)` gives a reproducible stream; `None` seeds from the system
/// clock, so two runs started at different times draw different weights.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    let seed = seed.unwrap_or_else(time_seed);
    log::debug!("Initializing random generator with seed {}", seed);
    StdRng::seed_from_u64(seed)
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
