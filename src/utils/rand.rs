pub use ::rand::Rng;
use ::rand::rngs::StdRng;
use ::rand::SeedableRng;

use crate::utils::env::{self, VarError};

static ENV_RNG_SEED: &str = "SEED";

/// Seed given by the `SEED` environment variable, if any.
pub fn env_seed() -> Result<Option<u64>, VarError> {
    env::var_opt(ENV_RNG_SEED)
}

/// A generator seeded from `SEED`, or from system entropy when the variable is absent or invalid.
pub fn seeded_rng() -> StdRng {
    match env_seed() {
        Ok(Some(seed)) => StdRng::seed_from_u64(seed),
        _ => StdRng::from_entropy(),
    }
}

pub fn rng_from_seed(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
