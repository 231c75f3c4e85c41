//! Random number sources.
//!
//! Every session owns its own source, injected at construction. Sessions
//! stay independent of each other and a seeded run replays exactly.

use std::collections::VecDeque;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::error::{SimError, SimResult};

/// A source of uniformly distributed integers.
pub trait RandomSource: Send {
    /// Draw an integer in `min..=max`.
    ///
    /// Fails with [`SimError::InvalidRange`] if `min > max`.
    fn next(&mut self, min: u64, max: u64) -> SimResult<u64>;
}

/// A [`RandomSource`] backed by the standard RNG.
#[derive(Debug)]
pub struct StdSource {
    rng: StdRng,
}

impl StdSource {
    /// Create a source seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a source with a fixed seed, for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for StdSource {
    fn next(&mut self, min: u64, max: u64) -> SimResult<u64> {
        if min > max {
            return Err(SimError::InvalidRange { min, max });
        }
        Ok(self.rng.gen_range(min..=max))
    }
}

/// A [`RandomSource`] that replays a fixed sequence of values.
///
/// Values are returned verbatim (after the range check), so tests control
/// arrival and service timings exactly. Once only one value remains it is
/// repeated forever; an empty script yields `min`.
#[derive(Debug, Default)]
pub struct ScriptSource {
    values: VecDeque<u64>,
}

impl ScriptSource {
    /// Create a source that yields `values` in order.
    pub fn new(values: impl IntoIterator<Item = u64>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }
}

impl RandomSource for ScriptSource {
    fn next(&mut self, min: u64, max: u64) -> SimResult<u64> {
        if min > max {
            return Err(SimError::InvalidRange { min, max });
        }
        let value = if self.values.len() > 1 {
            self.values.pop_front().unwrap_or(min)
        } else {
            self.values.front().copied().unwrap_or(min)
        };
        Ok(value)
    }
}
