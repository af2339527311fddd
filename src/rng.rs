//! Randomness used by selection tools and turn resolution.
//!
//! Everything random goes through [`RandomSource`] so callers can swap the
//! entropy-backed source for a seeded or scripted one.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

pub const DAMAGE_ROLL_MIN: f64 = 0.85;
pub const DAMAGE_ROLL_MAX: f64 = 1.0;

pub trait RandomSource {
    /// Uniform index in `0..len`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize;

    /// Uniform percentage in `0.0..100.0`, used for accuracy checks.
    fn percent(&mut self) -> f64;

    /// Uniform damage multiplier in `0.85..=1.0`.
    fn damage_roll(&mut self) -> f64;

    /// True with probability `percent`/100.
    fn chance(&mut self, percent: u32) -> bool {
        self.percent() < percent as f64
    }
}

pub struct SmallRngSource {
    rng: SmallRng,
}

impl SmallRngSource {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl RandomSource for SmallRngSource {
    fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    fn percent(&mut self) -> f64 {
        self.rng.gen_range(0.0..100.0)
    }

    fn damage_roll(&mut self) -> f64 {
        self.rng.gen_range(DAMAGE_ROLL_MIN..=DAMAGE_ROLL_MAX)
    }
}

/// Replays queued draws in order. Once a queue runs dry it falls back to
/// index 0, a percentage of 0 (every accuracy check hits) and a roll of 1.0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    indices: VecDeque<usize>,
    percents: VecDeque<f64>,
    rolls: VecDeque<f64>,
}

impl ScriptedRandom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indices(mut self, values: &[usize]) -> Self {
        self.indices.extend(values.iter().copied());
        self
    }

    pub fn with_percents(mut self, values: &[f64]) -> Self {
        self.percents.extend(values.iter().copied());
        self
    }

    pub fn with_rolls(mut self, values: &[f64]) -> Self {
        self.rolls.extend(values.iter().copied());
        self
    }
}

impl RandomSource for ScriptedRandom {
    fn index(&mut self, len: usize) -> usize {
        self.indices.pop_front().unwrap_or(0).min(len.saturating_sub(1))
    }

    fn percent(&mut self) -> f64 {
        self.percents.pop_front().unwrap_or(0.0)
    }

    fn damage_roll(&mut self) -> f64 {
        self.rolls
            .pop_front()
            .unwrap_or(DAMAGE_ROLL_MAX)
            .clamp(DAMAGE_ROLL_MIN, DAMAGE_ROLL_MAX)
    }
}
