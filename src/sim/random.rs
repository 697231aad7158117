//! Randomness for play outcomes
//!
//! The resolver never calls a global RNG; it draws from a `RandomSource`
//! handed in by the caller so a seed (or a scripted sequence) replays a play
//! exactly.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Uniform draws in `[0, 1)`
pub trait RandomSource {
    fn next_unit(&mut self) -> f32;

    /// Uniform index in `0..len` (`len` must be non-zero)
    fn pick(&mut self, len: usize) -> usize {
        ((self.next_unit() * len as f32) as usize).min(len.saturating_sub(1))
    }
}

/// Seeded PCG generator used by the game
#[derive(Debug, Clone)]
pub struct SimRng(Pcg32);

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self(Pcg32::seed_from_u64(seed))
    }
}

impl RandomSource for SimRng {
    fn next_unit(&mut self) -> f32 {
        self.0.random::<f32>()
    }
}

/// Replays a fixed list of draws, repeating the last one when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    draws: Vec<f32>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(draws: impl Into<Vec<f32>>) -> Self {
        Self {
            draws: draws.into(),
            cursor: 0,
        }
    }

    /// How many draws have been taken
    pub fn taken(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f32 {
        let value = self
            .draws
            .get(self.cursor)
            .or(self.draws.last())
            .copied()
            .unwrap_or(0.0);
        self.cursor += 1;
        value
    }
}

/// Chance a defender in range picks off the pass
pub fn interception_chance(base: f32, jitter: f32, draw: f32) -> f32 {
    (base + draw * jitter).clamp(0.0, 1.0)
}
