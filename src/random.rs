//! Random number sources for mock chart data.
//!
//! Chart series are synthetic and intentionally non-deterministic in
//! production. The composer takes any [`RandomSource`] so tests can swap in a
//! fixed sequence.

use rand::Rng;

#[cfg(test)]
#[path = "random_test.rs"]
mod tests;

/// Source of uniformly distributed integers.
pub trait RandomSource {
    /// Return an integer in the inclusive range `[min, max]`.
    fn uniform_int(&mut self, min: u32, max: u32) -> u32;
}

/// Thread-local RNG from `rand`. Stateless, so it is `Send` and can be
/// created inside request handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn uniform_int(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        rand::rng().random_range(min..=max)
    }
}

/// Adapter for any seeded or custom `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl<R: Rng> RandomSource for RngSource<R> {
    fn uniform_int(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        self.0.random_range(min..=max)
    }
}

/// Replays a fixed sequence of values, wrapping around. Values are clamped
/// into the requested range.
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<u32>,
    cursor: usize,
}

impl SequenceRandom {
    #[must_use]
    pub fn new(values: Vec<u32>) -> Self {
        Self { values, cursor: 0 }
    }
}

impl RandomSource for SequenceRandom {
    fn uniform_int(&mut self, min: u32, max: u32) -> u32 {
        if self.values.is_empty() {
            return min;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value.clamp(min, max.max(min))
    }
}
