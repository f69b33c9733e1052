//! RNG module - substitutable random sources
//!
//! The engine draws every random decision (spawn cell, spawn value, shuffle
//! order) from a [`RandomSource`] handed to the session at construction.
//!
//! - [`SimpleRng`]: seedable LCG, reproducible across runs (tests, replays)
//! - [`RandRng`]: adapter over any `rand::Rng` (entropy-seeded play)

use rand::Rng;

/// A uniform `[0, 1)` generator.
pub trait RandomSource {
    /// Next value in `[0, 1)`
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `[0, len)`. `len` must be non-zero.
    fn next_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        let idx = (self.next_f64() * len as f64) as usize;
        idx.min(len - 1)
    }
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }
}

impl RandomSource for SimpleRng {
    fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / (u32::MAX as f64 + 1.0)
    }
}

/// Wraps any `rand` generator as a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RandRng<R>(pub R);

impl<R: Rng> RandomSource for RandRng<R> {
    fn next_f64(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}

/// A source replaying a fixed sequence, cycling when exhausted.
///
/// Lets tests pin spawn positions and values exactly.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    values: Vec<f64>,
    next: usize,
}

impl ScriptedRng {
    pub fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "scripted rng needs at least one value");
        Self { values, next: 0 }
    }
}

impl RandomSource for ScriptedRng {
    fn next_f64(&mut self) -> f64 {
        let v = self.values[self.next % self.values.len()];
        self.next += 1;
        v.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

/// Shuffle a slice using Fisher-Yates
pub fn shuffle<T, R: RandomSource + ?Sized>(rng: &mut R, slice: &mut [T]) {
    for i in (1..slice.len()).rev() {
        let j = rng.next_index(i + 1);
        slice.swap(i, j);
    }
}
