//! RNG module - injectable randomness for the engines
//!
//! Every engine that needs randomness (mine placement, piece selection, food
//! placement, deck shuffling) takes a `&mut impl RandomSource`, so tests can
//! pass a seeded generator and get identical games back.
//!
//! Two sources ship with the crate:
//! - [`SimpleRng`]: a tiny LCG, fully deterministic, used by tests and benches
//! - [`SystemRng`]: `rand`'s `SmallRng`, seeded from OS entropy or a `u64`

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

/// A source of uniformly distributed random numbers.
pub trait RandomSource {
    /// Next raw 32-bit value
    fn next_u32(&mut self) -> u32;

    /// Uniform float in `[0, 1)`
    fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / (u32::MAX as f64 + 1.0)
    }

    /// Uniform integer in `[0, max)`; returns 0 when `max` is 0
    fn next_below(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        ((self.next_f64() * max as f64) as usize).min(max - 1)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }
}

/// Shuffle a slice in place using Fisher-Yates
///
/// For `i` from `len-1` down to 1, swaps `i` with a uniform `j` in `[0, i]`.
pub fn shuffle<T, R: RandomSource + ?Sized>(rng: &mut R, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.next_below(i + 1);
        items.swap(i, j);
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

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        shuffle(self, slice);
    }
}

impl RandomSource for SimpleRng {
    fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Process-level random source backed by `rand`'s `SmallRng`.
#[derive(Debug, Clone)]
pub struct SystemRng {
    inner: SmallRng,
}

impl SystemRng {
    /// Seed from operating system entropy
    pub fn from_entropy() -> Self {
        Self {
            inner: SmallRng::from_os_rng(),
        }
    }

    /// Seed deterministically
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    /// `seed == 0` means "use entropy"
    pub fn from_seed_or_entropy(seed: u64) -> Self {
        if seed == 0 {
            Self::from_entropy()
        } else {
            Self::seeded(seed)
        }
    }
}

impl RandomSource for SystemRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }
}
