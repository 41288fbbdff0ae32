//! Reproducible permutations for assessment generation and fixtures.
//!
//! The generator is a linear congruential sequence so the same seed yields the same order on
//! every platform; no external entropy is consumed.

const MULTIPLIER: u64 = 9_301;
const INCREMENT: u64 = 49_297;
const MODULUS: u64 = 233_280;

/// Linear congruential source of fractions in `[0, 1)`.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    state: u64,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        // The recurrence only depends on the state modulo MODULUS.
        Self {
            state: seed % MODULUS,
        }
    }

    pub fn next_fraction(&mut self) -> f64 {
        self.state = (self.state * MULTIPLIER + INCREMENT) % MODULUS;
        self.state as f64 / MODULUS as f64
    }
}

/// Fisher-Yates permutation driven by [`SeededRandom`].
///
/// Walks from the last index down to 1, swapping each slot with `floor(fraction * (i + 1))`.
pub fn shuffle<T>(mut items: Vec<T>, seed: u64) -> Vec<T> {
    let mut random = SeededRandom::new(seed);
    for i in (1..items.len()).rev() {
        let j = (random.next_fraction() * (i + 1) as f64).floor() as usize;
        items.swap(i, j.min(i));
    }
    items
}
