//! Deterministic Halton low-discrepancy sequence, implementing the `Rng`
//! capability without any external random-number dependency — determinism
//! is load-bearing for reproducible planning runs.

use flatprm_capability::Rng;
use flatprm_linalg::{Float, Vector};

/// A Halton sequence sampler. Each flat-state dimension is driven by the
/// van der Corput sequence in a distinct prime base (the first `flat_order *
/// flat_dimension` primes).
#[derive(Debug, Clone)]
pub struct HaltonRng {
    index: u64,
}

impl Default for HaltonRng {
    fn default() -> Self {
        Self::new()
    }
}

impl HaltonRng {
    /// Start the sequence at index 1 (index 0 would yield the degenerate
    /// all-zero sample in every base).
    #[must_use]
    pub const fn new() -> Self {
        Self { index: 1 }
    }

    fn van_der_corput(mut index: u64, base: u64) -> Float {
        let mut denominator = 1.0;
        let mut result = 0.0;
        while index > 0 {
            denominator *= base as Float;
            result += (index % base) as Float / denominator;
            index /= base;
        }
        result
    }

    fn is_prime(n: u64) -> bool {
        if n < 2 {
            return false;
        }
        let mut d = 2;
        while d * d <= n {
            if n % d == 0 {
                return false;
            }
            d += 1;
        }
        true
    }

    /// The `n`-th prime (1-indexed: `nth_prime(1) == 2`).
    fn nth_prime(n: usize) -> u64 {
        let mut found = 0;
        let mut candidate = 1;
        while found < n {
            candidate += 1;
            if Self::is_prime(candidate) {
                found += 1;
            }
        }
        candidate
    }
}

impl Rng for HaltonRng {
    fn next(&mut self, flatstate_dimension: usize) -> Vector<Float> {
        let index = self.index;
        self.index += 1;
        Vector::from_iter(
            (0..flatstate_dimension).map(|d| Self::van_der_corput(index, Self::nth_prime(d + 1))),
        )
    }
}
