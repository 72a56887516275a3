//! Injectable randomness for feature selection

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::EnhanceError;

/// Source of random choices used by the enhancer
pub trait RandomSource {
    /// Pick `count` distinct indices in `0..len`, in sampling order.
    ///
    /// Fails with [`EnhanceError::SampleTooLarge`] when `count > len`.
    fn choose_indices(&mut self, len: usize, count: usize) -> Result<Vec<usize>, EnhanceError>;

    /// Pick `count` distinct items from `items`, in sampling order
    fn choose_without_replacement<T: Clone>(
        &mut self,
        items: &[T],
        count: usize,
    ) -> Result<Vec<T>, EnhanceError>
    where
        Self: Sized,
    {
        let indices = self.choose_indices(items.len(), count)?;
        Ok(indices.into_iter().map(|i| items[i].clone()).collect())
    }
}

impl<S: RandomSource + ?Sized> RandomSource for &mut S {
    fn choose_indices(&mut self, len: usize, count: usize) -> Result<Vec<usize>, EnhanceError> {
        (**self).choose_indices(len, count)
    }
}

/// [`RandomSource`] backed by a `rand` generator
#[derive(Debug, Clone)]
pub struct RngSource<R = StdRng> {
    rng: R,
}

impl RngSource<StdRng> {
    /// Non-deterministic source seeded from the operating system
    pub fn from_os() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible source for a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeded when `seed` is given, OS-seeded otherwise
    pub fn from_seed_opt(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_os(),
        }
    }
}

impl Default for RngSource<StdRng> {
    fn default() -> Self {
        Self::from_os()
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn choose_indices(&mut self, len: usize, count: usize) -> Result<Vec<usize>, EnhanceError> {
        if count > len {
            return Err(EnhanceError::SampleTooLarge {
                requested: count,
                available: len,
            });
        }
        Ok(rand::seq::index::sample(&mut self.rng, len, count).into_vec())
    }
}
