//! Random sources for outcome draws.
//!
//! Fairness here means statistically uniform and re-seedable, nothing more.

use std::ops::RangeInclusive;

use crate::api::error::WheelError;

/// Supplies the random numbers a spin needs.
pub trait RandomSource {
    /// Uniform integer in `[0, upper)`. Fails if `upper == 0` or the source is
    /// unusable.
    fn pick(&mut self, upper: usize) -> Result<usize, WheelError>;

    /// Uniform integer in `range`.
    fn pick_in(&mut self, range: RangeInclusive<u32>) -> Result<u32, WheelError> {
        let (lo, hi) = (*range.start(), *range.end());
        if lo > hi {
            return Err(WheelError::InvalidTurnRange { min: lo, max: hi });
        }
        let offset = self.pick((hi - lo) as usize + 1)?;
        Ok(lo + offset as u32)
    }
}

/// Default source: a `fastrand` generator, seeded from entropy unless told
/// otherwise.
#[derive(Debug, Clone)]
pub struct FastRng {
    rng: fastrand::Rng,
}

impl FastRng {
    pub fn new() -> Self {
        Self { rng: fastrand::Rng::new() }
    }

    /// Deterministic generator for reproducible simulations.
    pub fn with_seed(seed: u64) -> Self {
        Self { rng: fastrand::Rng::with_seed(seed) }
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng.seed(seed);
    }

    /// The underlying generator, for non-outcome picks such as palette colors.
    pub fn inner_mut(&mut self) -> &mut fastrand::Rng {
        &mut self.rng
    }
}

impl Default for FastRng {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for FastRng {
    fn pick(&mut self, upper: usize) -> Result<usize, WheelError> {
        if upper == 0 {
            return Err(WheelError::RandomSource("cannot pick from an empty range".into()));
        }
        Ok(self.rng.usize(..upper))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_is_deterministic() {
        let mut a = FastRng::with_seed(42);
        let mut b = FastRng::with_seed(42);
        for _ in 0..10 {
            assert_eq!(a.pick(1000).unwrap(), b.pick(1000).unwrap());
        }
    }

    #[test]
    fn reseed_restarts_sequence() {
        let mut rng = FastRng::with_seed(7);
        let first: Vec<usize> = (0..5).map(|_| rng.pick(100).unwrap()).collect();
        rng.reseed(7);
        let again: Vec<usize> = (0..5).map(|_| rng.pick(100).unwrap()).collect();
        assert_eq!(first, again);
    }

    #[test]
    fn empty_range_is_an_error() {
        let mut rng = FastRng::with_seed(1);
        assert!(matches!(rng.pick(0), Err(WheelError::RandomSource(_))));
    }

    #[test]
    fn pick_in_stays_in_range() {
        let mut rng = FastRng::with_seed(3);
        let mut seen = [false; 6];
        for _ in 0..1000 {
            let turns = rng.pick_in(5..=10).unwrap();
            assert!((5..=10).contains(&turns));
            seen[(turns - 5) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s), "every turn count should appear");
        assert_eq!(rng.pick_in(7..=7).unwrap(), 7);
    }
}
