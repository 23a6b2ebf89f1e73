//! Injectable randomness.
//!
//! Everything stochastic in the workspace draws through
//! [`RandomSource`], so a run can be replayed exactly by
//! seeding the source, or scripted outright in tests.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of the three kinds of random draws
/// used by network initialization and evolution.
pub trait RandomSource {
    /// Returns a uniformly distributed value in `[0, 1)`.
    fn uniform(&mut self) -> f64;

    /// Returns a uniformly distributed integer in
    /// `[low, high]` (both ends inclusive).
    ///
    /// Callers must ensure `low <= high`.
    fn uniform_int(&mut self, low: u64, high: u64) -> u64;

    /// Returns a *triangular* value in `(-1, 1)`, peaking at 0.
    /// Computed as the difference of two uniform draws.
    fn clamped(&mut self) -> f64 {
        self.uniform() - self.uniform()
    }

    /// Returns `true` with probability `chance`.
    fn chance(&mut self, chance: f64) -> bool {
        self.uniform() < chance
    }
}

impl<S: RandomSource + ?Sized> RandomSource for &mut S {
    fn uniform(&mut self) -> f64 {
        (**self).uniform()
    }

    fn uniform_int(&mut self, low: u64, high: u64) -> u64 {
        (**self).uniform_int(low, high)
    }

    fn clamped(&mut self) -> f64 {
        (**self).clamped()
    }

    fn chance(&mut self, chance: f64) -> bool {
        (**self).chance(chance)
    }
}

/// Simple wrapper for any `T: Rng`,
/// adapting it to [`RandomSource`].
///
/// # Examples
/// ```
/// use sweepnet_nn::random::{RandomSource, RngSource};
///
/// let mut a = RngSource::seeded(7);
/// let mut b = RngSource::seeded(7);
/// assert_eq!(a.uniform(), b.uniform());
///
/// let triangular = a.clamped();
/// assert!(triangular > -1.0 && triangular < 1.0);
/// ```
#[derive(Clone, Debug)]
pub struct RngSource<T: Rng>(T);

impl<T: Rng> RngSource<T> {
    pub fn new(rng: T) -> RngSource<T> {
        RngSource(rng)
    }

    /// Returns the wrapped generator.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl RngSource<StdRng> {
    /// A deterministic source; equal seeds give equal sequences.
    pub fn seeded(seed: u64) -> RngSource<StdRng> {
        RngSource(StdRng::seed_from_u64(seed))
    }

    /// A source seeded from operating system entropy.
    pub fn from_entropy() -> RngSource<StdRng> {
        RngSource(StdRng::from_entropy())
    }
}

impl<T: Rng> RandomSource for RngSource<T> {
    fn uniform(&mut self) -> f64 {
        self.0.gen::<f64>()
    }

    fn uniform_int(&mut self, low: u64, high: u64) -> u64 {
        self.0.gen_range(low..=high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn uniform_int_is_inclusive() {
        let mut source = RngSource::new(ChaCha8Rng::seed_from_u64(42));
        let draws: Vec<u64> = (0..500).map(|_| source.uniform_int(1, 3)).collect();
        assert!(draws.iter().all(|d| (1..=3).contains(d)));
        assert!(draws.contains(&1));
        assert!(draws.contains(&3));
    }

    #[test]
    fn uniform_int_degenerate_range() {
        let mut source = RngSource::new(ChaCha8Rng::seed_from_u64(1));
        assert_eq!(source.uniform_int(5, 5), 5);
    }

    #[test]
    fn clamped_is_triangular() {
        let mut source = RngSource::new(ChaCha8Rng::seed_from_u64(3));
        let draws: Vec<f64> = (0..10_000).map(|_| source.clamped()).collect();
        assert!(draws.iter().all(|d| d.abs() < 1.0));
        // Triangular mass within ±0.5 is 0.75, uniform would be 0.5.
        let central = draws.iter().filter(|d| d.abs() < 0.5).count() as f64 / draws.len() as f64;
        assert!((central - 0.75).abs() < 0.03, "central mass {}", central);
    }

    #[test]
    fn borrowed_source_advances_owner() {
        let mut owner = RngSource::seeded(9);
        let mut reference = RngSource::seeded(9);
        {
            let mut borrowed = &mut owner;
            borrowed.uniform();
        }
        reference.uniform();
        assert_eq!(owner.uniform(), reference.uniform());
    }

    #[test]
    fn chance_extremes() {
        let mut source = RngSource::seeded(11);
        assert!((0..100).all(|_| !source.chance(0.0)));
        assert!((0..100).all(|_| source.chance(1.0)));
    }
}
