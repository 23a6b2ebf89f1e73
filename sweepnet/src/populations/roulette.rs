use super::SelectionPolicy;
use crate::Fitness;

use sweepnet_nn::random::RandomSource;

use log::trace;

/// A fitness-proportionate selection wheel.
///
/// Holds the running total of every genome's weight, so a
/// genome's slice is the gap between its entry and the one
/// before it. Spins only land within the policy's selectable
/// range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Roulette {
    wheel: Vec<u64>,
    last_selectable: usize,
}

impl Roulette {
    /// Builds the wheel for `sorted` fitness values.
    ///
    /// # Panics
    /// Panics if the policy's selectable range runs past
    /// the population, or if the range has no weight.
    ///
    /// # Examples
    /// ```
    /// use sweepnet::{GeneticConfig, Roulette, SelectionPolicy};
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig {
    ///     population_size: 6,
    ///     desired_elites: 1,
    ///     copies_per_elite: NonZeroUsize::new(2).unwrap(),
    ///     crossover_rate: 0.7,
    ///     mutation_rate: 0.1,
    ///     max_perturbation: 0.3,
    /// };
    /// let sorted = [5, 3, 1, 0, 0, 0];
    /// let policy = SelectionPolicy::derive(&sorted, &config);
    ///
    /// let roulette = Roulette::new(&sorted, &policy);
    /// assert_eq!(roulette.wheel(), &[5, 8, 9, 9, 9, 9]);
    /// assert_eq!(roulette.total(), 9);
    /// assert_eq!(roulette.locate(6), 1);
    /// ```
    pub fn new(sorted: &[Fitness], policy: &SelectionPolicy) -> Roulette {
        assert!(
            policy.last_selectable < sorted.len(),
            "selectable range 0..={} runs past a population of {}",
            policy.last_selectable,
            sorted.len()
        );
        let wheel: Vec<u64> = sorted
            .iter()
            .scan(0u64, |total, fitness| {
                *total += policy.weight.weigh(*fitness);
                Some(*total)
            })
            .collect();
        assert!(
            wheel[policy.last_selectable] > 0,
            "no weight in selectable range under {:?}",
            policy.weight
        );
        Roulette {
            wheel,
            last_selectable: policy.last_selectable,
        }
    }

    /// The cumulative weights over the whole population.
    pub fn wheel(&self) -> &[u64] {
        &self.wheel
    }

    /// Total weight of the selectable range.
    pub fn total(&self) -> u64 {
        self.wheel[self.last_selectable]
    }

    pub fn last_selectable(&self) -> usize {
        self.last_selectable
    }

    /// Returns the first selectable index whose cumulative
    /// weight reaches `marble`.
    ///
    /// Marbles above [`total`] land on the last selectable index.
    ///
    /// [`total`]: Roulette::total
    pub fn locate(&self, marble: u64) -> usize {
        self.wheel[..=self.last_selectable]
            .partition_point(|weight| *weight < marble)
            .min(self.last_selectable)
    }

    /// Draws a marble in `[1, total]` and returns
    /// the index it lands on.
    pub fn spin(&self, rng: &mut impl RandomSource) -> usize {
        let marble = rng.uniform_int(1, self.total());
        let index = self.locate(marble);
        trace!("marble {} of {} selects genome {}", marble, self.total(), index);
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::populations::{PolicyCase, WheelWeight};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use sweepnet_nn::random::RngSource;

    fn policy(last_selectable: usize, weight: WheelWeight) -> SelectionPolicy {
        SelectionPolicy {
            case: PolicyCase::SufficientElites,
            elites: 1,
            copies: 2,
            last_selectable,
            weight,
        }
    }

    #[test]
    fn lower_bound_lookup() {
        let roulette = Roulette::new(&[5, 3, 1, 0, 0, 0], &policy(2, WheelWeight::Fitness));
        let picks: Vec<usize> = (1..=9).map(|m| roulette.locate(m)).collect();
        assert_eq!(picks, [0, 0, 0, 0, 0, 1, 1, 1, 2]);
    }

    #[test]
    fn zero_weight_genomes_are_skipped() {
        let roulette = Roulette::new(&[4, 0, 2], &policy(2, WheelWeight::Fitness));
        assert_eq!(roulette.wheel(), &[4, 4, 6]);
        assert_eq!(roulette.locate(4), 0);
        assert_eq!(roulette.locate(5), 2);
    }

    #[test]
    fn boosted_weights_cover_everyone() {
        let roulette = Roulette::new(&[2, 0, 0], &policy(2, WheelWeight::Boosted(5)));
        assert_eq!(roulette.wheel(), &[11, 12, 13]);
        assert_eq!(roulette.locate(12), 1);
        assert_eq!(roulette.locate(13), 2);
    }

    #[test]
    fn spins_stay_in_selectable_range() {
        let roulette = Roulette::new(&[5, 3, 1, 0, 0, 0], &policy(2, WheelWeight::Fitness));
        let mut rng = RngSource::new(ChaCha8Rng::seed_from_u64(9));
        let mut seen = [0usize; 3];
        for _ in 0..1000 {
            let index = roulette.spin(&mut rng);
            assert!(index <= 2);
            seen[index] += 1;
        }
        assert!(seen.iter().all(|count| *count > 0));
        assert!(seen[0] > seen[2]);
    }

    #[test]
    #[should_panic]
    fn selectable_range_past_population() {
        Roulette::new(&[1, 1], &policy(2, WheelWeight::Fitness));
    }
}
