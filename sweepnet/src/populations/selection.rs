use super::GeneticConfig;
use crate::Fitness;

use serde::{Deserialize, Serialize};

use std::fmt;

/// Which branch of the selection rules produced a policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyCase {
    /// No genome scored: no elitism, every genome
    /// equally likely to be picked as a parent.
    TotalFailure,
    /// At least the desired number of elites scored.
    SufficientElites,
    /// Fewer genomes scored than the desired elites, and
    /// a copy count was found that fills the elite slots.
    InsufficientElites,
    /// Fewer genomes scored than the desired elites, and
    /// no suitable copy count was found.
    InsufficientElitesFallback,
}

/// How a genome's fitness maps to its share of the roulette wheel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WheelWeight {
    /// Every genome weighs 1.
    Uniform,
    /// A genome weighs its fitness.
    Fitness,
    /// A genome weighs `fitness * factor + 1`, so that
    /// unscored genomes still get a thin slice.
    Boosted(u64),
}

impl WheelWeight {
    /// # Examples
    /// ```
    /// use sweepnet::WheelWeight;
    ///
    /// assert_eq!(WheelWeight::Uniform.weigh(7), 1);
    /// assert_eq!(WheelWeight::Fitness.weigh(7), 7);
    /// assert_eq!(WheelWeight::Boosted(5).weigh(7), 36);
    /// assert_eq!(WheelWeight::Boosted(10).weigh(0), 1);
    /// ```
    pub fn weigh(&self, fitness: Fitness) -> u64 {
        match self {
            WheelWeight::Uniform => 1,
            WheelWeight::Fitness => u64::from(fitness),
            WheelWeight::Boosted(factor) => u64::from(fitness) * factor + 1,
        }
    }
}

/// The elitism and parent-selection decisions for one epoch.
///
/// Derived from the sorted fitness values alone, so it can be
/// computed, logged and tested without touching any genome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionPolicy {
    pub case: PolicyCase,
    /// Number of top genomes carried over.
    pub elites: usize,
    /// Copies made of each elite.
    pub copies: usize,
    /// Highest population index the roulette may return.
    pub last_selectable: usize,
    pub weight: WheelWeight,
}

impl SelectionPolicy {
    /// Derives the policy for fitness values sorted
    /// in decreasing order.
    ///
    /// # Panics
    /// Panics if `sorted` is empty.
    ///
    /// # Examples
    /// ```
    /// use sweepnet::{GeneticConfig, PolicyCase, SelectionPolicy, WheelWeight};
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
    ///
    /// let policy = SelectionPolicy::derive(&[5, 3, 1, 0, 0, 0], &config);
    /// assert_eq!(policy.case, PolicyCase::SufficientElites);
    /// assert_eq!((policy.elites, policy.copies), (1, 2));
    /// assert_eq!(policy.last_selectable, 2);
    /// assert_eq!(policy.weight, WheelWeight::Fitness);
    /// assert_eq!(policy.median_index(), 1);
    /// ```
    pub fn derive(sorted: &[Fitness], config: &GeneticConfig) -> SelectionPolicy {
        assert!(!sorted.is_empty(), "cannot select from an empty population");
        let last = sorted.len() - 1;
        let fit_count = sorted.iter().take_while(|f| **f > 0).count();
        let desired = config.desired_elites;
        let copies_per_elite = config.copies_per_elite.get();

        if sorted[0] == 0 {
            return SelectionPolicy {
                case: PolicyCase::TotalFailure,
                elites: 0,
                copies: 0,
                last_selectable: last,
                weight: WheelWeight::Uniform,
            };
        }

        if fit_count >= desired {
            return SelectionPolicy {
                case: PolicyCase::SufficientElites,
                elites: desired,
                copies: copies_per_elite,
                last_selectable: fit_count - 1,
                weight: WheelWeight::Fitness,
            };
        }

        // Spread the elite slots over the few genomes that scored,
        // never taking more slots than the population has.
        let at_least = desired * copies_per_elite;
        let at_most = (2 * at_least).min(sorted.len());
        let copies = (at_least / fit_count..=at_least).find(|copies| {
            let slots = fit_count * copies;
            (at_least..=at_most).contains(&slots) && slots % 2 == 0
        });
        match copies {
            Some(copies) => SelectionPolicy {
                case: PolicyCase::InsufficientElites,
                elites: fit_count,
                copies,
                last_selectable: last,
                weight: WheelWeight::Boosted(5),
            },
            None => SelectionPolicy {
                case: PolicyCase::InsufficientElitesFallback,
                elites: fit_count,
                copies: copies_per_elite,
                last_selectable: last,
                weight: WheelWeight::Boosted(10),
            },
        }
    }

    /// Population slots taken by elite copies.
    pub fn elite_slots(&self) -> usize {
        self.elites * self.copies
    }

    /// Index of the genome whose fitness is reported as the median.
    pub fn median_index(&self) -> usize {
        self.last_selectable / 2
    }

    /// Number of parent pairs needed to refill a population
    /// of `population_size` after the elites. Rounds up; a
    /// surplus child is dropped.
    pub fn pair_count(&self, population_size: usize) -> usize {
        (population_size.saturating_sub(self.elite_slots()) + 1) / 2
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}: {} elites x {} copies, parents from 0..={}, {:?} weights",
            self.case, self.elites, self.copies, self.last_selectable, self.weight
        )
    }
}
