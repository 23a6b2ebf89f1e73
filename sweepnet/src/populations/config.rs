use super::ConfigError;
use crate::parameters::constraints;

use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Parameter-file keys for the genetic configuration.
pub mod keys {
    pub const POPULATION_SIZE: &str = "iNumSweepers";
    pub const ELITES: &str = "iNumElite";
    pub const COPIES_PER_ELITE: &str = "iNumCopiesElite";
    pub const CROSSOVER_RATE: &str = "dCrossoverRate";
    pub const MUTATION_RATE: &str = "dMutationRate";
    pub const MAX_PERTURBATION: &str = "dMaxPerturbation";
}

pub(crate) const ELITE_SLOTS_OVERFLOW: &str = "times iNumCopiesElite overflows";

/// Configuration data for population generation
/// and evolution.
///
/// # Note
/// Use [`validate`] (or build a [`GeneticAlgorithm`], which
/// calls it) before relying on a hand-built configuration.
///
/// [`validate`]: GeneticConfig::validate
/// [`GeneticAlgorithm`]: crate::GeneticAlgorithm
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneticConfig {
    /// Size of the population. Once the elite copies
    /// are taken out, what remains must be a positive
    /// even number, so that whole pairs of children
    /// fill it.
    pub population_size: usize,
    /// Number of fittest genomes carried unchanged
    /// into the next generation.
    pub desired_elites: usize,
    /// How many copies of each elite are carried.
    pub copies_per_elite: NonZeroUsize,
    /// Chance that a pairing of distinct parents
    /// swaps genes at a crossover point.
    pub crossover_rate: f64,
    /// Per-gene chance of a child's weight being perturbed.
    pub mutation_rate: f64,
    /// Largest magnitude of a single perturbation.
    pub max_perturbation: f64,
}

impl GeneticConfig {
    /// Number of population slots reserved for elite copies
    /// when there are enough fit genomes to supply them, or
    /// `None` if that count overflows.
    pub fn elite_slots(&self) -> Option<usize> {
        self.desired_elites.checked_mul(self.copies_per_elite.get())
    }

    /// Checks every range and parity rule.
    ///
    /// # Errors
    /// Returns [`ConfigError::OutOfRange`] naming the first
    /// offending key.
    ///
    /// # Examples
    /// ```
    /// use sweepnet::GeneticConfig;
    /// use std::num::NonZeroUsize;
    ///
    /// let mut config = GeneticConfig {
    ///     population_size: 30,
    ///     desired_elites: 4,
    ///     copies_per_elite: NonZeroUsize::new(1).unwrap(),
    ///     crossover_rate: 0.7,
    ///     mutation_rate: 0.1,
    ///     max_perturbation: 0.3,
    /// };
    /// assert!(config.validate().is_ok());
    ///
    /// // 31 - 4 leaves an odd number of slots for pairs of children.
    /// config.population_size = 31;
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        let elite_slots = self.elite_slots().ok_or_else(|| ConfigError::OutOfRange {
            key: keys::ELITES.to_owned(),
            constraint: ELITE_SLOTS_OVERFLOW,
        })?;
        constraints::population_size(elite_slots)
            .check(keys::POPULATION_SIZE, &self.population_size)?;
        constraints::unit_interval().check(keys::CROSSOVER_RATE, &self.crossover_rate)?;
        constraints::unit_interval().check(keys::MUTATION_RATE, &self.mutation_rate)?;
        constraints::non_negative().check(keys::MAX_PERTURBATION, &self.max_perturbation)?;
        Ok(())
    }
}
