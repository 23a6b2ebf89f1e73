//! A population of genomes, evolved one epoch at a time
//! by elitism, roulette-wheel selection, single-point
//! crossover and per-gene mutation.
mod config;
mod errors;
pub mod logging;
mod offspring_factory;
mod roulette;
mod selection;

use crate::{Fitness, Genome};
pub use config::{keys, GeneticConfig};
pub(crate) use config::ELITE_SLOTS_OVERFLOW;
pub use errors::ConfigError;
use offspring_factory::OffspringFactory;
pub use roulette::Roulette;
pub use selection::{PolicyCase, SelectionPolicy, WheelWeight};

use sweepnet_nn::networks::{NetworkError, Topology};
use sweepnet_nn::random::RandomSource;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use std::cmp::Reverse;
use std::mem;

/// Best and median fitness consumed by one epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitnessRecord {
    pub best: Fitness,
    pub median: Fitness,
}

/// What the most recent epoch consumed and decided.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpochReport {
    /// Generation the consumed population belonged to.
    pub generation: usize,
    pub policy: SelectionPolicy,
    pub fitness: FitnessRecord,
    /// The consumed population, fittest first.
    pub ranked: Vec<Genome>,
}

/// A generational genetic algorithm over fixed-length
/// weight chromosomes.
///
/// Fitness is written into the current genomes from outside
/// (see [`set_fitness`] and [`evaluate_fitness`]), then
/// [`run_epoch`] replaces the whole population with the next
/// generation.
///
/// [`set_fitness`]: GeneticAlgorithm::set_fitness
/// [`evaluate_fitness`]: GeneticAlgorithm::evaluate_fitness
/// [`run_epoch`]: GeneticAlgorithm::run_epoch
pub struct GeneticAlgorithm<R> {
    population: Vec<Genome>,
    chromosome_length: usize,
    config: GeneticConfig,
    rng: R,
    generation: usize,
    last_epoch: Option<EpochReport>,
    history: Vec<FitnessRecord>,
}

impl<R: RandomSource> GeneticAlgorithm<R> {
    /// Creates a population of random genomes sized for `topology`.
    ///
    /// # Errors
    /// Returns an error if `config` is invalid.
    ///
    /// # Examples
    /// ```
    /// use sweepnet::{GeneticAlgorithm, GeneticConfig};
    /// use sweepnet_nn::networks::{NetworkConfig, Topology};
    /// use sweepnet_nn::random::RngSource;
    /// use std::num::NonZeroUsize;
    ///
    /// let topology = Topology::new(&NetworkConfig {
    ///     input_count: NonZeroUsize::new(4).unwrap(),
    ///     output_count: NonZeroUsize::new(2).unwrap(),
    ///     hidden_layer_count: 1,
    ///     neurons_per_hidden_layer: 6,
    /// }).unwrap();
    /// let config = GeneticConfig {
    ///     population_size: 30,
    ///     desired_elites: 4,
    ///     copies_per_elite: NonZeroUsize::new(1).unwrap(),
    ///     crossover_rate: 0.7,
    ///     mutation_rate: 0.1,
    ///     max_perturbation: 0.3,
    /// };
    ///
    /// let ga = GeneticAlgorithm::new(config, &topology, RngSource::seeded(1)).unwrap();
    /// assert_eq!(ga.genomes().len(), 30);
    /// assert!(ga.genomes().iter().all(|g| g.len() == topology.weight_count()));
    /// ```
    pub fn new(
        config: GeneticConfig,
        topology: &Topology,
        mut rng: R,
    ) -> Result<GeneticAlgorithm<R>, ConfigError> {
        config.validate()?;
        let chromosome_length = topology.weight_count();
        let population = (0..config.population_size)
            .map(|_| Genome::triangular(chromosome_length, &mut rng))
            .collect();
        Ok(GeneticAlgorithm {
            population,
            chromosome_length,
            config,
            rng,
            generation: 0,
            last_epoch: None,
            history: vec![],
        })
    }

    /// Creates a population from existing genomes.
    ///
    /// # Errors
    /// Returns an error if `config` is invalid, if the number of
    /// genomes isn't the configured population size, or if the
    /// genomes' lengths differ.
    pub fn with_population(
        config: GeneticConfig,
        population: Vec<Genome>,
        rng: R,
    ) -> Result<GeneticAlgorithm<R>, ConfigError> {
        config.validate()?;
        if population.len() != config.population_size {
            return Err(ConfigError::OutOfRange {
                key: keys::POPULATION_SIZE.to_owned(),
                constraint: "must match the number of seed genomes",
            });
        }
        let chromosome_length = population[0].len();
        if let Some(odd) = population.iter().find(|g| g.len() != chromosome_length) {
            return Err(NetworkError::WeightCountMismatch {
                expected: chromosome_length,
                found: odd.len(),
            }
            .into());
        }
        Ok(GeneticAlgorithm {
            population,
            chromosome_length,
            config,
            rng,
            generation: 0,
            last_epoch: None,
            history: vec![],
        })
    }

    /// Produces the next generation from the current fitness values,
    /// and returns it.
    ///
    /// The population is ranked by decreasing fitness (ties keep
    /// their current order), the [`SelectionPolicy`] is derived
    /// from the ranking, elites are copied over and the rest of
    /// the population is filled with mutated children of
    /// roulette-selected parents. Every new genome starts at
    /// zero fitness.
    ///
    /// # Panics
    /// Panics if an internal invariant breaks: the generation
    /// changing size, or chromosomes changing length.
    ///
    /// # Examples
    /// ```
    /// use sweepnet::{GeneticAlgorithm, GeneticConfig, Genome};
    /// use sweepnet_nn::random::RngSource;
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
    /// let genomes = (0..6).map(|i| Genome::new(vec![i as f64; 3])).collect();
    /// let mut ga = GeneticAlgorithm::with_population(config, genomes, RngSource::seeded(5)).unwrap();
    ///
    /// for (i, fitness) in [0, 3, 5, 0, 1, 0].iter().enumerate() {
    ///     ga.set_fitness(i, *fitness);
    /// }
    /// let next = ga.run_epoch();
    ///
    /// // The single elite (genome 2) is carried over twice.
    /// assert_eq!(next[0].weights(), &[2.0; 3]);
    /// assert_eq!(next[1].weights(), &[2.0; 3]);
    /// assert_eq!(ga.best_fitness(), 5);
    /// assert_eq!(ga.median_fitness(), 3);
    /// ```
    pub fn run_epoch(&mut self) -> &[Genome] {
        assert!(
            !self.population.is_empty(),
            "cannot run an epoch on an empty population"
        );
        self.population.sort_by(Genome::by_decreasing_fitness);
        let fitnesses: Vec<Fitness> = self.population.iter().map(Genome::fitness).collect();

        let policy = SelectionPolicy::derive(&fitnesses, &self.config);
        debug!("generation {}: {}", self.generation, policy);
        match policy.case {
            PolicyCase::TotalFailure => warn!(
                "generation {}: no genome scored, selecting uniformly",
                self.generation
            ),
            PolicyCase::InsufficientElitesFallback => warn!(
                "generation {}: only {} genomes scored, keeping {} copies each",
                self.generation, policy.elites, policy.copies
            ),
            PolicyCase::SufficientElites | PolicyCase::InsufficientElites => {}
        }

        let fitness = FitnessRecord {
            best: fitnesses[0],
            median: fitnesses[policy.median_index()],
        };

        let roulette = Roulette::new(&fitnesses, &policy);
        let offspring = OffspringFactory::new(
            &self.population,
            &policy,
            &roulette,
            &self.config,
            &mut self.rng,
        )
        .generate_offspring();

        assert_eq!(
            offspring.len(),
            self.population.len(),
            "generation {} changed the population size",
            self.generation
        );
        assert!(
            offspring.iter().all(|g| g.len() == self.chromosome_length),
            "generation {} changed the chromosome length",
            self.generation
        );

        info!(
            "generation {}: best fitness {}, median fitness {}",
            self.generation, fitness.best, fitness.median
        );
        self.history.push(fitness);
        self.last_epoch = Some(EpochReport {
            generation: self.generation,
            policy,
            fitness,
            ranked: mem::replace(&mut self.population, offspring),
        });
        self.generation += 1;

        &self.population
    }

    /// Evaluates the fitness of each genome with `evaluator`.
    ///
    /// # Examples
    /// ```
    /// use sweepnet::{GeneticAlgorithm, GeneticConfig, Genome};
    /// use sweepnet_nn::random::RngSource;
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig {
    ///     population_size: 4,
    ///     desired_elites: 1,
    ///     copies_per_elite: NonZeroUsize::new(2).unwrap(),
    ///     crossover_rate: 0.7,
    ///     mutation_rate: 0.1,
    ///     max_perturbation: 0.3,
    /// };
    /// let genomes = (0..4).map(|i| Genome::new(vec![i as f64])).collect();
    /// let mut ga = GeneticAlgorithm::with_population(config, genomes, RngSource::seeded(0)).unwrap();
    ///
    /// // Reward genomes by their only weight.
    /// ga.evaluate_fitness(|g| g.weight(0) as u32);
    /// assert_eq!(ga.champion().weight(0), 3.0);
    /// ```
    pub fn evaluate_fitness<E>(&mut self, mut evaluator: E)
    where
        E: FnMut(&Genome) -> Fitness,
    {
        for genome in &mut self.population {
            let fitness = evaluator(genome);
            genome.set_fitness(fitness);
        }
    }

    /// Re-randomizes every genome and forgets all history.
    pub fn reset(&mut self) {
        let length = self.chromosome_length;
        let rng = &mut self.rng;
        self.population = (0..self.config.population_size)
            .map(|_| Genome::triangular(length, &mut *rng))
            .collect();
        self.generation = 0;
        self.last_epoch = None;
        self.history.clear();
    }
}

impl<R> GeneticAlgorithm<R> {
    /// The current population. Ranked by fitness only
    /// in that elites lead it right after an epoch.
    pub fn genomes(&self) -> &[Genome] {
        &self.population
    }

    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn genome(&self, index: usize) -> &Genome {
        &self.population[index]
    }

    /// Records the fitness earned by genome `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn set_fitness(&mut self, index: usize, fitness: Fitness) {
        self.population[index].set_fitness(fitness);
    }

    /// Returns the fittest current genome; the first
    /// one in population order if several tie.
    pub fn champion(&self) -> &Genome {
        self.population
            .iter()
            .min_by_key(|g| Reverse(g.fitness()))
            .expect("empty population has no champion")
    }

    /// Best fitness consumed by the last epoch, or 0 before any epoch.
    pub fn best_fitness(&self) -> Fitness {
        self.last_epoch.as_ref().map_or(0, |e| e.fitness.best)
    }

    /// Median fitness consumed by the last epoch, or 0 before any epoch.
    pub fn median_fitness(&self) -> Fitness {
        self.last_epoch.as_ref().map_or(0, |e| e.fitness.median)
    }

    /// Number of epochs run.
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn last_epoch(&self) -> Option<&EpochReport> {
        self.last_epoch.as_ref()
    }

    /// Best and median fitness of every epoch so far, oldest first.
    pub fn fitness_history(&self) -> &[FitnessRecord] {
        &self.history
    }

    pub fn config(&self) -> &GeneticConfig {
        &self.config
    }

    pub fn chromosome_length(&self) -> usize {
        self.chromosome_length
    }
}
