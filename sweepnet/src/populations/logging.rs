use super::{GeneticAlgorithm, SelectionPolicy};
use crate::{Fitness, Genome};

use serde::{Deserialize, Serialize};

use std::fmt;

/// How many genomes each [`Log`] keeps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportingLevel {
    /// Clones the entire ranked population.
    AllGenomes,
    /// Clones only the population champion.
    Champion,
    /// Clones no genomes.
    NoGenomes,
}

/// A snapshot of one epoch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Log {
    pub generation_number: usize,
    pub best_fitness: Fitness,
    pub median_fitness: Fitness,
    pub policy: SelectionPolicy,
    pub fitness_stats: Stats,
    pub generation_sample: GenerationMemberRecord,
}

impl fmt::Display for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Log {{\n\
            \tgeneration_number: {}\n\
            \tbest_fitness: {}\n\
            \tmedian_fitness: {}\n\
            \tpolicy: {}\n\
            \tfitness_stats: {:?}\n\
            }}",
            self.generation_number,
            self.best_fitness,
            self.median_fitness,
            self.policy,
            self.fitness_stats,
        )
    }
}

/// Summary of a generation's fitness values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub maximum: f64,
    pub minimum: f64,
    pub mean: f64,
    pub median: f64,
}

impl Stats {
    /// Returns statistics about numbers in a sequence,
    /// or `None` if it is empty.
    ///
    /// # Examples
    /// ```
    /// use sweepnet::logging::Stats;
    ///
    /// let stats = Stats::of([-2.0, -1.0, 0.5, 1.0, 1.5].iter().copied()).unwrap();
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    ///
    /// let even = Stats::of([4.0, 1.0, 3.0, 2.0].iter().copied()).unwrap();
    /// assert_eq!(even.median, 2.5);
    /// ```
    pub fn of(data: impl Iterator<Item = f64>) -> Option<Stats> {
        let mut data: Vec<f64> = data.collect();
        if data.is_empty() {
            return None;
        }
        data.sort_by(f64::total_cmp);
        let mid = data.len() / 2;
        let median = if data.len() % 2 == 0 {
            (data[mid - 1] + data[mid]) / 2.0
        } else {
            data[mid]
        };
        Some(Stats {
            maximum: data[data.len() - 1],
            minimum: data[0],
            mean: data.iter().sum::<f64>() / data.len() as f64,
            median,
        })
    }
}

/// The genomes kept by a [`Log`], per [`ReportingLevel`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GenerationMemberRecord {
    /// Every genome, fittest first.
    Population(Vec<Genome>),
    /// Only the population champion.
    Champion(Genome),
    /// Empty.
    None,
}

/// Collects one [`Log`] per epoch of a [`GeneticAlgorithm`].
#[derive(Clone, Debug)]
pub struct EvolutionLogger {
    reporting_level: ReportingLevel,
    logs: Vec<Log>,
}

impl EvolutionLogger {
    /// Returns an empty logger.
    pub fn new(reporting_level: ReportingLevel) -> EvolutionLogger {
        EvolutionLogger {
            reporting_level,
            logs: vec![],
        }
    }

    /// Store a snapshot of the population consumed by
    /// the algorithm's most recent epoch, and return it.
    ///
    /// Returns `None`, storing nothing, if no epoch has run yet.
    ///
    /// # Examples
    /// ```
    /// use sweepnet::{GeneticAlgorithm, GeneticConfig, Genome};
    /// use sweepnet::logging::{EvolutionLogger, GenerationMemberRecord, ReportingLevel};
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
    /// let mut ga = GeneticAlgorithm::with_population(config, genomes, RngSource::seeded(2)).unwrap();
    /// let mut logger = EvolutionLogger::new(ReportingLevel::Champion);
    /// assert!(logger.log(&ga).is_none());
    ///
    /// ga.evaluate_fitness(|g| g.weight(0) as u32 * 2);
    /// ga.run_epoch();
    ///
    /// let log = logger.log(&ga).unwrap();
    /// assert_eq!(log.generation_number, 0);
    /// assert_eq!(log.best_fitness, 6);
    /// assert_eq!(log.fitness_stats.mean, 3.0);
    /// match &log.generation_sample {
    ///     GenerationMemberRecord::Champion(champion) => assert_eq!(champion.weight(0), 3.0),
    ///     other => panic!("unexpected sample {:?}", other),
    /// }
    /// ```
    pub fn log<R>(&mut self, algorithm: &GeneticAlgorithm<R>) -> Option<&Log> {
        let epoch = algorithm.last_epoch()?;
        let fitness_stats = Stats::of(epoch.ranked.iter().map(|g| f64::from(g.fitness())))?;
        self.logs.push(Log {
            generation_number: epoch.generation,
            best_fitness: epoch.fitness.best,
            median_fitness: epoch.fitness.median,
            policy: epoch.policy,
            fitness_stats,
            generation_sample: match self.reporting_level {
                ReportingLevel::AllGenomes => {
                    GenerationMemberRecord::Population(epoch.ranked.clone())
                }
                ReportingLevel::Champion => {
                    GenerationMemberRecord::Champion(epoch.ranked.first()?.clone())
                }
                ReportingLevel::NoGenomes => GenerationMemberRecord::None,
            },
        });
        self.logs.last()
    }

    /// Iterate over all logged snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &Log> {
        self.logs.iter()
    }

    pub fn reporting_level(&self) -> ReportingLevel {
        self.reporting_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeneticConfig;
    use std::num::NonZeroUsize;
    use sweepnet_nn::random::RngSource;

    fn algorithm() -> GeneticAlgorithm<RngSource<rand::rngs::StdRng>> {
        let config = GeneticConfig {
            population_size: 6,
            desired_elites: 1,
            copies_per_elite: NonZeroUsize::new(2).unwrap(),
            crossover_rate: 0.7,
            mutation_rate: 0.1,
            max_perturbation: 0.3,
        };
        let genomes = (0..6).map(|i| Genome::new(vec![i as f64; 2])).collect();
        GeneticAlgorithm::with_population(config, genomes, RngSource::seeded(17)).unwrap()
    }

    #[test]
    fn stats_of_empty() {
        assert_eq!(Stats::of(std::iter::empty()), None);
    }

    #[test]
    fn logs_every_epoch() {
        let mut ga = algorithm();
        let mut logger = EvolutionLogger::new(ReportingLevel::NoGenomes);
        for generation in 0..3 {
            ga.evaluate_fitness(|g| g.weight(0) as u32);
            ga.run_epoch();
            let log = logger.log(&ga).unwrap();
            assert_eq!(log.generation_number, generation);
            assert_eq!(log.generation_sample, GenerationMemberRecord::None);
        }
        assert_eq!(logger.iter().count(), 3);
    }

    #[test]
    fn all_genomes_are_ranked() {
        let mut ga = algorithm();
        let mut logger = EvolutionLogger::new(ReportingLevel::AllGenomes);
        for (i, fitness) in [0, 3, 5, 0, 1, 0].iter().enumerate() {
            ga.set_fitness(i, *fitness);
        }
        ga.run_epoch();
        let log = logger.log(&ga).unwrap();
        assert_eq!((log.best_fitness, log.median_fitness), (5, 3));
        assert_eq!(log.fitness_stats.median, 0.5);
        match &log.generation_sample {
            GenerationMemberRecord::Population(genomes) => {
                let fitnesses: Vec<_> = genomes.iter().map(Genome::fitness).collect();
                assert_eq!(fitnesses, [5, 3, 1, 0, 0, 0]);
            }
            other => panic!("unexpected sample {:?}", other),
        }
    }

    #[test]
    fn serializes_as_json() {
        let mut ga = algorithm();
        let mut logger = EvolutionLogger::new(ReportingLevel::NoGenomes);
        ga.set_fitness(0, 4);
        ga.run_epoch();
        let log = logger.log(&ga).unwrap();
        let json = serde_json::to_value(log).unwrap();
        assert_eq!(json["generation_number"], 0);
        assert_eq!(json["best_fitness"], 4);
        assert_eq!(json["policy"]["case"], "SufficientElites");
        assert_eq!(json["generation_sample"], "None");
        let back: Log = serde_json::from_value(json).unwrap();
        assert_eq!(back.policy, log.policy);
        assert_eq!(back.fitness_stats.maximum, 4.0);
    }
}
