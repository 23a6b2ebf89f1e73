use super::{GeneticConfig, Roulette, SelectionPolicy};
use crate::Genome;

use sweepnet_nn::random::RandomSource;

/// Auxiliary type for offspring generation.
/// Builds the next generation from a population sorted
/// by decreasing fitness, according to the epoch's
/// selection policy.
pub(super) struct OffspringFactory<'a, R> {
    parents: &'a [Genome],
    policy: &'a SelectionPolicy,
    roulette: &'a Roulette,
    config: &'a GeneticConfig,
    rng: &'a mut R,
}

impl<'a, R: RandomSource> OffspringFactory<'a, R> {
    pub(super) fn new(
        parents: &'a [Genome],
        policy: &'a SelectionPolicy,
        roulette: &'a Roulette,
        config: &'a GeneticConfig,
        rng: &'a mut R,
    ) -> OffspringFactory<'a, R> {
        OffspringFactory {
            parents,
            policy,
            roulette,
            config,
            rng,
        }
    }

    /// Generate a full population: elite copies first,
    /// then mated children in pairs.
    pub(super) fn generate_offspring(&mut self) -> Vec<Genome> {
        let size = self.parents.len();
        let mut offspring = Vec::with_capacity(size + 1);

        self.add_elite(&mut offspring);
        self.add_mated_offspring(&mut offspring);

        offspring.truncate(size);
        offspring
    }

    /// Copy each of the top `elites` parents `copies` times.
    fn add_elite(&self, offspring: &mut Vec<Genome>) {
        for elite in &self.parents[..self.policy.elites] {
            offspring.extend((0..self.policy.copies).map(|_| elite.fresh_copy()));
        }
    }

    /// Spin the roulette for each pair of parents,
    /// and add both of their mutated children.
    fn add_mated_offspring(&mut self, offspring: &mut Vec<Genome>) {
        for _ in 0..self.policy.pair_count(self.parents.len()) {
            let mother = self.roulette.spin(self.rng);
            let father = self.roulette.spin(self.rng);
            let (mut first, mut second) = self.crossover(mother, father);
            self.mutate(&mut first);
            self.mutate(&mut second);
            offspring.push(Genome::new(first));
            offspring.push(Genome::new(second));
        }
    }

    /// Single-point crossover. The chance is only rolled for
    /// distinct parents; otherwise both children are plain copies.
    fn crossover(&mut self, mother: usize, father: usize) -> (Vec<f64>, Vec<f64>) {
        let mother_genes = self.parents[mother].weights();
        let father_genes = self.parents[father].weights();
        let length = mother_genes.len();

        if mother == father
            || self.rng.uniform() > self.config.crossover_rate
            || length < 2
        {
            return (mother_genes.to_vec(), father_genes.to_vec());
        }

        let point = self.rng.uniform_int(0, length as u64 - 2) as usize;
        let first = [&mother_genes[..point], &father_genes[point..]].concat();
        let second = [&father_genes[..point], &mother_genes[point..]].concat();
        (first, second)
    }

    /// Nudge each gene by up to the maximum perturbation,
    /// with the configured chance.
    fn mutate(&mut self, genes: &mut [f64]) {
        for gene in genes {
            if self.rng.chance(self.config.mutation_rate) {
                *gene += self.rng.clamped() * self.config.max_perturbation;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedSource;
    use std::num::NonZeroUsize;

    fn config(crossover_rate: f64, mutation_rate: f64) -> GeneticConfig {
        GeneticConfig {
            population_size: 4,
            desired_elites: 1,
            copies_per_elite: NonZeroUsize::new(2).unwrap(),
            crossover_rate,
            mutation_rate,
            max_perturbation: 0.5,
        }
    }

    fn parents() -> Vec<Genome> {
        [2, 1, 0, 0]
            .iter()
            .enumerate()
            .map(|(i, fitness)| {
                let mut genome = Genome::new((0..4).map(|g| (10 * i + g) as f64).collect());
                genome.set_fitness(*fitness);
                genome
            })
            .collect()
    }

    fn generate(config: &GeneticConfig, rng: &mut ScriptedSource) -> Vec<Genome> {
        let parents = parents();
        let fitnesses: Vec<_> = parents.iter().map(Genome::fitness).collect();
        let policy = SelectionPolicy::derive(&fitnesses, config);
        let roulette = Roulette::new(&fitnesses, &policy);
        OffspringFactory::new(&parents, &policy, &roulette, config, rng).generate_offspring()
    }

    #[test]
    fn crossover_swaps_tails() {
        let config = config(0.7, 0.0);
        // Marbles 1 and 3 pick parents 0 and 1, then cut at 1.
        let mut rng = ScriptedSource::new(vec![1, 3, 1], vec![0.7]);
        let offspring = generate(&config, &mut rng);

        assert_eq!(offspring.len(), 4);
        assert_eq!(offspring[0].weights(), parents()[0].weights());
        assert_eq!(offspring[1].weights(), parents()[0].weights());
        assert_eq!(offspring[2].weights(), &[0.0, 11.0, 12.0, 13.0]);
        assert_eq!(offspring[3].weights(), &[10.0, 1.0, 2.0, 3.0]);
        assert!(offspring.iter().all(|g| g.fitness() == 0));
        assert!(rng.is_exhausted());
    }

    #[test]
    fn failed_crossover_roll_copies_parents() {
        let config = config(0.7, 0.0);
        let mut rng = ScriptedSource::new(vec![3, 1], vec![0.71]);
        let offspring = generate(&config, &mut rng);
        assert_eq!(offspring[2].weights(), parents()[1].weights());
        assert_eq!(offspring[3].weights(), parents()[0].weights());
    }

    #[test]
    fn same_parent_skips_crossover_roll() {
        let config = config(1.0, 0.0);
        // No crossover uniform and no cut point are drawn.
        let mut rng = ScriptedSource::new(vec![2, 1], vec![]);
        let offspring = generate(&config, &mut rng);
        assert_eq!(offspring[2].weights(), parents()[0].weights());
        assert_eq!(offspring[3].weights(), parents()[0].weights());
        assert!(rng.is_exhausted());
    }

    #[test]
    fn mutation_perturbs_selected_genes() {
        let config = config(0.0, 0.5);
        // Crossover rolls 0.9 > 0.0. Then first child: gene 0 mutates
        // by (0.75 - 0.25) * 0.5, the rest don't. Second child: none.
        let uniforms = vec![0.9, 0.1, 0.75, 0.25, 0.6, 0.6, 0.6, 0.6, 0.6, 0.6, 0.6];
        let mut rng = ScriptedSource::new(vec![1, 3], uniforms);
        let offspring = generate(&config, &mut rng);
        assert_eq!(offspring[2].weights(), &[0.25, 1.0, 2.0, 3.0]);
        assert_eq!(offspring[3].weights(), parents()[1].weights());
        assert!(rng.is_exhausted());
    }

    #[test]
    fn children_do_not_alias_parents() {
        let parents = parents();
        let config = config(0.0, 0.0);
        let fitnesses: Vec<_> = parents.iter().map(Genome::fitness).collect();
        let policy = SelectionPolicy::derive(&fitnesses, &config);
        let roulette = Roulette::new(&fitnesses, &policy);
        let mut rng = ScriptedSource::new(vec![1, 1], vec![]);
        let offspring =
            OffspringFactory::new(&parents, &policy, &roulette, &config, &mut rng).generate_offspring();
        for child in &offspring {
            for parent in &parents {
                assert_ne!(child.weights().as_ptr(), parent.weights().as_ptr());
            }
        }
    }
}
