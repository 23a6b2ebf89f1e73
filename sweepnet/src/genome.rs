use sweepnet_nn::networks::Topology;
use sweepnet_nn::random::RandomSource;

use serde::{Deserialize, Serialize};

use std::cmp::Ordering;
use std::fmt;

/// Fitness scores are non-negative success counts.
pub type Fitness = u32;

/// A flat chromosome of network weights, plus the
/// fitness it earned while driving an agent.
///
/// Supports Serde for convenient reporting.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Genome {
    weights: Box<[f64]>,
    fitness: Fitness,
}

impl Genome {
    /// Creates a genome with the given chromosome and zero fitness.
    ///
    /// # Examples
    /// ```
    /// use sweepnet::Genome;
    ///
    /// let genome = Genome::new(vec![0.5, -0.25, 1.0]);
    /// assert_eq!(genome.len(), 3);
    /// assert_eq!(genome.weight(1), -0.25);
    /// assert_eq!(genome.fitness(), 0);
    /// ```
    pub fn new(weights: Vec<f64>) -> Genome {
        Genome {
            weights: weights.into_boxed_slice(),
            fitness: 0,
        }
    }

    /// Creates a genome sized for `topology`, with
    /// triangular random weights in `(-1, 1)`.
    ///
    /// # Examples
    /// ```
    /// use sweepnet::Genome;
    /// use sweepnet_nn::networks::{NetworkConfig, Topology};
    /// use sweepnet_nn::random::RngSource;
    /// use std::num::NonZeroUsize;
    ///
    /// let topology = Topology::new(&NetworkConfig {
    ///     input_count: NonZeroUsize::new(4).unwrap(),
    ///     output_count: NonZeroUsize::new(2).unwrap(),
    ///     hidden_layer_count: 0,
    ///     neurons_per_hidden_layer: 0,
    /// }).unwrap();
    ///
    /// let genome = Genome::random(&topology, &mut RngSource::seeded(3));
    /// assert_eq!(genome.len(), topology.weight_count());
    /// ```
    pub fn random(topology: &Topology, rng: &mut impl RandomSource) -> Genome {
        Genome::triangular(topology.weight_count(), rng)
    }

    pub(crate) fn triangular(length: usize, rng: &mut impl RandomSource) -> Genome {
        Genome::new((0..length).map(|_| rng.clamped()).collect())
    }

    /// Returns the whole chromosome, in network layout order.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Returns the weight at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn weight(&self, index: usize) -> f64 {
        self.weights[index]
    }

    /// Chromosome length.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn fitness(&self) -> Fitness {
        self.fitness
    }

    pub fn set_fitness(&mut self, fitness: Fitness) {
        self.fitness = fitness;
    }

    /// Orders genomes by fitness alone, fittest first.
    ///
    /// # Examples
    /// ```
    /// use sweepnet::Genome;
    ///
    /// let mut genomes = vec![Genome::new(vec![1.0]), Genome::new(vec![2.0])];
    /// genomes[1].set_fitness(4);
    /// genomes.sort_by(Genome::by_decreasing_fitness);
    /// assert_eq!(genomes[0].weights(), &[2.0]);
    /// ```
    pub fn by_decreasing_fitness(first: &Genome, second: &Genome) -> Ordering {
        second.fitness.cmp(&first.fitness)
    }

    /// Returns a copy with fitness reset to zero.
    pub(crate) fn fresh_copy(&self) -> Genome {
        Genome {
            weights: self.weights.clone(),
            fitness: 0,
        }
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Genome {{ fitness: {}, weights: [", self.fitness)?;
        for (i, w) in self.weights.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:.3}", w)?;
        }
        write!(f, "] }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_copy_is_independent() {
        let mut original = Genome::new(vec![0.1, 0.2]);
        original.set_fitness(7);
        let copy = original.fresh_copy();
        assert_eq!(copy.weights(), original.weights());
        assert_eq!(copy.fitness(), 0);
        assert_ne!(copy.weights().as_ptr(), original.weights().as_ptr());
    }

    #[test]
    fn decreasing_fitness_sort_is_stable() {
        let mut genomes: Vec<Genome> = (0..5).map(|i| Genome::new(vec![i as f64])).collect();
        for (g, f) in genomes.iter_mut().zip([1, 3, 1, 3, 0]) {
            g.set_fitness(f);
        }
        genomes.sort_by(Genome::by_decreasing_fitness);
        let order: Vec<f64> = genomes.iter().map(|g| g.weight(0)).collect();
        assert_eq!(order, [1.0, 3.0, 0.0, 2.0, 4.0]);
    }

    #[test]
    fn display() {
        let mut genome = Genome::new(vec![0.5, -1.0]);
        genome.set_fitness(2);
        assert_eq!(
            genome.to_string(),
            "Genome { fitness: 2, weights: [0.500, -1.000] }"
        );
    }
}
