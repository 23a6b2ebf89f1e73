//! A generational genetic algorithm for evolving the weights of
//! fixed-topology neural networks, as used to train the agents
//! of the `sweepers` simulation.
//!
//! Each [`Genome`] is a flat chromosome laid out exactly as a
//! [`Topology`] flattens a network's weights, so genomes and
//! networks exchange weights without any translation. Fitness
//! is written into the genomes from outside; each call to
//! [`GeneticAlgorithm::run_epoch`] then ranks the population,
//! keeps its elites, and breeds the rest of the next generation
//! by roulette-wheel selection, single-point crossover and
//! per-gene mutation.
//!
//! All randomness is drawn through [`RandomSource`], so seeded
//! runs are reproducible.
//!
//! [`Topology`]: sweepnet_nn::networks::Topology
//! [`RandomSource`]: sweepnet_nn::random::RandomSource
//!
//! # Example usage: Evolving a network that tells its inputs apart
//! ```
//! use sweepnet::{parameters::Parameters, GeneticAlgorithm};
//! use sweepnet_nn::networks::{NeuralNet, Topology};
//! use sweepnet_nn::random::RngSource;
//! use std::sync::Arc;
//!
//! let parameters: Parameters = "
//!     iNumInputs 2
//!     iNumOutputs 1
//!     iNumHidden 1
//!     iNeuronsPerHiddenLayer 3
//!     iNumElite 2
//!     iNumCopiesElite 1
//!     iNumSweepers 20
//!     dCrossoverRate 0.7
//!     dMutationRate 0.1
//!     dMaxPerturbation 0.3
//! ".parse().unwrap();
//!
//! let topology = Arc::new(Topology::new(&parameters.network).unwrap());
//! let mut ga = GeneticAlgorithm::new(
//!     parameters.genetic,
//!     &topology,
//!     RngSource::seeded(7),
//! ).unwrap();
//! let mut network = NeuralNet::new(topology);
//!
//! // One point for each input pattern answered on the right side of 0.5.
//! let cases = [([1.0, 0.0], true), ([0.0, 1.0], false)];
//! for _ in 0..30 {
//!     ga.evaluate_fitness(|genome| {
//!         network.load_weights(genome.weights()).unwrap();
//!         cases
//!             .iter()
//!             .filter(|(input, high)| (network.evaluate(input).unwrap()[0] > 0.5) == *high)
//!             .count() as u32
//!     });
//!     ga.run_epoch();
//! }
//!
//! assert_eq!(ga.generation(), 30);
//! assert_eq!(ga.fitness_history().len(), 30);
//! ```

mod genome;
pub mod parameters;
mod populations;

pub use genome::*;
pub use populations::*;

#[cfg(test)]
mod test_support;
