//! # sweepnet-nn
//! Fixed-topology feed-forward neural networks, built so that
//! their weights can be swapped in and out as flat chromosomes
//! by the `sweepnet` crate's genetic algorithm.
//!
//! Provides:
//! - [`Topology`]: the single description of how a network's weights
//!   are flattened. Anything producing or consuming weight vectors
//!   for a given [`NetworkConfig`] should go through the same `Topology`.
//! - [`NeuralNet`]: the evaluator, with sigmoid neurons and a fixed bias input.
//! - [`RandomSource`]: the randomness abstraction shared by network
//!   initialization and evolution, with [`RngSource`] adapting any `rand::Rng`.
//!
//! [`Topology`]: crate::networks::Topology
//! [`NetworkConfig`]: crate::networks::NetworkConfig
//! [`NeuralNet`]: crate::networks::NeuralNet
//! [`RandomSource`]: crate::random::RandomSource
//! [`RngSource`]: crate::random::RngSource
//!
//! # Example usage
//! ```
//! use sweepnet_nn::networks::{NetworkConfig, NeuralNet, Topology};
//! use sweepnet_nn::random::RngSource;
//! use std::num::NonZeroUsize;
//! use std::sync::Arc;
//!
//! let config = NetworkConfig {
//!     input_count: NonZeroUsize::new(4).unwrap(),
//!     output_count: NonZeroUsize::new(2).unwrap(),
//!     hidden_layer_count: 1,
//!     neurons_per_hidden_layer: 6,
//! };
//! let topology = Arc::new(Topology::new(&config).unwrap());
//!
//! let mut rng = RngSource::seeded(42);
//! let network = NeuralNet::random(topology.clone(), &mut rng);
//!
//! // Direction to target (x, y), then heading (x, y).
//! let tracks = network.evaluate(&[0.6, 0.8, 0.0, 1.0]).unwrap();
//! assert_eq!(tracks.len(), 2);
//!
//! // Weights move between networks as flat vectors.
//! let mut twin = NeuralNet::new(topology);
//! twin.load_weights(network.weights()).unwrap();
//! assert_eq!(twin.evaluate(&[0.6, 0.8, 0.0, 1.0]).unwrap(), tracks);
//! ```

pub mod networks;
pub mod random;
