//! A `NeuralNet` is a fixed-topology, fully-connected
//! feed-forward network. Its weights live in one flat
//! vector laid out by a shared [`Topology`], so a
//! chromosome can be loaded into it as-is.
//!
//! Evaluation is stateless: outputs depend only on
//! the current weights and the inputs given.
mod config;
mod errors;
mod topology;

pub use config::{keys, NetworkConfig};
pub use errors::NetworkError;
pub use topology::{LayerLayout, NeuronSlice, Topology};

use crate::random::RandomSource;

use std::fmt;
use std::sync::Arc;

/// Value fed into every neuron's bias weight.
pub const BIAS: f64 = -1.0;

/// The logistic function, `1 / (1 + e^-x)`, held inside the
/// open interval `(0, 1)` where `f64` would round it onto a bound.
///
/// # Examples
/// ```
/// use sweepnet_nn::networks::sigmoid;
///
/// assert_eq!(sigmoid(0.0), 0.5);
/// assert!(sigmoid(40.0) < 1.0);
/// assert!(sigmoid(-800.0) > 0.0);
/// ```
pub fn sigmoid(x: f64) -> f64 {
    (1.0 / (1.0 + (-x).exp())).clamp(f64::MIN_POSITIVE, 1.0 - f64::EPSILON / 2.0)
}

/// A feed-forward network with sigmoid neurons.
#[derive(Clone, PartialEq)]
pub struct NeuralNet {
    topology: Arc<Topology>,
    weights: Box<[f64]>,
}

impl NeuralNet {
    /// Creates a network with every weight set to zero.
    pub fn new(topology: Arc<Topology>) -> NeuralNet {
        let weights = vec![0.0; topology.weight_count()].into_boxed_slice();
        NeuralNet { topology, weights }
    }

    /// Creates a network with triangular random weights in `(-1, 1)`.
    ///
    /// # Examples
    /// ```
    /// use sweepnet_nn::networks::{NetworkConfig, NeuralNet, Topology};
    /// use sweepnet_nn::random::RngSource;
    /// use std::num::NonZeroUsize;
    /// use std::sync::Arc;
    ///
    /// let topology = Arc::new(Topology::new(&NetworkConfig {
    ///     input_count: NonZeroUsize::new(4).unwrap(),
    ///     output_count: NonZeroUsize::new(2).unwrap(),
    ///     hidden_layer_count: 1,
    ///     neurons_per_hidden_layer: 6,
    /// }).unwrap());
    ///
    /// let network = NeuralNet::random(topology, &mut RngSource::seeded(1));
    /// assert!(network.weights().iter().all(|w| w.abs() < 1.0));
    /// ```
    pub fn random(topology: Arc<Topology>, rng: &mut impl RandomSource) -> NeuralNet {
        let weights = (0..topology.weight_count()).map(|_| rng.clamped()).collect();
        NeuralNet { topology, weights }
    }

    /// Creates a network from a flat weight vector.
    ///
    /// # Errors
    /// Fails under the same conditions as [`load_weights`].
    ///
    /// [`load_weights`]: NeuralNet::load_weights
    pub fn with_weights(topology: Arc<Topology>, weights: &[f64]) -> Result<NeuralNet, NetworkError> {
        let mut network = NeuralNet::new(topology);
        network.load_weights(weights)?;
        Ok(network)
    }

    /// Replaces every weight with those in `weights`,
    /// which must follow the topology's flat layout.
    ///
    /// # Errors
    /// Returns [`NetworkError::WeightCountMismatch`] if `weights`
    /// isn't exactly [`Topology::weight_count`] long. The network
    /// is left untouched in that case.
    ///
    /// # Examples
    /// ```
    /// use sweepnet_nn::networks::{NetworkConfig, NeuralNet, Topology};
    /// use std::num::NonZeroUsize;
    /// use std::sync::Arc;
    ///
    /// let topology = Arc::new(Topology::new(&NetworkConfig {
    ///     input_count: NonZeroUsize::new(1).unwrap(),
    ///     output_count: NonZeroUsize::new(1).unwrap(),
    ///     hidden_layer_count: 0,
    ///     neurons_per_hidden_layer: 0,
    /// }).unwrap());
    ///
    /// let mut network = NeuralNet::new(topology);
    /// network.load_weights(&[0.5, -0.25]).unwrap();
    /// assert_eq!(network.weights(), &[0.5, -0.25]);
    ///
    /// assert!(network.load_weights(&[1.0]).is_err());
    /// ```
    pub fn load_weights(&mut self, weights: &[f64]) -> Result<(), NetworkError> {
        if weights.len() != self.weights.len() {
            return Err(NetworkError::WeightCountMismatch {
                expected: self.weights.len(),
                found: weights.len(),
            });
        }
        self.weights.copy_from_slice(weights);
        Ok(())
    }

    /// Returns the flat weight vector, in layout order.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Feeds `inputs` forward through every layer and
    /// returns the output layer's activations, each in `(0, 1)`.
    ///
    /// Each neuron takes the dot product of its weights with the
    /// previous layer's outputs followed by [`BIAS`], then applies
    /// [`sigmoid`].
    ///
    /// # Errors
    /// Returns [`NetworkError::InputCountMismatch`] if `inputs`
    /// isn't exactly [`Topology::input_count`] long.
    ///
    /// # Examples
    /// ```
    /// use sweepnet_nn::networks::{sigmoid, NetworkConfig, NeuralNet, Topology};
    /// use std::num::NonZeroUsize;
    /// use std::sync::Arc;
    ///
    /// let topology = Arc::new(Topology::new(&NetworkConfig {
    ///     input_count: NonZeroUsize::new(2).unwrap(),
    ///     output_count: NonZeroUsize::new(1).unwrap(),
    ///     hidden_layer_count: 0,
    ///     neurons_per_hidden_layer: 0,
    /// }).unwrap());
    ///
    /// // Weights for input 0, input 1, and bias.
    /// let network = NeuralNet::with_weights(topology, &[1.0, 2.0, 0.5]).unwrap();
    /// let output = network.evaluate(&[0.5, 0.25]).unwrap();
    ///
    /// assert_eq!(output, vec![sigmoid(0.5 + 0.5 - 0.5)]);
    /// ```
    pub fn evaluate(&self, inputs: &[f64]) -> Result<Vec<f64>, NetworkError> {
        if inputs.len() != self.topology.input_count() {
            return Err(NetworkError::InputCountMismatch {
                expected: self.topology.input_count(),
                found: inputs.len(),
            });
        }

        let mut passed = inputs.to_vec();
        for layer in self.topology.layers() {
            passed = layer
                .neurons()
                .iter()
                .map(|range| self.activate(&self.weights[range.clone()], &passed))
                .collect();
        }
        Ok(passed)
    }

    /// Activation of a single neuron. The last weight is the bias weight.
    fn activate(&self, weights: &[f64], inputs: &[f64]) -> f64 {
        let (input_weights, bias_weight) = weights.split_at(weights.len() - 1);
        let sum: f64 = input_weights
            .iter()
            .zip(inputs)
            .map(|(w, i)| w * i)
            .sum::<f64>()
            + bias_weight[0] * BIAS;
        sigmoid(sum)
    }
}

impl fmt::Debug for NeuralNet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NeuralNet")
            .field(
                "layers",
                &self
                    .topology
                    .layers()
                    .iter()
                    .map(|l| (l.fan_in(), l.neuron_count()))
                    .collect::<Vec<_>>(),
            )
            .field("weights", &self.weights)
            .finish()
    }
}
