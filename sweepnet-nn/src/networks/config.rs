use super::NetworkError;

use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Parameter-file keys for the network configuration.
pub mod keys {
    pub const INPUTS: &str = "iNumInputs";
    pub const OUTPUTS: &str = "iNumOutputs";
    pub const HIDDEN_LAYERS: &str = "iNumHidden";
    pub const NEURONS_PER_HIDDEN_LAYER: &str = "iNeuronsPerHiddenLayer";
}

/// Shape of a fixed-topology feed-forward network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Number of inputs (sensors).
    pub input_count: NonZeroUsize,
    /// Number of outputs (actuators).
    pub output_count: NonZeroUsize,
    /// Number of hidden layers between inputs and outputs.
    /// May be zero, in which case inputs map straight to outputs.
    pub hidden_layer_count: usize,
    /// Neurons in each hidden layer. Must be positive
    /// if [`hidden_layer_count`] is.
    ///
    /// [`hidden_layer_count`]: NetworkConfig::hidden_layer_count
    pub neurons_per_hidden_layer: usize,
}

impl NetworkConfig {
    /// Checks the one cross-field rule the types can't express.
    ///
    /// # Errors
    /// Returns [`NetworkError::InvalidConfig`] naming
    /// [`keys::NEURONS_PER_HIDDEN_LAYER`] if there are hidden
    /// layers but no neurons to put in them.
    ///
    /// # Examples
    /// ```
    /// use sweepnet_nn::networks::NetworkConfig;
    /// use std::num::NonZeroUsize;
    ///
    /// let config = NetworkConfig {
    ///     input_count: NonZeroUsize::new(4).unwrap(),
    ///     output_count: NonZeroUsize::new(2).unwrap(),
    ///     hidden_layer_count: 1,
    ///     neurons_per_hidden_layer: 0,
    /// };
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), NetworkError> {
        if self.hidden_layer_count > 0 && self.neurons_per_hidden_layer == 0 {
            return Err(NetworkError::InvalidConfig {
                key: keys::NEURONS_PER_HIDDEN_LAYER,
                constraint: "must be positive if any hidden",
            });
        }
        Ok(())
    }

    /// Closed-form count of every weight in the network,
    /// one per input of each neuron plus one for its bias.
    ///
    /// # Examples
    /// ```
    /// use sweepnet_nn::networks::NetworkConfig;
    /// use std::num::NonZeroUsize;
    ///
    /// let config = NetworkConfig {
    ///     input_count: NonZeroUsize::new(4).unwrap(),
    ///     output_count: NonZeroUsize::new(2).unwrap(),
    ///     hidden_layer_count: 1,
    ///     neurons_per_hidden_layer: 6,
    /// };
    /// assert_eq!(config.number_of_weights(), 6 * 5 + 2 * 7);
    /// ```
    pub fn number_of_weights(&self) -> usize {
        let inputs = self.input_count.get();
        let outputs = self.output_count.get();
        let hidden = self.neurons_per_hidden_layer;
        if self.hidden_layer_count == 0 {
            outputs * (inputs + 1)
        } else {
            hidden * (inputs + 1)
                + (self.hidden_layer_count - 1) * hidden * (hidden + 1)
                + outputs * (hidden + 1)
        }
    }
}
