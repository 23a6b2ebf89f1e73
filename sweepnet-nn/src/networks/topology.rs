use super::{NetworkConfig, NetworkError};

use std::ops::Range;

/// The weight layout of one layer: its fan-in, and the
/// slice of the flat weight vector owned by each neuron.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerLayout {
    fan_in: usize,
    neurons: Box<[Range<usize>]>,
}

impl LayerLayout {
    /// Number of values fed into each neuron, excluding the bias.
    pub fn fan_in(&self) -> usize {
        self.fan_in
    }

    /// Number of weights per neuron (fan-in plus bias).
    pub fn weights_per_neuron(&self) -> usize {
        self.fan_in + 1
    }

    /// Number of neurons, which is also the layer's output size.
    pub fn neuron_count(&self) -> usize {
        self.neurons.len()
    }

    /// Flat weight ranges of each neuron, in order.
    pub fn neurons(&self) -> &[Range<usize>] {
        &self.neurons
    }
}

/// Position of a single neuron's weights in the flat layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NeuronSlice {
    pub layer: usize,
    pub neuron: usize,
    pub weights: Range<usize>,
}

/// The shared description of a network's weight layout.
///
/// Weights are flattened layer-major, then neuron-major,
/// then weight-minor, with each neuron's bias weight last.
/// Chromosomes and networks built from the same `Topology`
/// agree on what every flat index means.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Topology {
    input_count: usize,
    output_count: usize,
    layers: Box<[LayerLayout]>,
    weight_count: usize,
}

impl Topology {
    /// Lays out the network described by `config`.
    ///
    /// # Errors
    /// Returns an error if the configuration fails
    /// [`NetworkConfig::validate`].
    ///
    /// # Examples
    /// ```
    /// use sweepnet_nn::networks::{NetworkConfig, Topology};
    /// use std::num::NonZeroUsize;
    ///
    /// let config = NetworkConfig {
    ///     input_count: NonZeroUsize::new(4).unwrap(),
    ///     output_count: NonZeroUsize::new(2).unwrap(),
    ///     hidden_layer_count: 1,
    ///     neurons_per_hidden_layer: 3,
    /// };
    /// let topology = Topology::new(&config).unwrap();
    ///
    /// assert_eq!(topology.layers().len(), 2);
    /// assert_eq!(topology.weight_count(), config.number_of_weights());
    /// // The second neuron of the hidden layer owns weights 5..10.
    /// assert_eq!(topology.layers()[0].neurons()[1], 5..10);
    /// ```
    pub fn new(config: &NetworkConfig) -> Result<Topology, NetworkError> {
        config.validate()?;

        let inputs = config.input_count.get();
        let outputs = config.output_count.get();
        let hidden = config.neurons_per_hidden_layer;

        // (neuron count, fan-in) of each layer.
        let shapes: Vec<(usize, usize)> = if config.hidden_layer_count == 0 {
            vec![(outputs, inputs)]
        } else {
            std::iter::once((hidden, inputs))
                .chain(std::iter::repeat((hidden, hidden)).take(config.hidden_layer_count - 1))
                .chain(std::iter::once((outputs, hidden)))
                .collect()
        };

        let mut next = 0;
        let layers: Box<[LayerLayout]> = shapes
            .into_iter()
            .map(|(neuron_count, fan_in)| LayerLayout {
                fan_in,
                neurons: (0..neuron_count)
                    .map(|_| {
                        let start = next;
                        next += fan_in + 1;
                        start..next
                    })
                    .collect(),
            })
            .collect();

        debug_assert_eq!(next, config.number_of_weights());

        Ok(Topology {
            input_count: inputs,
            output_count: outputs,
            layers,
            weight_count: next,
        })
    }

    /// Total number of weights; the required chromosome length.
    pub fn weight_count(&self) -> usize {
        self.weight_count
    }

    pub fn input_count(&self) -> usize {
        self.input_count
    }

    pub fn output_count(&self) -> usize {
        self.output_count
    }

    /// Layers in evaluation order, output layer last.
    pub fn layers(&self) -> &[LayerLayout] {
        &self.layers
    }

    /// Every neuron's weight slice, in flat-layout order.
    ///
    /// # Examples
    /// ```
    /// use sweepnet_nn::networks::{NetworkConfig, Topology};
    /// use std::num::NonZeroUsize;
    ///
    /// let topology = Topology::new(&NetworkConfig {
    ///     input_count: NonZeroUsize::new(2).unwrap(),
    ///     output_count: NonZeroUsize::new(1).unwrap(),
    ///     hidden_layer_count: 0,
    ///     neurons_per_hidden_layer: 0,
    /// })
    /// .unwrap();
    ///
    /// let slices: Vec<_> = topology.neuron_slices().collect();
    /// assert_eq!(slices.len(), 1);
    /// assert_eq!(slices[0].weights, 0..3);
    /// ```
    pub fn neuron_slices(&self) -> impl Iterator<Item = NeuronSlice> + '_ {
        self.layers.iter().enumerate().flat_map(|(layer, layout)| {
            layout
                .neurons
                .iter()
                .enumerate()
                .map(move |(neuron, weights)| NeuronSlice {
                    layer,
                    neuron,
                    weights: weights.clone(),
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;

    fn topology(inputs: usize, outputs: usize, layers: usize, neurons: usize) -> Topology {
        Topology::new(&NetworkConfig {
            input_count: NonZeroUsize::new(inputs).unwrap(),
            output_count: NonZeroUsize::new(outputs).unwrap(),
            hidden_layer_count: layers,
            neurons_per_hidden_layer: neurons,
        })
        .unwrap()
    }

    #[test]
    fn single_layer_without_hidden() {
        let t = topology(4, 2, 0, 0);
        assert_eq!(t.layers().len(), 1);
        assert_eq!(t.layers()[0].fan_in(), 4);
        assert_eq!(t.layers()[0].neuron_count(), 2);
        assert_eq!(t.layers()[0].neurons(), &[0..5, 5..10]);
        assert_eq!(t.weight_count(), 10);
    }

    #[test]
    fn hidden_layer_shapes() {
        let t = topology(4, 2, 3, 6);
        let shapes: Vec<(usize, usize)> = t
            .layers()
            .iter()
            .map(|l| (l.neuron_count(), l.fan_in()))
            .collect();
        assert_eq!(shapes, [(6, 4), (6, 6), (6, 6), (2, 6)]);
    }

    #[test]
    fn slices_tile_the_flat_layout() {
        let t = topology(3, 2, 2, 4);
        let mut expected_start = 0;
        for slice in t.neuron_slices() {
            assert_eq!(slice.weights.start, expected_start);
            assert_eq!(
                slice.weights.len(),
                t.layers()[slice.layer].weights_per_neuron()
            );
            expected_start = slice.weights.end;
        }
        assert_eq!(expected_start, t.weight_count());
    }

    #[test]
    fn slices_are_layer_then_neuron_ordered() {
        let t = topology(2, 1, 1, 2);
        let order: Vec<(usize, usize)> = t.neuron_slices().map(|s| (s.layer, s.neuron)).collect();
        assert_eq!(order, [(0, 0), (0, 1), (1, 0)]);
    }

    #[test]
    fn rejects_empty_hidden_layers() {
        let config = NetworkConfig {
            input_count: NonZeroUsize::new(4).unwrap(),
            output_count: NonZeroUsize::new(2).unwrap(),
            hidden_layer_count: 1,
            neurons_per_hidden_layer: 0,
        };
        assert!(matches!(
            Topology::new(&config),
            Err(NetworkError::InvalidConfig { .. })
        ));
    }
}
