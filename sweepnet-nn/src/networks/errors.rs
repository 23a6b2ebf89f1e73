use thiserror::Error;

/// Errors raised when a network is built
/// or fed data of the wrong shape.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// The network configuration breaks a rule.
    #[error("{key}: {constraint}")]
    InvalidConfig {
        key: &'static str,
        constraint: &'static str,
    },
    /// A flat weight vector didn't match the topology's weight count.
    #[error("weight vector has {found} weights, topology needs {expected}")]
    WeightCountMismatch { expected: usize, found: usize },
    /// An input vector didn't match the network's input count.
    #[error("input vector has {found} values, network takes {expected}")]
    InputCountMismatch { expected: usize, found: usize },
}
