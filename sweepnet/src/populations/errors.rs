use sweepnet_nn::networks::NetworkError;

use thiserror::Error;

use std::io;
use std::path::PathBuf;

/// A configuration that can't be used to run evolution.
///
/// Always names the offending parameter-file key.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key}: not found")]
    Missing { key: String },
    #[error("{key}: could not parse {value:?} to {expected}")]
    Unparsable {
        key: String,
        value: String,
        expected: &'static str,
    },
    #[error("{key}: {constraint}")]
    OutOfRange {
        key: String,
        constraint: &'static str,
    },
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error("couldn't read parameter file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ConfigError {
    /// The parameter-file key at fault, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Missing { key } | Self::Unparsable { key, .. } | Self::OutOfRange { key, .. } => {
                Some(key.as_str())
            }
            Self::Network(NetworkError::InvalidConfig { key, .. }) => Some(*key),
            Self::Network(_) | Self::Io { .. } => None,
        }
    }
}
