//! Loading of whitespace-delimited `key value` parameter files.
//!
//! Every value is parsed and range-checked as it is read, and
//! any failure names its key, so a bad file is rejected before
//! anything starts running.
use crate::populations::{keys as genetic_keys, ConfigError, GeneticConfig, ELITE_SLOTS_OVERFLOW};

use sweepnet_nn::networks::{keys as network_keys, NetworkConfig};

use ahash::RandomState;
use serde::{Deserialize, Serialize};

use std::collections::HashMap;
use std::convert::TryFrom;
use std::fs;
use std::num::NonZeroUsize;
use std::ops::{Rem, Sub};
use std::path::Path;
use std::str::FromStr;

/// A value type that can be read from a parameter file.
pub trait ParameterValue: FromStr + 'static {
    /// How the type is described in parse errors.
    const KIND: &'static str;
}

impl ParameterValue for i64 {
    const KIND: &'static str = "integer";
}

impl ParameterValue for f64 {
    const KIND: &'static str = "float";
}

/// A named predicate over a parameter value.
pub struct Constraint<T> {
    description: &'static str,
    test: Box<dyn Fn(&T) -> bool>,
}

impl<T> Constraint<T> {
    /// Creates a constraint; `description` is what the
    /// error message says the value must satisfy.
    ///
    /// # Examples
    /// ```
    /// use sweepnet::parameters::Constraint;
    ///
    /// let small = Constraint::new("must be below ten", |v: &i64| *v < 10);
    /// assert!(small.check("iSomething", &3).is_ok());
    /// assert_eq!(
    ///     small.check("iSomething", &12).unwrap_err().to_string(),
    ///     "iSomething: must be below ten"
    /// );
    /// ```
    pub fn new(description: &'static str, test: impl Fn(&T) -> bool + 'static) -> Constraint<T> {
        Constraint {
            description,
            test: Box::new(test),
        }
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    /// # Errors
    /// Returns [`ConfigError::OutOfRange`] naming `key`
    /// if `value` doesn't satisfy the constraint.
    pub fn check(&self, key: &str, value: &T) -> Result<(), ConfigError> {
        if (self.test)(value) {
            Ok(())
        } else {
            Err(ConfigError::OutOfRange {
                key: key.to_owned(),
                constraint: self.description,
            })
        }
    }
}

/// Stock constraints.
pub mod constraints {
    use super::*;

    pub fn any<T: 'static>() -> Constraint<T> {
        Constraint::new("any value", |_| true)
    }

    pub fn positive<T: PartialOrd + Default + 'static>() -> Constraint<T> {
        Constraint::new("must be positive", |v: &T| *v > T::default())
    }

    pub fn non_negative<T: PartialOrd + Default + 'static>() -> Constraint<T> {
        Constraint::new("must not be negative", |v: &T| *v >= T::default())
    }

    pub fn unit_interval() -> Constraint<f64> {
        Constraint::new("must be between (inclusive): zero and one", |v: &f64| {
            (0.0..=1.0).contains(v)
        })
    }

    /// The population must exceed the elite slots by
    /// a positive even number.
    pub fn population_size<T>(elite_slots: T) -> Constraint<T>
    where
        T: Copy + PartialOrd + Sub<Output = T> + Rem<Output = T> + From<u8> + 'static,
    {
        Constraint::new(
            "must be bigger than elites*copies by an even number",
            move |size: &T| {
                let two = T::from(2);
                *size >= two
                    && *size - two >= elite_slots
                    && (*size - elite_slots) % two == T::from(0)
            },
        )
    }
}

/// The raw contents of a parameter file.
///
/// Each line holding exactly two whitespace-separated tokens is
/// an entry; any other line is ignored. If a key repeats, the
/// last entry wins.
#[derive(Clone, Debug, Default)]
pub struct ParameterFile {
    entries: HashMap<String, String, RandomState>,
}

impl ParameterFile {
    /// Parses parameter-file text.
    ///
    /// # Examples
    /// ```
    /// use sweepnet::parameters::ParameterFile;
    ///
    /// let file = ParameterFile::parse("iNumSweepers 30\n# a comment line\ndMutationRate   0.1\n");
    /// assert_eq!(file.get("iNumSweepers"), Some("30"));
    /// assert_eq!(file.get("dMutationRate"), Some("0.1"));
    /// assert_eq!(file.len(), 2);
    /// ```
    pub fn parse(text: &str) -> ParameterFile {
        let entries = text
            .lines()
            .filter_map(|line| {
                let mut tokens = line.split_whitespace();
                match (tokens.next(), tokens.next(), tokens.next()) {
                    (Some(key), Some(value), None) => Some((key.to_owned(), value.to_owned())),
                    _ => None,
                }
            })
            .collect();
        ParameterFile { entries }
    }

    /// Reads and parses the file at `path`.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file can't be read.
    pub fn load(path: impl AsRef<Path>) -> Result<ParameterFile, ConfigError> {
        let path = path.as_ref();
        fs::read_to_string(path)
            .map(|text| ParameterFile::parse(&text))
            .map_err(|source| ConfigError::Io {
                path: path.to_owned(),
                source,
            })
    }

    /// Returns the raw value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reads `key` as a `T` satisfying `constraint`.
    ///
    /// # Errors
    /// Returns an error naming `key` if it is missing,
    /// can't be parsed as a `T`, or breaks the constraint.
    ///
    /// # Examples
    /// ```
    /// use sweepnet::parameters::{constraints, ParameterFile};
    ///
    /// let file = ParameterFile::parse("iNumElite -1\ndMutationRate lots");
    ///
    /// let elites = file.require::<i64>("iNumElite", constraints::non_negative());
    /// assert_eq!(elites.unwrap_err().to_string(), "iNumElite: must not be negative");
    ///
    /// let rate = file.require::<f64>("dMutationRate", constraints::unit_interval());
    /// assert_eq!(rate.unwrap_err().to_string(), "dMutationRate: could not parse \"lots\" to float");
    ///
    /// let missing = file.require::<f64>("dCrossoverRate", constraints::any());
    /// assert_eq!(missing.unwrap_err().to_string(), "dCrossoverRate: not found");
    /// ```
    pub fn require<T: ParameterValue>(
        &self,
        key: &str,
        constraint: Constraint<T>,
    ) -> Result<T, ConfigError> {
        let unparsed = self.get(key).ok_or_else(|| ConfigError::Missing {
            key: key.to_owned(),
        })?;
        let value = unparsed
            .parse::<T>()
            .map_err(|_| ConfigError::Unparsable {
                key: key.to_owned(),
                value: unparsed.to_owned(),
                expected: T::KIND,
            })?;
        constraint.check(key, &value)?;
        Ok(value)
    }

    /// Reads `key` as a count, i.e. a non-negative integer
    /// that also satisfies `constraint`.
    ///
    /// # Errors
    /// As [`require`], plus an error if the value is negative.
    ///
    /// [`require`]: ParameterFile::require
    pub fn require_count(&self, key: &str, constraint: Constraint<i64>) -> Result<usize, ConfigError> {
        let value = self.require(key, constraint)?;
        usize::try_from(value).map_err(|_| ConfigError::OutOfRange {
            key: key.to_owned(),
            constraint: "must not be negative",
        })
    }

    /// Reads `key` as a positive count.
    ///
    /// # Errors
    /// As [`require`], plus an error if the value isn't positive.
    ///
    /// [`require`]: ParameterFile::require
    pub fn require_nonzero(&self, key: &str) -> Result<NonZeroUsize, ConfigError> {
        let value = self.require_count(key, constraints::positive())?;
        NonZeroUsize::new(value).ok_or_else(|| ConfigError::OutOfRange {
            key: key.to_owned(),
            constraint: "must be positive",
        })
    }
}

/// The validated parameter set the evolution engine needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    pub network: NetworkConfig,
    pub genetic: GeneticConfig,
}

impl Parameters {
    /// Extracts and validates every engine parameter.
    ///
    /// Keys are checked in order: network shape first, then
    /// the genetic parameters, so the population-size rule can
    /// use the elite counts already read.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] met.
    ///
    /// # Examples
    /// ```
    /// use sweepnet::parameters::{ParameterFile, Parameters};
    ///
    /// let file = ParameterFile::parse(
    ///     "iNumInputs 4
    ///      iNumOutputs 2
    ///      iNumHidden 1
    ///      iNeuronsPerHiddenLayer 6
    ///      iNumElite 4
    ///      iNumCopiesElite 1
    ///      iNumSweepers 30
    ///      dCrossoverRate 0.7
    ///      dMutationRate 0.1
    ///      dMaxPerturbation 0.3",
    /// );
    ///
    /// let parameters = Parameters::from_file(&file).unwrap();
    /// assert_eq!(parameters.genetic.population_size, 30);
    /// assert_eq!(parameters.network.number_of_weights(), 6 * 5 + 2 * 7);
    /// ```
    pub fn from_file(file: &ParameterFile) -> Result<Parameters, ConfigError> {
        let input_count = file.require_nonzero(network_keys::INPUTS)?;
        let output_count = file.require_nonzero(network_keys::OUTPUTS)?;
        let hidden_layer_count =
            file.require_count(network_keys::HIDDEN_LAYERS, constraints::non_negative())?;
        let no_hidden = hidden_layer_count == 0;
        let neurons_per_hidden_layer = file.require_count(
            network_keys::NEURONS_PER_HIDDEN_LAYER,
            Constraint::new("must be positive if any hidden", move |n: &i64| {
                no_hidden || *n > 0
            }),
        )?;
        let network = NetworkConfig {
            input_count,
            output_count,
            hidden_layer_count,
            neurons_per_hidden_layer,
        };
        network.validate()?;

        let desired_elites =
            file.require_count(genetic_keys::ELITES, constraints::non_negative())?;
        let copies_per_elite = file.require_nonzero(genetic_keys::COPIES_PER_ELITE)?;
        let elite_slots = (desired_elites as i64)
            .checked_mul(copies_per_elite.get() as i64)
            .ok_or_else(|| ConfigError::OutOfRange {
                key: genetic_keys::ELITES.to_owned(),
                constraint: ELITE_SLOTS_OVERFLOW,
            })?;
        let population_size = file.require_count(
            genetic_keys::POPULATION_SIZE,
            constraints::population_size(elite_slots),
        )?;
        let genetic = GeneticConfig {
            population_size,
            desired_elites,
            copies_per_elite,
            crossover_rate: file.require(genetic_keys::CROSSOVER_RATE, constraints::unit_interval())?,
            mutation_rate: file.require(genetic_keys::MUTATION_RATE, constraints::unit_interval())?,
            max_perturbation: file
                .require(genetic_keys::MAX_PERTURBATION, constraints::non_negative())?,
        };
        genetic.validate()?;

        Ok(Parameters { network, genetic })
    }

    /// Reads, parses and validates the parameter file at `path`.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file can't be read,
    /// or any error [`from_file`] would.
    ///
    /// [`from_file`]: Parameters::from_file
    pub fn load(path: impl AsRef<Path>) -> Result<Parameters, ConfigError> {
        Parameters::from_file(&ParameterFile::load(path)?)
    }
}

impl FromStr for Parameters {
    type Err = ConfigError;

    fn from_str(text: &str) -> Result<Parameters, ConfigError> {
        Parameters::from_file(&ParameterFile::parse(text))
    }
}
