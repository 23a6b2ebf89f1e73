use crate::sweeper::{INPUT_COUNT, OUTPUT_COUNT};

use sweepnet::parameters::{constraints, ParameterFile};
use sweepnet::ConfigError;
use sweepnet_nn::networks::{keys as network_keys, NetworkConfig};

/// Parameter-file keys for the simulation.
pub mod keys {
    pub const WINDOW_WIDTH: &str = "iWindowWidth";
    pub const WINDOW_HEIGHT: &str = "iWindowHeight";
    pub const SPEED_SCALE: &str = "iSpeedScale";
    pub const MINES: &str = "iNumMines";
    pub const TICKS: &str = "iNumTicks";
    pub const MAX_TURN_RATE: &str = "dMaxTurnRate";
    pub const MINE_SCALE: &str = "dMineScale";
}

/// Settings of the minefield the sweepers are evaluated in.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationParameters {
    pub window_width: f64,
    pub window_height: f64,
    /// Distance covered per tick at full power on both tracks, halved.
    pub speed_scale: f64,
    pub mine_count: usize,
    pub ticks_per_generation: usize,
    /// Largest rotation per tick, in radians.
    pub max_turn_rate: f64,
    /// How close a sweeper must get to collect a mine.
    pub mine_scale: f64,
}

impl SimulationParameters {
    /// Reads the simulation keys, and checks that `network`
    /// has the sensors and actuators a sweeper uses.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] met.
    pub fn from_file(
        file: &ParameterFile,
        network: &NetworkConfig,
    ) -> Result<SimulationParameters, ConfigError> {
        if network.input_count.get() != INPUT_COUNT {
            return Err(ConfigError::OutOfRange {
                key: network_keys::INPUTS.to_owned(),
                constraint: "must be 4 to drive a sweeper",
            });
        }
        if network.output_count.get() != OUTPUT_COUNT {
            return Err(ConfigError::OutOfRange {
                key: network_keys::OUTPUTS.to_owned(),
                constraint: "must be 2 to drive a sweeper",
            });
        }

        Ok(SimulationParameters {
            window_width: file.require_nonzero(keys::WINDOW_WIDTH)?.get() as f64,
            window_height: file.require_nonzero(keys::WINDOW_HEIGHT)?.get() as f64,
            speed_scale: file.require_nonzero(keys::SPEED_SCALE)?.get() as f64,
            mine_count: file.require_nonzero(keys::MINES)?.get(),
            ticks_per_generation: file.require_nonzero(keys::TICKS)?.get(),
            max_turn_rate: file.require(keys::MAX_TURN_RATE, constraints::positive())?,
            mine_scale: file.require(keys::MINE_SCALE, constraints::positive())?,
        })
    }
}
