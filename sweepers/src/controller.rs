use crate::params::SimulationParameters;
use crate::sweeper::Sweeper;
use crate::world::{Bounds, Vector2};

use sweepnet::parameters::Parameters;
use sweepnet::{ConfigError, FitnessRecord, GeneticAlgorithm};
use sweepnet_nn::networks::{NetworkError, NeuralNet, Topology};
use sweepnet_nn::random::RandomSource;

use log::debug;

use std::sync::Arc;

/// Runs the sweepers through the minefield and feeds
/// their scores to the genetic algorithm.
///
/// Sweeper `i` always drives genome `i` of the current generation.
pub struct Controller<R> {
    algorithm: GeneticAlgorithm<R>,
    sweepers: Vec<Sweeper>,
    mines: Vec<Vector2>,
    bounds: Bounds,
    simulation: SimulationParameters,
    rng: R,
    ticks: usize,
}

impl<R: RandomSource> Controller<R> {
    /// Builds the first generation and scatters the mines.
    /// Evolution draws from `evolution_rng`; sweeper placement
    /// and mines from `world_rng`.
    ///
    /// # Errors
    /// Returns an error if the parameters are inconsistent.
    pub fn new(
        parameters: Parameters,
        simulation: SimulationParameters,
        evolution_rng: R,
        mut world_rng: R,
    ) -> Result<Controller<R>, ConfigError> {
        let topology = Arc::new(Topology::new(&parameters.network)?);
        let algorithm = GeneticAlgorithm::new(parameters.genetic, &topology, evolution_rng)?;
        let bounds = Bounds::new(simulation.window_width, simulation.window_height);

        let sweepers = algorithm
            .genomes()
            .iter()
            .map(|genome| {
                let brain = NeuralNet::with_weights(topology.clone(), genome.weights())?;
                Ok(Sweeper::new(brain, &bounds, &mut world_rng))
            })
            .collect::<Result<Vec<_>, NetworkError>>()?;
        let mines = (0..simulation.mine_count)
            .map(|_| bounds.random_point(&mut world_rng))
            .collect();

        Ok(Controller {
            algorithm,
            sweepers,
            mines,
            bounds,
            simulation,
            rng: world_rng,
            ticks: 0,
        })
    }

    /// Moves every sweeper once, collecting any mine reached.
    ///
    /// # Errors
    /// Propagates network evaluation errors.
    pub fn tick(&mut self) -> Result<(), NetworkError> {
        for (index, sweeper) in self.sweepers.iter_mut().enumerate() {
            sweeper.update(&self.mines, &self.bounds, &self.simulation)?;
            if let Some(mine) = sweeper.check_for_mine(&self.mines, self.simulation.mine_scale) {
                sweeper.increment_fitness();
                self.mines[mine] = self.bounds.random_point(&mut self.rng);
            }
            self.algorithm.set_fitness(index, sweeper.fitness());
        }
        self.ticks += 1;
        Ok(())
    }

    /// Runs a whole generation's ticks, then evolves.
    ///
    /// # Errors
    /// Propagates network errors.
    pub fn run_generation(&mut self) -> Result<FitnessRecord, NetworkError> {
        while self.ticks < self.simulation.ticks_per_generation {
            self.tick()?;
        }
        self.next_generation()
    }

    /// Evolves the population, loads the new weights
    /// and puts every sweeper back at a random start.
    ///
    /// # Errors
    /// Returns an error if a new chromosome doesn't fit the networks.
    pub fn next_generation(&mut self) -> Result<FitnessRecord, NetworkError> {
        let population = self.algorithm.run_epoch();
        for (sweeper, genome) in self.sweepers.iter_mut().zip(population) {
            sweeper.put_weights(genome.weights())?;
            sweeper.reset(&self.bounds, &mut self.rng);
        }
        self.ticks = 0;

        let record = FitnessRecord {
            best: self.algorithm.best_fitness(),
            median: self.algorithm.median_fitness(),
        };
        debug!(
            "generation {} done, {} mines on the field",
            self.algorithm.generation(),
            self.mines.len()
        );
        Ok(record)
    }

    pub fn algorithm(&self) -> &GeneticAlgorithm<R> {
        &self.algorithm
    }

    #[cfg(test)]
    pub fn sweepers(&self) -> &[Sweeper] {
        &self.sweepers
    }

    #[cfg(test)]
    pub fn mines(&self) -> &[Vector2] {
        &self.mines
    }

    /// Ticks run in the current generation.
    #[cfg(test)]
    pub fn ticks(&self) -> usize {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use sweepnet::parameters::ParameterFile;
    use sweepnet_nn::random::RngSource;

    const PARAMS: &str = include_str!("../params.ini");

    fn controller(seed: u64) -> Controller<RngSource<ChaCha8Rng>> {
        let text = PARAMS.replace("iNumTicks 2000", "iNumTicks 50");
        let file = ParameterFile::parse(&text);
        let parameters = Parameters::from_file(&file).unwrap();
        let simulation = SimulationParameters::from_file(&file, &parameters.network).unwrap();
        Controller::new(
            parameters,
            simulation,
            RngSource::new(ChaCha8Rng::seed_from_u64(seed)),
            RngSource::new(ChaCha8Rng::seed_from_u64(seed + 1)),
        )
        .unwrap()
    }

    #[test]
    fn sweepers_drive_their_genomes() {
        let controller = controller(1);
        assert_eq!(controller.sweepers().len(), 30);
        assert_eq!(controller.mines().len(), 40);
        for (sweeper, genome) in controller.sweepers().iter().zip(controller.algorithm().genomes()) {
            assert_eq!(sweeper.brain().weights(), genome.weights());
        }
    }

    #[test]
    fn ticks_record_fitness() {
        let mut controller = controller(2);
        for _ in 0..50 {
            controller.tick().unwrap();
        }
        assert_eq!(controller.ticks(), 50);
        for (sweeper, genome) in controller.sweepers().iter().zip(controller.algorithm().genomes()) {
            assert_eq!(sweeper.fitness(), genome.fitness());
        }
        assert_eq!(controller.mines().len(), 40);
    }

    #[test]
    fn generation_reloads_and_resets() {
        let mut controller = controller(3);
        let record = controller.run_generation().unwrap();
        assert_eq!(controller.ticks(), 0);
        assert_eq!(controller.algorithm().generation(), 1);
        assert_eq!(controller.algorithm().fitness_history(), &[record]);
        for (sweeper, genome) in controller.sweepers().iter().zip(controller.algorithm().genomes()) {
            assert_eq!(sweeper.fitness(), 0);
            assert_eq!(sweeper.brain().weights(), genome.weights());
        }
    }
}
