use crate::params::SimulationParameters;
use crate::world::{self, Bounds, Vector2};

use sweepnet::Fitness;
use sweepnet_nn::networks::{NetworkError, NeuralNet};
use sweepnet_nn::random::RandomSource;

/// Sensor inputs: direction to the closest mine, then heading.
pub const INPUT_COUNT: usize = 4;
/// Actuator outputs: left and right track power.
pub const OUTPUT_COUNT: usize = 2;

/// A two-tracked vehicle steered by its own network.
#[derive(Clone, Debug)]
pub struct Sweeper {
    brain: NeuralNet,
    position: Vector2,
    rotation: f64,
    look_at: Vector2,
    fitness: Fitness,
    closest_mine: usize,
}

impl Sweeper {
    /// Places a sweeper with `brain` at a random spot and heading.
    ///
    /// # Panics
    /// Panics unless the network maps 4 sensors to 2 tracks.
    pub fn new(brain: NeuralNet, bounds: &Bounds, rng: &mut impl RandomSource) -> Sweeper {
        assert_eq!(brain.topology().input_count(), INPUT_COUNT, "sweeper network inputs");
        assert_eq!(brain.topology().output_count(), OUTPUT_COUNT, "sweeper network outputs");
        let mut sweeper = Sweeper {
            brain,
            position: Vector2::ZERO,
            rotation: 0.0,
            look_at: Vector2::heading(0.0),
            fitness: 0,
            closest_mine: 0,
        };
        sweeper.reset(bounds, rng);
        sweeper
    }

    pub fn reset(&mut self, bounds: &Bounds, rng: &mut impl RandomSource) {
        self.fitness = 0;
        self.rotation = Bounds::random_rotation(rng);
        self.look_at = Vector2::heading(self.rotation);
        self.position = bounds.random_point(rng);
    }

    /// Swaps in a new chromosome.
    ///
    /// # Errors
    /// Returns an error if `weights` doesn't fit the network.
    pub fn put_weights(&mut self, weights: &[f64]) -> Result<(), NetworkError> {
        self.brain.load_weights(weights)
    }

    /// Senses the closest mine, runs the network and
    /// drives one tick's worth.
    ///
    /// # Errors
    /// Propagates network evaluation errors.
    pub fn update(
        &mut self,
        mines: &[Vector2],
        bounds: &Bounds,
        simulation: &SimulationParameters,
    ) -> Result<(), NetworkError> {
        let to_mine = match world::closest(self.position, mines) {
            Some((index, between)) => {
                self.closest_mine = index;
                between.normalize()
            }
            None => Vector2::ZERO,
        };

        let tracks = self
            .brain
            .evaluate(&[to_mine.x, to_mine.y, self.look_at.x, self.look_at.y])?;
        let (left, right) = (tracks[0], tracks[1]);

        let max_turn = simulation.max_turn_rate;
        self.rotation += (left - right).clamp(-max_turn, max_turn);
        let speed = (left + right) * simulation.speed_scale;

        self.look_at = Vector2::heading(self.rotation);
        self.position = bounds.wrap(self.position + self.look_at * speed);
        Ok(())
    }

    /// Returns the index of the mine sensed last update,
    /// if it is now within `reach`.
    pub fn check_for_mine(&self, mines: &[Vector2], reach: f64) -> Option<usize> {
        let mine = mines.get(self.closest_mine)?;
        if (*mine - self.position).length() <= reach {
            Some(self.closest_mine)
        } else {
            None
        }
    }

    pub fn increment_fitness(&mut self) {
        self.fitness += 1;
    }

    pub fn fitness(&self) -> Fitness {
        self.fitness
    }

    #[cfg(test)]
    pub fn position(&self) -> Vector2 {
        self.position
    }

    #[cfg(test)]
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    #[cfg(test)]
    pub fn brain(&self) -> &NeuralNet {
        &self.brain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::num::NonZeroUsize;
    use std::sync::Arc;
    use sweepnet_nn::networks::{NetworkConfig, Topology};
    use sweepnet_nn::random::RngSource;

    fn simulation() -> SimulationParameters {
        SimulationParameters {
            window_width: 400.0,
            window_height: 400.0,
            speed_scale: 2.0,
            mine_count: 1,
            ticks_per_generation: 10,
            max_turn_rate: 0.3,
            mine_scale: 2.0,
        }
    }

    fn topology() -> Arc<Topology> {
        Arc::new(
            Topology::new(&NetworkConfig {
                input_count: NonZeroUsize::new(INPUT_COUNT).unwrap(),
                output_count: NonZeroUsize::new(OUTPUT_COUNT).unwrap(),
                hidden_layer_count: 0,
                neurons_per_hidden_layer: 0,
            })
            .unwrap(),
        )
    }

    fn sweeper(weights: &[f64]) -> Sweeper {
        let brain = NeuralNet::with_weights(topology(), weights).unwrap();
        let bounds = Bounds::new(400.0, 400.0);
        let mut rng = RngSource::new(ChaCha8Rng::seed_from_u64(5));
        let mut sweeper = Sweeper::new(brain, &bounds, &mut rng);
        sweeper.position = Vector2::new(100.0, 100.0);
        sweeper.rotation = 0.0;
        sweeper.look_at = Vector2::heading(0.0);
        sweeper
    }

    #[test]
    fn equal_tracks_drive_straight() {
        // Zero weights give 0.5 on both tracks: speed 2, no turn.
        let mut sweeper = sweeper(&[0.0; 10]);
        let bounds = Bounds::new(400.0, 400.0);
        sweeper
            .update(&[Vector2::new(300.0, 300.0)], &bounds, &simulation())
            .unwrap();
        assert_eq!(sweeper.rotation(), 0.0);
        let position = sweeper.position();
        assert!((position.x - 100.0).abs() < 1e-12);
        assert!((position.y - 102.0).abs() < 1e-12);
    }

    #[test]
    fn turning_is_clamped() {
        // Left track bias drives it to ~1, right to ~0.
        let mut weights = [0.0; 10];
        weights[4] = -50.0;
        weights[9] = 50.0;
        let mut sweeper = sweeper(&weights);
        let bounds = Bounds::new(400.0, 400.0);
        sweeper.update(&[Vector2::ZERO], &bounds, &simulation()).unwrap();
        assert_eq!(sweeper.rotation(), 0.3);
    }

    #[test]
    fn collects_mine_in_reach() {
        let mut sweeper = sweeper(&[0.0; 10]);
        let bounds = Bounds::new(400.0, 400.0);
        let mines = [Vector2::new(50.0, 50.0), Vector2::new(100.0, 103.0)];
        sweeper.update(&mines, &bounds, &simulation()).unwrap();
        assert_eq!(sweeper.check_for_mine(&mines, 2.0), Some(1));
        assert_eq!(sweeper.check_for_mine(&mines[..1], 2.0), None);
    }

    #[test]
    fn reset_clears_fitness() {
        let mut sweeper = sweeper(&[0.0; 10]);
        sweeper.increment_fitness();
        sweeper.increment_fitness();
        assert_eq!(sweeper.fitness(), 2);
        let bounds = Bounds::new(400.0, 400.0);
        sweeper.reset(&bounds, &mut RngSource::seeded(1));
        assert_eq!(sweeper.fitness(), 0);
        let position = sweeper.position();
        assert!((0.0..=400.0).contains(&position.x));
        assert!((0.0..=400.0).contains(&position.y));
    }

    #[test]
    fn weights_must_fit() {
        let mut sweeper = sweeper(&[0.0; 10]);
        assert!(sweeper.put_weights(&[0.0; 9]).is_err());
        sweeper.put_weights(&[0.5; 10]).unwrap();
        assert_eq!(sweeper.brain().weights(), &[0.5; 10]);
    }
}
