//! Plane geometry for the minefield.
use sweepnet_nn::random::RandomSource;

use std::f64::consts::TAU;
use std::ops::{Add, Mul, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Vector2 {
        Vector2 { x, y }
    }

    /// Unit vector a sweeper rotated by `rotation` radians faces.
    /// Rotation 0 faces up the y axis.
    pub fn heading(rotation: f64) -> Vector2 {
        Vector2::new(-rotation.sin(), rotation.cos())
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Same direction, unit length. The zero vector stays zero.
    pub fn normalize(&self) -> Vector2 {
        let length = self.length();
        if length == 0.0 {
            *self
        } else {
            Vector2::new(self.x / length, self.y / length)
        }
    }
}

impl Add for Vector2 {
    type Output = Vector2;

    fn add(self, other: Vector2) -> Vector2 {
        Vector2::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vector2 {
    type Output = Vector2;

    fn sub(self, other: Vector2) -> Vector2 {
        Vector2::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Vector2;

    fn mul(self, factor: f64) -> Vector2 {
        Vector2::new(self.x * factor, self.y * factor)
    }
}

/// The rectangle `[0, width] x [0, height]`, with opposite edges joined.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Bounds {
        Bounds { width, height }
    }

    /// Moves a point that left the field to the opposite edge.
    pub fn wrap(&self, point: Vector2) -> Vector2 {
        Vector2::new(wrap(point.x, self.width), wrap(point.y, self.height))
    }

    pub fn random_point(&self, rng: &mut impl RandomSource) -> Vector2 {
        Vector2::new(rng.uniform() * self.width, rng.uniform() * self.height)
    }

    pub fn random_rotation(rng: &mut impl RandomSource) -> f64 {
        rng.uniform() * TAU
    }
}

fn wrap(value: f64, upper: f64) -> f64 {
    if value < 0.0 {
        upper
    } else if value > upper {
        0.0
    } else {
        value
    }
}

/// Returns the index of the place closest to `from`, and the
/// vector pointing from `from` to it. The first wins a tie.
pub fn closest(from: Vector2, places: &[Vector2]) -> Option<(usize, Vector2)> {
    places
        .iter()
        .map(|place| *place - from)
        .enumerate()
        .min_by(|(_, a), (_, b)| a.length().total_cmp(&b.length()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_starts_up_and_turns_left() {
        let up = Vector2::heading(0.0);
        assert_eq!(up, Vector2::new(-0.0, 1.0));
        let quarter = Vector2::heading(std::f64::consts::FRAC_PI_2);
        assert!((quarter.x + 1.0).abs() < 1e-12);
        assert!(quarter.y.abs() < 1e-12);
    }

    #[test]
    fn normalize() {
        let unit = Vector2::new(3.0, -4.0).normalize();
        assert_eq!(unit, Vector2::new(0.6, -0.8));
        assert_eq!(Vector2::ZERO.normalize(), Vector2::ZERO);
    }

    #[test]
    fn wraps_to_opposite_edge() {
        let bounds = Bounds::new(400.0, 300.0);
        assert_eq!(bounds.wrap(Vector2::new(-0.1, 150.0)), Vector2::new(400.0, 150.0));
        assert_eq!(bounds.wrap(Vector2::new(400.5, 300.1)), Vector2::new(0.0, 0.0));
        assert_eq!(bounds.wrap(Vector2::new(400.0, 0.0)), Vector2::new(400.0, 0.0));
    }

    #[test]
    fn closest_points_toward_target() {
        let places = [
            Vector2::new(10.0, 10.0),
            Vector2::new(1.0, 2.0),
            Vector2::new(-1.0, 2.0),
        ];
        let (index, toward) = closest(Vector2::new(0.0, 0.0), &places).unwrap();
        assert_eq!(index, 1);
        assert_eq!(toward, Vector2::new(1.0, 2.0));
        assert!(closest(Vector2::ZERO, &[]).is_none());
    }
}
