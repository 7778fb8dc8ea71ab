//! Trait for entities that carry a sensor array.
//!
//! A carrier exposes the pose the sensor casts its rays from, plus the outline
//! other carriers' sensors see as an obstacle.

use geo::Coord;

/// A vehicle-like entity that a [`super::sensor::Sensor`] can be bound to.
///
/// Any type that implements this trait:
/// - Has a position in 2D space
/// - Has a heading in radians; the forward direction is `(-sin(angle), -cos(angle))`,
///   so angle 0 faces "up" (negative y)
/// - Has a closed outline polygon
pub trait Carrier {
    /// Returns the current position, which is also the origin of every ray.
    fn position(&self) -> Coord<f64>;

    /// Returns the current heading in radians.
    fn angle(&self) -> f64;

    /// Returns the current outline polygon.
    fn outline(&self) -> &[Coord<f64>];
}
