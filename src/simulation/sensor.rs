//! Ray-casting sensor array.
//!
//! A sensor owns a fan of rays centred on its carrier's heading. Each tick it
//! recasts the rays from the carrier's pose and keeps the nearest hit per ray
//! against road borders and obstacle outlines.

use geo::{Coord, Line};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::carrier::Carrier;
use super::error::{DriveError, DriveResult};
use super::geometry::{Intersection, lerp, polygon_edges, segment_intersection};

/// Closed polygon outline of an obstacle.
pub type Outline = Vec<Coord<f64>>;

/// Shape of the ray fan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorParams {
    /// Number of rays in the fan.
    pub ray_count: usize,
    /// Length of every ray.
    pub ray_length: f64,
    /// Angle between the outermost rays, in radians.
    pub ray_spread: f64,
}

impl Default for SensorParams {
    fn default() -> Self {
        Self {
            ray_count: 8,
            ray_length: 200.0,
            ray_spread: std::f64::consts::FRAC_PI_2,
        }
    }
}

impl SensorParams {
    /// Checks that the fan is well formed.
    pub fn validate(&self) -> DriveResult<()> {
        if self.ray_count == 0 {
            return Err(DriveError::invalid_params("ray_count must be positive"));
        }
        if !(self.ray_length.is_finite() && self.ray_length > 0.0) {
            return Err(DriveError::invalid_params(format!(
                "ray_length must be positive and finite, got {}",
                self.ray_length
            )));
        }
        if !self.ray_spread.is_finite() {
            return Err(DriveError::invalid_params("ray_spread must be finite"));
        }
        Ok(())
    }
}

/// Sensor array bound to one carrier.
///
/// Holds the rays and readings of the most recent [`Sensor::update`]. Before
/// the first update there are no rays and every reading is `None`.
#[derive(Debug, Clone)]
pub struct Sensor {
    params: SensorParams,
    rays: Vec<Line<f64>>,
    readings: Vec<Option<Intersection>>,
}

impl Sensor {
    /// Creates a sensor with the given fan shape.
    pub fn new(params: SensorParams) -> DriveResult<Self> {
        params.validate()?;
        Ok(Self {
            params,
            rays: Vec::with_capacity(params.ray_count),
            readings: vec![None; params.ray_count],
        })
    }

    /// Returns the fan shape.
    pub fn params(&self) -> &SensorParams {
        &self.params
    }

    /// Returns the number of rays.
    pub fn ray_count(&self) -> usize {
        self.params.ray_count
    }

    /// Rays cast by the last update, ordered from left to right of the heading.
    pub fn rays(&self) -> &[Line<f64>] {
        &self.rays
    }

    /// Nearest hit per ray from the last update.
    pub fn readings(&self) -> &[Option<Intersection>] {
        &self.readings
    }

    /// Recasts the rays from the carrier's pose and recomputes the readings.
    ///
    /// # Arguments
    ///
    /// * `carrier` - The entity the sensor is mounted on
    /// * `borders` - Static road border segments
    /// * `obstacles` - Outlines of other carriers; must not contain the carrier's own outline
    pub fn update<C: Carrier + ?Sized>(
        &mut self,
        carrier: &C,
        borders: &[Line<f64>],
        obstacles: &[Outline],
    ) {
        self.cast_rays(carrier.position(), carrier.angle());
        self.compute_readings(borders, obstacles);
    }

    /// Builds the ray fan around `heading`, starting at `origin`.
    ///
    /// Ray `i` points at `heading + lerp(spread/2, -spread/2, i/(n-1))`; a
    /// single ray points straight ahead.
    pub fn cast_rays(&mut self, origin: Coord<f64>, heading: f64) {
        let SensorParams {
            ray_count,
            ray_length,
            ray_spread,
        } = self.params;

        self.rays.clear();
        self.rays.extend((0..ray_count).map(|i| {
            let t = if ray_count == 1 {
                0.5
            } else {
                i as f64 / (ray_count - 1) as f64
            };
            let ray_angle = lerp(ray_spread / 2.0, -ray_spread / 2.0, t) + heading;

            let end = Coord {
                x: origin.x - ray_angle.sin() * ray_length,
                y: origin.y - ray_angle.cos() * ray_length,
            };
            Line::new(origin, end)
        }));
    }

    /// Resolves the nearest hit along each cast ray.
    ///
    /// Candidates are scanned borders first, then each obstacle's edges in
    /// order. Only a strictly smaller offset replaces the current best, so on
    /// equal offsets the earliest candidate wins.
    pub fn compute_readings(&mut self, borders: &[Line<f64>], obstacles: &[Outline]) {
        if self.rays.is_empty() {
            // nothing cast yet
            self.readings = vec![None; self.params.ray_count];
            return;
        }
        self.readings = self
            .rays
            .iter()
            .map(|ray| nearest_hit(ray, borders, obstacles))
            .collect();
    }

    /// Maps readings to network inputs: `0.0` for no hit, `1 - offset` otherwise.
    ///
    /// Always `ray_count` long with values in `[0, 1]`.
    pub fn normalized_readings(&self) -> Array1<f64> {
        self.readings
            .iter()
            .map(|reading| reading.map_or(0.0, |hit| 1.0 - hit.offset))
            .collect()
    }
}

fn nearest_hit(
    ray: &Line<f64>,
    borders: &[Line<f64>],
    obstacles: &[Outline],
) -> Option<Intersection> {
    let border_hits = borders
        .iter()
        .filter_map(|border| segment_intersection(ray, border));
    let obstacle_hits = obstacles
        .iter()
        .flat_map(|outline| polygon_edges(outline))
        .filter_map(|edge| segment_intersection(ray, &edge));

    border_hits
        .chain(obstacle_hits)
        .fold(None, |best: Option<Intersection>, hit| match best {
            Some(current) if current.offset <= hit.offset => Some(current),
            _ => Some(hit),
        })
}
