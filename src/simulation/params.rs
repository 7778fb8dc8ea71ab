use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::car::{CarParams, brain_layer_sizes};
use super::error::{DriveError, DriveResult};
use super::road::RoadParams;
use super::sensor::SensorParams;

/// A traffic car placed at the start of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrafficSpawn {
    /// Lane index (clamped to the last lane).
    pub lane: usize,
    /// Starting y coordinate; smaller is further up the road.
    pub y: f64,
}

/// Simulation parameters that control a traffic run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// Ray fan of every AI car.
    pub sensor: SensorParams,
    /// Body and handling of AI cars.
    pub car: CarParams,
    /// Road layout.
    pub road: RoadParams,
    /// Hidden layer sizes; the network is `[ray_count, hidden.., 4]`.
    pub hidden_layers: Vec<usize>,
    /// Number of AI cars evaluated side by side.
    pub ai_cars: usize,
    /// Lane the AI cars start in.
    pub start_lane: usize,
    /// Starting y coordinate of the AI cars.
    pub start_y: f64,
    /// Traffic cars.
    pub traffic: Vec<TrafficSpawn>,
    /// Top speed of traffic cars.
    pub traffic_max_speed: f64,
    /// Ticks the binary runs for.
    pub steps: usize,
}

impl Default for SimulationParams {
    fn default() -> Self {
        let traffic = [
            (1, -100.0),
            (0, -300.0),
            (2, -300.0),
            (0, -500.0),
            (1, -500.0),
            (1, -700.0),
            (2, -700.0),
        ]
        .into_iter()
        .map(|(lane, y)| TrafficSpawn { lane, y })
        .collect();

        Self {
            sensor: SensorParams::default(),
            car: CarParams::default(),
            road: RoadParams::default(),
            hidden_layers: vec![6],
            ai_cars: 100,
            start_lane: 1,
            start_y: 100.0,
            traffic,
            traffic_max_speed: 2.0,
            steps: 2000,
        }
    }
}

impl SimulationParams {
    /// Loads parameters from a JSON file; missing fields take their defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> DriveResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&json)?;
        params.validate()?;
        debug!(path = %path.display(), "Loaded simulation params");
        Ok(params)
    }

    /// Checks every nested parameter group.
    pub fn validate(&self) -> DriveResult<()> {
        self.sensor.validate()?;
        self.car.validate()?;
        if self.hidden_layers.contains(&0) {
            return Err(DriveError::invalid_architecture(format!(
                "hidden layer sizes must be positive, got {:?}",
                self.hidden_layers
            )));
        }
        if !(self.traffic_max_speed.is_finite() && self.traffic_max_speed > 0.0) {
            return Err(DriveError::invalid_params(format!(
                "traffic_max_speed must be positive, got {}",
                self.traffic_max_speed
            )));
        }
        Ok(())
    }

    /// Layer sizes of an AI car network: `[ray_count, hidden.., 4]`.
    pub fn layer_sizes(&self) -> Vec<usize> {
        brain_layer_sizes(self.sensor.ray_count, &self.hidden_layers)
    }
}
