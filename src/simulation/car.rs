//! Vehicle state, kinematics, and the per-tick sense/think/act loop.
//!
//! Cars are rectangles moving on a y-down plane. An AI car senses the road
//! with its [`Sensor`], evaluates its [`NeuralNetwork`] on the normalized
//! readings, and drives with the resulting [`Controls`].

use geo::{Coord, Line};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::carrier::Carrier;
use super::controls::{CONTROL_COUNT, Controls};
use super::error::{DriveError, DriveResult};
use super::geometry::{polygon_touches_segment, polygons_intersect};
use super::network::{NeuralNetwork, evaluate};
use super::sensor::{Outline, Sensor, SensorParams};

/// Who decides a car's controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Driver {
    /// Sensor and network drive the car.
    Ai,
    /// Sensor and network run, but controls are set externally.
    Manual,
    /// No sensor or network; always drives forward.
    Traffic,
}

/// Body and handling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarParams {
    /// Body width.
    pub width: f64,
    /// Body length.
    pub height: f64,
    /// Top forward speed; reverse tops out at two thirds of it.
    pub max_speed: f64,
    /// Speed gained per tick while accelerating.
    pub acceleration: f64,
    /// Speed lost per tick while rolling.
    pub friction: f64,
    /// Heading change per tick while steering.
    pub turn_rate: f64,
}

impl Default for CarParams {
    fn default() -> Self {
        Self {
            width: 30.0,
            height: 50.0,
            max_speed: 3.0,
            acceleration: 0.2,
            friction: 0.05,
            turn_rate: 0.03,
        }
    }
}

impl CarParams {
    /// Checks that the body and handling values are usable.
    pub fn validate(&self) -> DriveResult<()> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("max_speed", self.max_speed),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(DriveError::invalid_params(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        let non_negative = [
            ("acceleration", self.acceleration),
            ("friction", self.friction),
            ("turn_rate", self.turn_rate),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(DriveError::invalid_params(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Sensor and network pair owned by a car.
#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Ray fan mounted on the car.
    pub sensor: Sensor,
    /// Network mapping readings to controls.
    pub brain: NeuralNetwork,
}

impl Autopilot {
    /// Pairs a sensor with a network, checking that they fit together.
    ///
    /// The network must take one input per ray and produce one output per control.
    pub fn new(sensor: Sensor, brain: NeuralNetwork) -> DriveResult<Self> {
        if brain.input_count() != sensor.ray_count() {
            return Err(DriveError::invalid_architecture(format!(
                "network takes {} inputs but the sensor has {} rays",
                brain.input_count(),
                sensor.ray_count()
            )));
        }
        if brain.output_count() != CONTROL_COUNT {
            return Err(DriveError::invalid_architecture(format!(
                "network produces {} outputs, expected {CONTROL_COUNT}",
                brain.output_count()
            )));
        }
        Ok(Self { sensor, brain })
    }

    /// Creates a sensor and a random network with the given hidden layers.
    pub fn new_random(sensor_params: SensorParams, hidden_layers: &[usize]) -> DriveResult<Self> {
        let sensor = Sensor::new(sensor_params)?;
        let brain = NeuralNetwork::new(&brain_layer_sizes(sensor_params.ray_count, hidden_layers))?;
        Self::new(sensor, brain)
    }
}

/// Layer sizes of a vehicle network: `[ray_count, hidden_layers.., 4]`.
pub fn brain_layer_sizes(ray_count: usize, hidden_layers: &[usize]) -> Vec<usize> {
    std::iter::once(ray_count)
        .chain(hidden_layers.iter().copied())
        .chain(std::iter::once(CONTROL_COUNT))
        .collect()
}

/// A simulated car.
#[derive(Debug, Clone)]
pub struct Car {
    /// Centre of the body.
    pub pos: Coord<f64>,
    /// Heading in radians; 0 faces negative y.
    pub angle: f64,
    /// Signed speed along the heading.
    pub speed: f64,
    /// Body and handling parameters.
    pub params: CarParams,
    /// Who decides the controls.
    pub driver: Driver,
    /// Controls applied on the next tick.
    pub controls: Controls,
    /// Set once the body touches a border or traffic; a damaged car stops moving.
    pub damaged: bool,
    outline: Outline,
    autopilot: Option<Autopilot>,
    last_outputs: Option<Array1<f64>>,
}

impl Car {
    /// Creates a car facing up the road.
    ///
    /// `Ai` and `Manual` cars get a sensor and a random network with layers
    /// `[ray_count, hidden_layers.., 4]`; `Traffic` cars get neither and
    /// ignore the sensor arguments.
    pub fn new(
        pos: Coord<f64>,
        driver: Driver,
        params: CarParams,
        sensor_params: SensorParams,
        hidden_layers: &[usize],
    ) -> DriveResult<Self> {
        let autopilot = match driver {
            Driver::Ai | Driver::Manual => {
                Some(Autopilot::new_random(sensor_params, hidden_layers)?)
            }
            Driver::Traffic => None,
        };
        Self::assemble(pos, driver, params, autopilot)
    }

    /// Creates an AI car driven by an existing network.
    pub fn with_brain(
        pos: Coord<f64>,
        params: CarParams,
        sensor_params: SensorParams,
        brain: NeuralNetwork,
    ) -> DriveResult<Self> {
        let autopilot = Autopilot::new(Sensor::new(sensor_params)?, brain)?;
        Self::assemble(pos, Driver::Ai, params, Some(autopilot))
    }

    fn assemble(
        pos: Coord<f64>,
        driver: Driver,
        params: CarParams,
        autopilot: Option<Autopilot>,
    ) -> DriveResult<Self> {
        params.validate()?;
        let controls = match driver {
            Driver::Traffic => Controls::forward_only(),
            Driver::Ai | Driver::Manual => Controls::default(),
        };
        let mut car = Self {
            pos,
            angle: 0.0,
            speed: 0.0,
            params,
            driver,
            controls,
            damaged: false,
            outline: Vec::new(),
            autopilot,
            last_outputs: None,
        };
        car.outline = car.build_outline();
        Ok(car)
    }

    /// Sensor mounted on the car, if it has one.
    pub fn sensor(&self) -> Option<&Sensor> {
        self.autopilot.as_ref().map(|autopilot| &autopilot.sensor)
    }

    /// Network driving the car, if it has one.
    pub fn brain(&self) -> Option<&NeuralNetwork> {
        self.autopilot.as_ref().map(|autopilot| &autopilot.brain)
    }

    /// Network outputs from the last tick.
    pub fn last_outputs(&self) -> Option<&Array1<f64>> {
        self.last_outputs.as_ref()
    }

    /// Advances the car by one tick.
    ///
    /// An undamaged car moves, rebuilds its outline and checks for damage.
    /// Every car with a sensor then senses and evaluates its network; only
    /// `Ai` cars apply the outputs to their controls.
    ///
    /// # Arguments
    ///
    /// * `borders` - Road border segments
    /// * `traffic` - Outlines of the cars this one can hit and see
    pub fn update(&mut self, borders: &[Line<f64>], traffic: &[Outline]) -> DriveResult<()> {
        if !self.damaged {
            self.advance();
            self.outline = self.build_outline();
            self.damaged = self.assess_damage(borders, traffic);
        }

        if let Some(mut autopilot) = self.autopilot.take() {
            autopilot.sensor.update(&*self, borders, traffic);
            let outputs = evaluate(&autopilot.brain, &autopilot.sensor.normalized_readings());
            self.autopilot = Some(autopilot);

            let outputs = outputs?;
            if self.driver == Driver::Ai {
                self.controls = Controls::from_outputs(&outputs)?;
            }
            self.last_outputs = Some(outputs);
        }
        Ok(())
    }

    fn advance(&mut self) {
        self.update_speed();
        self.update_heading();

        self.pos.x -= self.angle.sin() * self.speed;
        self.pos.y -= self.angle.cos() * self.speed;
    }

    fn update_speed(&mut self) {
        let CarParams {
            max_speed,
            acceleration,
            friction,
            ..
        } = self.params;

        if self.controls.forward {
            self.speed += acceleration;
        }
        if self.controls.reverse {
            self.speed -= acceleration;
        }
        self.speed = self.speed.clamp(-max_speed / 1.5, max_speed);

        if self.speed > 0.0 {
            self.speed -= friction;
        } else if self.speed < 0.0 {
            self.speed += friction;
        }
        if self.speed.abs() < friction {
            self.speed = 0.0;
        }
    }

    fn update_heading(&mut self) {
        // steering needs motion, and flips in reverse
        if self.speed == 0.0 {
            return;
        }
        let flip = self.speed.signum();
        if self.controls.left {
            self.angle += self.params.turn_rate * flip;
        }
        if self.controls.right {
            self.angle -= self.params.turn_rate * flip;
        }
    }

    fn build_outline(&self) -> Outline {
        let radius = self.params.width.hypot(self.params.height) / 2.0;
        let alpha = self.params.width.atan2(self.params.height);
        let corner = |theta: f64| Coord {
            x: self.pos.x - theta.sin() * radius,
            y: self.pos.y - theta.cos() * radius,
        };

        vec![
            corner(self.angle - alpha),
            corner(self.angle + alpha),
            corner(std::f64::consts::PI + self.angle - alpha),
            corner(std::f64::consts::PI + self.angle + alpha),
        ]
    }

    fn assess_damage(&self, borders: &[Line<f64>], traffic: &[Outline]) -> bool {
        borders
            .iter()
            .any(|border| polygon_touches_segment(&self.outline, border))
            || traffic
                .iter()
                .any(|other| polygons_intersect(&self.outline, other))
    }
}

impl Carrier for Car {
    fn position(&self) -> Coord<f64> {
        self.pos
    }

    fn angle(&self) -> f64 {
        self.angle
    }

    fn outline(&self) -> &[Coord<f64>] {
        &self.outline
    }
}
