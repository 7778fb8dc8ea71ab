//! Traffic world with parallel AI car updates.
//!
//! The world owns the road, the AI cars being evaluated, and the traffic
//! they must avoid. Each step:
//! - Moves traffic cars serially (they only see the borders)
//! - Snapshots traffic outlines
//! - Updates AI cars in parallel using rayon against the shared borders and
//!   the snapshot, so no car reads state another car is writing

use geo::Coord;
use rayon::prelude::*;
use tracing::{debug, info};

use super::car::{Car, CarParams, Driver};
use super::carrier::Carrier;
use super::error::DriveResult;
use super::network::NeuralNetwork;
use super::params::SimulationParams;
use super::road::Road;
use super::sensor::Outline;

/// The main world containing all simulation state.
#[derive(Debug, Clone)]
pub struct Traffic {
    /// Road the cars drive on.
    pub road: Road,
    /// AI cars being evaluated.
    pub cars: Vec<Car>,
    /// Traffic cars to avoid.
    pub traffic: Vec<Car>,
    /// Number of completed steps.
    pub ticks: u64,
}

impl Traffic {
    /// Creates a world with randomly initialized AI cars.
    pub fn new(params: &SimulationParams) -> DriveResult<Self> {
        params.validate()?;
        let road = Road::new(params.road)?;
        let start = Coord {
            x: road.lane_center(params.start_lane),
            y: params.start_y,
        };

        let cars = (0..params.ai_cars)
            .map(|_| {
                Car::new(
                    start,
                    Driver::Ai,
                    params.car,
                    params.sensor,
                    &params.hidden_layers,
                )
            })
            .collect::<DriveResult<Vec<_>>>()?;

        let traffic = spawn_traffic(&road, params)?;

        info!(
            ai_cars = cars.len(),
            traffic = traffic.len(),
            layers = ?params.layer_sizes(),
            "Created traffic world"
        );

        Ok(Self {
            road,
            cars,
            traffic,
            ticks: 0,
        })
    }

    /// Creates a world whose AI cars all start from copies of `brain`.
    pub fn with_brain(params: &SimulationParams, brain: &NeuralNetwork) -> DriveResult<Self> {
        let mut world = Self::new(params)?;
        for car in &mut world.cars {
            *car = Car::with_brain(car.pos, params.car, params.sensor, brain.clone())?;
        }
        Ok(world)
    }

    /// Advances the simulation by one tick.
    ///
    /// Fails if any car's pipeline fails; the step is then abandoned.
    pub fn step(&mut self) -> DriveResult<()> {
        let borders = self.road.borders();

        for car in &mut self.traffic {
            car.update(borders, &[])?;
        }

        let outlines: Vec<Outline> = self
            .traffic
            .iter()
            .map(|car| car.outline().to_vec())
            .collect();

        // parallel phase, each car only touches its own state
        self.cars
            .par_iter_mut()
            .try_for_each(|car| car.update(borders, &outlines))?;

        self.ticks += 1;
        debug!(
            tick = self.ticks,
            damaged = self.damaged_count(),
            "Stepped traffic world"
        );
        Ok(())
    }

    /// The AI car furthest up the road (smallest y), damaged or not.
    pub fn best_car(&self) -> Option<&Car> {
        self.cars
            .iter()
            .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
    }

    /// Number of damaged AI cars.
    pub fn damaged_count(&self) -> usize {
        self.cars.iter().filter(|car| car.damaged).count()
    }
}

fn spawn_traffic(road: &Road, params: &SimulationParams) -> DriveResult<Vec<Car>> {
    let traffic_params = CarParams {
        max_speed: params.traffic_max_speed,
        ..params.car
    };

    params
        .traffic
        .iter()
        .map(|spawn| {
            let pos = Coord {
                x: road.lane_center(spawn.lane),
                y: spawn.y,
            };
            Car::new(pos, Driver::Traffic, traffic_params, params.sensor, &[])
        })
        .collect()
}
