#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use selfdrive::simulation::error::DriveError;
use selfdrive::simulation::network::NeuralNetwork;
use selfdrive::simulation::params::{SimulationParams, TrafficSpawn};
use selfdrive::simulation::traffic::Traffic;
use std::fs;

fn create_test_params() -> SimulationParams {
    SimulationParams {
        ai_cars: 12,
        steps: 50,
        traffic: vec![
            TrafficSpawn { lane: 1, y: -100.0 },
            TrafficSpawn { lane: 0, y: -300.0 },
            TrafficSpawn { lane: 2, y: -300.0 },
        ],
        ..SimulationParams::default()
    }
}

#[test]
fn test_world_creation() {
    let params = create_test_params();
    let world = Traffic::new(&params).expect("valid params");

    assert_eq!(world.cars.len(), params.ai_cars);
    assert_eq!(world.traffic.len(), params.traffic.len());
    assert_eq!(world.ticks, 0);
    assert_eq!(world.damaged_count(), 0);

    for car in &world.cars {
        assert_eq!(car.pos.x, world.road.lane_center(params.start_lane));
        assert_eq!(car.pos.y, params.start_y);
        let brain = car.brain().expect("ai cars have a brain");
        assert_eq!(brain.layer_sizes(), params.layer_sizes());
    }
}

#[test]
fn test_default_layer_sizes() {
    let params = SimulationParams::default();
    assert_eq!(params.layer_sizes(), vec![8, 6, 4]);
}

#[test]
fn test_world_steps() {
    let params = create_test_params();
    let mut world = Traffic::new(&params).expect("valid params");
    let traffic_start: Vec<f64> = world.traffic.iter().map(|car| car.pos.y).collect();

    for _ in 0..params.steps {
        world.step().expect("step");
    }

    assert_eq!(world.ticks, params.steps as u64);
    assert!(world.damaged_count() <= world.cars.len());
    assert!(world.best_car().is_some());

    // traffic keeps driving up the road
    for (car, start) in world.traffic.iter().zip(traffic_start) {
        assert!(car.pos.y < start);
    }

    for car in &world.cars {
        let sensor = car.sensor().expect("ai cars have a sensor");
        let readings = sensor.normalized_readings();
        assert_eq!(readings.len(), params.sensor.ray_count);
        assert!(readings.iter().all(|&v| (0.0..=1.0).contains(&v)));
        assert_eq!(car.last_outputs().map(|o| o.len()), Some(4));
    }
}

#[test]
fn test_best_car_is_furthest_up() {
    let params = create_test_params();
    let mut world = Traffic::new(&params).expect("valid params");

    for _ in 0..20 {
        world.step().expect("step");
    }

    let best = world.best_car().expect("cars exist");
    assert!(world.cars.iter().all(|car| car.pos.y >= best.pos.y));
}

#[test]
fn test_shared_brain_gives_identical_cars() {
    let params = create_test_params();
    let brain = NeuralNetwork::new(&params.layer_sizes()).expect("valid sizes");
    let mut world = Traffic::with_brain(&params, &brain).expect("brain fits");

    for _ in 0..30 {
        world.step().expect("step");
    }

    // same brain, same start, same snapshot: the parallel phase must not diverge
    let first = &world.cars[0];
    for car in &world.cars[1..] {
        assert_eq!(car.pos, first.pos);
        assert_eq!(car.angle, first.angle);
        assert_eq!(car.damaged, first.damaged);
        assert_eq!(car.last_outputs(), first.last_outputs());
    }
}

#[test]
fn test_mismatched_brain_is_rejected() {
    let params = create_test_params();
    let brain = NeuralNetwork::new(&[3, 4]).expect("valid sizes");

    assert!(matches!(
        Traffic::with_brain(&params, &brain),
        Err(DriveError::InvalidArchitecture(_))
    ));
}

#[test]
fn test_invalid_params_are_rejected() {
    let mut params = create_test_params();
    params.sensor.ray_count = 0;
    assert!(matches!(
        Traffic::new(&params),
        Err(DriveError::InvalidParams(_))
    ));

    let mut params = create_test_params();
    params.road.lane_count = 0;
    assert!(matches!(
        Traffic::new(&params),
        Err(DriveError::InvalidParams(_))
    ));

    let mut params = create_test_params();
    params.hidden_layers = vec![0];
    assert!(matches!(
        Traffic::new(&params),
        Err(DriveError::InvalidArchitecture(_))
    ));
}

#[test]
fn test_params_load_with_defaults() {
    let path = "test_params_partial.json";
    fs::write(path, r#"{ "ai_cars": 3, "hidden_layers": [5, 5] }"#).expect("write params");

    let params = SimulationParams::load_from_file(path).expect("Failed to load params");
    assert_eq!(params.ai_cars, 3);
    assert_eq!(params.layer_sizes(), vec![8, 5, 5, 4]);
    assert_eq!(params.road, SimulationParams::default().road);

    fs::remove_file(path).ok();
}

#[test]
fn test_params_roundtrip() {
    let path = "test_params_roundtrip.json";
    let params = create_test_params();
    fs::write(path, serde_json::to_string_pretty(&params).expect("serialize")).expect("write");

    let loaded = SimulationParams::load_from_file(path).expect("Failed to load params");
    assert_eq!(loaded, params);

    fs::remove_file(path).ok();
}

#[test]
fn test_params_load_missing_file() {
    assert!(matches!(
        SimulationParams::load_from_file("does_not_exist.json"),
        Err(DriveError::Io(_))
    ));
}
