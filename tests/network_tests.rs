#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use ndarray::{Array1, Array2, array};
use selfdrive::simulation::controls::Controls;
use selfdrive::simulation::error::DriveError;
use selfdrive::simulation::network::{Level, NeuralNetwork, evaluate};
use std::fs;

fn unit_network() -> NeuralNetwork {
    let level = Level::from_parts(array![[1.0]], array![0.0]).expect("valid level");
    NeuralNetwork::from_levels(vec![level]).expect("valid network")
}

#[test]
fn test_positive_sum_fires() {
    let network = unit_network();
    let outputs = evaluate(&network, &array![0.6]).expect("matching input");
    assert_eq!(outputs, array![1.0]);
}

#[test]
fn test_negative_sum_stays_off() {
    let network = unit_network();
    let outputs = evaluate(&network, &array![-0.1]).expect("matching input");
    assert_eq!(outputs, array![0.0]);
}

#[test]
fn test_zero_sum_stays_off() {
    let network = unit_network();
    let outputs = evaluate(&network, &array![0.0]).expect("matching input");
    assert_eq!(outputs, array![0.0]);
}

#[test]
fn test_bias_shifts_threshold() {
    let level = Level::from_parts(array![[1.0], [1.0]], array![-0.5, 0.5]).expect("valid level");
    let network = NeuralNetwork::from_levels(vec![level]).expect("valid network");

    let outputs = evaluate(&network, &array![0.4]).expect("matching input");
    assert_eq!(outputs, array![0.0, 1.0]);
}

#[test]
fn test_layers_chain() {
    // first level inverts, second level passes through
    let first = Level::from_parts(array![[-1.0, 0.0], [0.0, -1.0]], array![0.5, 0.5])
        .expect("valid level");
    let second = Level::from_parts(array![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]], array![0.0, 0.0, -1.5])
        .expect("valid level");
    let network = NeuralNetwork::from_levels(vec![first, second]).expect("valid network");

    assert_eq!(network.layer_sizes(), vec![2, 2, 3]);
    let outputs = evaluate(&network, &array![0.0, 1.0]).expect("matching input");
    assert_eq!(outputs, array![1.0, 0.0, 0.0]);
}

#[test]
fn test_input_dimension_mismatch() {
    let network = NeuralNetwork::new(&[3, 4, 4]).expect("valid sizes");
    let result = evaluate(&network, &array![0.1, 0.2]);

    match result {
        Err(DriveError::DimensionMismatch { expected, actual }) => {
            assert_eq!(expected, 3);
            assert_eq!(actual, 2);
        }
        other => panic!("expected dimension mismatch, got {other:?}"),
    }
}

#[test]
fn test_evaluate_is_deterministic() {
    let network = NeuralNetwork::new(&[8, 6, 4]).expect("valid sizes");
    let inputs = array![0.0, 0.1, 0.9, 0.5, 0.0, 0.3, 0.7, 1.0];

    let first = evaluate(&network, &inputs).expect("matching input");
    for _ in 0..10 {
        assert_eq!(evaluate(&network, &inputs).expect("matching input"), first);
    }
    assert_eq!(network.feed_forward(&inputs).expect("matching input"), first);
}

#[test]
fn test_outputs_are_binary() {
    let network = NeuralNetwork::new(&[5, 7, 4]).expect("valid sizes");
    let outputs = evaluate(&network, &array![0.2, 0.4, 0.6, 0.8, 1.0]).expect("matching input");

    assert_eq!(outputs.len(), 4);
    assert!(outputs.iter().all(|&v| v == 0.0 || v == 1.0));
}

#[test]
fn test_random_network_shapes_and_ranges() {
    let network = NeuralNetwork::new(&[8, 6, 4]).expect("valid sizes");

    assert_eq!(network.input_count(), 8);
    assert_eq!(network.output_count(), 4);
    assert_eq!(network.levels().len(), 2);
    assert_eq!(network.levels()[0].weights.dim(), (6, 8));
    assert_eq!(network.levels()[1].biases.len(), 4);

    for level in network.levels() {
        assert!(level.weights.iter().all(|w| (-1.0..=1.0).contains(w)));
        assert!(level.biases.iter().all(|b| (-1.0..=1.0).contains(b)));
    }
}

#[test]
fn test_malformed_networks_fail_at_construction() {
    assert!(matches!(
        NeuralNetwork::new(&[4]),
        Err(DriveError::InvalidArchitecture(_))
    ));
    assert!(matches!(
        NeuralNetwork::new(&[4, 0, 4]),
        Err(DriveError::InvalidArchitecture(_))
    ));
    assert!(matches!(
        NeuralNetwork::from_levels(Vec::new()),
        Err(DriveError::InvalidArchitecture(_))
    ));
    assert!(matches!(
        Level::from_parts(Array2::zeros((2, 3)), Array1::zeros(3)),
        Err(DriveError::InvalidArchitecture(_))
    ));

    let first = Level::new_random(3, 5);
    let second = Level::new_random(4, 2);
    assert!(matches!(
        NeuralNetwork::from_levels(vec![first, second]),
        Err(DriveError::InvalidArchitecture(_))
    ));
}

#[test]
fn test_controls_from_outputs() {
    let controls = Controls::from_outputs(&array![1.0, 0.0, 1.0, 0.0]).expect("four outputs");
    assert_eq!(
        controls,
        Controls {
            forward: true,
            left: false,
            right: true,
            reverse: false,
        }
    );
    assert_eq!(controls.to_signals(), [1.0, 0.0, 1.0, 0.0]);

    assert!(matches!(
        Controls::from_outputs(&array![1.0, 0.0]),
        Err(DriveError::DimensionMismatch {
            expected: 4,
            actual: 2
        })
    ));
}

#[test]
fn test_save_and_load_is_exact() {
    let network = NeuralNetwork::new(&[8, 6, 4]).expect("valid sizes");
    let save_path = "test_network_roundtrip.json";

    network.save_to_file(save_path).expect("Failed to save network");
    let loaded = NeuralNetwork::load_from_file(save_path).expect("Failed to load network");

    assert_eq!(loaded, network);

    fs::remove_file(save_path).ok();
}

#[test]
fn test_load_rejects_inconsistent_levels() {
    let first = Level::new_random(3, 5);
    let second = Level::new_random(4, 2);
    let json = serde_json::json!({ "levels": [first, second] }).to_string();

    let parsed: Result<NeuralNetwork, _> = serde_json::from_str(&json);
    assert!(parsed.is_err());
}
