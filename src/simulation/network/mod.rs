//! Feed-forward network that maps sensor readings to control signals.
//!
//! The network is a chain of [`Level`]s with a step activation. Evaluation is
//! a pure function of the network and its inputs, so any number of vehicles
//! can evaluate their own networks in parallel.
//!
//! The step activation is not differentiable; gradient-based training would
//! need a smooth activation instead.

use std::path::Path;

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::{DriveError, DriveResult};

pub mod level;

pub use level::Level;

/// Layered feed-forward network.
///
/// Construction guarantees that every level's output count equals the next
/// level's input count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNetwork")]
pub struct NeuralNetwork {
    levels: Vec<Level>,
}

/// Unchecked wire form; deserialization goes through [`NeuralNetwork::from_levels`].
#[derive(Deserialize)]
struct RawNetwork {
    levels: Vec<Level>,
}

impl TryFrom<RawNetwork> for NeuralNetwork {
    type Error = DriveError;

    fn try_from(raw: RawNetwork) -> DriveResult<Self> {
        Self::from_levels(raw.levels)
    }
}

impl NeuralNetwork {
    /// Creates a new network with random weights.
    ///
    /// `layer_sizes` lists the node count of every layer, inputs first. At
    /// least two sizes are required and none may be zero.
    pub fn new(layer_sizes: &[usize]) -> DriveResult<Self> {
        if layer_sizes.len() < 2 {
            return Err(DriveError::invalid_architecture(format!(
                "need at least an input and an output layer, got {layer_sizes:?}"
            )));
        }
        if layer_sizes.contains(&0) {
            return Err(DriveError::invalid_architecture(format!(
                "layer sizes must be positive, got {layer_sizes:?}"
            )));
        }

        let levels = layer_sizes
            .windows(2)
            .map(|pair| Level::new_random(pair[0], pair[1]))
            .collect();

        Ok(Self { levels })
    }

    /// Creates a network from explicit levels, checking that they chain.
    pub fn from_levels(levels: Vec<Level>) -> DriveResult<Self> {
        if levels.is_empty() {
            return Err(DriveError::invalid_architecture("network has no levels"));
        }
        for level in &levels {
            level.validate()?;
        }
        for (i, pair) in levels.windows(2).enumerate() {
            if pair[0].output_count() != pair[1].input_count() {
                return Err(DriveError::invalid_architecture(format!(
                    "level {i} produces {} outputs but level {} expects {} inputs",
                    pair[0].output_count(),
                    i + 1,
                    pair[1].input_count()
                )));
            }
        }
        Ok(Self { levels })
    }

    /// Ordered levels from input to output.
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Width of the input vector.
    pub fn input_count(&self) -> usize {
        self.levels[0].input_count()
    }

    /// Width of the output vector.
    pub fn output_count(&self) -> usize {
        self.levels[self.levels.len() - 1].output_count()
    }

    /// Node counts of every layer, inputs first.
    pub fn layer_sizes(&self) -> Vec<usize> {
        std::iter::once(self.input_count())
            .chain(self.levels.iter().map(Level::output_count))
            .collect()
    }

    /// Runs a forward pass through every level.
    #[inline]
    pub fn feed_forward(&self, inputs: &Array1<f64>) -> DriveResult<Array1<f64>> {
        let mut levels = self.levels.iter();
        let first = levels.next().map_or_else(
            || Err(DriveError::invalid_architecture("network has no levels")),
            |level| level.forward(inputs),
        )?;
        levels.try_fold(first, |output, level| level.forward(&output))
    }

    /// Saves the network as JSON; weights and biases round-trip exactly.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> DriveResult<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), layers = ?self.layer_sizes(), "Saved network");
        Ok(())
    }

    /// Loads a network saved by [`NeuralNetwork::save_to_file`], re-checking its dimensions.
    pub fn load_from_file(path: impl AsRef<Path>) -> DriveResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let network: Self = serde_json::from_str(&json)?;
        debug!(path = %path.display(), layers = ?network.layer_sizes(), "Loaded network");
        Ok(network)
    }
}

/// Evaluates `network` on `inputs`.
///
/// Fails with [`DriveError::DimensionMismatch`] when `inputs` does not match
/// the first level's input count. Identical arguments always give identical
/// outputs.
pub fn evaluate(network: &NeuralNetwork, inputs: &Array1<f64>) -> DriveResult<Array1<f64>> {
    network.feed_forward(inputs)
}
