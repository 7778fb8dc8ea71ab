//! A single fully connected layer with a step activation.

use ndarray::{Array1, Array2};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use serde::{Deserialize, Serialize};

use super::super::error::{DriveError, DriveResult};

/// One layer of the feed-forward network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Weight matrix (`output_count` × `input_count`).
    pub weights: Array2<f64>,
    /// Bias vector (`output_count`).
    pub biases: Array1<f64>,
}

impl Level {
    /// Creates a new layer with weights and biases drawn uniformly from `[-1, 1]`.
    pub fn new_random(input_count: usize, output_count: usize) -> Self {
        Self {
            weights: Array2::random((output_count, input_count), Uniform::new_inclusive(-1.0, 1.0)),
            biases: Array1::random(output_count, Uniform::new_inclusive(-1.0, 1.0)),
        }
    }

    /// Creates a layer from explicit parameters.
    ///
    /// Fails when the bias length differs from the number of weight rows.
    pub fn from_parts(weights: Array2<f64>, biases: Array1<f64>) -> DriveResult<Self> {
        let level = Self { weights, biases };
        level.validate()?;
        Ok(level)
    }

    pub(crate) fn validate(&self) -> DriveResult<()> {
        if self.biases.len() != self.weights.nrows() {
            return Err(DriveError::invalid_architecture(format!(
                "{} biases for {} outputs",
                self.biases.len(),
                self.weights.nrows()
            )));
        }
        if self.input_count() == 0 || self.output_count() == 0 {
            return Err(DriveError::invalid_architecture(format!(
                "empty layer {}x{}",
                self.output_count(),
                self.input_count()
            )));
        }
        Ok(())
    }

    /// Number of inputs the layer consumes.
    pub fn input_count(&self) -> usize {
        self.weights.ncols()
    }

    /// Number of outputs the layer produces.
    pub fn output_count(&self) -> usize {
        self.weights.nrows()
    }

    /// Performs forward pass with a hard threshold: `1.0` if `bias + w·x > 0`, else `0.0`.
    #[inline]
    pub fn forward(&self, inputs: &Array1<f64>) -> DriveResult<Array1<f64>> {
        if inputs.len() != self.input_count() {
            return Err(DriveError::dimension_mismatch(
                self.input_count(),
                inputs.len(),
            ));
        }

        let mut output = self.weights.dot(inputs);
        output += &self.biases;
        output.mapv_inplace(|sum| if sum > 0.0 { 1.0 } else { 0.0 });
        Ok(output)
    }
}
