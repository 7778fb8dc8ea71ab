//! Driving controls produced by a network or set by hand.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::error::{DriveError, DriveResult};

/// Number of network outputs a vehicle brain must produce.
pub const CONTROL_COUNT: usize = 4;

/// The four driving controls, in network output order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    /// Accelerate.
    pub forward: bool,
    /// Steer left (increase the heading angle).
    pub left: bool,
    /// Steer right (decrease the heading angle).
    pub right: bool,
    /// Brake / accelerate backwards.
    pub reverse: bool,
}

impl Controls {
    /// Controls that only hold the accelerator down.
    pub const fn forward_only() -> Self {
        Self {
            forward: true,
            left: false,
            right: false,
            reverse: false,
        }
    }

    /// Maps network outputs `{forward, left, right, reverse}` to controls.
    ///
    /// An output engages its control when it is positive.
    pub fn from_outputs(outputs: &Array1<f64>) -> DriveResult<Self> {
        if outputs.len() != CONTROL_COUNT {
            return Err(DriveError::dimension_mismatch(CONTROL_COUNT, outputs.len()));
        }
        Ok(Self {
            forward: outputs[0] > 0.0,
            left: outputs[1] > 0.0,
            right: outputs[2] > 0.0,
            reverse: outputs[3] > 0.0,
        })
    }

    /// Returns the controls as `0.0`/`1.0` signals in network output order.
    pub fn to_signals(self) -> [f64; CONTROL_COUNT] {
        [self.forward, self.left, self.right, self.reverse].map(|on| if on { 1.0 } else { 0.0 })
    }
}
