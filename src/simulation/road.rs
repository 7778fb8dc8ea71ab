//! Straight multi-lane road whose borders the sensors and collision checks see.

use geo::{Coord, Line};
use serde::{Deserialize, Serialize};

use super::error::{DriveError, DriveResult};

/// Half the length of the road; large but finite so intersection math stays well-conditioned.
pub const ROAD_EXTENT: f64 = 1_000_000.0;

/// Road layout parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoadParams {
    /// Horizontal centre of the road.
    pub center_x: f64,
    /// Distance between the left and right borders.
    pub width: f64,
    /// Number of lanes.
    pub lane_count: usize,
}

impl Default for RoadParams {
    fn default() -> Self {
        Self {
            center_x: 100.0,
            width: 180.0,
            lane_count: 3,
        }
    }
}

/// A vertical road running along the y axis.
#[derive(Debug, Clone)]
pub struct Road {
    params: RoadParams,
    left: f64,
    right: f64,
    borders: Vec<Line<f64>>,
}

impl Road {
    /// Builds the road and its two border segments.
    pub fn new(params: RoadParams) -> DriveResult<Self> {
        if !(params.width.is_finite() && params.width > 0.0) {
            return Err(DriveError::invalid_params(format!(
                "road width must be positive, got {}",
                params.width
            )));
        }
        if params.lane_count == 0 {
            return Err(DriveError::invalid_params("lane_count must be positive"));
        }

        let left = params.center_x - params.width / 2.0;
        let right = params.center_x + params.width / 2.0;
        let top = -ROAD_EXTENT;
        let bottom = ROAD_EXTENT;

        let borders = vec![
            Line::new(Coord { x: left, y: top }, Coord { x: left, y: bottom }),
            Line::new(Coord { x: right, y: top }, Coord { x: right, y: bottom }),
        ];

        Ok(Self {
            params,
            left,
            right,
            borders,
        })
    }

    /// Layout the road was built from.
    pub fn params(&self) -> &RoadParams {
        &self.params
    }

    /// Left border x coordinate.
    pub fn left(&self) -> f64 {
        self.left
    }

    /// Right border x coordinate.
    pub fn right(&self) -> f64 {
        self.right
    }

    /// Border segments, left then right.
    pub fn borders(&self) -> &[Line<f64>] {
        &self.borders
    }

    /// Horizontal centre of lane `index`; indices past the last lane clamp to it.
    pub fn lane_center(&self, index: usize) -> f64 {
        let lane_width = self.params.width / self.params.lane_count as f64;
        let lane = index.min(self.params.lane_count - 1);
        self.left + lane_width / 2.0 + lane as f64 * lane_width
    }
}
