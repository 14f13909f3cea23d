// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Summary statistics of water shifts and positions.

use std::fmt::Display;

use crate::structures::vector3d::Vector3D;

/// Mean and population variance of a set of values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    pub mean: f32,
    pub variance: f32,
}

impl Statistics {
    /// Calculate mean and population variance of the values.
    /// Returns `None` if there are no values.
    ///
    /// ## Example
    /// ```
    /// # use watrack_rs::analysis::statistics::Statistics;
    /// # use float_cmp::assert_approx_eq;
    /// #
    /// let stats = Statistics::from_values(&[1.0, 2.0, 3.0, 4.0]).unwrap();
    /// assert_approx_eq!(f32, stats.mean, 2.5);
    /// assert_approx_eq!(f32, stats.variance, 1.25);
    /// ```
    pub fn from_values(values: &[f32]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let n = values.len() as f64;
        let mean = values.iter().map(|&x| x as f64).sum::<f64>() / n;
        let variance = values
            .iter()
            .map(|&x| (x as f64 - mean).powi(2))
            .sum::<f64>()
            / n;

        Some(Statistics {
            mean: mean as f32,
            variance: variance as f32,
        })
    }
}

impl Display for Statistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "mean {:.3}, variance {:.3}", self.mean, self.variance)
    }
}

/// Statistics of the positions of a single water.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionStatistics {
    /// Mean position (centroid) of the water.
    pub mean: Vector3D,
    /// Population variance of the position along each axis.
    pub variance: Vector3D,
    /// Mean distance of the water from the centroid.
    pub mean_distance: f32,
}

impl PositionStatistics {
    /// Calculate statistics of the positions.
    /// Returns `None` if there are no positions.
    pub fn from_positions(positions: &[Vector3D]) -> Option<Self> {
        let axis = |f: fn(&Vector3D) -> f32| {
            Statistics::from_values(&positions.iter().map(f).collect::<Vec<f32>>())
        };

        let x = axis(|p| p.x)?;
        let y = axis(|p| p.y)?;
        let z = axis(|p| p.z)?;

        let mean = Vector3D::new(x.mean, y.mean, z.mean);
        let distances = positions
            .iter()
            .map(|p| p.distance(&mean))
            .collect::<Vec<f32>>();

        Some(PositionStatistics {
            mean,
            variance: Vector3D::new(x.variance, y.variance, z.variance),
            mean_distance: Statistics::from_values(&distances)?.mean,
        })
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/
