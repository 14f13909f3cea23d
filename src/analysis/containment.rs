// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Geometric tests of water containment in reference spheres.

use crate::structures::vector3d::Vector3D;

/// Get indices of the reference points that are closer to `candidate` than `radius`.
///
/// A point lying exactly at the distance `radius` from a reference point is not contained.
/// Indices are returned in ascending order.
///
/// ## Example
/// ```
/// # use watrack_rs::analysis::containment::water_in_spheres;
/// # use watrack_rs::structures::vector3d::Vector3D;
/// #
/// let references = [
///     Vector3D::new(0.0, 0.0, 0.0),
///     Vector3D::new(10.0, 10.0, 10.0),
///     Vector3D::new(0.5, 0.0, 0.0),
/// ];
///
/// let slots = water_in_spheres(&Vector3D::new(0.2, 0.0, 0.0), &references, 1.0);
/// assert_eq!(slots, vec![0, 2]);
/// ```
pub fn water_in_spheres(candidate: &Vector3D, references: &[Vector3D], radius: f32) -> Vec<usize> {
    let radius_sq = radius * radius;

    references
        .iter()
        .enumerate()
        .filter(|(_, reference)| candidate.distance_squared(reference) < radius_sq)
        .map(|(index, _)| index)
        .collect()
}

/******************************/
/*         UNIT TESTS         */
/******************************/
