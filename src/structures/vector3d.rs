// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of a three-dimensional position vector.

use std::ops::{Add, Deref, DerefMut, Div, Sub};

use nalgebra::base::Vector3;

/// Position of a point in space (in Å) or a displacement between two points.
/// Implemented using `nalgebra`'s Vector3.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Vector3D(pub(crate) Vector3<f32>);

impl From<[f32; 3]> for Vector3D {
    #[inline]
    fn from(arr: [f32; 3]) -> Self {
        Vector3D(Vector3::new(arr[0], arr[1], arr[2]))
    }
}

/// Allows accessing fields of `Vector3D` as `.x`, `.y`, and `.z`.
pub struct Vector3Raw {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Deref for Vector3D {
    type Target = Vector3Raw;

    #[inline]
    fn deref(&self) -> &Self::Target {
        unsafe { &*(self.0.as_ptr() as *const Vector3Raw) }
    }
}

impl DerefMut for Vector3D {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        unsafe { &mut *(self.0.as_mut_ptr() as *mut Vector3Raw) }
    }
}

impl Vector3D {
    /// Create a new `Vector3D` structure.
    #[inline]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Vector3D(Vector3::new(x, y, z))
    }

    /// Calculate length of the vector.
    ///
    /// ## Example
    /// ```
    /// # use watrack_rs::prelude::*;
    /// # use float_cmp::assert_approx_eq;
    /// #
    /// let vector = Vector3D::new(1.0, 2.0, 3.0);
    /// assert_approx_eq!(f32, vector.len(), 3.741657);
    /// ```
    #[inline]
    pub fn len(&self) -> f32 {
        self.0.magnitude()
    }

    /// Calculate squared euclidean distance between two points.
    /// Cheaper than `Vector3D::distance` since no square root is calculated.
    ///
    /// ## Example
    /// ```
    /// # use watrack_rs::prelude::*;
    /// # use float_cmp::assert_approx_eq;
    /// #
    /// let point1 = Vector3D::new(1.0, 2.0, 3.0);
    /// let point2 = Vector3D::new(2.0, 0.0, 3.0);
    ///
    /// assert_approx_eq!(f32, point1.distance_squared(&point2), 5.0);
    /// ```
    #[inline]
    pub fn distance_squared(&self, point: &Vector3D) -> f32 {
        (self.0 - point.0).magnitude_squared()
    }

    /// Calculate euclidean distance between two points.
    /// No periodic boundary conditions are applied.
    ///
    /// ## Example
    /// ```
    /// # use watrack_rs::prelude::*;
    /// # use float_cmp::assert_approx_eq;
    /// #
    /// let point1 = Vector3D::new(1.0, 2.0, 3.0);
    /// let point2 = Vector3D::new(4.0, 6.0, 3.0);
    ///
    /// assert_approx_eq!(f32, point1.distance(&point2), 5.0);
    /// ```
    #[inline]
    pub fn distance(&self, point: &Vector3D) -> f32 {
        (self.0 - point.0).magnitude()
    }

    /// Returns `true` if all coordinates of the vector are zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.x == 0.0 && self.0.y == 0.0 && self.0.z == 0.0
    }

    /// Get the coordinates of the vector as an array.
    #[inline]
    pub fn to_array(&self) -> [f32; 3] {
        [self.0.x, self.0.y, self.0.z]
    }
}

impl Default for Vector3D {
    /// Create a null vector.
    #[inline]
    fn default() -> Self {
        Vector3D::new(0.0, 0.0, 0.0)
    }
}

impl Add for Vector3D {
    type Output = Vector3D;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Vector3D(self.0 + rhs.0)
    }
}

impl Sub for Vector3D {
    type Output = Vector3D;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Vector3D(self.0 - rhs.0)
    }
}

impl Div<f32> for Vector3D {
    type Output = Vector3D;

    #[inline]
    fn div(self, rhs: f32) -> Self::Output {
        Vector3D(self.0 / rhs)
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn deref_fields() {
        let mut vector = Vector3D::new(1.5, -2.0, 0.25);
        assert_approx_eq!(f32, vector.x, 1.5);
        assert_approx_eq!(f32, vector.y, -2.0);
        assert_approx_eq!(f32, vector.z, 0.25);

        vector.y = 4.0;
        assert_eq!(vector.to_array(), [1.5, 4.0, 0.25]);
    }

    #[test]
    fn distance_is_symmetric() {
        let point1 = Vector3D::new(10.0, 10.0, 10.0);
        let point2 = Vector3D::new(10.0, 10.0, 10.1);

        assert_approx_eq!(f32, point1.distance(&point2), 0.1, epsilon = 1e-5);
        assert_approx_eq!(f32, point2.distance(&point1), 0.1, epsilon = 1e-5);
        assert_approx_eq!(
            f32,
            point1.distance_squared(&point2),
            point1.distance(&point2).powi(2),
            epsilon = 1e-6
        );
    }

    #[test]
    fn distance_to_itself() {
        let point = Vector3D::new(-3.2, 7.1, 0.4);
        assert_eq!(point.distance_squared(&point), 0.0);
        assert!((point - point).is_zero());
    }

    #[test]
    fn arithmetics() {
        let sum = Vector3D::new(1.0, 2.0, 3.0) + Vector3D::new(3.0, 2.0, 1.0);
        assert_eq!(sum, Vector3D::new(4.0, 4.0, 4.0));

        let mean = sum / 2.0;
        assert_eq!(mean, Vector3D::new(2.0, 2.0, 2.0));
        assert_approx_eq!(f32, mean.len(), 12.0f32.sqrt());
    }
}
