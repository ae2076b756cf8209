#![warn(missing_docs)]

//! Math types for kinsweep.
//!
//! Thin aliases over nalgebra: real-valued points and vectors for geometry,
//! unsigned grid points for voxel indices, rigid transforms for moving
//! tools, and the linear tolerance used to reject degenerate shapes.

use nalgebra::{Isometry3, Translation3, Unit, UnitQuaternion, Vector3};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// An integer voxel index `(i, j, k)` into a point grid.
pub type GridPoint = nalgebra::Point3<u64>;

/// Convert a grid index to real coordinates (no scaling or offset).
pub fn grid_to_real(p: &GridPoint) -> Point3 {
    p.map(|v| v as f64)
}

/// A rigid motion (rotation then translation) of 3D space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// The underlying isometry.
    pub isometry: Isometry3<f64>,
}

impl Transform {
    /// Translation by `delta`.
    pub fn translation(delta: &Vec3) -> Self {
        Self {
            isometry: Isometry3::from_parts(Translation3::from(*delta), UnitQuaternion::identity()),
        }
    }

    /// Rotation by `angle` radians about `axis` through the origin
    /// (right-handed).
    pub fn rotation_about_axis(axis: &Dir3, angle: f64) -> Self {
        Self {
            isometry: Isometry3::from_parts(
                Translation3::identity(),
                UnitQuaternion::from_axis_angle(axis, angle),
            ),
        }
    }

    /// Rotation by `angle` radians about `axis` through `pivot`.
    pub fn rotation_about_point(pivot: &Point3, axis: &Dir3, angle: f64) -> Self {
        Self::translation(&pivot.coords)
            .then(&Self::rotation_about_axis(axis, angle))
            .then(&Self::translation(&-pivot.coords))
    }

    /// Compose: the result applies `other` first, then `self`.
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            isometry: self.isometry * other.isometry,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        self.isometry.transform_point(p)
    }

    /// Transform a direction vector (ignores translation).
    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        self.isometry.transform_vector(v)
    }
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance.
    pub linear: f64,
}

impl Tolerance {
    /// Default tolerance (1e-9 linear).
    pub const DEFAULT: Self = Self { linear: 1e-9 };

    /// Whether two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        nalgebra::distance(a, b) < self.linear
    }
}
