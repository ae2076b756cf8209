//! Axis-aligned bounding boxes with an explicit empty state.
//!
//! The same type serves two coordinate spaces: real-valued geometry
//! ([`DoubleBbox`]) and inclusive voxel-index ranges ([`GridBbox`]). Extents
//! are inclusive on both ends, so `width()` is `max - min + 1`; for index
//! boxes that is exactly the number of voxels along the axis.

use std::ops::{Add, Sub};

use kinsweep_math::{GridPoint, Point3};
use nalgebra::{Scalar, Vector3};
use num_traits::One;
use serde::{Deserialize, Serialize};

/// Scalar types a [`Bbox`] can be built over.
pub trait Coord: Scalar + Copy + PartialOrd + Add<Output = Self> + Sub<Output = Self> + One {}

impl<T> Coord for T where
    T: Scalar + Copy + PartialOrd + Add<Output = T> + Sub<Output = T> + One
{
}

/// Axis-aligned bounding box.
///
/// A box is either valid, with a min and max corner, or invalid (empty), in
/// which case it has no corners at all. Combining operations treat an
/// invalid box as the identity for [`merge`](Bbox::merge) and as
/// "no overlap" for [`intersects`](Bbox::intersects).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bbox<T: Scalar> {
    extents: Option<(nalgebra::Point3<T>, nalgebra::Point3<T>)>,
}

/// Bounding box over real coordinates.
pub type DoubleBbox = Bbox<f64>;

/// Inclusive bounding box over voxel indices.
pub type GridBbox = Bbox<u64>;

fn lesser<T: PartialOrd>(a: T, b: T) -> T {
    if b < a {
        b
    } else {
        a
    }
}

fn greater<T: PartialOrd>(a: T, b: T) -> T {
    if b > a {
        b
    } else {
        a
    }
}

impl<T: Coord> Bbox<T> {
    /// Create a valid box from its min and max corners.
    ///
    /// Callers pass `min <= max` on every axis.
    pub fn new(min: nalgebra::Point3<T>, max: nalgebra::Point3<T>) -> Self {
        Self {
            extents: Some((min, max)),
        }
    }

    /// Create an invalid (empty) box.
    pub fn invalid() -> Self {
        Self { extents: None }
    }

    /// A degenerate box holding a single point.
    pub fn from_point(p: nalgebra::Point3<T>) -> Self {
        Self::new(p, p)
    }

    /// Whether the box has extents.
    pub fn is_valid(&self) -> bool {
        self.extents.is_some()
    }

    /// Minimum corner, `None` for an invalid box.
    pub fn min(&self) -> Option<&nalgebra::Point3<T>> {
        self.extents.as_ref().map(|(min, _)| min)
    }

    /// Maximum corner, `None` for an invalid box.
    pub fn max(&self) -> Option<&nalgebra::Point3<T>> {
        self.extents.as_ref().map(|(_, max)| max)
    }

    /// Inclusive extent along X (`max.x - min.x + 1`).
    pub fn width(&self) -> Option<T> {
        self.extents.map(|(min, max)| max.x - min.x + T::one())
    }

    /// Inclusive extent along Y (`max.y - min.y + 1`).
    pub fn height(&self) -> Option<T> {
        self.extents.map(|(min, max)| max.y - min.y + T::one())
    }

    /// Inclusive extent along Z (`max.z - min.z + 1`).
    pub fn depth(&self) -> Option<T> {
        self.extents.map(|(min, max)| max.z - min.z + T::one())
    }

    /// Test if two boxes overlap (touching counts as overlap).
    ///
    /// Always false if either box is invalid.
    pub fn intersects(&self, other: &Self) -> bool {
        match (&self.extents, &other.extents) {
            (Some((a_min, a_max)), Some((b_min, b_max))) => {
                a_min.x <= b_max.x
                    && a_max.x >= b_min.x
                    && a_min.y <= b_max.y
                    && a_max.y >= b_min.y
                    && a_min.z <= b_max.z
                    && a_max.z >= b_min.z
            }
            _ => false,
        }
    }

    /// Test if `other` lies entirely inside this box (shared faces allowed).
    ///
    /// Always false if either box is invalid.
    pub fn contains(&self, other: &Self) -> bool {
        match (&self.extents, &other.extents) {
            (Some((a_min, a_max)), Some((b_min, b_max))) => {
                a_min.x <= b_min.x
                    && a_max.x >= b_max.x
                    && a_min.y <= b_min.y
                    && a_max.y >= b_max.y
                    && a_min.z <= b_min.z
                    && a_max.z >= b_max.z
            }
            _ => false,
        }
    }

    /// Test if a point lies inside the box (boundary included).
    pub fn contains_point(&self, p: &nalgebra::Point3<T>) -> bool {
        self.contains(&Self::from_point(*p))
    }

    /// Grow this box to the union of both boxes.
    ///
    /// An invalid `self` adopts `other` verbatim; an invalid `other` leaves
    /// `self` unchanged.
    pub fn merge(&mut self, other: &Self) -> &mut Self {
        self.extents = match (self.extents, other.extents) {
            (Some((a_min, a_max)), Some((b_min, b_max))) => Some((
                nalgebra::Point3::new(
                    lesser(a_min.x, b_min.x),
                    lesser(a_min.y, b_min.y),
                    lesser(a_min.z, b_min.z),
                ),
                nalgebra::Point3::new(
                    greater(a_max.x, b_max.x),
                    greater(a_max.y, b_max.y),
                    greater(a_max.z, b_max.z),
                ),
            )),
            (None, theirs) => theirs,
            (ours, None) => ours,
        };
        self
    }

    /// Shrink this box to the overlap of both boxes.
    ///
    /// If the boxes do not overlap (including when either is invalid) the
    /// result is invalid.
    pub fn intersect(&mut self, other: &Self) -> &mut Self {
        self.extents = match (self.extents, other.extents) {
            (Some((a_min, a_max)), Some((b_min, b_max))) if self.intersects(other) => Some((
                nalgebra::Point3::new(
                    greater(a_min.x, b_min.x),
                    greater(a_min.y, b_min.y),
                    greater(a_min.z, b_min.z),
                ),
                nalgebra::Point3::new(
                    lesser(a_max.x, b_max.x),
                    lesser(a_max.y, b_max.y),
                    lesser(a_max.z, b_max.z),
                ),
            )),
            _ => None,
        };
        self
    }

    /// By-value form of [`merge`](Self::merge).
    pub fn merged(mut self, other: &Self) -> Self {
        self.merge(other);
        self
    }

    /// By-value form of [`intersect`](Self::intersect).
    pub fn intersected(mut self, other: &Self) -> Self {
        self.intersect(other);
        self
    }

    /// Shift both corners by `delta`. Size and validity are unchanged.
    pub fn translate(&mut self, delta: &Vector3<T>) {
        if let Some((min, max)) = self.extents.as_mut() {
            *min = nalgebra::Point3::new(min.x + delta.x, min.y + delta.y, min.z + delta.z);
            *max = nalgebra::Point3::new(max.x + delta.x, max.y + delta.y, max.z + delta.z);
        }
    }
}

impl<T: Coord> Default for Bbox<T> {
    fn default() -> Self {
        Self::invalid()
    }
}

/// Convert a real-valued box to voxel indices for a grid of spacing
/// `grid_delta` anchored at the origin.
///
/// The minimum corner is floored and the maximum ceiled, so the index box is
/// a conservative superset of the real box. Negative coordinates saturate to
/// index 0. An invalid box stays invalid.
pub fn to_grid_bbox(dbb: &DoubleBbox, grid_delta: f64) -> GridBbox {
    match (dbb.min(), dbb.max()) {
        (Some(min), Some(max)) => {
            let min = min.coords / grid_delta;
            let max = max.coords / grid_delta;
            // `as u64` saturates: negatives become 0, NaN becomes 0.
            let umin = GridPoint::new(
                min.x.floor() as u64,
                min.y.floor() as u64,
                min.z.floor() as u64,
            );
            let umax = GridPoint::new(
                max.x.ceil() as u64,
                max.y.ceil() as u64,
                max.z.ceil() as u64,
            );
            GridBbox::new(umin, umax)
        }
        _ => GridBbox::invalid(),
    }
}
