//! The capability shared by every region that can be queried for containment.

use kinsweep_math::Point3;

use crate::DoubleBbox;

/// A region of space with a bounding box and a point-containment test.
///
/// Implementors must be `Send + Sync` so voxel passes can test containment
/// from several threads at once.
pub trait Solid: Send + Sync {
    /// Axis-aligned box enclosing the solid. May be invalid for solids that
    /// have not accumulated any extent yet.
    fn bbox(&self) -> &DoubleBbox;

    /// Whether `point` lies inside the solid (boundary included).
    fn contains(&self, point: &Point3) -> bool;
}
