//! Finite capped cylinder primitive.

use kinsweep_math::{Point3, Tolerance, Vec3};

use crate::{DoubleBbox, GeomError, Result, Solid, Sphere};

/// A solid cylinder between two end points, with flat caps perpendicular
/// to the axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Cylinder {
    pt1: Point3,
    pt2: Point3,
    axis: Vec3,
    radius: f64,
    /// `radius * |axis|`, compared against the unnormalized cross product.
    radius_mult_axis_length: f64,
    bbox: DoubleBbox,
}

impl Cylinder {
    /// Create a cylinder from `pt1` to `pt2`.
    ///
    /// # Errors
    ///
    /// * [`GeomError::InvalidConfiguration`] if the radius is negative or not finite.
    /// * [`GeomError::InvalidGeometry`] if the end points coincide.
    pub fn new(pt1: Point3, pt2: Point3, radius: f64) -> Result<Self> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(GeomError::InvalidConfiguration(format!(
                "cylinder radius must be finite and non-negative, got {radius}"
            )));
        }
        if Tolerance::DEFAULT.points_equal(&pt1, &pt2) {
            return Err(GeomError::InvalidGeometry(format!(
                "cylinder axis has zero length ({pt1} to {pt2})"
            )));
        }

        let axis = pt2 - pt1;
        // Conservative: the union of the end-sphere boxes
        let bbox = Sphere::new(pt1, radius)?
            .bbox()
            .merged(Sphere::new(pt2, radius)?.bbox());

        Ok(Self {
            pt1,
            pt2,
            axis,
            radius,
            radius_mult_axis_length: radius * axis.norm(),
            bbox,
        })
    }

    /// First end point.
    pub fn pt1(&self) -> &Point3 {
        &self.pt1
    }

    /// Second end point.
    pub fn pt2(&self) -> &Point3 {
        &self.pt2
    }

    /// Radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Solid for Cylinder {
    fn bbox(&self) -> &DoubleBbox {
        &self.bbox
    }

    fn contains(&self, point: &Point3) -> bool {
        let from_pt1 = *point - self.pt1;
        from_pt1.dot(&self.axis) >= 0.0
            && (*point - self.pt2).dot(&self.axis) <= 0.0
            && from_pt1.cross(&self.axis).norm() <= self.radius_mult_axis_length
    }
}
