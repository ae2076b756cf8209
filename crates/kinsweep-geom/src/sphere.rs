//! Sphere primitive, the tool shape moved by a kinematic sweep.

use kinsweep_math::{Point3, Vec3};

use crate::{DoubleBbox, GeomError, Result, Solid};

/// A solid ball: all points within `radius` of `center`.
///
/// The radius is fixed at construction. The center can be moved with
/// [`set_center`](Sphere::set_center); the cached bounding box always equals
/// the box computed from the current center.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    center: Point3,
    radius: f64,
    bbox: DoubleBbox,
}

impl Sphere {
    /// Create a sphere.
    ///
    /// # Errors
    ///
    /// Returns [`GeomError::InvalidConfiguration`] if the radius is negative
    /// or either argument is not finite.
    pub fn new(center: Point3, radius: f64) -> Result<Self> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(GeomError::InvalidConfiguration(format!(
                "sphere radius must be finite and non-negative, got {radius}"
            )));
        }
        if !center.coords.iter().all(|c| c.is_finite()) {
            return Err(GeomError::InvalidConfiguration(format!(
                "sphere center must be finite, got {center}"
            )));
        }
        Ok(Self {
            center,
            radius,
            bbox: Self::compute_bbox(&center, radius),
        })
    }

    /// Current center.
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    /// Radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Move the sphere so its center is at `center`.
    pub fn set_center(&mut self, center: Point3) {
        self.center = center;
        self.bbox = Self::compute_bbox(&center, self.radius);
    }

    fn compute_bbox(center: &Point3, radius: f64) -> DoubleBbox {
        let r = Vec3::repeat(radius);
        DoubleBbox::new(*center - r, *center + r)
    }
}

impl Solid for Sphere {
    fn bbox(&self) -> &DoubleBbox {
        &self.bbox
    }

    fn contains(&self, point: &Point3) -> bool {
        (*point - self.center).norm() <= self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use kinsweep_math::{Dir3, Transform};

    #[test]
    fn test_bbox() {
        let s = Sphere::new(Point3::new(1.0, 2.0, 3.0), 0.5).unwrap();
        assert_eq!(s.bbox().min(), Some(&Point3::new(0.5, 1.5, 2.5)));
        assert_eq!(s.bbox().max(), Some(&Point3::new(1.5, 2.5, 3.5)));
    }

    #[test]
    fn test_contains_closed_boundary() {
        let s = Sphere::new(Point3::new(5.0, 5.0, 5.0), 2.0).unwrap();
        assert!(s.contains(&Point3::new(5.0, 5.0, 5.0)));
        assert!(s.contains(&Point3::new(7.0, 5.0, 5.0)));
        assert!(s.contains(&Point3::new(5.0, 3.0, 5.0)));
        assert!(!s.contains(&Point3::new(7.0 + 1e-9, 5.0, 5.0)));
        assert!(!s.contains(&Point3::new(6.5, 6.5, 5.0)));
    }

    #[test]
    fn test_set_center_matches_fresh_bbox() {
        let mut s = Sphere::new(Point3::new(0.0, 0.0, 0.0), 1.5).unwrap();
        for c in [
            Point3::new(3.0, -2.0, 0.25),
            Point3::new(-10.0, 4.0, 7.0),
            Point3::new(0.1, 0.2, 0.3),
        ] {
            s.set_center(c);
            let fresh = Sphere::new(c, 1.5).unwrap();
            assert_eq!(s.bbox(), fresh.bbox());
            assert_eq!(s.center(), &c);
            assert_relative_eq!(s.radius(), 1.5);
        }
    }

    #[test]
    fn test_contains_is_rotation_invariant() {
        let center = Point3::new(1.0, -2.0, 3.0);
        let s = Sphere::new(center, 2.0).unwrap();
        let axes = [
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(-0.3, 0.8, 0.5),
        ];
        let points = [
            Point3::new(2.0, -1.0, 3.5),
            Point3::new(3.0, -2.0, 3.0),
            Point3::new(1.0, -2.0, 5.1),
            Point3::new(2.5, -0.5, 4.5),
            Point3::new(-0.9, -2.0, 3.0),
        ];
        for axis in axes {
            let axis = Dir3::new_normalize(axis);
            for angle in [0.3, 1.0, 2.5, 4.0] {
                let rot = Transform::rotation_about_point(&center, &axis, angle);
                for p in &points {
                    let q = rot.apply_point(p);
                    // Stay clear of the boundary where rounding could flip the answer
                    let margin = ((p - center).norm() - 2.0).abs();
                    if margin > 1e-9 {
                        assert_eq!(s.contains(p), s.contains(&q), "{p} vs {q}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_zero_radius_contains_only_center() {
        let s = Sphere::new(Point3::new(1.0, 1.0, 1.0), 0.0).unwrap();
        assert!(s.contains(&Point3::new(1.0, 1.0, 1.0)));
        assert!(!s.contains(&Point3::new(1.0, 1.0, 1.001)));
    }

    #[test]
    fn test_invalid_radius() {
        let origin = Point3::origin();
        assert!(matches!(
            Sphere::new(origin, -1.0),
            Err(GeomError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            Sphere::new(origin, f64::NAN),
            Err(GeomError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            Sphere::new(Point3::new(f64::INFINITY, 0.0, 0.0), 1.0),
            Err(GeomError::InvalidConfiguration(_))
        ));
    }
}
