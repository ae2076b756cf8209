//! Time-sampled sweep of a sphere through a point cloud.

use kinsweep_geom::{DoubleBbox, Solid, Sphere};
use kinsweep_math::Point3;
use serde::Serialize;
use tracing::{debug, info};

use crate::{MotionFunction, PointCloud, Result, SweepError};

/// Slack when counting time steps, so a domain that is an exact multiple of
/// the step does not gain an extra sample from rounding.
const STEP_EPS: f64 = 1e-9;

/// Summary of one [`KinematicSolid::build`] run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepReport {
    /// Number of sampled poses.
    pub samples: usize,
    /// Voxels whose state was changed to the filler value.
    pub voxels_changed: usize,
    /// Union of the sphere's bounding box over all poses.
    pub swept_bbox: DoubleBbox,
}

/// The volume traced by a sphere moving along a motion function.
///
/// Borrows the cloud and the sphere mutably for its whole lifetime. The
/// sphere's center at construction is the origin the motion's displacements
/// are added to. After [`build`](Self::build) the cloud holds the swept
/// result and the sphere is left at its last sampled pose.
///
/// As a [`Solid`] it only reports the swept bounding box; `contains` is
/// always `false`.
pub struct KinematicSolid<'a> {
    points: &'a mut PointCloud,
    sphere: &'a mut Sphere,
    motion: &'a dyn MotionFunction,
    delta_t: f64,
    filler: bool,
    origin: Point3,
    bbox: DoubleBbox,
}

impl<'a> KinematicSolid<'a> {
    /// Set up a sweep of `sphere` through `points`.
    ///
    /// `filler = false` erases swept voxels from the cloud, `true` sets them.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::InvalidConfiguration`] if `delta_t` is not a
    /// positive finite number.
    pub fn new(
        points: &'a mut PointCloud,
        sphere: &'a mut Sphere,
        motion: &'a dyn MotionFunction,
        delta_t: f64,
        filler: bool,
    ) -> Result<Self> {
        if !delta_t.is_finite() || delta_t <= 0.0 {
            return Err(SweepError::InvalidConfiguration(format!(
                "time step must be positive, got {delta_t}"
            )));
        }
        let origin = *sphere.center();
        Ok(Self {
            points,
            sphere,
            motion,
            delta_t,
            filler,
            origin,
            bbox: DoubleBbox::invalid(),
        })
    }

    /// Time step between sampled poses.
    pub fn delta_t(&self) -> f64 {
        self.delta_t
    }

    /// Value written into swept voxels.
    pub fn filler(&self) -> bool {
        self.filler
    }

    /// The cloud being swept.
    pub fn points(&self) -> &PointCloud {
        &*self.points
    }

    /// The moving sphere.
    pub fn sphere(&self) -> &Sphere {
        &*self.sphere
    }

    /// Check the motion's domain and plan the samples over it.
    fn sampling(&self) -> Result<Sampling> {
        let (begin, end) = self.motion.domain();
        if !begin.is_finite() || !end.is_finite() {
            return Err(SweepError::InvalidGeometry(format!(
                "motion domain must be finite, got [{begin}, {end}]"
            )));
        }
        if end < begin {
            return Err(SweepError::InvalidGeometry(format!(
                "motion domain is empty: [{begin}, {end}]"
            )));
        }

        let steps = ((end - begin) / self.delta_t - STEP_EPS).ceil().max(0.0);
        // Keeps the cast exact and `steps + 1` in range
        if steps >= usize::MAX as f64 {
            return Err(SweepError::InvalidConfiguration(format!(
                "time step {} is too small for the domain [{begin}, {end}]",
                self.delta_t
            )));
        }
        Ok(Sampling {
            begin,
            end,
            delta_t: self.delta_t,
            steps: steps as usize,
        })
    }

    /// Run the sweep.
    ///
    /// Each sampled pose moves the sphere to `origin + motion(t)` and sets
    /// every voxel inside it to the filler value. Calling `build` again
    /// repeats the sweep from the same origin.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::InvalidGeometry`] if the motion's domain is not
    /// finite or ends before it begins, and
    /// [`SweepError::InvalidConfiguration`] if the time step is too small to
    /// count the samples. The cloud is untouched in both cases.
    pub fn build(&mut self) -> Result<SweepReport> {
        let sampling = self.sampling()?;
        info!(
            samples = sampling.len(),
            delta_t = self.delta_t,
            filler = self.filler,
            "sweeping sphere through point cloud"
        );

        self.bbox = DoubleBbox::invalid();
        let mut voxels_changed = 0;
        for t in sampling.times() {
            let center = self.origin + self.motion.evaluate(t);
            self.sphere.set_center(center);
            self.bbox.merge(self.sphere.bbox());

            let changed = self.points.fill_solid(&*self.sphere, self.filler);
            debug!(t, %center, changed, "sampled pose");
            voxels_changed += changed;
        }

        info!(voxels_changed, "sweep complete");
        Ok(SweepReport {
            samples: sampling.len(),
            voxels_changed,
            swept_bbox: self.bbox,
        })
    }
}

/// Sample times `begin`, `begin + dt`, ... with the last one at exactly `end`.
struct Sampling {
    begin: f64,
    end: f64,
    delta_t: f64,
    steps: usize,
}

impl Sampling {
    fn len(&self) -> usize {
        self.steps + 1
    }

    fn times(&self) -> impl Iterator<Item = f64> + '_ {
        (0..=self.steps).map(move |i| {
            if i == self.steps {
                self.end
            } else {
                (self.begin + i as f64 * self.delta_t).min(self.end)
            }
        })
    }
}

impl Solid for KinematicSolid<'_> {
    fn bbox(&self) -> &DoubleBbox {
        &self.bbox
    }

    fn contains(&self, _point: &Point3) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConstantMotion, FnMotion, LinearMotion, PolylineMotion};
    use approx::assert_relative_eq;
    use kinsweep_math::{grid_to_real, GridPoint, Vec3};

    fn cube(initial: bool) -> PointCloud {
        PointCloud::with_occupancy(Point3::origin(), 10, 10, 10, 1.0, initial).unwrap()
    }

    fn all_voxels() -> impl Iterator<Item = GridPoint> {
        (0..10u64).flat_map(|k| {
            (0..10u64).flat_map(move |j| (0..10u64).map(move |i| GridPoint::new(i, j, k)))
        })
    }

    fn within(p: &GridPoint, center: &Point3, radius: f64) -> bool {
        nalgebra::distance(&grid_to_real(p), center) <= radius
    }

    #[test]
    fn test_erase_single_pose() {
        let mut cloud = cube(true);
        let center = Point3::new(5.0, 5.0, 5.0);
        let mut sphere = Sphere::new(center, 2.0).unwrap();
        let motion = ConstantMotion::single(Vec3::zeros());

        let report = KinematicSolid::new(&mut cloud, &mut sphere, &motion, 1.0, false)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(report.samples, 1);
        assert_eq!(report.voxels_changed, 33);

        for p in all_voxels() {
            assert_eq!(cloud.get(&p), Some(!within(&p, &center, 2.0)), "voxel {p}");
        }
    }

    #[test]
    fn test_fill_single_pose() {
        let mut cloud = cube(false);
        let center = Point3::new(5.0, 5.0, 5.0);
        let mut sphere = Sphere::new(center, 2.0).unwrap();
        let motion = ConstantMotion::single(Vec3::zeros());

        KinematicSolid::new(&mut cloud, &mut sphere, &motion, 1.0, true)
            .unwrap()
            .build()
            .unwrap();

        for p in all_voxels() {
            assert_eq!(cloud.get(&p), Some(within(&p, &center, 2.0)), "voxel {p}");
        }
        assert_eq!(cloud.occupied_count(), 33);
    }

    #[test]
    fn test_invalid_time_step() {
        let mut cloud = cube(true);
        let mut sphere = Sphere::new(Point3::new(5.0, 5.0, 5.0), 2.0).unwrap();
        let motion = ConstantMotion::single(Vec3::zeros());
        for dt in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                KinematicSolid::new(&mut cloud, &mut sphere, &motion, dt, false),
                Err(SweepError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn test_inverted_domain_leaves_cloud_untouched() {
        let mut cloud = cube(true);
        let mut sphere = Sphere::new(Point3::new(5.0, 5.0, 5.0), 2.0).unwrap();
        let motion = ConstantMotion::new(Vec3::zeros(), 1.0, 0.0);

        let result = KinematicSolid::new(&mut cloud, &mut sphere, &motion, 0.1, false)
            .unwrap()
            .build();
        assert!(matches!(result, Err(SweepError::InvalidGeometry(_))));
        assert_eq!(cloud.occupied_count(), 1000);
    }

    #[test]
    fn test_non_finite_domain() {
        let mut cloud = cube(true);
        let mut sphere = Sphere::new(Point3::new(5.0, 5.0, 5.0), 2.0).unwrap();
        let motion = ConstantMotion::new(Vec3::zeros(), 0.0, f64::INFINITY);

        let result = KinematicSolid::new(&mut cloud, &mut sphere, &motion, 0.1, false)
            .unwrap()
            .build();
        assert!(matches!(result, Err(SweepError::InvalidGeometry(_))));
    }

    #[test]
    fn test_sample_count() {
        let mut cloud = cube(true);
        let mut sphere = Sphere::new(Point3::new(5.0, 5.0, 5.0), 0.1).unwrap();

        // Exact multiple: 0, 0.25, 0.5, 0.75, 1.0
        let exact = ConstantMotion::new(Vec3::zeros(), 0.0, 1.0);
        let mut sweep = KinematicSolid::new(&mut cloud, &mut sphere, &exact, 0.25, false).unwrap();
        assert_eq!(sweep.build().unwrap().samples, 5);

        // Not a multiple: 0, 0.4, 0.8, 1.0
        let mut cloud = cube(true);
        let mut sphere = Sphere::new(Point3::new(5.0, 5.0, 5.0), 0.1).unwrap();
        let ragged = ConstantMotion::new(Vec3::zeros(), 0.0, 1.0);
        let mut sweep = KinematicSolid::new(&mut cloud, &mut sphere, &ragged, 0.4, false).unwrap();
        assert_eq!(sweep.build().unwrap().samples, 4);
    }

    #[test]
    fn test_last_sample_hits_domain_end() {
        let mut cloud = cube(true);
        let mut sphere = Sphere::new(Point3::new(1.0, 5.0, 5.0), 0.5).unwrap();
        let motion = LinearMotion::new(Vec3::zeros(), Vec3::new(7.0, 0.0, 0.0), 0.0, 1.0);

        KinematicSolid::new(&mut cloud, &mut sphere, &motion, 0.3, false)
            .unwrap()
            .build()
            .unwrap();

        assert_relative_eq!(sphere.center().x, 8.0, epsilon = 1e-12);
        assert_eq!(cloud.get(&GridPoint::new(8, 5, 5)), Some(false));
    }

    #[test]
    fn test_step_count_too_large() {
        let mut cloud = cube(true);
        let mut sphere = Sphere::new(Point3::new(5.0, 5.0, 5.0), 2.0).unwrap();
        let motion = ConstantMotion::new(Vec3::zeros(), 0.0, 1.0);

        let result = KinematicSolid::new(&mut cloud, &mut sphere, &motion, 1e-300, false)
            .unwrap()
            .build();
        assert!(matches!(result, Err(SweepError::InvalidConfiguration(_))));
        assert_eq!(cloud.occupied_count(), 1000);
    }

    #[test]
    fn test_end_sampled_when_step_barely_short() {
        // Domain is a hair over four steps; the slack folds the remainder into
        // the last sample, which must still land on the domain end
        let mut cloud = cube(true);
        let mut sphere = Sphere::new(Point3::new(1.0, 5.0, 5.0), 0.5).unwrap();
        let motion = LinearMotion::new(Vec3::zeros(), Vec3::new(8.0, 0.0, 0.0), 0.0, 1.0);

        let dt = 0.25 * (1.0 - 1e-12);
        let report = KinematicSolid::new(&mut cloud, &mut sphere, &motion, dt, false)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(report.samples, 5);
        assert_eq!(sphere.center().x, 9.0);
        assert_eq!(cloud.get(&GridPoint::new(9, 5, 5)), Some(false));
    }

    #[test]
    fn test_linear_channel() {
        let mut cloud = cube(true);
        let mut sphere = Sphere::new(Point3::new(2.0, 5.0, 5.0), 1.0).unwrap();
        let motion = LinearMotion::new(Vec3::zeros(), Vec3::new(5.0, 0.0, 0.0), 0.0, 1.0);

        let report = KinematicSolid::new(&mut cloud, &mut sphere, &motion, 0.1, false)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(report.samples, 11);

        // Axis of the channel is fully cleared
        for i in 1..=8 {
            assert_eq!(cloud.get(&GridPoint::new(i, 5, 5)), Some(false), "x = {i}");
        }
        assert_eq!(cloud.get(&GridPoint::new(0, 5, 5)), Some(true));
        assert_eq!(cloud.get(&GridPoint::new(9, 5, 5)), Some(true));
        // Well off the path
        assert_eq!(cloud.get(&GridPoint::new(5, 8, 5)), Some(true));
        assert_eq!(cloud.get(&GridPoint::new(5, 5, 2)), Some(true));
    }

    #[test]
    fn test_swept_bbox() {
        let mut cloud = cube(true);
        let mut sphere = Sphere::new(Point3::new(2.0, 2.0, 2.0), 1.0).unwrap();
        let motion = PolylineMotion::new(vec![
            (0.0, Vec3::zeros()),
            (1.0, Vec3::new(4.0, 0.0, 0.0)),
            (2.0, Vec3::new(4.0, 3.0, 1.0)),
        ])
        .unwrap();

        let mut sweep = KinematicSolid::new(&mut cloud, &mut sphere, &motion, 0.5, true).unwrap();
        let report = sweep.build().unwrap();
        let bbox = report.swept_bbox;
        assert_eq!(sweep.bbox(), &bbox);

        let min = bbox.min().unwrap();
        let max = bbox.max().unwrap();
        assert_relative_eq!(min.x, 1.0);
        assert_relative_eq!(min.y, 1.0);
        assert_relative_eq!(min.z, 1.0);
        assert_relative_eq!(max.x, 7.0);
        assert_relative_eq!(max.y, 6.0);
        assert_relative_eq!(max.z, 4.0);
    }

    #[test]
    fn test_kinematic_solid_contains_nothing() {
        let mut cloud = cube(true);
        let mut sphere = Sphere::new(Point3::new(5.0, 5.0, 5.0), 2.0).unwrap();
        let motion = ConstantMotion::single(Vec3::zeros());
        let mut sweep = KinematicSolid::new(&mut cloud, &mut sphere, &motion, 1.0, false).unwrap();
        assert!(!sweep.bbox().is_valid());

        sweep.build().unwrap();
        assert!(sweep.bbox().is_valid());
        assert!(!sweep.contains(&Point3::new(5.0, 5.0, 5.0)));
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let mut cloud = cube(true);
        let mut sphere = Sphere::new(Point3::new(3.0, 3.0, 3.0), 1.5).unwrap();
        let motion = FnMotion::new(|t| Vec3::new(t, t, 0.0), 0.0, 3.0);

        let mut sweep = KinematicSolid::new(&mut cloud, &mut sphere, &motion, 0.5, false).unwrap();
        let first = sweep.build().unwrap();
        let second = sweep.build().unwrap();
        assert!(first.voxels_changed > 0);
        assert_eq!(second.voxels_changed, 0);
        assert_eq!(first.swept_bbox, second.swept_bbox);
        assert!(!sweep.filler());
        assert_relative_eq!(sweep.delta_t(), 0.5);
        assert_relative_eq!(sweep.sphere().center().x, 6.0);
        assert_eq!(sweep.points().occupied_count(), 1000 - first.voxels_changed);
    }
}
