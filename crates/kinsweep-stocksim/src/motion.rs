//! Time-parameterized tool motion.
//!
//! A motion function maps a time value to a displacement of the tool from
//! its starting pose. Every motion has a bounded domain `[begin, end]`; the
//! sweep samples it from `begin` to `end` inclusive.

use kinsweep_math::{Dir3, Transform, Vec3};

use crate::{Result, SweepError};

/// A displacement as a function of time over a bounded domain.
pub trait MotionFunction: Send + Sync {
    /// The time interval `(begin, end)` the function is defined on.
    fn domain(&self) -> (f64, f64);

    /// Displacement of the tool at time `t`.
    ///
    /// Only called with `t` inside [`domain`](Self::domain).
    fn evaluate(&self, t: f64) -> Vec3;
}

/// A motion that stays at a fixed displacement.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantMotion {
    displacement: Vec3,
    begin: f64,
    end: f64,
}

impl ConstantMotion {
    /// Constant displacement over `[begin, end]`.
    pub fn new(displacement: Vec3, begin: f64, end: f64) -> Self {
        Self {
            displacement,
            begin,
            end,
        }
    }

    /// Constant displacement at the single instant `t = 0`.
    pub fn single(displacement: Vec3) -> Self {
        Self::new(displacement, 0.0, 0.0)
    }
}

impl MotionFunction for ConstantMotion {
    fn domain(&self) -> (f64, f64) {
        (self.begin, self.end)
    }

    fn evaluate(&self, _t: f64) -> Vec3 {
        self.displacement
    }
}

/// Straight-line motion at constant speed.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearMotion {
    from: Vec3,
    to: Vec3,
    begin: f64,
    end: f64,
}

impl LinearMotion {
    /// Move from displacement `from` at `begin` to `to` at `end`.
    pub fn new(from: Vec3, to: Vec3, begin: f64, end: f64) -> Self {
        Self {
            from,
            to,
            begin,
            end,
        }
    }
}

impl MotionFunction for LinearMotion {
    fn domain(&self) -> (f64, f64) {
        (self.begin, self.end)
    }

    fn evaluate(&self, t: f64) -> Vec3 {
        let span = self.end - self.begin;
        if span <= 0.0 {
            return self.from;
        }
        let s = ((t - self.begin) / span).clamp(0.0, 1.0);
        self.from.lerp(&self.to, s)
    }
}

/// Piecewise-linear motion through timed waypoints.
#[derive(Debug, Clone, PartialEq)]
pub struct PolylineMotion {
    waypoints: Vec<(f64, Vec3)>,
}

impl PolylineMotion {
    /// Build from `(time, displacement)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::InvalidGeometry`] if there are no waypoints, a
    /// time is not finite, or the times are not strictly increasing.
    pub fn new(waypoints: Vec<(f64, Vec3)>) -> Result<Self> {
        if waypoints.is_empty() {
            return Err(SweepError::InvalidGeometry(
                "polyline motion needs at least one waypoint".into(),
            ));
        }
        if waypoints.iter().any(|(t, _)| !t.is_finite()) {
            return Err(SweepError::InvalidGeometry(
                "waypoint times must be finite".into(),
            ));
        }
        if waypoints.windows(2).any(|w| w[1].0 <= w[0].0) {
            return Err(SweepError::InvalidGeometry(
                "waypoint times must be strictly increasing".into(),
            ));
        }
        Ok(Self { waypoints })
    }

    /// Waypoints in time order.
    pub fn waypoints(&self) -> &[(f64, Vec3)] {
        &self.waypoints
    }
}

impl MotionFunction for PolylineMotion {
    fn domain(&self) -> (f64, f64) {
        // Non-empty by construction
        let first = self.waypoints[0].0;
        let last = self.waypoints[self.waypoints.len() - 1].0;
        (first, last)
    }

    fn evaluate(&self, t: f64) -> Vec3 {
        // First waypoint strictly after t
        let next = self.waypoints.partition_point(|(wt, _)| *wt <= t);
        if next == 0 {
            return self.waypoints[0].1;
        }
        if next == self.waypoints.len() {
            return self.waypoints[next - 1].1;
        }
        let (t0, p0) = self.waypoints[next - 1];
        let (t1, p1) = self.waypoints[next];
        p0.lerp(&p1, (t - t0) / (t1 - t0))
    }
}

/// Rotation of the tool about a fixed axis at constant angular velocity.
///
/// The pivot is given relative to the tool's starting position, so the
/// displacement at `begin` is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitMotion {
    pivot_offset: Vec3,
    axis: Dir3,
    angular_velocity: f64,
    begin: f64,
    end: f64,
}

impl OrbitMotion {
    /// Orbit around `pivot_offset` (relative to the start position) about
    /// `axis`, turning `angular_velocity` radians per time unit.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::InvalidGeometry`] if `axis` has zero length.
    pub fn new(
        pivot_offset: Vec3,
        axis: Vec3,
        angular_velocity: f64,
        begin: f64,
        end: f64,
    ) -> Result<Self> {
        let axis = Dir3::try_new(axis, f64::EPSILON).ok_or_else(|| {
            SweepError::InvalidGeometry("orbit axis has zero length".into())
        })?;
        Ok(Self {
            pivot_offset,
            axis,
            angular_velocity,
            begin,
            end,
        })
    }
}

impl MotionFunction for OrbitMotion {
    fn domain(&self) -> (f64, f64) {
        (self.begin, self.end)
    }

    fn evaluate(&self, t: f64) -> Vec3 {
        let angle = self.angular_velocity * (t - self.begin);
        let rotation = Transform::rotation_about_axis(&self.axis, angle);
        // start -> pivot -> rotated arm
        self.pivot_offset + rotation.apply_vec(&-self.pivot_offset)
    }
}

/// Motion defined by a closure.
pub struct FnMotion<F> {
    f: F,
    begin: f64,
    end: f64,
}

impl<F> FnMotion<F>
where
    F: Fn(f64) -> Vec3 + Send + Sync,
{
    /// Wrap `f` as a motion over `[begin, end]`.
    pub fn new(f: F, begin: f64, end: f64) -> Self {
        Self { f, begin, end }
    }
}

impl<F> MotionFunction for FnMotion<F>
where
    F: Fn(f64) -> Vec3 + Send + Sync,
{
    fn domain(&self) -> (f64, f64) {
        (self.begin, self.end)
    }

    fn evaluate(&self, t: f64) -> Vec3 {
        (self.f)(t)
    }
}
