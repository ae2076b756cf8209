#![warn(missing_docs)]

//! Voxel stock simulation for kinematic sphere sweeps.
//!
//! A rectangular block of stock is sampled as a dense boolean
//! [`PointCloud`]. A [`KinematicSolid`] moves a [`Sphere`](kinsweep_geom::Sphere)
//! along a [`MotionFunction`] and, at every sampled pose, sets the voxels
//! inside the sphere to a filler value: `false` erases the swept volume
//! from the stock, `true` paints it.
//!
//! Accuracy is governed by two knobs, the time step of the sweep and the
//! grid spacing of the cloud. Neither has a derived error bound; smaller
//! values trade run time for fidelity.
//!
//! # Example
//!
//! ```
//! use kinsweep_geom::Sphere;
//! use kinsweep_math::{GridPoint, Point3, Vec3};
//! use kinsweep_stocksim::{KinematicSolid, LinearMotion, PointCloud};
//!
//! // 20 x 10 x 10 block of stock with 1mm spacing
//! let mut stock = PointCloud::new(Point3::origin(), 20, 10, 10, 1.0).unwrap();
//! let mut ball = Sphere::new(Point3::new(2.0, 5.0, 5.0), 2.0).unwrap();
//!
//! // Slide the ball 15mm along +X over one time unit
//! let motion = LinearMotion::new(Vec3::zeros(), Vec3::new(15.0, 0.0, 0.0), 0.0, 1.0);
//!
//! let mut sweep = KinematicSolid::new(&mut stock, &mut ball, &motion, 0.05, false).unwrap();
//! let report = sweep.build().unwrap();
//! assert!(report.voxels_changed > 0);
//!
//! assert_eq!(stock.get(&GridPoint::new(10, 5, 5)), Some(false));
//! ```

mod cloud;
mod kinematic;
mod motion;

pub use cloud::PointCloud;
pub use kinematic::{KinematicSolid, SweepReport};
pub use motion::{
    ConstantMotion, FnMotion, LinearMotion, MotionFunction, OrbitMotion, PolylineMotion,
};

use kinsweep_geom::GeomError;
use thiserror::Error;

/// Errors from stock simulation operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SweepError {
    /// Invalid construction parameters (zero voxel counts, non-positive
    /// spacing or time step, ...).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Malformed geometry or motion domain.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Error constructing a primitive solid.
    #[error(transparent)]
    Geom(#[from] GeomError),
}

/// Result type for stock simulation operations.
pub type Result<T> = std::result::Result<T, SweepError>;
