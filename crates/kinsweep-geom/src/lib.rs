#![warn(missing_docs)]

//! Bounding boxes and analytic solids for kinsweep.
//!
//! Provides the axis-aligned [`Bbox`] used both for real-valued geometry
//! and for inclusive voxel-index ranges, the [`Solid`] capability shared by
//! everything that can be tested for point containment, and the two analytic
//! primitives used as cutting tools: [`Sphere`] and [`Cylinder`].
//!
//! # Example
//!
//! ```
//! use kinsweep_geom::{Solid, Sphere};
//! use kinsweep_math::Point3;
//!
//! let mut ball = Sphere::new(Point3::new(0.0, 0.0, 0.0), 2.0).unwrap();
//! assert!(ball.contains(&Point3::new(2.0, 0.0, 0.0)));
//!
//! ball.set_center(Point3::new(10.0, 0.0, 0.0));
//! assert_eq!(ball.bbox().min(), Some(&Point3::new(8.0, -2.0, -2.0)));
//! ```

mod bbox;
mod cylinder;
mod error;
mod solid;
mod sphere;

pub use bbox::{to_grid_bbox, Bbox, Coord, DoubleBbox, GridBbox};
pub use cylinder::Cylinder;
pub use error::{GeomError, Result};
pub use solid::Solid;
pub use sphere::Sphere;
