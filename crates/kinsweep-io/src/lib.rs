#![warn(missing_docs)]

//! Persistence for kinsweep point clouds.
//!
//! Writers consume a [`PointCloud`] through its public accessors only:
//!
//! - [`XyzWriter`] - ASCII `x y z` per occupied voxel, optionally restricted
//!   to the skin (occupied voxels that touch empty space or the grid edge)
//! - [`JsonWriter`] - the full grid (dimensions, spacing, occupancy), readable
//!   back with [`read_json`]
//!
//! # Example
//!
//! ```no_run
//! use kinsweep_io::{CloudFormat, CloudWriter};
//! use kinsweep_math::Point3;
//! use kinsweep_stocksim::PointCloud;
//!
//! let cloud = PointCloud::new(Point3::origin(), 10, 10, 10, 1.0).unwrap();
//! CloudFormat::XyzSkin.writer().write(&cloud, "skin.xyz".as_ref()).unwrap();
//! ```

mod error;
mod json;
mod xyz;

pub use error::{Result, WriteError};
pub use json::{read_json, JsonWriter};
pub use xyz::XyzWriter;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use kinsweep_stocksim::PointCloud;
use serde::{Deserialize, Serialize};

/// Persists a point cloud to a destination file.
pub trait CloudWriter {
    /// Write `cloud` to `destination`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError`] if the file cannot be created or written.
    fn write(&self, cloud: &PointCloud, destination: &Path) -> Result<()>;
}

/// Output formats known to this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CloudFormat {
    /// XYZ points of the skin voxels only.
    #[default]
    XyzSkin,
    /// XYZ points of every occupied voxel.
    Xyz,
    /// Full grid as JSON.
    Json,
}

impl CloudFormat {
    /// Writer for this format.
    pub fn writer(self) -> Box<dyn CloudWriter> {
        match self {
            Self::XyzSkin => Box::new(XyzWriter::skin()),
            Self::Xyz => Box::new(XyzWriter::all()),
            Self::Json => Box::new(JsonWriter::default()),
        }
    }

    /// Guess the format from a file extension. `.xyz` files get the skin.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "xyz" | "pts" | "txt" => Some(Self::XyzSkin),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Guess the format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for CloudFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::XyzSkin => "xyz-skin",
            Self::Xyz => "xyz",
            Self::Json => "json",
        })
    }
}

impl FromStr for CloudFormat {
    type Err = WriteError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "xyz-skin" => Ok(Self::XyzSkin),
            "xyz" => Ok(Self::Xyz),
            "json" => Ok(Self::Json),
            other => Err(WriteError::Format(format!(
                "unknown format '{other}' (expected xyz-skin, xyz or json)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(CloudFormat::from_extension("xyz"), Some(CloudFormat::XyzSkin));
        assert_eq!(CloudFormat::from_extension("XYZ"), Some(CloudFormat::XyzSkin));
        assert_eq!(CloudFormat::from_extension("json"), Some(CloudFormat::Json));
        assert_eq!(CloudFormat::from_extension("stl"), None);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            CloudFormat::from_path(Path::new("/tmp/out.json")),
            Some(CloudFormat::Json)
        );
        assert_eq!(CloudFormat::from_path(Path::new("noextension")), None);
    }

    #[test]
    fn test_format_names() {
        for format in [CloudFormat::XyzSkin, CloudFormat::Xyz, CloudFormat::Json] {
            assert_eq!(format.to_string().parse::<CloudFormat>().unwrap(), format);
        }
        assert!(matches!(
            "ply".parse::<CloudFormat>(),
            Err(WriteError::Format(_))
        ));
    }
}
