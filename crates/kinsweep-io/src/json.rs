//! Lossless JSON form of a point cloud.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use kinsweep_stocksim::PointCloud;
use tracing::info;

use crate::{CloudWriter, Result};

/// Writes the full grid: reference point, voxel counts, spacing and the
/// occupancy buffer in X-fastest order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonWriter {
    /// Indent the output.
    pub pretty: bool,
}

impl CloudWriter for JsonWriter {
    fn write(&self, cloud: &PointCloud, destination: &Path) -> Result<()> {
        let mut out = BufWriter::new(File::create(destination)?);
        if self.pretty {
            serde_json::to_writer_pretty(&mut out, cloud)?;
        } else {
            serde_json::to_writer(&mut out, cloud)?;
        }
        out.flush()?;
        info!(
            path = %destination.display(),
            voxels = cloud.len(),
            "wrote JSON point cloud"
        );
        Ok(())
    }
}

/// Read a cloud written by [`JsonWriter`].
///
/// # Errors
///
/// Returns [`WriteError::Json`](crate::WriteError::Json) if the file is not
/// valid JSON or its occupancy buffer does not match its dimensions.
pub fn read_json(path: &Path) -> Result<PointCloud> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WriteError;
    use kinsweep_geom::Sphere;
    use kinsweep_math::{GridPoint, Point3};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_json_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cloud.json");

        let mut cloud = PointCloud::new(Point3::new(-1.0, 0.0, 2.5), 6, 5, 4, 0.25).unwrap();
        let ball = Sphere::new(Point3::new(0.0, 0.5, 3.0), 0.5).unwrap();
        assert!(cloud.fill_solid(&ball, false) > 0);

        JsonWriter::default().write(&cloud, &path).unwrap();
        let back = read_json(&path).unwrap();
        assert_eq!(back, cloud);
        assert_eq!(back.get(&GridPoint::new(4, 2, 2)), Some(false));
    }

    #[test]
    fn test_pretty_output_reads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cloud.json");
        let cloud = PointCloud::with_occupancy(Point3::origin(), 2, 2, 2, 1.0, false).unwrap();

        JsonWriter { pretty: true }.write(&cloud, &path).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains('\n'));
        assert_eq!(read_json(&path).unwrap(), cloud);
    }

    #[test]
    fn test_read_rejects_bad_grid() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(
            &path,
            r#"{"reference_point":[0,0,0],"number_x":2,"number_y":2,"number_z":2,
                "grid_delta":1.0,"occupancy":[true,false]}"#,
        )
        .unwrap();
        assert!(matches!(read_json(&path), Err(WriteError::Json(_))));
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            read_json(&dir.path().join("nope.json")),
            Err(WriteError::Io(_))
        ));
    }
}
