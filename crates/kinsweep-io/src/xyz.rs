//! ASCII XYZ output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use kinsweep_stocksim::PointCloud;
use tracing::info;

use crate::{CloudWriter, Result};

/// Writes one `x y z` line per occupied voxel coordinate.
///
/// Header lines start with `#` and record the grid so the points can be
/// mapped back to voxel indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XyzWriter {
    skin_only: bool,
}

impl XyzWriter {
    /// Only voxels on the boundary of the occupied region.
    pub fn skin() -> Self {
        Self { skin_only: true }
    }

    /// Every occupied voxel.
    pub fn all() -> Self {
        Self { skin_only: false }
    }

    fn write_to<W: Write>(&self, cloud: &PointCloud, mut out: W) -> Result<usize> {
        let reference = cloud.reference_point();
        writeln!(out, "# kinsweep point cloud")?;
        writeln!(
            out,
            "# grid {} {} {} spacing {}",
            cloud.number_x(),
            cloud.number_y(),
            cloud.number_z(),
            cloud.grid_delta()
        )?;
        writeln!(out, "# reference {} {} {}", reference.x, reference.y, reference.z)?;
        writeln!(out, "# format: x y z")?;

        let mut written = 0;
        for p in cloud.occupied_points() {
            if self.skin_only && !cloud.is_skin(&p) {
                continue;
            }
            let c = cloud.ulong_point_to_coordinate(&p);
            writeln!(out, "{} {} {}", c.x, c.y, c.z)?;
            written += 1;
        }
        out.flush()?;
        Ok(written)
    }
}

impl CloudWriter for XyzWriter {
    fn write(&self, cloud: &PointCloud, destination: &Path) -> Result<()> {
        let file = File::create(destination)?;
        let points = self.write_to(cloud, BufWriter::new(file))?;
        info!(
            path = %destination.display(),
            points,
            skin_only = self.skin_only,
            "wrote XYZ point cloud"
        );
        Ok(())
    }
}
