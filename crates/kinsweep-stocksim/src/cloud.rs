//! Dense boolean voxel grid representing a block of stock.

use kinsweep_geom::{to_grid_bbox, DoubleBbox, GridBbox, Solid};
use kinsweep_math::{grid_to_real, GridPoint, Point3, Vec3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{Result, SweepError};

/// A parallelepiped sampled on a uniform grid.
///
/// Voxel `(i, j, k)` sits at `reference_point + (i, j, k) * grid_delta` and
/// holds one occupancy flag. Flags are stored with X varying fastest, then
/// Y, then Z: the linear index is `i + nx * (j + ny * k)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PointCloudData", into = "PointCloudData")]
pub struct PointCloud {
    reference_point: Point3,
    number_x: u64,
    number_y: u64,
    number_z: u64,
    grid_delta: f64,
    bbox: DoubleBbox,
    cloud: Vec<bool>,
}

/// Serialized form of a [`PointCloud`]. The bounding box is derived, not stored.
#[derive(Serialize, Deserialize)]
struct PointCloudData {
    reference_point: Point3,
    number_x: u64,
    number_y: u64,
    number_z: u64,
    grid_delta: f64,
    occupancy: Vec<bool>,
}

impl PointCloud {
    /// Create a fully occupied cloud (the solid block).
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::InvalidConfiguration`] if any count is zero, the
    /// spacing is not a positive finite number, or the voxel count does not
    /// fit in memory addressing.
    pub fn new(
        reference_point: Point3,
        number_x: u64,
        number_y: u64,
        number_z: u64,
        grid_delta: f64,
    ) -> Result<Self> {
        Self::with_occupancy(reference_point, number_x, number_y, number_z, grid_delta, true)
    }

    /// Create a cloud with every voxel set to `initial`.
    ///
    /// # Errors
    ///
    /// Same as [`PointCloud::new`].
    pub fn with_occupancy(
        reference_point: Point3,
        number_x: u64,
        number_y: u64,
        number_z: u64,
        grid_delta: f64,
        initial: bool,
    ) -> Result<Self> {
        let len = Self::validate(&reference_point, number_x, number_y, number_z, grid_delta)?;
        Ok(Self {
            reference_point,
            number_x,
            number_y,
            number_z,
            grid_delta,
            bbox: Self::compute_bbox(&reference_point, number_x, number_y, number_z, grid_delta),
            cloud: vec![initial; len],
        })
    }

    fn validate(
        reference_point: &Point3,
        number_x: u64,
        number_y: u64,
        number_z: u64,
        grid_delta: f64,
    ) -> Result<usize> {
        if number_x == 0 || number_y == 0 || number_z == 0 {
            return Err(SweepError::InvalidConfiguration(format!(
                "voxel counts must be at least 1, got {number_x} x {number_y} x {number_z}"
            )));
        }
        if !grid_delta.is_finite() || grid_delta <= 0.0 {
            return Err(SweepError::InvalidConfiguration(format!(
                "grid spacing must be positive, got {grid_delta}"
            )));
        }
        if !reference_point.coords.iter().all(|c| c.is_finite()) {
            return Err(SweepError::InvalidConfiguration(format!(
                "reference point must be finite, got {reference_point}"
            )));
        }
        number_x
            .checked_mul(number_y)
            .and_then(|n| n.checked_mul(number_z))
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| {
                SweepError::InvalidConfiguration(format!(
                    "{number_x} x {number_y} x {number_z} voxels overflow the address space"
                ))
            })
    }

    fn compute_bbox(
        reference_point: &Point3,
        number_x: u64,
        number_y: u64,
        number_z: u64,
        grid_delta: f64,
    ) -> DoubleBbox {
        let extent = Vec3::new(number_x as f64, number_y as f64, number_z as f64) * grid_delta;
        DoubleBbox::new(*reference_point, *reference_point + extent)
    }

    /// Number of voxels along X.
    pub fn number_x(&self) -> u64 {
        self.number_x
    }

    /// Number of voxels along Y.
    pub fn number_y(&self) -> u64 {
        self.number_y
    }

    /// Number of voxels along Z.
    pub fn number_z(&self) -> u64 {
        self.number_z
    }

    /// Spacing between neighbouring voxels (same on all axes).
    pub fn grid_delta(&self) -> f64 {
        self.grid_delta
    }

    /// Coordinates of voxel `(0, 0, 0)`.
    pub fn reference_point(&self) -> &Point3 {
        &self.reference_point
    }

    /// Total number of voxels.
    pub fn len(&self) -> usize {
        self.cloud.len()
    }

    /// Always false: a cloud has at least one voxel.
    pub fn is_empty(&self) -> bool {
        self.cloud.is_empty()
    }

    /// Raw occupancy buffer in X-fastest order.
    pub fn cloud(&self) -> &[bool] {
        &self.cloud
    }

    /// Mutable raw occupancy buffer in X-fastest order.
    pub fn cloud_mut(&mut self) -> &mut [bool] {
        &mut self.cloud
    }

    /// Linear buffer index of a voxel, `None` if outside the grid.
    pub fn linear_index(&self, p: &GridPoint) -> Option<usize> {
        if p.x >= self.number_x || p.y >= self.number_y || p.z >= self.number_z {
            return None;
        }
        Some((p.x + self.number_x * (p.y + self.number_y * p.z)) as usize)
    }

    /// Voxel at a linear buffer index, `None` past the end.
    pub fn grid_point(&self, index: usize) -> Option<GridPoint> {
        if index >= self.cloud.len() {
            return None;
        }
        let index = index as u64;
        let slab = self.number_x * self.number_y;
        Some(GridPoint::new(
            index % self.number_x,
            (index % slab) / self.number_x,
            index / slab,
        ))
    }

    /// Occupancy of a voxel, `None` if outside the grid.
    pub fn get(&self, p: &GridPoint) -> Option<bool> {
        self.linear_index(p).map(|i| self.cloud[i])
    }

    /// Set the occupancy of a voxel. Returns false if outside the grid.
    pub fn set(&mut self, p: &GridPoint, value: bool) -> bool {
        match self.linear_index(p) {
            Some(i) => {
                self.cloud[i] = value;
                true
            }
            None => false,
        }
    }

    /// Real coordinates of a voxel index.
    ///
    /// Pure affine map; indices past the grid are allowed, so
    /// `(nx, ny, nz)` maps to the bounding box max corner.
    pub fn ulong_point_to_coordinate(&self, p: &GridPoint) -> Point3 {
        grid_coordinate(&self.reference_point, self.grid_delta, p)
    }

    /// Index box covering every voxel: `[0, n - 1]` on each axis.
    pub fn grid_bbox(&self) -> GridBbox {
        GridBbox::new(
            GridPoint::origin(),
            GridPoint::new(self.number_x - 1, self.number_y - 1, self.number_z - 1),
        )
    }

    /// Voxels whose coordinates may fall inside `region`.
    ///
    /// Conservative: rounds outward, then clips to the grid. Invalid when the
    /// region misses the cloud.
    pub fn voxel_range(&self, region: &DoubleBbox) -> GridBbox {
        let mut local = region.intersected(&self.bbox);
        if !local.is_valid() {
            return GridBbox::invalid();
        }
        local.translate(&-self.reference_point.coords);
        to_grid_bbox(&local, self.grid_delta).intersected(&self.grid_bbox())
    }

    /// Set every voxel whose coordinate lies inside `solid` to `value`.
    ///
    /// Only voxels in the solid's bounding box are tested. Z slabs are
    /// processed in parallel; each voxel is written at most once, so the
    /// result matches a sequential pass. Returns the number of voxels whose
    /// state changed.
    pub fn fill_solid(&mut self, solid: &dyn Solid, value: bool) -> usize {
        let range = self.voxel_range(solid.bbox());
        let (Some(lo), Some(hi)) = (range.min().copied(), range.max().copied()) else {
            return 0;
        };

        let reference = self.reference_point;
        let delta = self.grid_delta;
        let nx = self.number_x;
        let slab = (self.number_x * self.number_y) as usize;
        let slabs = &mut self.cloud[lo.z as usize * slab..(hi.z as usize + 1) * slab];

        slabs
            .par_chunks_mut(slab)
            .enumerate()
            .map(|(dk, plane)| {
                let k = lo.z + dk as u64;
                let mut changed = 0;
                for j in lo.y..=hi.y {
                    for i in lo.x..=hi.x {
                        let idx = (i + nx * j) as usize;
                        let p = GridPoint::new(i, j, k);
                        if plane[idx] != value
                            && solid.contains(&grid_coordinate(&reference, delta, &p))
                        {
                            plane[idx] = value;
                            changed += 1;
                        }
                    }
                }
                changed
            })
            .sum()
    }

    /// Number of occupied voxels.
    pub fn occupied_count(&self) -> usize {
        self.cloud.iter().filter(|&&v| v).count()
    }

    /// Indices of occupied voxels in buffer order.
    pub fn occupied_points(&self) -> impl Iterator<Item = GridPoint> + '_ {
        self.cloud
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v)
            .filter_map(|(i, _)| self.grid_point(i))
    }

    /// Whether a voxel is occupied and touches empty space: at least one of
    /// its six face neighbours is unoccupied or outside the grid.
    pub fn is_skin(&self, p: &GridPoint) -> bool {
        if self.get(p) != Some(true) {
            return false;
        }
        let dims = [self.number_x, self.number_y, self.number_z];
        let coords = [p.x, p.y, p.z];
        for axis in 0..3 {
            if coords[axis] == 0 || coords[axis] + 1 == dims[axis] {
                return true;
            }
            for step in [coords[axis] - 1, coords[axis] + 1] {
                let mut n = *p;
                n[axis] = step;
                if self.get(&n) != Some(true) {
                    return true;
                }
            }
        }
        false
    }

    /// Occupancy of the voxel cell containing `point`.
    ///
    /// Cell `(i, j, k)` spans `[coord, coord + grid_delta)` on each axis, with
    /// the bounding box max face belonging to the last cell. False outside
    /// the bounding box.
    pub fn is_occupied_at(&self, point: &Point3) -> bool {
        if !self.bbox.contains_point(point) {
            return false;
        }
        let local = (*point - self.reference_point) / self.grid_delta;
        let cell = |v: f64, n: u64| (v.floor() as u64).min(n - 1);
        let p = GridPoint::new(
            cell(local.x, self.number_x),
            cell(local.y, self.number_y),
            cell(local.z, self.number_z),
        );
        self.get(&p).unwrap_or(false)
    }
}

fn grid_coordinate(reference: &Point3, grid_delta: f64, p: &GridPoint) -> Point3 {
    *reference + grid_to_real(p).coords * grid_delta
}

impl Solid for PointCloud {
    fn bbox(&self) -> &DoubleBbox {
        &self.bbox
    }

    /// Bounding-box test only; see [`PointCloud::is_occupied_at`] for a
    /// per-voxel lookup.
    fn contains(&self, point: &Point3) -> bool {
        self.bbox.contains_point(point)
    }
}

impl TryFrom<PointCloudData> for PointCloud {
    type Error = SweepError;

    fn try_from(data: PointCloudData) -> Result<Self> {
        let mut cloud = Self::new(
            data.reference_point,
            data.number_x,
            data.number_y,
            data.number_z,
            data.grid_delta,
        )?;
        if data.occupancy.len() != cloud.cloud.len() {
            return Err(SweepError::InvalidConfiguration(format!(
                "occupancy has {} entries, expected {}",
                data.occupancy.len(),
                cloud.cloud.len()
            )));
        }
        cloud.cloud = data.occupancy;
        Ok(cloud)
    }
}

impl From<PointCloud> for PointCloudData {
    fn from(cloud: PointCloud) -> Self {
        Self {
            reference_point: cloud.reference_point,
            number_x: cloud.number_x,
            number_y: cloud.number_y,
            number_z: cloud.number_z,
            grid_delta: cloud.grid_delta,
            occupancy: cloud.cloud,
        }
    }
}
