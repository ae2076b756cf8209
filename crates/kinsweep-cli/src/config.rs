//! TOML job files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use kinsweep_io::CloudFormat;
use kinsweep_math::{Point3, Vec3};
use kinsweep_stocksim::{ConstantMotion, LinearMotion, MotionFunction, OrbitMotion, PolylineMotion};
use serde::Deserialize;

/// A complete sweep job.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    /// Time step between sampled poses.
    pub delta_t: f64,
    /// `false` erases the swept volume, `true` fills it.
    #[serde(default)]
    pub filler: bool,
    pub cloud: CloudConfig,
    pub tool: ToolConfig,
    pub motion: MotionConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CloudConfig {
    pub reference: [f64; 3],
    pub counts: [u64; 3],
    pub grid_delta: f64,
    /// Occupancy of every voxel before the sweep.
    #[serde(default = "default_initial")]
    pub initial: bool,
}

fn default_initial() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
    pub center: [f64; 3],
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Waypoint {
    pub t: f64,
    pub displacement: [f64; 3],
}

/// Tool path, as displacements from the tool's starting center.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case", deny_unknown_fields)]
pub enum MotionConfig {
    Constant {
        #[serde(default)]
        displacement: [f64; 3],
        #[serde(default)]
        begin: f64,
        #[serde(default)]
        end: f64,
    },
    Linear {
        #[serde(default)]
        from: [f64; 3],
        to: [f64; 3],
        begin: f64,
        end: f64,
    },
    Polyline {
        waypoints: Vec<Waypoint>,
    },
    Orbit {
        pivot: [f64; 3],
        axis: [f64; 3],
        /// Radians per time unit.
        angular_velocity: f64,
        begin: f64,
        end: f64,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    pub path: Option<PathBuf>,
    pub format: Option<CloudFormat>,
}

impl JobConfig {
    /// Parse a job from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a job file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading job file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing job file {}", path.display()))
    }

    /// Reject values the geometry constructors would refuse, with messages
    /// that name the offending key.
    pub fn validate(&self) -> Result<()> {
        if !(self.delta_t.is_finite() && self.delta_t > 0.0) {
            bail!("delta_t must be positive, got {}", self.delta_t);
        }
        if self.cloud.counts.contains(&0) {
            bail!("cloud.counts must all be at least 1, got {:?}", self.cloud.counts);
        }
        if !(self.cloud.grid_delta.is_finite() && self.cloud.grid_delta > 0.0) {
            bail!("cloud.grid_delta must be positive, got {}", self.cloud.grid_delta);
        }
        if !(self.tool.radius.is_finite() && self.tool.radius >= 0.0) {
            bail!("tool.radius must be non-negative, got {}", self.tool.radius);
        }
        match &self.motion {
            MotionConfig::Constant { begin, end, .. }
            | MotionConfig::Linear { begin, end, .. }
            | MotionConfig::Orbit { begin, end, .. } => {
                if end < begin {
                    bail!("motion ends ({end}) before it begins ({begin})");
                }
            }
            MotionConfig::Polyline { waypoints } => {
                if waypoints.is_empty() {
                    bail!("polyline motion needs at least one waypoint");
                }
            }
        }
        Ok(())
    }

    /// Reference point of the stock block.
    pub fn reference(&self) -> Point3 {
        Point3::from(self.cloud.reference)
    }

    /// Starting center of the tool.
    pub fn tool_center(&self) -> Point3 {
        Point3::from(self.tool.center)
    }
}

impl MotionConfig {
    /// Construct the motion function this section describes.
    pub fn build(&self) -> Result<Box<dyn MotionFunction>> {
        let motion: Box<dyn MotionFunction> = match self {
            Self::Constant {
                displacement,
                begin,
                end,
            } => Box::new(ConstantMotion::new(Vec3::from(*displacement), *begin, *end)),
            Self::Linear {
                from,
                to,
                begin,
                end,
            } => Box::new(LinearMotion::new(
                Vec3::from(*from),
                Vec3::from(*to),
                *begin,
                *end,
            )),
            Self::Polyline { waypoints } => Box::new(PolylineMotion::new(
                waypoints
                    .iter()
                    .map(|w| (w.t, Vec3::from(w.displacement)))
                    .collect(),
            )?),
            Self::Orbit {
                pivot,
                axis,
                angular_velocity,
                begin,
                end,
            } => Box::new(OrbitMotion::new(
                Vec3::from(*pivot),
                Vec3::from(*axis),
                *angular_velocity,
                *begin,
                *end,
            )?),
        };
        Ok(motion)
    }
}
