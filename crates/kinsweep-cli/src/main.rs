//! kinsweep CLI - sphere sweeps through voxel stock
//!
//! Reads a TOML job, erases (or fills) the volume a moving sphere sweeps
//! through a block of voxels, and writes the resulting cloud.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kinsweep_geom::{Solid, Sphere};
use kinsweep_io::{read_json, CloudFormat};
use kinsweep_stocksim::{KinematicSolid, PointCloud, SweepReport};
use std::path::{Path, PathBuf};
use tracing::info;

mod config;

use config::JobConfig;

#[derive(Parser)]
#[command(name = "kinsweep")]
#[command(about = "Sweep a sphere through a voxel block and write the result", long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG still takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a sweep job and write the resulting cloud
    Run {
        /// Path to the .toml job file
        job: PathBuf,
        /// Output file (overrides the job's output.path)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Output format: xyz-skin, xyz or json (default: from the job, then
        /// the output extension)
        #[arg(long)]
        format: Option<CloudFormat>,
    },
    /// Display information about a cloud written as JSON
    Info {
        /// Path to the .json cloud
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match cli.command {
        Commands::Run {
            job,
            output,
            format,
        } => {
            let (path, report) = run_job(&job, output, format)?;
            println!(
                "Swept {} poses, changed {} voxels, wrote {}",
                report.samples,
                report.voxels_changed,
                path.display()
            );
        }
        Commands::Info { file } => {
            show_info(&file)?;
        }
    }

    Ok(())
}

/// Where to write and in which format. Command-line flags win over the job
/// file; the format falls back to the output extension, then to the skin.
fn resolve_output(
    job_path: &Path,
    job: &JobConfig,
    output: Option<PathBuf>,
    format: Option<CloudFormat>,
) -> (PathBuf, CloudFormat) {
    let path = output.or_else(|| job.output.path.clone());
    let format = format
        .or(job.output.format)
        .or_else(|| path.as_deref().and_then(CloudFormat::from_path))
        .unwrap_or_default();
    let path = path.unwrap_or_else(|| {
        job_path.with_extension(match format {
            CloudFormat::Json => "json",
            CloudFormat::XyzSkin | CloudFormat::Xyz => "xyz",
        })
    });
    (path, format)
}

fn run_job(
    job_path: &Path,
    output: Option<PathBuf>,
    format: Option<CloudFormat>,
) -> Result<(PathBuf, SweepReport)> {
    let job = JobConfig::load(job_path)?;
    job.validate()
        .with_context(|| format!("invalid job file {}", job_path.display()))?;

    let [nx, ny, nz] = job.cloud.counts;
    let mut cloud = PointCloud::with_occupancy(
        job.reference(),
        nx,
        ny,
        nz,
        job.cloud.grid_delta,
        job.cloud.initial,
    )
    .context("building point cloud")?;
    let mut tool = Sphere::new(job.tool_center(), job.tool.radius).context("building tool")?;
    let motion = job.motion.build().context("building motion")?;

    info!(
        voxels = cloud.len(),
        radius = job.tool.radius,
        filler = job.filler,
        "starting sweep"
    );
    let report =
        KinematicSolid::new(&mut cloud, &mut tool, motion.as_ref(), job.delta_t, job.filler)?
            .build()
            .context("sweeping tool")?;

    let (path, format) = resolve_output(job_path, &job, output, format);
    format
        .writer()
        .write(&cloud, &path)
        .with_context(|| format!("writing {}", path.display()))?;

    Ok((path, report))
}

fn show_info(path: &Path) -> Result<()> {
    let cloud = read_json(path).with_context(|| format!("reading cloud {}", path.display()))?;

    let occupied = cloud.occupied_count();
    let skin = cloud.occupied_points().filter(|p| cloud.is_skin(p)).count();
    let reference = cloud.reference_point();

    println!("File: {}", path.display());
    println!(
        "Grid: {} x {} x {} voxels, spacing {}",
        cloud.number_x(),
        cloud.number_y(),
        cloud.number_z(),
        cloud.grid_delta()
    );
    println!("Reference: ({}, {}, {})", reference.x, reference.y, reference.z);
    if let Some(max) = cloud.bbox().max() {
        println!("Extent to: ({}, {}, {})", max.x, max.y, max.z);
    }
    println!(
        "Occupied: {} of {} ({:.1}%)",
        occupied,
        cloud.len(),
        100.0 * occupied as f64 / cloud.len() as f64
    );
    println!("Skin: {}", skin);

    Ok(())
}
