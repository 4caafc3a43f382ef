use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use slitwave::config::ExperimentConfig;
use slitwave::experiment::{run_experiment, ExperimentError};
use slitwave::render::RenderStyle;
use slitwave::store::FrameStore;
use slitwave::types::FieldComponent;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Double-slit diffraction: record field frames, slice the final
/// intensity, render images and animate
#[derive(Parser, Debug)]
#[command(name = "slitwave", version)]
#[command(about = "Double-slit diffraction runs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a run with the reference engine, then analyse and render it
    Run(RunArgs),
    /// Print the header of an existing frame store
    Inspect {
        /// Path to the store
        store: PathBuf,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Physical duration of the run in fs
    #[arg(short, long, default_value_t = 120.0)]
    duration: f64,

    /// Frames to capture, including the initial state
    #[arg(short, long, default_value_t = 120)]
    frames: u64,

    /// Grid cells per µm
    #[arg(short, long, default_value_t = 10)]
    resolution: u32,

    /// Cell width across the slits in µm
    #[arg(long, default_value_t = 20.0)]
    cell_width: f64,

    /// Cell height along the propagation direction in µm
    #[arg(long, default_value_t = 30.0)]
    cell_height: f64,

    /// Vacuum wavelength in µm
    #[arg(short, long, default_value_t = 1.0)]
    wavelength: f64,

    /// Width of each slit in µm
    #[arg(long, default_value_t = 1.0)]
    slit_width: f64,

    /// Centre-to-centre slit separation in µm
    #[arg(long, default_value_t = 4.0)]
    slit_separation: f64,

    /// Barrier distance from the source edge in µm
    #[arg(long, default_value_t = 5.0)]
    barrier_position: f64,

    /// Relative permittivity of the barrier
    #[arg(long, default_value_t = 12.0)]
    barrier_epsilon: f64,

    /// Field component to record (ex, ey, ez, hx, hy, hz)
    #[arg(short, long, default_value = "ez", value_parser = parse_component)]
    component: FieldComponent,

    /// Slice offsets from the source edge in µm, comma separated
    #[arg(long, value_delimiter = ',', default_values_t = [10.0, 11.0, 12.0, 15.0, 20.0, 25.0])]
    offsets: Vec<f64>,

    /// Slices per comparison plot
    #[arg(short, long, default_value_t = 3)]
    group_size: usize,

    /// Directory for images and the animation
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Frame store location (default: <output-dir>/double_slit.slit)
    #[arg(long)]
    store: Option<PathBuf>,

    /// Keep the frame store after the run
    #[arg(long)]
    keep_store: bool,

    /// Encode the frames into an MP4 with ffmpeg
    #[arg(short, long)]
    animate: bool,

    /// Animation frame rate
    #[arg(long, default_value_t = 20)]
    fps: u32,

    /// Skip frame images and the slice plot
    #[arg(long)]
    no_render: bool,
}

fn parse_component(name: &str) -> Result<FieldComponent, String> {
    FieldComponent::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = FieldComponent::ALL.iter().map(|c| c.name()).collect();
        format!("unknown component '{name}', expected one of {}", known.join(", "))
    })
}

impl From<RunArgs> for ExperimentConfig {
    fn from(args: RunArgs) -> Self {
        Self {
            total_duration: args.duration,
            frame_count: args.frames,
            resolution: args.resolution,
            cell_width: args.cell_width,
            cell_height: args.cell_height,
            wavelength: args.wavelength,
            barrier_position: args.barrier_position,
            slit_width: args.slit_width,
            slit_separation: args.slit_separation,
            barrier_epsilon: args.barrier_epsilon,
            component: args.component,
            offsets: args.offsets,
            group_size: args.group_size,
            output_dir: args.output_dir,
            store_path: args.store,
            keep_store: args.keep_store,
            render: !args.no_render,
            animate: args.animate,
            fps: args.fps,
        }
    }
}

fn run(args: RunArgs) -> Result<(), ExperimentError> {
    let config = ExperimentConfig::from(args);
    let summary = run_experiment(&config, &RenderStyle::default())?;

    println!(
        "Recorded {} frames ({:.3} fs) in {:.2} s",
        summary.run.frames_written,
        summary.run.physical_time,
        summary.run.wall_us as f64 / 1e6
    );
    println!(
        "Final frame {} at t = {:.3} fs",
        summary.report.frame_index, summary.report.time
    );
    for (i, group) in summary.report.groups.iter().enumerate() {
        let offsets: Vec<String> = group
            .slices
            .iter()
            .map(|s| format!("{} µm (row {})", s.offset, s.row))
            .collect();
        println!("  group {i}: max {:.4e}  [{}]", group.max, offsets.join(", "));
    }
    if !summary.frames.is_empty() {
        println!("Frames: {}", config.output_dir.join("frames").display());
    }
    if let Some(plot) = &summary.slice_plot {
        println!("Slice plot: {}", plot.display());
    }
    if let Some(video) = &summary.animation {
        println!("Animation: {}", video.display());
    }
    if let Some(store) = &summary.store {
        println!("Store kept at {}", store.display());
    }
    Ok(())
}

fn inspect(path: &Path) -> Result<(), ExperimentError> {
    let store = FrameStore::open(path)?;
    let header = store.header();
    let params = header.params;
    println!("{}", path.display());
    println!("  frames:        {}", params.frame_count());
    println!("  duration:      {} fs", params.total_duration());
    println!("  time delta:    {} fs", params.time_delta());
    println!("  resolution:    {} cells/µm", params.resolution());
    println!("  frame shape:   {}", header.frame_shape);
    let state = if header.has_dielectric() {
        "written"
    } else {
        "missing"
    };
    println!("  dielectric:    {} ({state})", header.dielectric_shape);
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Run(args) => run(args),
        Command::Inspect { store } => inspect(&store),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "slitwave failed");
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
