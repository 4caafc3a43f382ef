//! One complete double-slit experiment: record, analyse, render, animate.

use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use slitwave_analysis::{AnalysisError, SliceAnalyzer, SliceReport};
use slitwave_core::FieldEngine;
use slitwave_driver::{record, DriverConfig, RunError, RunReport};
use slitwave_render::{encode_animation, FrameRenderer, RenderError, RenderStyle};
use slitwave_store::{FrameStore, StoreError};
use tracing::{info, warn};

use crate::config::{ConfigError, ExperimentConfig};

/// Errors from [`run_experiment`], one variant per stage.
#[derive(Debug)]
pub enum ExperimentError {
    /// The configuration is invalid.
    Config(ConfigError),
    /// The output directory could not be prepared.
    Io(io::Error),
    /// Recording failed; the partial store has been deleted.
    Run(RunError),
    /// The recorded store could not be reopened or removed.
    Store(StoreError),
    /// Slice analysis failed.
    Analysis(AnalysisError),
    /// Image or animation output failed.
    Render(RenderError),
}

impl fmt::Display for ExperimentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid configuration: {e}"),
            Self::Io(e) => write!(f, "output directory: {e}"),
            Self::Run(e) => write!(f, "run failed: {e}"),
            Self::Store(e) => write!(f, "frame store: {e}"),
            Self::Analysis(e) => write!(f, "analysis failed: {e}"),
            Self::Render(e) => write!(f, "rendering failed: {e}"),
        }
    }
}

impl Error for ExperimentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Run(e) => Some(e),
            Self::Store(e) => Some(e),
            Self::Analysis(e) => Some(e),
            Self::Render(e) => Some(e),
        }
    }
}

impl From<ConfigError> for ExperimentError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<io::Error> for ExperimentError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<RunError> for ExperimentError {
    fn from(e: RunError) -> Self {
        Self::Run(e)
    }
}

impl From<StoreError> for ExperimentError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<AnalysisError> for ExperimentError {
    fn from(e: AnalysisError) -> Self {
        Self::Analysis(e)
    }
}

impl From<RenderError> for ExperimentError {
    fn from(e: RenderError) -> Self {
        Self::Render(e)
    }
}

/// What an experiment produced.
#[derive(Clone, Debug)]
pub struct ExperimentSummary {
    /// Recording statistics.
    pub run: RunReport,
    /// Slices of the final frame.
    pub report: SliceReport,
    /// Frame images, in frame order. Empty when rendering is off.
    pub frames: Vec<PathBuf>,
    /// Slice comparison plot, when rendering is on.
    pub slice_plot: Option<PathBuf>,
    /// Encoded animation, when requested.
    pub animation: Option<PathBuf>,
    /// The frame store, when kept.
    pub store: Option<PathBuf>,
}

/// Run the reference engine through `config` and post-process the result.
///
/// The frame store is removed afterwards unless `config.keep_store` is set,
/// whether or not post-processing succeeded.
pub fn run_experiment(
    config: &ExperimentConfig,
    style: &RenderStyle,
) -> Result<ExperimentSummary, ExperimentError> {
    config.validate()?;
    let params = config.params()?;
    let mut engine = config.engine()?;
    fs::create_dir_all(&config.output_dir)?;
    let store_path = config.store_path();

    info!(
        shape = %engine.shape(),
        component = %config.component,
        frames = params.frame_count(),
        duration_fs = params.total_duration(),
        store = %store_path.display(),
        "recording double-slit run"
    );
    let driver = DriverConfig::default().with_component(config.component);
    let run = record(&mut engine, &store_path, &params, driver)?;

    let outcome = post_process(config, style, &store_path, run);

    if config.keep_store {
        return outcome.map(|summary| ExperimentSummary {
            store: Some(store_path),
            ..summary
        });
    }
    if let Err(e) = FrameStore::delete(&store_path) {
        warn!(store = %store_path.display(), error = %e, "could not delete frame store");
        if outcome.is_ok() {
            return Err(e.into());
        }
    }
    outcome
}

fn post_process(
    config: &ExperimentConfig,
    style: &RenderStyle,
    store_path: &Path,
    run: RunReport,
) -> Result<ExperimentSummary, ExperimentError> {
    let mut store = FrameStore::open(store_path)?;
    let analyzer = SliceAnalyzer::new(config.offsets.iter().copied(), config.group_size);
    let report = analyzer.analyze(&store)?;
    for (i, group) in report.groups.iter().enumerate() {
        info!(group = i, slices = group.slices.len(), max = group.max, "slice group");
    }

    let mut summary = ExperimentSummary {
        run,
        report,
        frames: Vec::new(),
        slice_plot: None,
        animation: None,
        store: None,
    };

    if config.render {
        let renderer = FrameRenderer::new(RenderStyle {
            fps: config.fps,
            ..style.clone()
        })?;
        let frames_dir = config.output_dir.join("frames");
        summary.frames = renderer.render_store(&store, &frames_dir)?;

        let plot = config.output_dir.join("slices.png");
        renderer.render_slices(&plot, &summary.report.groups)?;
        summary.slice_plot = Some(plot);

        if config.animate {
            let video = config.output_dir.join("double_slit.mp4");
            encode_animation(&frames_dir, &video, renderer.style().fps)?;
            summary.animation = Some(video);
        }
    }

    store.close()?;
    Ok(summary)
}
