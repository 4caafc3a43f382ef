//! Experiment configuration.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

use slitwave_analysis::offset_to_row;
use slitwave_core::{FieldComponent, GridShape, ParamsError, SimulationParameters};
use slitwave_engines::HuygensDoubleSlit;

/// Errors from [`ExperimentConfig::validate`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Duration, frame count or resolution is invalid.
    Params(ParamsError),
    /// The simulation cell must have a finite, positive size.
    InvalidCellSize {
        /// Requested width in µm.
        width: f64,
        /// Requested height in µm.
        height: f64,
    },
    /// The cell rounds to a grid with no rows or no columns.
    EmptyGrid {
        /// The resulting grid.
        shape: GridShape,
    },
    /// The slit geometry is unusable.
    Geometry {
        /// The engine's explanation.
        reason: String,
    },
    /// A slice offset lies outside the grid.
    OffsetOutsideGrid {
        /// The offending offset in µm.
        offset: f64,
        /// Cell height in µm.
        height: f64,
    },
    /// Slices cannot be grouped in batches of zero.
    InvalidGroupSize,
    /// Animation frame rate must be positive.
    InvalidFps,
    /// An animation is built from rendered frames.
    AnimateWithoutRender,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Params(e) => write!(f, "{e}"),
            Self::InvalidCellSize { width, height } => {
                write!(f, "cell size must be finite and > 0, got {width}x{height} µm")
            }
            Self::EmptyGrid { shape } => write!(f, "cell maps to an empty grid {shape}"),
            Self::Geometry { reason } => write!(f, "slit geometry: {reason}"),
            Self::OffsetOutsideGrid { offset, height } => {
                write!(f, "slice offset {offset} µm is outside the {height} µm cell")
            }
            Self::InvalidGroupSize => write!(f, "group size must be at least 1"),
            Self::InvalidFps => write!(f, "fps must be at least 1"),
            Self::AnimateWithoutRender => write!(f, "animation requires rendered frames"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Params(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParamsError> for ConfigError {
    fn from(e: ParamsError) -> Self {
        Self::Params(e)
    }
}

/// Everything a double-slit experiment needs. Lengths are in µm, time in
/// fs.
///
/// The grid has `round(cell_height × resolution)` rows and
/// `round(cell_width × resolution)` columns. The wave enters at row 0 and
/// travels towards increasing rows; slice offsets are measured from row 0.
#[derive(Clone, Debug, PartialEq)]
pub struct ExperimentConfig {
    /// Physical duration of the run (fs).
    pub total_duration: f64,
    /// Frames to capture, including the initial state.
    pub frame_count: u64,
    /// Grid cells per µm.
    pub resolution: u32,
    /// Cell extent across the slits (µm).
    pub cell_width: f64,
    /// Cell extent along the propagation direction (µm).
    pub cell_height: f64,
    /// Vacuum wavelength (µm).
    pub wavelength: f64,
    /// Barrier distance from row 0 (µm).
    pub barrier_position: f64,
    /// Width of each slit (µm).
    pub slit_width: f64,
    /// Centre-to-centre slit separation (µm).
    pub slit_separation: f64,
    /// Relative permittivity of the barrier.
    pub barrier_epsilon: f64,
    /// Field component captured into every frame.
    pub component: FieldComponent,
    /// Distances from row 0 at which intensity slices are taken (µm).
    pub offsets: Vec<f64>,
    /// Slices per comparison plot.
    pub group_size: usize,
    /// Directory for images and the animation.
    pub output_dir: PathBuf,
    /// Frame store location. Default: `output_dir/double_slit.slit`.
    pub store_path: Option<PathBuf>,
    /// Keep the frame store after the run.
    pub keep_store: bool,
    /// Render frame images and the slice plot.
    pub render: bool,
    /// Encode rendered frames into `output_dir/double_slit.mp4`.
    pub animate: bool,
    /// Animation frame rate.
    pub fps: u32,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            total_duration: 120.0,
            frame_count: 120,
            resolution: 10,
            cell_width: 20.0,
            cell_height: 30.0,
            wavelength: 1.0,
            barrier_position: 5.0,
            slit_width: 1.0,
            slit_separation: 4.0,
            barrier_epsilon: 12.0,
            component: FieldComponent::Ez,
            offsets: vec![10.0, 11.0, 12.0, 15.0, 20.0, 25.0],
            group_size: 3,
            output_dir: PathBuf::from("output"),
            store_path: None,
            keep_store: false,
            render: true,
            animate: false,
            fps: 20,
        }
    }
}

impl ExperimentConfig {
    /// Run parameters recorded in the store.
    pub fn params(&self) -> Result<SimulationParameters, ConfigError> {
        Ok(SimulationParameters::new(
            self.total_duration,
            self.frame_count,
            self.resolution,
        )?)
    }

    /// Grid shape of the simulation cell.
    pub fn grid_shape(&self) -> Result<GridShape, ConfigError> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if !(ok(self.cell_width) && ok(self.cell_height)) {
            return Err(ConfigError::InvalidCellSize {
                width: self.cell_width,
                height: self.cell_height,
            });
        }
        let res = f64::from(self.resolution);
        let shape = GridShape::new(
            (self.cell_height * res).round() as usize,
            (self.cell_width * res).round() as usize,
        );
        if !shape.is_valid() {
            return Err(ConfigError::EmptyGrid { shape });
        }
        Ok(shape)
    }

    /// Build the reference engine for this geometry.
    pub fn engine(&self) -> Result<HuygensDoubleSlit, ConfigError> {
        HuygensDoubleSlit::builder()
            .shape(self.grid_shape()?)
            .resolution(self.resolution)
            .wavelength(self.wavelength)
            .barrier_position(self.barrier_position)
            .slit_width(self.slit_width)
            .slit_separation(self.slit_separation)
            .barrier_epsilon(self.barrier_epsilon)
            .build()
            .map_err(|reason| ConfigError::Geometry { reason })
    }

    /// Where the frame store is written.
    pub fn store_path(&self) -> PathBuf {
        self.store_path
            .clone()
            .unwrap_or_else(|| self.output_dir.join("double_slit.slit"))
    }

    /// Check every setting without touching the filesystem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.params()?;
        let shape = self.grid_shape()?;
        self.engine()?;
        for &offset in &self.offsets {
            if offset_to_row(offset, self.resolution, shape.rows).is_err() {
                return Err(ConfigError::OffsetOutsideGrid {
                    offset,
                    height: self.cell_height,
                });
            }
        }
        if self.group_size == 0 {
            return Err(ConfigError::InvalidGroupSize);
        }
        if self.fps == 0 {
            return Err(ConfigError::InvalidFps);
        }
        if self.animate && !self.render {
            return Err(ConfigError::AnimateWithoutRender);
        }
        Ok(())
    }
}
