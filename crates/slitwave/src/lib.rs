//! slitwave: record, analyse and render double-slit diffraction runs.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all slitwave sub-crates, plus the [`experiment`] module that wires them
//! into a single run used by the `slitwave` binary, configured through
//! [`config::ExperimentConfig`].
//!
//! # Quick start
//!
//! ```rust,no_run
//! use slitwave::prelude::*;
//!
//! let config = ExperimentConfig::default();
//! let summary = run_experiment(&config, &RenderStyle::default()).unwrap();
//! for group in &summary.report.groups {
//!     println!("group max {}", group.max);
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `slitwave-core` | Parameters, units, field types, `FieldEngine` |
//! | [`store`] | `slitwave-store` | Binary frame store |
//! | [`driver`] | `slitwave-driver` | Record loop and store lifecycle |
//! | [`analysis`] | `slitwave-analysis` | Intensity, slices, comparison groups |
//! | [`render`] | `slitwave-render` | PNG frames, slice plots, animation |
//! | [`engines`] | `slitwave-engines` | Reference analytic engine |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod experiment;

/// Core types, traits and units (`slitwave-core`).
pub use slitwave_core as types;

/// Binary frame store (`slitwave-store`).
///
/// [`store::FrameStore`] holds the run parameters, one dielectric map and
/// every captured frame.
pub use slitwave_store as store;

/// Simulation driver (`slitwave-driver`).
pub use slitwave_driver as driver;

/// Intensity slices and comparison groups (`slitwave-analysis`).
pub use slitwave_analysis as analysis;

/// Image and animation output (`slitwave-render`).
pub use slitwave_render as render;

/// Reference field engines (`slitwave-engines`).
pub use slitwave_engines as engines;

/// Common imports for typical slitwave usage.
///
/// ```rust
/// use slitwave::prelude::*;
/// ```
pub mod prelude {
    // Core
    pub use slitwave_core::{
        Complex64, ComplexField, DielectricMap, FieldComponent, FieldEngine, GridShape,
        SimulationParameters, TimeScale,
    };

    // Errors
    pub use slitwave_analysis::AnalysisError;
    pub use slitwave_core::{EngineError, ParamsError};
    pub use slitwave_driver::RunError;
    pub use slitwave_render::RenderError;
    pub use slitwave_store::StoreError;

    // Store and driver
    pub use slitwave_driver::{record, DriverConfig, RunReport, SimulationDriver};
    pub use slitwave_store::FrameStore;

    // Analysis
    pub use slitwave_analysis::{
        compute_intensity, extract_slices, group_for_comparison, IntensitySlice, SliceAnalyzer,
        SliceGroup, SliceReport,
    };

    // Output
    pub use slitwave_render::{encode_animation, FrameRenderer, RenderStyle};

    // Engines
    pub use slitwave_engines::HuygensDoubleSlit;

    // Experiment
    pub use crate::config::{ConfigError, ExperimentConfig};
    pub use crate::experiment::{run_experiment, ExperimentError, ExperimentSummary};
}
