//! Core types and traits for slitwave diffraction runs.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the workspace:
//! run parameters, time-unit conversion, field array types, the
//! [`FieldEngine`] capability trait, and the shared error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod engine;
pub mod error;
pub mod field;
pub mod params;
pub mod units;

pub use engine::FieldEngine;
pub use error::{EngineError, ParamsError};
pub use field::{ComplexField, DielectricMap, FieldComponent, GridShape};
pub use params::SimulationParameters;
pub use units::{physical_to_engine_time, TimeScale, SPEED_OF_LIGHT_UM_PER_FS};

/// Complex scalar type stored in every field frame.
pub use num_complex::Complex64;
