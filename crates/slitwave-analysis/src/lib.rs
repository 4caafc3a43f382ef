//! Post-processing of recorded runs.
//!
//! Turns a complex field frame into an intensity map, cuts horizontal
//! slices out of it at physical distances from the top of the grid, and
//! batches those slices into groups that share a vertical scale when
//! plotted side by side.
//!
//! The free functions ([`compute_intensity`], [`extract_slices`],
//! [`group_for_comparison`]) are pure. [`SliceAnalyzer`] bundles them into
//! a single pass over the final frame of a [`FrameStore`](slitwave_store::FrameStore).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod analyzer;
pub mod error;
pub mod group;
pub mod intensity;
pub mod slices;

pub use analyzer::{SliceAnalyzer, SliceReport};
pub use error::AnalysisError;
pub use group::{group_for_comparison, SliceGroup};
pub use intensity::{compute_intensity, IntensityMap};
pub use slices::{extract_slices, offset_to_row, IntensitySlice};
