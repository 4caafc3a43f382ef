//! Visual output for recorded runs.
//!
//! - [`FrameRenderer`] draws one PNG heatmap per frame (real part of the
//!   field, dielectric overlaid) and line plots of slice groups.
//! - [`encode_animation`] stitches numbered frame images into a video by
//!   running `ffmpeg`.
//!
//! All drawing is configured through an explicit [`RenderStyle`]. Images
//! carry no text, so no font backend is required.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod animation;
pub mod colormap;
pub mod error;
pub mod renderer;
pub mod style;

pub use animation::{encode_animation, encode_animation_with, FRAME_PATTERN};
pub use error::RenderError;
pub use renderer::{frame_file_name, FrameRenderer};
pub use style::{ColorRange, RenderStyle};
