//! Errors from rendering and encoding.

use std::error::Error;
use std::fmt;
use std::io;

use slitwave_core::GridShape;
use slitwave_store::StoreError;

/// Errors from [`FrameRenderer`](crate::FrameRenderer) and
/// [`encode_animation`](crate::encode_animation).
#[derive(Debug)]
pub enum RenderError {
    /// Filesystem failure around the output images.
    Io(io::Error),
    /// The drawing backend failed.
    Draw(String),
    /// The external video encoder could not be run or exited with failure.
    Encoder {
        /// What went wrong.
        reason: String,
    },
    /// Reading frames from the store failed.
    Store(StoreError),
    /// The dielectric map does not cover the field.
    ShapeMismatch {
        /// Shape of the field frame.
        field: GridShape,
        /// Shape of the dielectric map.
        dielectric: GridShape,
    },
    /// The [`RenderStyle`](crate::RenderStyle) is unusable.
    InvalidStyle {
        /// Which setting is wrong.
        reason: String,
    },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Draw(msg) => write!(f, "drawing failed: {msg}"),
            Self::Encoder { reason } => write!(f, "animation encoder: {reason}"),
            Self::Store(e) => write!(f, "store: {e}"),
            Self::ShapeMismatch { field, dielectric } => write!(
                f,
                "dielectric map {dielectric} does not match field {field}"
            ),
            Self::InvalidStyle { reason } => write!(f, "invalid render style: {reason}"),
        }
    }
}

impl Error for RenderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for RenderError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<StoreError> for RenderError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}
