//! Errors from slice analysis.

use std::error::Error;
use std::fmt;

use slitwave_store::StoreError;

/// Errors from [`extract_slices`](crate::extract_slices),
/// [`group_for_comparison`](crate::group_for_comparison) and
/// [`SliceAnalyzer::analyze`](crate::SliceAnalyzer::analyze).
#[derive(Debug)]
pub enum AnalysisError {
    /// An offset maps to a row outside the intensity map.
    IndexOutOfRange {
        /// The requested physical offset.
        offset: f64,
        /// `round(offset × resolution)`; may be negative or non-finite.
        row: f64,
        /// Number of rows in the map.
        rows: usize,
    },
    /// Slices cannot be grouped in batches of zero.
    InvalidGroupSize,
    /// Reading the source frame failed.
    Store(StoreError),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { offset, row, rows } => write!(
                f,
                "offset {offset} maps to row {row}, outside 0..{rows}"
            ),
            Self::InvalidGroupSize => write!(f, "group size must be at least 1"),
            Self::Store(e) => write!(f, "store: {e}"),
        }
    }
}

impl Error for AnalysisError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for AnalysisError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}
