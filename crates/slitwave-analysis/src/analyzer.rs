//! One-shot analysis of a recorded run.

use smallvec::SmallVec;
use slitwave_store::FrameStore;
use tracing::debug;

use crate::error::AnalysisError;
use crate::group::{group_for_comparison, SliceGroup};
use crate::intensity::{compute_intensity, IntensityMap};
use crate::slices::extract_slices;

/// Slices and groups taken from one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct SliceReport {
    /// Index of the analysed frame.
    pub frame_index: u64,
    /// Physical time of the analysed frame.
    pub time: f64,
    /// Intensity map of the whole frame.
    pub intensity: IntensityMap,
    /// Comparison groups, in offset order.
    pub groups: Vec<SliceGroup>,
}

impl SliceReport {
    /// Number of slices across all groups.
    pub fn slice_count(&self) -> usize {
        self.groups.iter().map(|g| g.slices.len()).sum()
    }
}

/// Intensity-slice analysis of the final frame of a store.
///
/// Offsets are converted to rows with the resolution recorded in the
/// store header.
#[derive(Clone, Debug, PartialEq)]
pub struct SliceAnalyzer {
    /// Physical distances from row 0 at which to slice.
    pub offsets: SmallVec<[f64; 8]>,
    /// Slices per comparison group.
    pub group_size: usize,
}

impl SliceAnalyzer {
    /// Create an analyzer.
    pub fn new(offsets: impl IntoIterator<Item = f64>, group_size: usize) -> Self {
        Self {
            offsets: offsets.into_iter().collect(),
            group_size,
        }
    }

    /// Analyse the last frame in `store`.
    ///
    /// # Errors
    ///
    /// Store read failures, offsets outside the grid, and a zero group size
    /// are all reported as [`AnalysisError`]. Group size is checked before
    /// any data is read.
    pub fn analyze(&self, store: &FrameStore) -> Result<SliceReport, AnalysisError> {
        if self.group_size == 0 {
            return Err(AnalysisError::InvalidGroupSize);
        }
        let params = store.read_params()?;
        let frame_index = params.last_frame();
        let frame = store.read_frame(frame_index)?;
        let intensity = compute_intensity(&frame);
        let slices = extract_slices(&intensity, &self.offsets, params.resolution())?;
        let groups = group_for_comparison(slices, self.group_size)?;
        debug!(
            frame = frame_index,
            resolution = params.resolution(),
            slices = self.offsets.len(),
            groups = groups.len(),
            "analysed final frame"
        );
        Ok(SliceReport {
            frame_index,
            time: params.frame_time(frame_index),
            intensity,
            groups,
        })
    }
}
