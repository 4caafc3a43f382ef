//! Comparison groups.

use crate::error::AnalysisError;
use crate::slices::IntensitySlice;

/// A batch of slices plotted on a shared vertical scale.
#[derive(Clone, Debug, PartialEq)]
pub struct SliceGroup {
    /// The slices, in input order.
    pub slices: Vec<IntensitySlice>,
    /// Largest intensity across every slice in the group. `0.0` when all
    /// slices are empty.
    pub max: f64,
}

impl SliceGroup {
    fn new(slices: Vec<IntensitySlice>) -> Self {
        let max = slices.iter().map(IntensitySlice::max).fold(0.0, f64::max);
        Self { slices, max }
    }
}

/// Split `slices` into consecutive groups of `group_size`.
///
/// The last group holds the remainder and is shorter when the count does
/// not divide evenly. No slices gives no groups.
///
/// # Errors
///
/// [`AnalysisError::InvalidGroupSize`] if `group_size` is 0.
pub fn group_for_comparison(
    slices: Vec<IntensitySlice>,
    group_size: usize,
) -> Result<Vec<SliceGroup>, AnalysisError> {
    if group_size == 0 {
        return Err(AnalysisError::InvalidGroupSize);
    }
    let mut groups = Vec::with_capacity(slices.len().div_ceil(group_size));
    let mut rest = slices.into_iter().peekable();
    while rest.peek().is_some() {
        let batch: Vec<_> = rest.by_ref().take(group_size).collect();
        groups.push(SliceGroup::new(batch));
    }
    Ok(groups)
}
