//! Horizontal intensity slices.

use ndarray::{Array1, Axis};

use crate::error::AnalysisError;
use crate::intensity::IntensityMap;

/// One row of an intensity map, taken at a physical distance from row 0.
#[derive(Clone, Debug, PartialEq)]
pub struct IntensitySlice {
    /// The physical offset that was requested.
    pub offset: f64,
    /// Row index the offset resolved to.
    pub row: usize,
    /// Intensity along the row, one value per column.
    pub values: Array1<f64>,
}

impl IntensitySlice {
    /// Largest value in the slice, or `0.0` for an empty slice.
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }
}

/// Row index for a physical `offset` on a grid with `resolution` cells per
/// unit length: `round(offset × resolution)`.
///
/// # Errors
///
/// [`AnalysisError::IndexOutOfRange`] if the result is non-finite, negative,
/// or not below `rows`.
pub fn offset_to_row(offset: f64, resolution: u32, rows: usize) -> Result<usize, AnalysisError> {
    let row = (offset * f64::from(resolution)).round();
    if !row.is_finite() || row < 0.0 || row >= rows as f64 {
        return Err(AnalysisError::IndexOutOfRange { offset, row, rows });
    }
    Ok(row as usize)
}

/// Take one full row of `intensity` per offset, in the order given.
///
/// ```
/// use ndarray::Array2;
/// use slitwave_analysis::extract_slices;
///
/// let intensity = Array2::<f64>::zeros((300, 200));
/// let slices = extract_slices(&intensity, &[10.0, 11.0, 12.0, 15.0, 20.0, 25.0], 10).unwrap();
/// let rows: Vec<usize> = slices.iter().map(|s| s.row).collect();
/// assert_eq!(rows, [100, 110, 120, 150, 200, 250]);
/// ```
///
/// # Errors
///
/// Fails on the first offset whose row falls outside the map; see
/// [`offset_to_row`].
pub fn extract_slices(
    intensity: &IntensityMap,
    offsets: &[f64],
    resolution: u32,
) -> Result<Vec<IntensitySlice>, AnalysisError> {
    let rows = intensity.nrows();
    offsets
        .iter()
        .map(|&offset| {
            let row = offset_to_row(offset, resolution, rows)?;
            Ok(IntensitySlice {
                offset,
                row,
                values: intensity.index_axis(Axis(0), row).to_owned(),
            })
        })
        .collect()
}
