//! Field intensity.

use ndarray::Array2;
use slitwave_core::ComplexField;

/// Real, non-negative intensity values with the shape of the source frame.
pub type IntensityMap = Array2<f64>;

/// Elementwise squared magnitude, `re² + im²`.
///
/// ```
/// use slitwave_analysis::compute_intensity;
/// use slitwave_core::Complex64;
/// use ndarray::array;
///
/// let frame = array![[Complex64::new(3.0, 4.0), Complex64::new(0.0, -1.0)]];
/// assert_eq!(compute_intensity(&frame), array![[25.0, 1.0]]);
/// ```
pub fn compute_intensity(frame: &ComplexField) -> IntensityMap {
    frame.mapv(|z| z.norm_sqr())
}
