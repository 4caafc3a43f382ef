//! Analytic double-slit engine.
//!
//! A monochromatic plane wave travels down the grid (increasing row) and
//! meets an opaque barrier row pierced by two slits. Past the barrier the
//! field is the superposition of cylindrical wavelets radiated by in-phase
//! point emitters placed on every slit cell:
//!
//! ```text
//! incident side (y ≤ y_b):  E = exp(i(k·y − ω·t))                 if t ≥ y
//! far side      (y > y_b):  E = Σ exp(i(k·ρ − ω·t)) / sqrt(k·ρ) / n  if t ≥ y_b + ρ
//! ```
//!
//! Lengths are in µm, time in engine units (`a/c` with `a = 1 µm`), so
//! `ω = k = 2π/λ`. Cell centres sit at `((c + ½)/res, (r + ½)/res)`.
//! `k·ρ` is floored at 1 to keep the wavelet amplitude bounded next to its
//! emitter.
//!
//! Constructed via the builder pattern: [`HuygensDoubleSlit::builder`].

use std::f64::consts::TAU;

use ndarray::Array2;
use slitwave_core::{
    Complex64, ComplexField, DielectricMap, EngineError, FieldComponent, FieldEngine, GridShape,
};
use tracing::debug;

/// Analytic double-slit diffraction engine.
///
/// Only [`FieldComponent::Ez`] is modelled; the scalar wave stands for the
/// out-of-plane electric field.
#[derive(Debug)]
pub struct HuygensDoubleSlit {
    shape: GridShape,
    resolution: f64,
    k: f64,
    barrier_row: usize,
    barrier_epsilon: f64,
    /// Column of every emitter, both slits.
    emitter_cols: Vec<usize>,
    time: f64,
    initialized: bool,
}

/// Builder for [`HuygensDoubleSlit`].
///
/// Required: `shape`. Lengths are in µm.
#[derive(Clone, Debug)]
pub struct HuygensDoubleSlitBuilder {
    shape: Option<GridShape>,
    resolution: u32,
    wavelength: f64,
    barrier_position: f64,
    slit_width: f64,
    slit_separation: f64,
    barrier_epsilon: f64,
}

impl HuygensDoubleSlit {
    /// Create a new builder with default geometry.
    pub fn builder() -> HuygensDoubleSlitBuilder {
        HuygensDoubleSlitBuilder {
            shape: None,
            resolution: 10,
            wavelength: 1.0,
            barrier_position: 5.0,
            slit_width: 1.0,
            slit_separation: 4.0,
            barrier_epsilon: 12.0,
        }
    }

    /// Row index of the barrier.
    pub fn barrier_row(&self) -> usize {
        self.barrier_row
    }

    /// Columns holding a point emitter, both slits, ascending.
    pub fn emitter_cols(&self) -> &[usize] {
        &self.emitter_cols
    }

    fn is_slit(&self, col: usize) -> bool {
        self.emitter_cols.binary_search(&col).is_ok()
    }

    fn centre(&self, index: usize) -> f64 {
        (index as f64 + 0.5) / self.resolution
    }

    fn value_at(&self, row: usize, col: usize, phase_t: Complex64) -> Complex64 {
        let zero = Complex64::new(0.0, 0.0);
        let t = self.time;
        let y = self.centre(row);

        if row < self.barrier_row || (row == self.barrier_row && self.is_slit(col)) {
            if t < y {
                return zero;
            }
            return Complex64::from_polar(1.0, self.k * y) * phase_t;
        }
        if row == self.barrier_row {
            return zero;
        }

        let y_b = self.centre(self.barrier_row);
        let x = self.centre(col);
        let dy = y - y_b;
        let mut sum = zero;
        for &ec in &self.emitter_cols {
            let dx = x - self.centre(ec);
            let rho = dx.hypot(dy);
            if t < y_b + rho {
                continue;
            }
            let kr = self.k * rho;
            sum += Complex64::from_polar(1.0 / kr.max(1.0).sqrt(), kr);
        }
        sum * phase_t / self.emitter_cols.len() as f64
    }
}

impl HuygensDoubleSlitBuilder {
    /// Set the grid shape (required).
    pub fn shape(mut self, shape: GridShape) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Set grid cells per µm (default: 10). Must be > 0.
    pub fn resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set the vacuum wavelength in µm (default: 1.0). Must be > 0.
    pub fn wavelength(mut self, wavelength: f64) -> Self {
        self.wavelength = wavelength;
        self
    }

    /// Set the barrier distance from row 0 in µm (default: 5.0).
    pub fn barrier_position(mut self, position: f64) -> Self {
        self.barrier_position = position;
        self
    }

    /// Set the width of each slit in µm (default: 1.0). Must be > 0.
    pub fn slit_width(mut self, width: f64) -> Self {
        self.slit_width = width;
        self
    }

    /// Set the centre-to-centre slit separation in µm (default: 4.0).
    /// Must be greater than the slit width.
    pub fn slit_separation(mut self, separation: f64) -> Self {
        self.slit_separation = separation;
        self
    }

    /// Set the relative permittivity of the barrier (default: 12.0).
    /// Must be >= 1.
    pub fn barrier_epsilon(mut self, epsilon: f64) -> Self {
        self.barrier_epsilon = epsilon;
        self
    }

    /// Build the engine, validating all configuration.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - `shape` is not set or has a zero dimension
    /// - `resolution` is 0
    /// - `wavelength` or `slit_width` is not finite and > 0
    /// - `slit_separation` does not exceed `slit_width`
    /// - the barrier row falls outside the grid
    /// - either slit extends past the grid edge
    /// - `barrier_epsilon` is not finite and >= 1
    pub fn build(self) -> Result<HuygensDoubleSlit, String> {
        let shape = self.shape.ok_or_else(|| "shape is required".to_string())?;
        if !shape.is_valid() {
            return Err(format!("shape must be non-empty, got {shape}"));
        }
        if self.resolution == 0 {
            return Err("resolution must be > 0".to_string());
        }
        if !(self.wavelength > 0.0 && self.wavelength.is_finite()) {
            return Err(format!(
                "wavelength must be finite and > 0, got {}",
                self.wavelength
            ));
        }
        if !(self.slit_width > 0.0 && self.slit_width.is_finite()) {
            return Err(format!(
                "slit_width must be finite and > 0, got {}",
                self.slit_width
            ));
        }
        if !(self.slit_separation > self.slit_width && self.slit_separation.is_finite()) {
            return Err(format!(
                "slit_separation must be finite and > slit_width ({}), got {}",
                self.slit_width, self.slit_separation
            ));
        }
        if !(self.barrier_epsilon >= 1.0 && self.barrier_epsilon.is_finite()) {
            return Err(format!(
                "barrier_epsilon must be finite and >= 1, got {}",
                self.barrier_epsilon
            ));
        }

        let res = f64::from(self.resolution);
        let barrier = (self.barrier_position * res).round();
        if !(barrier >= 0.0 && barrier < shape.rows as f64) {
            return Err(format!(
                "barrier_position {} µm is outside the grid ({} rows at {} cells/µm)",
                self.barrier_position, shape.rows, self.resolution
            ));
        }

        let width = shape.cols as f64 / res;
        let mid = width / 2.0;
        let half_span = (self.slit_separation + self.slit_width) / 2.0;
        if mid - half_span < 0.0 {
            return Err(format!(
                "slits span {} µm but the grid is only {width} µm wide",
                2.0 * half_span
            ));
        }

        let mut emitter_cols = Vec::new();
        for centre in [
            mid - self.slit_separation / 2.0,
            mid + self.slit_separation / 2.0,
        ] {
            let before = emitter_cols.len();
            emitter_cols.extend((0..shape.cols).filter(|&c| {
                let x = (c as f64 + 0.5) / res;
                (x - centre).abs() <= self.slit_width / 2.0
            }));
            if emitter_cols.len() == before {
                // Slit narrower than a cell: use the nearest cell.
                let nearest = (centre * res - 0.5).round().max(0.0) as usize;
                emitter_cols.push(nearest.min(shape.cols - 1));
            }
        }
        emitter_cols.sort_unstable();
        emitter_cols.dedup();

        Ok(HuygensDoubleSlit {
            shape,
            resolution: res,
            k: TAU / self.wavelength,
            barrier_row: barrier as usize,
            barrier_epsilon: self.barrier_epsilon,
            emitter_cols,
            time: 0.0,
            initialized: false,
        })
    }
}

impl FieldEngine for HuygensDoubleSlit {
    fn shape(&self) -> GridShape {
        self.shape
    }

    fn initialize(&mut self) -> Result<(), EngineError> {
        self.time = 0.0;
        self.initialized = true;
        debug!(
            shape = %self.shape,
            barrier_row = self.barrier_row,
            emitters = self.emitter_cols.len(),
            "initialized double-slit engine"
        );
        Ok(())
    }

    fn advance(&mut self, duration: f64) -> Result<(), EngineError> {
        if !self.initialized {
            return Err(EngineError::NotInitialized);
        }
        if !(duration.is_finite() && duration >= 0.0) {
            return Err(EngineError::InvalidDuration { value: duration });
        }
        self.time += duration;
        Ok(())
    }

    fn time(&self) -> f64 {
        self.time
    }

    fn sample(&mut self, component: FieldComponent) -> Result<ComplexField, EngineError> {
        if !self.initialized {
            return Err(EngineError::NotInitialized);
        }
        if component != FieldComponent::Ez {
            return Err(EngineError::UnsupportedComponent { component });
        }
        // ω = k in engine units.
        let phase_t = Complex64::from_polar(1.0, -self.k * self.time);
        Ok(Array2::from_shape_fn(self.shape.dim(), |(r, c)| {
            self.value_at(r, c, phase_t)
        }))
    }

    fn sample_dielectric(&mut self) -> Result<DielectricMap, EngineError> {
        if !self.initialized {
            return Err(EngineError::NotInitialized);
        }
        Ok(Array2::from_shape_fn(self.shape.dim(), |(r, c)| {
            if r == self.barrier_row && !self.is_slit(c) {
                self.barrier_epsilon
            } else {
                1.0
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn engine() -> HuygensDoubleSlit {
        // 6 µm × 8 µm at 10 cells/µm, barrier at 2 µm.
        HuygensDoubleSlit::builder()
            .shape(GridShape::new(60, 80))
            .resolution(10)
            .wavelength(0.8)
            .barrier_position(2.0)
            .slit_width(0.4)
            .slit_separation(2.0)
            .build()
            .unwrap()
    }

    fn started(t: f64) -> HuygensDoubleSlit {
        let mut e = engine();
        e.initialize().unwrap();
        e.advance(t).unwrap();
        e
    }

    // ---------------------------------------------------------------
    // Builder tests
    // ---------------------------------------------------------------

    #[test]
    fn builder_geometry() {
        let e = engine();
        assert_eq!(e.barrier_row(), 20);
        // Slit centres at 3.0 and 5.0 µm, 0.4 µm wide: four cells each.
        assert_eq!(e.emitter_cols(), [28, 29, 30, 31, 48, 49, 50, 51]);
    }

    #[test]
    fn builder_rejects_missing_shape() {
        let result = HuygensDoubleSlit::builder().build();
        assert!(result.unwrap_err().contains("shape"));
    }

    #[test]
    fn builder_rejects_bad_wavelength() {
        for wl in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = HuygensDoubleSlit::builder()
                .shape(GridShape::new(60, 80))
                .wavelength(wl)
                .build();
            assert!(result.unwrap_err().contains("wavelength"));
        }
    }

    #[test]
    fn builder_rejects_overlapping_slits() {
        let result = HuygensDoubleSlit::builder()
            .shape(GridShape::new(60, 80))
            .slit_width(2.0)
            .slit_separation(1.5)
            .build();
        assert!(result.unwrap_err().contains("slit_separation"));
    }

    #[test]
    fn builder_rejects_barrier_outside_grid() {
        let result = HuygensDoubleSlit::builder()
            .shape(GridShape::new(40, 80))
            .barrier_position(4.0)
            .build();
        assert!(result.unwrap_err().contains("barrier_position"));
    }

    #[test]
    fn builder_rejects_slits_wider_than_grid() {
        let result = HuygensDoubleSlit::builder()
            .shape(GridShape::new(60, 30))
            .slit_separation(4.0)
            .build();
        assert!(result.unwrap_err().contains("slits span"));
    }

    #[test]
    fn builder_rejects_low_epsilon() {
        let result = HuygensDoubleSlit::builder()
            .shape(GridShape::new(60, 80))
            .barrier_epsilon(0.5)
            .build();
        assert!(result.unwrap_err().contains("barrier_epsilon"));
    }

    #[test]
    fn narrow_slit_uses_nearest_cell() {
        let e = HuygensDoubleSlit::builder()
            .shape(GridShape::new(60, 80))
            .slit_width(0.01)
            .slit_separation(2.0)
            .build()
            .unwrap();
        assert_eq!(e.emitter_cols().len(), 2);
    }

    // ---------------------------------------------------------------
    // Engine behaviour
    // ---------------------------------------------------------------

    #[test]
    fn requires_initialize() {
        let mut e = engine();
        assert_eq!(e.advance(1.0), Err(EngineError::NotInitialized));
        assert_eq!(
            e.sample(FieldComponent::Ez).unwrap_err(),
            EngineError::NotInitialized
        );
        assert!(e.sample_dielectric().is_err());
    }

    #[test]
    fn rejects_invalid_durations() {
        let mut e = started(1.0);
        for d in [-0.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                e.advance(d),
                Err(EngineError::InvalidDuration { .. })
            ));
        }
        assert_eq!(e.time(), 1.0);
        e.advance(0.0).unwrap();
        assert_eq!(e.time(), 1.0);
    }

    #[test]
    fn only_ez_is_modelled() {
        let mut e = started(0.0);
        assert_eq!(
            e.sample(FieldComponent::Hx).unwrap_err(),
            EngineError::UnsupportedComponent {
                component: FieldComponent::Hx
            }
        );
    }

    #[test]
    fn dark_before_the_wave_arrives() {
        let mut e = started(0.0);
        let f = e.sample(FieldComponent::Ez).unwrap();
        assert!(f.iter().all(|z| z.norm() == 0.0));
    }

    #[test]
    fn wavefront_is_causal() {
        // Front at y = 1.0 µm: rows with centres up to 0.95 are lit.
        let mut e = started(1.0);
        let f = e.sample(FieldComponent::Ez).unwrap();
        for r in 0..60 {
            let lit = f.row(r).iter().any(|z| z.norm() > 0.0);
            assert_eq!(lit, r < 10, "row {r}");
        }
    }

    #[test]
    fn incident_wave_has_unit_amplitude() {
        let mut e = started(3.0);
        let f = e.sample(FieldComponent::Ez).unwrap();
        for r in 0..20 {
            for z in f.row(r) {
                assert_relative_eq!(z.norm(), 1.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn barrier_blocks_outside_slits() {
        let mut e = started(5.0);
        let f = e.sample(FieldComponent::Ez).unwrap();
        for (c, z) in f.row(20).iter().enumerate() {
            if e.emitter_cols().contains(&c) {
                assert_relative_eq!(z.norm(), 1.0, epsilon = 1e-12);
            } else {
                assert_eq!(z.norm(), 0.0, "col {c}");
            }
        }
    }

    #[test]
    fn far_side_lights_up_after_barrier() {
        let mut e = started(2.0);
        let f = e.sample(FieldComponent::Ez).unwrap();
        assert!(f.row(40).iter().all(|z| z.norm() == 0.0));

        e.advance(8.0).unwrap();
        let f = e.sample(FieldComponent::Ez).unwrap();
        assert!(f.row(40).iter().all(|z| z.norm() > 0.0));
    }

    #[test]
    fn pattern_is_mirror_symmetric() {
        let mut e = started(20.0);
        let f = e.sample(FieldComponent::Ez).unwrap();
        let cols = 80;
        for r in [25, 40, 59] {
            for c in 0..cols / 2 {
                let left = f[(r, c)].norm_sqr();
                let right = f[(r, cols - 1 - c)].norm_sqr();
                assert_relative_eq!(left, right, epsilon = 1e-9, max_relative = 1e-9);
            }
        }
    }

    #[test]
    fn dielectric_marks_barrier_cells() {
        let mut e = started(0.0);
        let eps = e.sample_dielectric().unwrap();
        assert_eq!(eps.dim(), (60, 80));
        for ((r, c), &v) in eps.indexed_iter() {
            let expected = if r == 20 && !e.emitter_cols().contains(&c) {
                12.0
            } else {
                1.0
            };
            assert_eq!(v, expected, "cell ({r}, {c})");
        }
    }

    #[test]
    fn initialize_resets_time() {
        let mut e = started(4.0);
        e.initialize().unwrap();
        assert_eq!(e.time(), 0.0);
    }
}
