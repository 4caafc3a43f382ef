//! Test utilities and mock engines for slitwave development.
//!
//! Provides mock implementations of [`FieldEngine`] and seeded random
//! array generators for constructing test scenarios.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod engines;

pub use engines::{
    ClockEngine, ConstantEngine, EngineCall, FailPoint, FailingEngine, RecordingEngine,
};

use ndarray::Array2;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use slitwave_core::{Complex64, ComplexField, DielectricMap, GridShape};

/// Deterministic complex field with components uniform in `[-1, 1)`.
pub fn random_field(shape: GridShape, seed: u64) -> ComplexField {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    Array2::from_shape_simple_fn(shape.dim(), || {
        let re: f64 = rng.random::<f64>() * 2.0 - 1.0;
        let im: f64 = rng.random::<f64>() * 2.0 - 1.0;
        Complex64::new(re, im)
    })
}

/// Deterministic permittivity map with values in `[1, 13)`.
pub fn random_dielectric(shape: GridShape, seed: u64) -> DielectricMap {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    Array2::from_shape_simple_fn(shape.dim(), || 1.0 + 12.0 * rng.random::<f64>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_field() {
        let s = GridShape::new(5, 7);
        assert_eq!(random_field(s, 3), random_field(s, 3));
        assert_ne!(random_field(s, 3), random_field(s, 4));
    }

    #[test]
    fn dielectric_in_range() {
        let eps = random_dielectric(GridShape::new(10, 10), 1);
        assert!(eps.iter().all(|&v| (1.0..13.0).contains(&v)));
    }
}
