//! The field-stepping engine capability interface.

use crate::error::EngineError;
use crate::field::{ComplexField, DielectricMap, FieldComponent, GridShape};

/// A 2D time-domain field engine the driver can step and sample.
///
/// This is the only surface the driver sees of a solver. Geometry, sources,
/// boundary layers and the update equations all stay behind it.
///
/// # Contract
///
/// - [`initialize()`](FieldEngine::initialize) resets the engine to time 0.
///   It may be called again to restart.
/// - [`advance()`](FieldEngine::advance) moves the engine forward by a
///   duration in **engine** time units (see [`crate::units`]).
/// - [`sample()`](FieldEngine::sample) and
///   [`sample_dielectric()`](FieldEngine::sample_dielectric) return arrays
///   whose shape equals [`shape()`](FieldEngine::shape) for the whole run.
/// - The dielectric map does not change while the engine runs.
pub trait FieldEngine {
    /// Grid shape of every sampled array.
    fn shape(&self) -> GridShape;

    /// Reset to the start state (time = 0).
    fn initialize(&mut self) -> Result<(), EngineError>;

    /// Advance the simulation by `duration` engine time units.
    fn advance(&mut self, duration: f64) -> Result<(), EngineError>;

    /// Current engine time.
    fn time(&self) -> f64;

    /// Sample one field component over the whole grid.
    fn sample(&mut self, component: FieldComponent) -> Result<ComplexField, EngineError>;

    /// Sample the static permittivity map.
    fn sample_dielectric(&mut self) -> Result<DielectricMap, EngineError>;
}

impl<E: FieldEngine + ?Sized> FieldEngine for &mut E {
    fn shape(&self) -> GridShape {
        (**self).shape()
    }

    fn initialize(&mut self) -> Result<(), EngineError> {
        (**self).initialize()
    }

    fn advance(&mut self, duration: f64) -> Result<(), EngineError> {
        (**self).advance(duration)
    }

    fn time(&self) -> f64 {
        (**self).time()
    }

    fn sample(&mut self, component: FieldComponent) -> Result<ComplexField, EngineError> {
        (**self).sample(component)
    }

    fn sample_dielectric(&mut self) -> Result<DielectricMap, EngineError> {
        (**self).sample_dielectric()
    }
}

impl<E: FieldEngine + ?Sized> FieldEngine for Box<E> {
    fn shape(&self) -> GridShape {
        (**self).shape()
    }

    fn initialize(&mut self) -> Result<(), EngineError> {
        (**self).initialize()
    }

    fn advance(&mut self, duration: f64) -> Result<(), EngineError> {
        (**self).advance(duration)
    }

    fn time(&self) -> f64 {
        (**self).time()
    }

    fn sample(&mut self, component: FieldComponent) -> Result<ComplexField, EngineError> {
        (**self).sample(component)
    }

    fn sample_dielectric(&mut self) -> Result<DielectricMap, EngineError> {
        (**self).sample_dielectric()
    }
}
