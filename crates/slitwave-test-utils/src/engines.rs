//! Reusable mock engines.
//!
//! - [`ConstantEngine`]: one value before any advance, another after.
//! - [`ClockEngine`]: every cell encodes the current engine time.
//! - [`FailingEngine`]: fails deterministically at a chosen call.
//! - [`RecordingEngine`]: wraps another engine and logs every call.

use ndarray::Array2;
use slitwave_core::{
    Complex64, ComplexField, DielectricMap, EngineError, FieldComponent, FieldEngine, GridShape,
};

fn require_init(initialized: bool) -> Result<(), EngineError> {
    if initialized {
        Ok(())
    } else {
        Err(EngineError::NotInitialized)
    }
}

fn check_duration(duration: f64) -> Result<(), EngineError> {
    if duration.is_finite() && duration >= 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidDuration { value: duration })
    }
}

/// Returns `initial` everywhere until the first advance, `value` afterwards.
pub struct ConstantEngine {
    pub shape: GridShape,
    pub initial: Complex64,
    pub value: Complex64,
    pub permittivity: f64,
    time: f64,
    initialized: bool,
}

impl ConstantEngine {
    pub fn new(shape: GridShape, initial: Complex64, value: Complex64) -> Self {
        Self {
            shape,
            initial,
            value,
            permittivity: 1.0,
            time: 0.0,
            initialized: false,
        }
    }
}

impl FieldEngine for ConstantEngine {
    fn shape(&self) -> GridShape {
        self.shape
    }

    fn initialize(&mut self) -> Result<(), EngineError> {
        self.time = 0.0;
        self.initialized = true;
        Ok(())
    }

    fn advance(&mut self, duration: f64) -> Result<(), EngineError> {
        require_init(self.initialized)?;
        check_duration(duration)?;
        self.time += duration;
        Ok(())
    }

    fn time(&self) -> f64 {
        self.time
    }

    fn sample(&mut self, _component: FieldComponent) -> Result<ComplexField, EngineError> {
        require_init(self.initialized)?;
        let v = if self.time == 0.0 {
            self.initial
        } else {
            self.value
        };
        Ok(Array2::from_elem(self.shape.dim(), v))
    }

    fn sample_dielectric(&mut self) -> Result<DielectricMap, EngineError> {
        require_init(self.initialized)?;
        Ok(Array2::from_elem(self.shape.dim(), self.permittivity))
    }
}

/// Cell `(r, c)` holds `time + i·(r·cols + c)`, so each frame reveals the
/// engine time it was sampled at and its own layout.
pub struct ClockEngine {
    pub shape: GridShape,
    time: f64,
    initialized: bool,
}

impl ClockEngine {
    pub fn new(shape: GridShape) -> Self {
        Self {
            shape,
            time: 0.0,
            initialized: false,
        }
    }

    /// The frame this engine produces at engine time `time`.
    pub fn expected_frame(shape: GridShape, time: f64) -> ComplexField {
        Array2::from_shape_fn(shape.dim(), |(r, c)| {
            Complex64::new(time, (r * shape.cols + c) as f64)
        })
    }
}

impl FieldEngine for ClockEngine {
    fn shape(&self) -> GridShape {
        self.shape
    }

    fn initialize(&mut self) -> Result<(), EngineError> {
        self.time = 0.0;
        self.initialized = true;
        Ok(())
    }

    fn advance(&mut self, duration: f64) -> Result<(), EngineError> {
        require_init(self.initialized)?;
        check_duration(duration)?;
        self.time += duration;
        Ok(())
    }

    fn time(&self) -> f64 {
        self.time
    }

    fn sample(&mut self, _component: FieldComponent) -> Result<ComplexField, EngineError> {
        require_init(self.initialized)?;
        Ok(Self::expected_frame(self.shape, self.time))
    }

    fn sample_dielectric(&mut self) -> Result<DielectricMap, EngineError> {
        require_init(self.initialized)?;
        Ok(Array2::from_shape_fn(self.shape.dim(), |(r, _)| {
            if r == self.shape.rows / 2 {
                12.0
            } else {
                1.0
            }
        }))
    }
}

/// Which engine operation a [`FailingEngine`] breaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailPoint {
    Initialize,
    Dielectric,
    /// The n-th `advance` call (0-based) fails.
    Advance(usize),
    /// The n-th `sample` call (0-based) fails.
    Sample(usize),
}

/// A [`ClockEngine`] that fails deterministically at one call.
pub struct FailingEngine {
    inner: ClockEngine,
    fail_at: FailPoint,
    advances: usize,
    samples: usize,
}

impl FailingEngine {
    pub fn new(shape: GridShape, fail_at: FailPoint) -> Self {
        Self {
            inner: ClockEngine::new(shape),
            fail_at,
            advances: 0,
            samples: 0,
        }
    }

    /// How many `advance` calls were attempted.
    pub fn advances(&self) -> usize {
        self.advances
    }

    fn failure(&self, what: &str) -> EngineError {
        EngineError::Failed {
            reason: format!("deliberate {what} failure"),
        }
    }
}

impl FieldEngine for FailingEngine {
    fn shape(&self) -> GridShape {
        self.inner.shape()
    }

    fn initialize(&mut self) -> Result<(), EngineError> {
        if self.fail_at == FailPoint::Initialize {
            return Err(self.failure("initialize"));
        }
        self.inner.initialize()
    }

    fn advance(&mut self, duration: f64) -> Result<(), EngineError> {
        let n = self.advances;
        self.advances += 1;
        if self.fail_at == FailPoint::Advance(n) {
            return Err(self.failure("advance"));
        }
        self.inner.advance(duration)
    }

    fn time(&self) -> f64 {
        self.inner.time()
    }

    fn sample(&mut self, component: FieldComponent) -> Result<ComplexField, EngineError> {
        let n = self.samples;
        self.samples += 1;
        if self.fail_at == FailPoint::Sample(n) {
            return Err(self.failure("sample"));
        }
        self.inner.sample(component)
    }

    fn sample_dielectric(&mut self) -> Result<DielectricMap, EngineError> {
        if self.fail_at == FailPoint::Dielectric {
            return Err(self.failure("dielectric"));
        }
        self.inner.sample_dielectric()
    }
}

/// One logged engine call.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineCall {
    Initialize,
    Advance(f64),
    Sample(FieldComponent),
    SampleDielectric,
}

/// Wraps an engine and records every call in order.
pub struct RecordingEngine<E> {
    pub inner: E,
    pub calls: Vec<EngineCall>,
}

impl<E: FieldEngine> RecordingEngine<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            calls: Vec::new(),
        }
    }

    /// Durations passed to `advance`, in order.
    pub fn advances(&self) -> Vec<f64> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                EngineCall::Advance(d) => Some(*d),
                _ => None,
            })
            .collect()
    }
}

impl<E: FieldEngine> FieldEngine for RecordingEngine<E> {
    fn shape(&self) -> GridShape {
        self.inner.shape()
    }

    fn initialize(&mut self) -> Result<(), EngineError> {
        self.calls.push(EngineCall::Initialize);
        self.inner.initialize()
    }

    fn advance(&mut self, duration: f64) -> Result<(), EngineError> {
        self.calls.push(EngineCall::Advance(duration));
        self.inner.advance(duration)
    }

    fn time(&self) -> f64 {
        self.inner.time()
    }

    fn sample(&mut self, component: FieldComponent) -> Result<ComplexField, EngineError> {
        self.calls.push(EngineCall::Sample(component));
        self.inner.sample(component)
    }

    fn sample_dielectric(&mut self) -> Result<DielectricMap, EngineError> {
        self.calls.push(EngineCall::SampleDielectric);
        self.inner.sample_dielectric()
    }
}
