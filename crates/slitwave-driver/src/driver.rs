//! The record loop.
//!
//! # Time units
//!
//! The store records physical time (`params.time_delta()`); the engine is
//! advanced by `config.time_scale.to_engine(params.time_delta())`. The
//! conversion is computed once per run and never fed back into the
//! recorded metadata.

use std::time::Instant;

use slitwave_core::{FieldEngine, GridShape, SimulationParameters};
use slitwave_store::FrameStore;
use tracing::{debug, info};

use crate::config::DriverConfig;
use crate::error::{RunError, RunStage};

/// Summary of a completed run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    /// Frames written, including frame 0.
    pub frames_written: u64,
    /// Physical time of the last frame.
    pub physical_time: f64,
    /// Engine time after the last advance.
    pub engine_time: f64,
    /// Wall-clock duration of the run, in microseconds.
    pub wall_us: u64,
}

/// Drives a [`FieldEngine`] and captures one frame per time increment.
///
/// Frames are captured strictly in ascending index order, each exactly
/// once: frame 0 right after `initialize()`, frame `i` right after the
/// `i`-th `advance()`. The dielectric map is captured once, after
/// `initialize()`.
///
/// # Example
///
/// ```ignore
/// let driver = SimulationDriver::new(DriverConfig::default());
/// let mut store = FrameStore::recreate(path, params, shape, shape)?;
/// let report = driver.run(&mut engine, &mut store, &params)?;
/// store.close()?;
/// ```
#[derive(Clone, Debug, Default)]
pub struct SimulationDriver {
    config: DriverConfig,
}

impl SimulationDriver {
    /// Create a driver with the given configuration.
    pub fn new(config: DriverConfig) -> Self {
        Self { config }
    }

    /// The driver's configuration.
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Engine-time duration of one frame interval.
    pub fn engine_step(&self, params: &SimulationParameters) -> f64 {
        self.config.time_scale.to_engine(params.time_delta())
    }

    /// Run the engine from time 0 through `params.frame_count()` frames,
    /// writing every frame into `store`.
    ///
    /// # Errors
    ///
    /// Aborts on the first engine or store failure. The store is left
    /// partially written and must be discarded by the caller.
    pub fn run<E: FieldEngine + ?Sized>(
        &self,
        engine: &mut E,
        store: &mut FrameStore,
        params: &SimulationParameters,
    ) -> Result<RunReport, RunError> {
        let started = Instant::now();
        let header = *store.header();
        if header.params != *params {
            return Err(RunError::ParamsMismatch);
        }
        let frame_shape = header.frame_shape;
        check_shape(frame_shape, engine.shape())?;

        let frame_count = params.frame_count();
        let step = self.engine_step(params);
        let component = self.config.component;
        info!(
            frames = frame_count,
            time_delta = params.time_delta(),
            engine_step = step,
            component = %component,
            "starting run"
        );

        engine
            .initialize()
            .map_err(|source| RunError::EngineFailure {
                stage: RunStage::Initialize,
                source,
            })?;

        let dielectric = engine
            .sample_dielectric()
            .map_err(|source| RunError::EngineFailure {
                stage: RunStage::Dielectric,
                source,
            })?;
        check_shape(frame_shape, GridShape::of(&dielectric))?;
        store.write_dielectric(&dielectric)?;

        for index in 0..frame_count {
            if index > 0 {
                engine
                    .advance(step)
                    .map_err(|source| RunError::EngineFailure {
                        stage: RunStage::Advance(index),
                        source,
                    })?;
            }
            let frame = engine
                .sample(component)
                .map_err(|source| RunError::EngineFailure {
                    stage: RunStage::Sample(index),
                    source,
                })?;
            check_shape(frame_shape, GridShape::of(&frame))?;
            store.write_frame(index, &frame)?;
            debug!(
                frame = index,
                time = params.frame_time(index),
                engine_time = engine.time(),
                "captured frame"
            );
        }

        let report = RunReport {
            frames_written: frame_count,
            physical_time: params.frame_time(params.last_frame()),
            engine_time: engine.time(),
            wall_us: started.elapsed().as_micros() as u64,
        };
        info!(
            frames = report.frames_written,
            engine_time = report.engine_time,
            wall_us = report.wall_us,
            "run complete"
        );
        Ok(report)
    }
}

fn check_shape(store: GridShape, engine: GridShape) -> Result<(), RunError> {
    if store != engine {
        return Err(RunError::ShapeMismatch { store, engine });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use slitwave_core::{Complex64, FieldComponent, TimeScale};
    use slitwave_test_utils::{
        ClockEngine, ConstantEngine, EngineCall, FailPoint, FailingEngine, RecordingEngine,
    };
    use tempfile::TempDir;

    fn setup(frames: u64, shape: GridShape) -> (TempDir, FrameStore, SimulationParameters) {
        let dir = tempfile::tempdir().unwrap();
        let params = SimulationParameters::new(10.0, frames, 10).unwrap();
        let store =
            FrameStore::create(dir.path().join("run.slit"), params, shape, shape).unwrap();
        (dir, store, params)
    }

    #[test]
    fn call_order_is_init_dielectric_then_sample_advance_pairs() {
        let shape = GridShape::new(3, 2);
        let (_dir, mut store, params) = setup(3, shape);
        let mut engine = RecordingEngine::new(ClockEngine::new(shape));
        let driver = SimulationDriver::new(DriverConfig::default().with_time_scale(TimeScale::IDENTITY));
        driver.run(&mut engine, &mut store, &params).unwrap();

        assert_eq!(
            engine.calls,
            vec![
                EngineCall::Initialize,
                EngineCall::SampleDielectric,
                EngineCall::Sample(FieldComponent::Ez),
                EngineCall::Advance(5.0),
                EngineCall::Sample(FieldComponent::Ez),
                EngineCall::Advance(5.0),
                EngineCall::Sample(FieldComponent::Ez),
            ]
        );
    }

    #[test]
    fn advance_uses_converted_delta_and_store_keeps_physical() {
        let shape = GridShape::new(2, 2);
        let (_dir, mut store, params) = setup(5, shape);
        let mut engine = RecordingEngine::new(ClockEngine::new(shape));
        let driver = SimulationDriver::new(DriverConfig::default());
        let report = driver.run(&mut engine, &mut store, &params).unwrap();

        let expected_step = slitwave_core::physical_to_engine_time(2.5);
        assert_eq!(engine.advances(), vec![expected_step; 4]);
        assert_eq!(store.read_params().unwrap().time_delta(), 2.5);
        assert_eq!(report.physical_time, 10.0);
        assert_eq!(report.frames_written, 5);
        assert!((report.engine_time - 4.0 * expected_step).abs() < 1e-12);
    }

    #[test]
    fn frame_zero_is_pre_advance_state() {
        let shape = GridShape::new(4, 4);
        let (_dir, mut store, params) = setup(4, shape);
        let mut engine = ConstantEngine::new(
            shape,
            Complex64::new(-1.0, 0.5),
            Complex64::new(2.0, 2.0),
        );
        SimulationDriver::default()
            .run(&mut engine, &mut store, &params)
            .unwrap();

        let f0 = store.read_frame(0).unwrap();
        assert!(f0.iter().all(|z| *z == Complex64::new(-1.0, 0.5)));
        for i in 1..4 {
            let f = store.read_frame(i).unwrap();
            assert!(f.iter().all(|z| *z == Complex64::new(2.0, 2.0)));
        }
    }

    #[test]
    fn engine_shape_must_match_store() {
        let (_dir, mut store, params) = setup(3, GridShape::new(4, 4));
        let mut engine = ClockEngine::new(GridShape::new(4, 5));
        let err = SimulationDriver::default()
            .run(&mut engine, &mut store, &params)
            .unwrap_err();
        assert!(matches!(err, RunError::ShapeMismatch { .. }));
    }

    #[test]
    fn params_must_match_store() {
        let shape = GridShape::new(2, 2);
        let (_dir, mut store, _params) = setup(3, shape);
        let other = SimulationParameters::new(10.0, 4, 10).unwrap();
        let err = SimulationDriver::default()
            .run(&mut ClockEngine::new(shape), &mut store, &other)
            .unwrap_err();
        assert!(matches!(err, RunError::ParamsMismatch));
    }

    #[test]
    fn advance_failure_aborts_with_stage() {
        let shape = GridShape::new(2, 2);
        let (_dir, mut store, params) = setup(6, shape);
        let mut engine = FailingEngine::new(shape, FailPoint::Advance(2));
        let err = SimulationDriver::default()
            .run(&mut engine, &mut store, &params)
            .unwrap_err();
        match err {
            RunError::EngineFailure { stage, .. } => assert_eq!(stage, RunStage::Advance(3)),
            other => panic!("unexpected error: {other}"),
        }
        // No further advances after the failure.
        assert_eq!(engine.advances(), 3);
    }

    #[test]
    fn sample_and_init_failures_abort() {
        let shape = GridShape::new(2, 2);
        for (fail, stage) in [
            (FailPoint::Initialize, RunStage::Initialize),
            (FailPoint::Dielectric, RunStage::Dielectric),
            (FailPoint::Sample(0), RunStage::Sample(0)),
            (FailPoint::Sample(2), RunStage::Sample(2)),
        ] {
            let (_dir, mut store, params) = setup(4, shape);
            let mut engine = FailingEngine::new(shape, fail);
            let err = SimulationDriver::default()
                .run(&mut engine, &mut store, &params)
                .unwrap_err();
            assert!(
                matches!(err, RunError::EngineFailure { stage: s, .. } if s == stage),
                "expected failure at {stage}, got {err}"
            );
        }
    }

    #[test]
    fn closed_store_fails_the_run() {
        let shape = GridShape::new(2, 2);
        let (_dir, mut store, params) = setup(3, shape);
        store.close().unwrap();
        let err = SimulationDriver::default()
            .run(&mut ClockEngine::new(shape), &mut store, &params)
            .unwrap_err();
        assert!(matches!(
            err,
            RunError::Store(slitwave_store::StoreError::Closed)
        ));
    }
}
