//! Store lifecycle around a run.

use std::path::Path;

use slitwave_core::{FieldEngine, SimulationParameters};
use slitwave_store::FrameStore;
use tracing::warn;

use crate::config::DriverConfig;
use crate::driver::{RunReport, SimulationDriver};
use crate::error::RunError;

/// Record a complete run into a fresh store at `path`.
///
/// Any existing store at `path` is discarded first. The store is created
/// with the engine's grid shape, filled by [`SimulationDriver::run`], and
/// closed. If anything fails, the handle is released and the partially
/// written store is deleted before the error is returned, so a retry always
/// starts clean.
pub fn record<E: FieldEngine + ?Sized>(
    engine: &mut E,
    path: impl AsRef<Path>,
    params: &SimulationParameters,
    config: DriverConfig,
) -> Result<RunReport, RunError> {
    let path = path.as_ref();
    let shape = engine.shape();
    let mut store = FrameStore::recreate(path, *params, shape, shape)?;

    let outcome = SimulationDriver::new(config)
        .run(engine, &mut store, params)
        .and_then(|report| {
            store.close()?;
            Ok(report)
        });

    match outcome {
        Ok(report) => Ok(report),
        Err(e) => {
            drop(store);
            warn!(path = %path.display(), error = %e, "run aborted, discarding partial store");
            if let Err(cleanup) = FrameStore::delete(path) {
                warn!(path = %path.display(), error = %cleanup, "could not delete partial store");
            }
            Err(e)
        }
    }
}
