//! Errors from a driver run.

use std::error::Error;
use std::fmt;

use slitwave_core::{EngineError, GridShape};
use slitwave_store::StoreError;

/// Where in the run the engine failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStage {
    /// During `initialize()`.
    Initialize,
    /// While sampling the dielectric map.
    Dielectric,
    /// While advancing towards the given frame.
    Advance(u64),
    /// While sampling the given frame.
    Sample(u64),
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initialize => write!(f, "initialize"),
            Self::Dielectric => write!(f, "dielectric sampling"),
            Self::Advance(i) => write!(f, "advance to frame {i}"),
            Self::Sample(i) => write!(f, "sampling frame {i}"),
        }
    }
}

/// Errors that abort a [`SimulationDriver::run`](crate::SimulationDriver::run).
///
/// Every variant is fatal to the run. A store that saw a failed run is not
/// valid and must be discarded before retrying.
#[derive(Debug)]
pub enum RunError {
    /// The engine failed.
    EngineFailure {
        /// Where the failure happened.
        stage: RunStage,
        /// The engine's own error.
        source: EngineError,
    },
    /// The engine's grid disagrees with the store's frame shape.
    ShapeMismatch {
        /// Frame shape of the store.
        store: GridShape,
        /// Shape reported or produced by the engine.
        engine: GridShape,
    },
    /// The store's run parameters differ from the ones passed to `run`.
    ParamsMismatch,
    /// The frame store rejected an operation.
    Store(StoreError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EngineFailure { stage, source } => {
                write!(f, "engine failure during {stage}: {source}")
            }
            Self::ShapeMismatch { store, engine } => {
                write!(f, "engine grid {engine} does not match store frames {store}")
            }
            Self::ParamsMismatch => {
                write!(f, "store was created with different run parameters")
            }
            Self::Store(e) => write!(f, "store: {e}"),
        }
    }
}

impl Error for RunError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EngineFailure { source, .. } => Some(source),
            Self::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for RunError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}
