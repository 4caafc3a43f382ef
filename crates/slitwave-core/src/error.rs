//! Error types shared across the slitwave workspace.
//!
//! Parameter validation and engine failures live here because every
//! downstream crate (store, driver, analysis) needs to name them.

use std::error::Error;
use std::fmt;

use crate::field::FieldComponent;

/// Errors from [`SimulationParameters::new()`](crate::SimulationParameters::new).
#[derive(Clone, Debug, PartialEq)]
pub enum ParamsError {
    /// Total duration is NaN, infinite, zero, or negative.
    InvalidDuration {
        /// The rejected value.
        value: f64,
    },
    /// Fewer than two frames were requested. Frame 0 is the initial
    /// state, so at least one interval must exist.
    TooFewFrames {
        /// The rejected frame count.
        frame_count: u64,
    },
    /// Resolution of zero grid points per unit length.
    ZeroResolution,
}

impl fmt::Display for ParamsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDuration { value } => {
                write!(f, "total duration must be finite and positive, got {value}")
            }
            Self::TooFewFrames { frame_count } => {
                write!(f, "frame count must be at least 2, got {frame_count}")
            }
            Self::ZeroResolution => write!(f, "resolution must be at least 1"),
        }
    }
}

impl Error for ParamsError {}

/// Errors reported by a [`FieldEngine`](crate::FieldEngine) implementation.
///
/// The driver wraps these in its own `EngineFailure` variant together with
/// the frame index at which the engine failed.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineError {
    /// `advance` or `sample` was called before `initialize`.
    NotInitialized,
    /// The requested advance duration is NaN, infinite, or negative.
    InvalidDuration {
        /// The rejected duration in engine time units.
        value: f64,
    },
    /// The engine does not model the requested field component.
    UnsupportedComponent {
        /// The component that was requested.
        component: FieldComponent,
    },
    /// Any other engine-specific failure.
    Failed {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "engine used before initialize()"),
            Self::InvalidDuration { value } => {
                write!(f, "advance duration must be finite and non-negative, got {value}")
            }
            Self::UnsupportedComponent { component } => {
                write!(f, "field component {component} is not supported")
            }
            Self::Failed { reason } => write!(f, "engine failed: {reason}"),
        }
    }
}

impl Error for EngineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_offending_values() {
        let e = ParamsError::TooFewFrames { frame_count: 1 };
        assert!(e.to_string().contains("got 1"));

        let e = EngineError::UnsupportedComponent {
            component: FieldComponent::Hy,
        };
        assert!(e.to_string().contains("Hy"));
    }
}
