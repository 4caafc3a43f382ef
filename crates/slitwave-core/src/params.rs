//! Run parameters shared by the driver, the store header, and analysis.

use crate::error::ParamsError;

/// Immutable description of one simulation run.
///
/// `time_delta` is derived, never stored independently: frame 0 is the
/// initial state and the last frame lands exactly on `total_duration`,
/// so `time_delta = total_duration / (frame_count - 1)`.
///
/// # Examples
///
/// ```
/// use slitwave_core::SimulationParameters;
///
/// let params = SimulationParameters::new(120.0, 120, 10).unwrap();
/// assert!((params.time_delta() - 120.0 / 119.0).abs() < 1e-12);
/// assert_eq!(params.frame_time(119), params.time_delta() * 119.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationParameters {
    total_duration: f64,
    frame_count: u64,
    resolution: u32,
}

impl SimulationParameters {
    /// Validate and build a parameter set.
    ///
    /// # Errors
    ///
    /// Returns [`ParamsError`] if the duration is not finite and strictly
    /// positive, `frame_count < 2`, or `resolution == 0`.
    pub fn new(total_duration: f64, frame_count: u64, resolution: u32) -> Result<Self, ParamsError> {
        if !total_duration.is_finite() || total_duration <= 0.0 {
            return Err(ParamsError::InvalidDuration {
                value: total_duration,
            });
        }
        if frame_count < 2 {
            return Err(ParamsError::TooFewFrames { frame_count });
        }
        if resolution == 0 {
            return Err(ParamsError::ZeroResolution);
        }
        Ok(Self {
            total_duration,
            frame_count,
            resolution,
        })
    }

    /// Total simulated duration in physical time units.
    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    /// Number of frames, including the initial frame 0.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Grid points per unit length.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Physical time between consecutive frames. Always > 0.
    pub fn time_delta(&self) -> f64 {
        self.total_duration / (self.frame_count - 1) as f64
    }

    /// Elapsed physical time at which frame `index` is captured.
    pub fn frame_time(&self, index: u64) -> f64 {
        index as f64 * self.time_delta()
    }

    /// Index of the last frame.
    pub fn last_frame(&self) -> u64 {
        self.frame_count - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn spec_example_time_delta() {
        let p = SimulationParameters::new(120.0, 120, 10).unwrap();
        assert_relative_eq!(p.time_delta(), 1.008_403_361_344_537_8, epsilon = 1e-12);
        assert_eq!(p.frame_count(), 120);
        assert_eq!(p.last_frame(), 119);
    }

    #[test]
    fn two_frames_is_minimum() {
        let p = SimulationParameters::new(5.0, 2, 1).unwrap();
        assert_eq!(p.time_delta(), 5.0);
        assert_eq!(
            SimulationParameters::new(5.0, 1, 1),
            Err(ParamsError::TooFewFrames { frame_count: 1 })
        );
        assert_eq!(
            SimulationParameters::new(5.0, 0, 1),
            Err(ParamsError::TooFewFrames { frame_count: 0 })
        );
    }

    #[test]
    fn rejects_bad_duration_and_resolution() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                SimulationParameters::new(bad, 10, 1),
                Err(ParamsError::InvalidDuration { .. })
            ));
        }
        assert_eq!(
            SimulationParameters::new(1.0, 10, 0),
            Err(ParamsError::ZeroResolution)
        );
    }

    proptest! {
        #[test]
        fn frame_times_strictly_increase(
            duration in 1e-3f64..1e6,
            frames in 2u64..500,
        ) {
            let p = SimulationParameters::new(duration, frames, 10).unwrap();
            prop_assert!(p.time_delta() > 0.0);
            for i in 1..frames {
                prop_assert!(p.frame_time(i) > p.frame_time(i - 1));
            }
            prop_assert!((p.frame_time(p.last_frame()) - duration).abs() <= duration * 1e-12);
        }
    }
}
