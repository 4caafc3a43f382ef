//! Conversion between physical time and engine time.
//!
//! Two time units coexist in every run and must never be mixed:
//!
//! - **Physical time**, in femtoseconds. This is what the store header
//!   records (`total_duration`, `time_delta`) and what frame timestamps
//!   are expressed in.
//! - **Engine time**, in `a / c` where the engine length unit `a` is
//!   1 µm. This is what [`FieldEngine::advance`](crate::FieldEngine::advance)
//!   receives.
//!
//! One femtosecond is `c · 1 fs / 1 µm = 0.299 792 458` engine units.

/// Speed of light in µm per fs: the physical → engine time factor.
pub const SPEED_OF_LIGHT_UM_PER_FS: f64 = 0.299_792_458;

/// Convert a physical duration (fs) into engine time (`a/c`, `a = 1 µm`).
#[inline]
pub fn physical_to_engine_time(femtoseconds: f64) -> f64 {
    femtoseconds * SPEED_OF_LIGHT_UM_PER_FS
}

/// Scalar factor applied once per advance to turn physical time into
/// engine time.
///
/// [`TimeScale::default()`] uses [`SPEED_OF_LIGHT_UM_PER_FS`]. Engines that
/// already step in physical units use [`TimeScale::IDENTITY`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeScale {
    engine_units_per_physical: f64,
}

impl TimeScale {
    /// No conversion: engine time equals physical time.
    pub const IDENTITY: TimeScale = TimeScale {
        engine_units_per_physical: 1.0,
    };

    /// Femtoseconds → `a/c` with `a = 1 µm`.
    pub const SPEED_OF_LIGHT: TimeScale = TimeScale {
        engine_units_per_physical: SPEED_OF_LIGHT_UM_PER_FS,
    };

    /// Custom factor. Returns `None` unless it is finite and positive.
    pub fn new(engine_units_per_physical: f64) -> Option<Self> {
        if engine_units_per_physical.is_finite() && engine_units_per_physical > 0.0 {
            Some(Self {
                engine_units_per_physical,
            })
        } else {
            None
        }
    }

    /// Physical duration → engine duration.
    #[inline]
    pub fn to_engine(&self, physical: f64) -> f64 {
        physical * self.engine_units_per_physical
    }
}

impl Default for TimeScale {
    fn default() -> Self {
        Self::SPEED_OF_LIGHT
    }
}
