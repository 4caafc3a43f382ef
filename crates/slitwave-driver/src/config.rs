//! Driver configuration.

use slitwave_core::{FieldComponent, TimeScale};

/// What the driver samples and how it converts time for the engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DriverConfig {
    /// Field component captured into every frame. Default: `Ez`.
    pub component: FieldComponent,
    /// Physical → engine time conversion applied to each advance.
    /// Default: [`TimeScale::SPEED_OF_LIGHT`].
    pub time_scale: TimeScale,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            component: FieldComponent::Ez,
            time_scale: TimeScale::default(),
        }
    }
}

impl DriverConfig {
    /// Sample `component` instead of the default.
    pub fn with_component(mut self, component: FieldComponent) -> Self {
        self.component = component;
        self
    }

    /// Use a different time conversion.
    pub fn with_time_scale(mut self, time_scale: TimeScale) -> Self {
        self.time_scale = time_scale;
        self
    }
}
