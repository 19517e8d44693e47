use serde::Deserialize;

/// Deepest tree the CLI accepts; each level doubles the work
pub const MAX_DEPTH_LIMIT: usize = 14;

/// Seconds between animation frames when none is configured
pub const DEFAULT_TIME_STEP: f32 = 0.03;

/// Longest frame delay accepted, in seconds
pub const MAX_TIME_STEP: f32 = 10.0;

/// Frame delay in seconds, or the default when `step` is not finite or
/// outside `[0, MAX_TIME_STEP]`.
pub fn checked_time_step(step: f32) -> f32 {
    if step.is_finite() && (0.0..=MAX_TIME_STEP).contains(&step) {
        step
    } else {
        log::warn!(
            "time step {} outside 0..={} seconds, using {}",
            step,
            MAX_TIME_STEP,
            DEFAULT_TIME_STEP
        );
        DEFAULT_TIME_STEP
    }
}

/// Tunables of the clock tree.
///
/// All factors are per-depth decay multipliers in `(0, 1)`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Logical units to surface pixels; consumed by the canvas, not the engine
    pub zoom: f64,
    pub start_line_width: f64,
    pub max_depth: usize,
    pub length_factor: f64,
    pub luminance_factor: f64,
    pub width_factor: f64,
    pub start_arm_length: f64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            zoom: 0.25,
            start_line_width: 10.0,
            max_depth: 9,
            length_factor: 0.9,
            luminance_factor: 0.9,
            width_factor: 0.7,
            start_arm_length: 150.0,
        }
    }
}

/// Command-line overrides for `ClockConfig`; unset fields keep the base value
#[derive(Clone, Debug, Default)]
pub struct ClockOverrides {
    pub zoom: Option<f64>,
    pub start_line_width: Option<f64>,
    pub max_depth: Option<usize>,
    pub length_factor: Option<f64>,
    pub luminance_factor: Option<f64>,
    pub width_factor: Option<f64>,
    pub start_arm_length: Option<f64>,
}

impl ClockOverrides {
    pub fn apply(&self, base: &ClockConfig) -> ClockConfig {
        ClockConfig {
            zoom: self.zoom.unwrap_or(base.zoom),
            start_line_width: self.start_line_width.unwrap_or(base.start_line_width),
            max_depth: self.max_depth.unwrap_or(base.max_depth).min(MAX_DEPTH_LIMIT),
            length_factor: self.length_factor.unwrap_or(base.length_factor),
            luminance_factor: self.luminance_factor.unwrap_or(base.luminance_factor),
            width_factor: self.width_factor.unwrap_or(base.width_factor),
            start_arm_length: self.start_arm_length.unwrap_or(base.start_arm_length),
        }
    }
}

/// Configuration for the interactive clock and print mode
#[derive(Clone)]
pub struct RunConfig {
    pub clock: ClockConfig,
    pub time_step: f32,
    pub palette: u8,
    pub show_fps: bool,
    /// Fixed instant to draw instead of the wall clock (print mode)
    pub at: Option<chrono::NaiveTime>,
    /// Output size in cells for print mode; detected when unset
    pub size: Option<(u16, u16)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_only_set_fields() {
        let base = ClockConfig::default();
        let overrides = ClockOverrides {
            max_depth: Some(4),
            length_factor: Some(0.5),
            ..ClockOverrides::default()
        };
        let merged = overrides.apply(&base);
        assert_eq!(merged.max_depth, 4);
        assert_eq!(merged.length_factor, 0.5);
        assert_eq!(merged.width_factor, base.width_factor);
        assert_eq!(merged.start_arm_length, base.start_arm_length);
    }

    #[test]
    fn depth_is_capped() {
        let overrides = ClockOverrides { max_depth: Some(40), ..ClockOverrides::default() };
        assert_eq!(overrides.apply(&ClockConfig::default()).max_depth, MAX_DEPTH_LIMIT);
    }

    #[test]
    fn unusable_time_steps_fall_back_to_default() {
        assert_eq!(checked_time_step(0.05), 0.05);
        assert_eq!(checked_time_step(0.0), 0.0);
        assert_eq!(checked_time_step(MAX_TIME_STEP), MAX_TIME_STEP);
        for step in [f32::INFINITY, f32::NEG_INFINITY, f32::NAN, -1.0, 1e30, MAX_TIME_STEP * 2.0] {
            assert_eq!(checked_time_step(step), DEFAULT_TIME_STEP, "step {}", step);
        }
    }
}
