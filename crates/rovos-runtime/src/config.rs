//! [`DriveConfig`] – tunables of the decision layer.
//!
//! All defaults are the values the vehicle was tuned with; they also make a
//! bare `[drive]` TOML table (or a missing one) fully usable.

use serde::{Deserialize, Serialize};

/// Configuration bundle for [`TickLoop`][crate::tick_loop::TickLoop].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveConfig {
    /// Full motor speed a channel reaches at full output deflection.
    #[serde(default = "default_base_speed")]
    pub base_speed: f64,

    /// Consecutive stable ticks required before a direction change is
    /// trusted at full speed.
    #[serde(default = "default_change_tolerance")]
    pub change_tolerance: u32,

    /// Speed multiplier applied while a direction change is untrusted.
    #[serde(default = "default_slow_down_factor")]
    pub slow_down_factor: f64,

    /// Fixed scale applied to every raw sensor sample (identity by default).
    #[serde(default = "default_input_coefficient")]
    pub input_coefficient: f64,

    /// Exponential smoothing factor for sensor channels, in `[0, 1)`.
    #[serde(default = "default_filter_factor")]
    pub filter_factor: f64,

    /// Which network output feeds which physical motor: motor channel `i`
    /// reads output `motor_channel_map[i]`.  The default swaps the two
    /// outputs, matching how this vehicle's motors are wired relative to the
    /// trained network.
    #[serde(default = "default_motor_channel_map")]
    pub motor_channel_map: [usize; 2],
}

fn default_base_speed() -> f64 {
    400.0
}
fn default_change_tolerance() -> u32 {
    3
}
fn default_slow_down_factor() -> f64 {
    0.5
}
fn default_input_coefficient() -> f64 {
    1.0
}
fn default_filter_factor() -> f64 {
    0.7
}
fn default_motor_channel_map() -> [usize; 2] {
    [1, 0]
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            base_speed: default_base_speed(),
            change_tolerance: default_change_tolerance(),
            slow_down_factor: default_slow_down_factor(),
            input_coefficient: default_input_coefficient(),
            filter_factor: default_filter_factor(),
            motor_channel_map: default_motor_channel_map(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_vehicle_tuning() {
        let config = DriveConfig::default();
        assert_eq!(config.base_speed, 400.0);
        assert_eq!(config.change_tolerance, 3);
        assert_eq!(config.slow_down_factor, 0.5);
        assert_eq!(config.input_coefficient, 1.0);
        assert_eq!(config.filter_factor, 0.7);
        assert_eq!(config.motor_channel_map, [1, 0]);
    }

    #[test]
    fn empty_toml_table_yields_defaults() {
        let config: DriveConfig = toml::from_str("").unwrap();
        assert_eq!(config, DriveConfig::default());
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let config: DriveConfig = toml::from_str(
            "base_speed = 250.0\nmotor_channel_map = [0, 1]\n",
        )
        .unwrap();
        assert_eq!(config.base_speed, 250.0);
        assert_eq!(config.motor_channel_map, [0, 1]);
        assert_eq!(config.filter_factor, 0.7);
    }
}
