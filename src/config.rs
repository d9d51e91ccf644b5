//! Device configuration parameters
//!
//! Fixed properties of the sampler hardware: the supported sensor ranges
//! and the flow-meter floor below which pumping is pointless.  These are
//! not operator inputs; see [`crate::deployment`] for those.

use serde::{Deserialize, Serialize};

/// Absolute zero in degrees Celsius.  Doubles as the "unset" temperature
/// in operator-facing payloads.
pub const ABS_ZERO_C: f32 = -273.15;

/// Core device configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    // --- Depth sensor ---
    /// Shallowest supported target depth (metres)
    pub min_depth_m: f32,
    /// Deepest supported target depth (metres, exclusive)
    pub max_depth_m: f32,
    /// Depth at which the device counts as submerged and the dive clock starts
    pub dive_start_depth_m: f32,

    // --- Temperature sensor ---
    /// Highest supported target temperature (Celsius, exclusive)
    pub max_temperature_c: f32,

    // --- Flow meter ---
    /// Flow rate (L/min) below which pumping stops regardless of the deployment
    pub min_flowrate_l_per_min: f32,
    /// Pumping ticks to wait before the reference peak flow rate is captured
    pub peak_capture_ticks: u32,
}

impl Default for SamplerConfig {
    /// MS5837 pressure sensor build.
    fn default() -> Self {
        Self {
            // Depth
            min_depth_m: 1.0,
            max_depth_m: 300.0,
            dive_start_depth_m: 2.0,

            // Temperature
            max_temperature_c: 125.0,

            // Flow
            min_flowrate_l_per_min: 0.2,
            peak_capture_ticks: 10,
        }
    }
}

impl SamplerConfig {
    /// Keller pressure sensor build (deeper rated range).
    pub fn keller() -> Self {
        Self {
            max_depth_m: 975.0,
            ..Self::default()
        }
    }
}
