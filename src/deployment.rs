//! Deployment parameters and the unit-conversion boundary.
//!
//! Operators describe a deployment in field units (metres, Celsius,
//! minutes, litres, L/min).  The trigger engine works in device units
//! (seconds and flow-meter ticks).  Every conversion happens here, once,
//! when a [`DeploymentParams`] becomes a [`DeploymentConfig`].
//!
//! A parameter left at zero (or at absolute zero for temperature) means
//! "not used for this deployment" and becomes `None`.  A `None` condition
//! can never fire.

use serde::{Deserialize, Serialize};

use crate::config::ABS_ZERO_C;

const SECS_PER_MIN: u32 = 60;

// ---------------------------------------------------------------------------
// Operator-facing parameters
// ---------------------------------------------------------------------------

/// Deployment parameters as entered by the operator.
///
/// Field names on the wire follow the coordination server's configuration
/// payload.  Missing fields take the "unset" defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentParams {
    /// Target depth (m); `<= 0` disables the depth start condition.
    #[serde(rename = "depth")]
    pub target_depth_m: f32,
    /// Depth tolerance (± m).
    #[serde(rename = "depth_band")]
    pub depth_band_m: f32,
    /// Target temperature (°C); at or below absolute zero disables it.
    #[serde(rename = "temperature")]
    pub target_temperature_c: f32,
    /// Temperature tolerance (± °C).
    #[serde(rename = "temp_band")]
    pub temperature_band_c: f32,
    /// Minutes after the dive starts before pumping may begin.
    #[serde(rename = "wait_pump_start")]
    pub wait_after_dive_min: u32,
    /// Litres to pump before stopping.
    #[serde(rename = "flow_volume")]
    pub target_volume_l: f32,
    /// Flow rate (L/min) at which pumping stops.
    #[serde(rename = "min_flowrate")]
    pub min_flowrate_l_per_min: f32,
    /// Minutes of pumping before stopping.
    #[serde(rename = "wait_pump_end")]
    pub max_pump_duration_min: u32,
    /// Flow-meter calibration.
    #[serde(rename = "ticks_per_L")]
    pub ticks_per_litre: u32,
}

impl Default for DeploymentParams {
    fn default() -> Self {
        Self {
            target_depth_m: 0.0,
            depth_band_m: 0.0,
            target_temperature_c: ABS_ZERO_C,
            temperature_band_c: 0.0,
            wait_after_dive_min: 0,
            target_volume_l: 0.0,
            min_flowrate_l_per_min: 0.0,
            max_pump_duration_min: 0,
            ticks_per_litre: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Device-unit configuration
// ---------------------------------------------------------------------------

/// A target value with a symmetric tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub target: f32,
    pub tolerance: f32,
}

impl Band {
    /// True when `value` lies within `target ± tolerance`, edges included.
    pub fn contains(&self, value: f32) -> bool {
        (value - self.target).abs() <= self.tolerance
    }
}

/// Deployment configuration in device units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeploymentConfig {
    pub depth: Option<Band>,
    pub temperature: Option<Band>,
    /// Seconds after dive start.
    pub wait_after_dive_secs: Option<u32>,
    /// Cumulative flow-meter ticks.
    pub target_volume_ticks: Option<u32>,
    /// Seconds of pumping.
    pub max_pump_duration_secs: Option<u32>,
    /// Ticks per minute.
    pub min_flowrate_ticks_per_min: Option<f32>,
    pub ticks_per_litre: u32,
}

impl DeploymentConfig {
    pub fn from_params(p: &DeploymentParams) -> Self {
        let tpl = p.ticks_per_litre;
        Self {
            depth: (p.target_depth_m > 0.0).then_some(Band {
                target: p.target_depth_m,
                tolerance: p.depth_band_m,
            }),
            temperature: (p.target_temperature_c > ABS_ZERO_C).then_some(Band {
                target: p.target_temperature_c,
                tolerance: p.temperature_band_c,
            }),
            wait_after_dive_secs: minutes_to_secs(p.wait_after_dive_min),
            target_volume_ticks: litres_to_ticks(p.target_volume_l, tpl),
            max_pump_duration_secs: minutes_to_secs(p.max_pump_duration_min),
            min_flowrate_ticks_per_min: flowrate_to_ticks_per_min(p.min_flowrate_l_per_min, tpl),
            ticks_per_litre: tpl,
        }
    }
}

impl From<DeploymentParams> for DeploymentConfig {
    fn from(p: DeploymentParams) -> Self {
        Self::from_params(&p)
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// Minutes to seconds.  Zero, or a duration that does not fit, is `None`.
pub fn minutes_to_secs(minutes: u32) -> Option<u32> {
    if minutes == 0 {
        return None;
    }
    minutes.checked_mul(SECS_PER_MIN)
}

/// Litres to flow-meter ticks, truncating.  `None` when the volume is not
/// positive, rounds to zero ticks, or does not fit in the tick counter.
pub fn litres_to_ticks(litres: f32, ticks_per_litre: u32) -> Option<u32> {
    if litres.is_nan() || litres <= 0.0 {
        return None;
    }
    let ticks = f64::from(litres) * f64::from(ticks_per_litre);
    if ticks < 1.0 || ticks >= f64::from(u32::MAX) {
        return None;
    }
    Some(ticks as u32)
}

/// L/min to ticks/min.  `None` when the rate is not positive.
pub fn flowrate_to_ticks_per_min(litres_per_min: f32, ticks_per_litre: u32) -> Option<f32> {
    (litres_per_min > 0.0).then(|| litres_per_min * ticks_per_litre as f32)
}
