//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ SamplerService (domain)
//! ```
//!
//! Driven adapters (sensors, pump, event sinks, configuration loaders)
//! implement these traits.  The [`SamplerService`](super::service::SamplerService)
//! consumes them via generics, so the decision core never touches hardware
//! or the network directly.

use crate::deployment::DeploymentParams;
use crate::error::{ActuatorError, ConfigError};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// One control tick's worth of sensor and clock readings.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorSnapshot {
    /// Depth below the surface (m).
    pub depth_m: f32,
    /// Water temperature (°C).
    pub temperature_c: f32,
    /// Wall-clock time (unix seconds), synchronised before deployment.
    pub now: u32,
    /// Cumulative flow-meter ticks.
    pub flow_ticks: u32,
}

/// Read-side port: the domain calls this once per control tick.
pub trait SensorPort {
    fn read(&mut self) -> SensorSnapshot;
}

// ───────────────────────────────────────────────────────────────
// Pump port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the sampling pump.
pub trait PumpPort {
    fn start_pump(&mut self) -> Result<(), ActuatorError>;

    fn stop_pump(&mut self) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log, LEDs,
/// data file, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration source (driven adapter: coordination server → domain)
// ───────────────────────────────────────────────────────────────

/// Delivers the operator's deployment parameters, once per deployment.
///
/// Implementations only fetch and decode; range checks and the decision
/// whether the deployment may run belong to the trigger engine.
pub trait ConfigSource {
    fn fetch(&mut self) -> Result<DeploymentParams, ConfigError>;
}
