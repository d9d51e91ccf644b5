//! Outbound application events.
//!
//! The [`SamplerService`](super::service::SamplerService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on the
//! other side decide what to do with them: log to serial, blink the status
//! LEDs, append to the deployment data file, etc.

use crate::error::{ActuatorError, ConfigError};
use crate::trigger::conditions::{ConditionMask, StartCondition, StopCondition};

/// Deployment lifecycle phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentPhase {
    /// No valid deployment configuration.
    NotReady,
    /// Configured; waiting for the device to submerge.
    Ready,
    /// Under water; the trigger engine drives the pump.
    Deployed,
    /// A stop condition ended sampling.  The pump stays off.
    Complete,
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// A deployment configuration was accepted.
    Configured(ConditionMask),

    /// A deployment configuration was rejected.
    ConfigRejected(ConfigError),

    /// The device submerged past the dive depth.
    DiveStarted { at: u32 },

    /// The pump ran for the first time this deployment.
    PumpStarted { at: u32 },

    /// The pump was switched on or off.
    PumpSwitched {
        on: bool,
        start: Option<StartCondition>,
        stop: Option<StopCondition>,
    },

    /// Reference flow rate for the decay condition was captured.
    PeakFlowCaptured(f32),

    /// Sampling finished.
    Completed { at: u32, reason: StopCondition },

    /// The pump did not accept a command.
    ActuatorFault(ActuatorError),

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryData {
    pub phase: DeploymentPhase,
    pub now: u32,
    pub depth_m: f32,
    pub temperature_c: f32,
    /// Flow-meter ticks since dive start.
    pub flow_ticks: u32,
    /// Ticks per minute.
    pub flowrate: f32,
    pub pump_on: bool,
    pub pump_elapsed_secs: u32,
}
