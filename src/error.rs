//! Error types for the sampler.
//!
//! The decision rule itself has no error paths: every branch is total over
//! its numeric domain.  The only failure signals are a rejected deployment
//! configuration and a pump actuator that refused a command.  Both variants
//! are `Copy` so they can be carried in events without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Why a deployment configuration cannot be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `ticks_per_L` is zero, so volume and flow-rate conditions are meaningless.
    FlowmeterUncalibrated,
    /// No start condition is well-formed: the pump could never start.
    NoStartCondition,
    /// No stop condition is well-formed: the pump could never stop.
    NoStopCondition,
    /// The configuration source had nothing to deliver.
    Unavailable,
    /// The configuration payload could not be decoded.
    Malformed,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FlowmeterUncalibrated => write!(f, "flow meter ticks per litre is zero"),
            Self::NoStartCondition => write!(f, "no valid pump start condition"),
            Self::NoStopCondition => write!(f, "no valid pump stop condition"),
            Self::Unavailable => write!(f, "deployment configuration unavailable"),
            Self::Malformed => write!(f, "deployment configuration malformed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// The pump enable GPIO could not be driven.
    GpioWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
        }
    }
}
