//! Application core: the deployment lifecycle around the trigger engine.
//!
//! This module sequences a sampling deployment: configuration, dive
//! detection, pump control and completion.  All interaction with hardware
//! and the coordination server happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
