//! Sensor subsystem.
//!
//! Depth and temperature arrive from the pressure-sensor driver as plain
//! readings; only the flow meter needs state shared with interrupt context.

pub mod flow;
