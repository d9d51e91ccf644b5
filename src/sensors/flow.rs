//! Hall-effect flow meter pulse counter.
//!
//! The meter outputs one pulse per "tick" of water; the calibration
//! (ticks per litre) is a deployment parameter.  A GPIO ISR increments an
//! atomic counter on each rising edge and the control loop reads the
//! running total once per tick.  Unlike a rate sensor, the total is never
//! reset during a deployment: volume and flow rate are both derived from it.

use core::sync::atomic::{AtomicU32, Ordering};

/// Lock-free cumulative pulse counter shared between ISR and control loop.
pub struct PulseCounter {
    total: AtomicU32,
}

impl Default for PulseCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl PulseCounter {
    pub const fn new() -> Self {
        Self {
            total: AtomicU32::new(0),
        }
    }

    /// Count one pulse.  Wraps at `u32::MAX`; consumers use wrapping
    /// arithmetic on differences.
    pub fn pulse(&self) {
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    /// Running total since the last reset.
    pub fn total(&self) -> u32 {
        self.total.load(Ordering::Relaxed)
    }

    /// Zero the total at the start of a deployment.
    pub fn reset(&self) {
        self.total.store(0, Ordering::Relaxed);
    }
}

/// Global counter fed by the flow-meter GPIO interrupt.
/// `static` because ISR callbacks cannot capture closures.
pub static FLOW_PULSES: PulseCounter = PulseCounter::new();

/// Called from the GPIO ISR on each rising edge.
pub fn flow_isr_handler() {
    FLOW_PULSES.pulse();
}
