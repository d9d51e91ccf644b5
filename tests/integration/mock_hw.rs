//! Mock hardware adapter for integration tests.
//!
//! Plays back scripted sensor readings and records every pump call so
//! tests can assert on the full command history without touching GPIO.

use sampler::app::events::AppEvent;
use sampler::app::ports::{EventSink, PumpPort, SensorPort, SensorSnapshot};
use sampler::error::ActuatorError;

// ── Pump call record ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpCall {
    Start,
    Stop,
}

// ── MockBoard ─────────────────────────────────────────────────

/// One-second-tick board: the clock advances by one on every read and the
/// flow meter counts `ticks_per_sec` while the pump runs.
pub struct MockBoard {
    pub now: u32,
    pub depth_m: f32,
    pub temperature_c: f32,
    pub flow_ticks: u32,
    pub ticks_per_sec: u32,
    pub pump_running: bool,
    pub jammed: bool,
    pub calls: Vec<PumpCall>,
}

#[allow(dead_code)]
impl MockBoard {
    pub fn new() -> Self {
        Self {
            now: 1_700_000_000,
            depth_m: 0.0,
            temperature_c: 12.0,
            flow_ticks: 0,
            ticks_per_sec: 0,
            pump_running: false,
            jammed: false,
            calls: Vec::new(),
        }
    }

    pub fn starts(&self) -> usize {
        self.calls.iter().filter(|c| **c == PumpCall::Start).count()
    }
}

impl Default for MockBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockBoard {
    fn read(&mut self) -> SensorSnapshot {
        self.now += 1;
        if self.pump_running {
            self.flow_ticks = self.flow_ticks.wrapping_add(self.ticks_per_sec);
        }
        SensorSnapshot {
            depth_m: self.depth_m,
            temperature_c: self.temperature_c,
            now: self.now,
            flow_ticks: self.flow_ticks,
        }
    }
}

impl PumpPort for MockBoard {
    fn start_pump(&mut self) -> Result<(), ActuatorError> {
        if self.jammed {
            return Err(ActuatorError::GpioWriteFailed);
        }
        self.calls.push(PumpCall::Start);
        self.pump_running = true;
        Ok(())
    }

    fn stop_pump(&mut self) -> Result<(), ActuatorError> {
        if self.jammed {
            return Err(ActuatorError::GpioWriteFailed);
        }
        self.calls.push(PumpCall::Stop);
        self.pump_running = false;
        Ok(())
    }
}

// ── Recording event sink ──────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
