//! Application service, the hexagonal core.
//!
//! [`SamplerService`] owns the trigger engine and the deployment lifecycle.
//! It exposes a hardware-agnostic API; all I/O flows through port traits
//! injected at call sites, so the whole deployment can be replayed against
//! mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                 │      SamplerService       │
//!   PumpPort ◀────│  phases · TriggerEngine   │ ◀── ConfigSource
//!                 └──────────────────────────┘
//! ```
//!
//! Phases: `NotReady → Ready → Deployed → Complete`.  Only `Deployed`
//! consults the engine; every other phase holds the pump off.

use log::{debug, info, warn};

use crate::config::SamplerConfig;
use crate::deployment::DeploymentParams;
use crate::error::ConfigError;
use crate::trigger::conditions::{ConditionMask, StartCondition, StopCondition};
use crate::trigger::{PumpCommand, TriggerEngine, TriggerInputs};

use super::events::{AppEvent, DeploymentPhase, TelemetryData};
use super::ports::{ConfigSource, EventSink, PumpPort, SensorPort, SensorSnapshot};

// ───────────────────────────────────────────────────────────────
// SamplerService
// ───────────────────────────────────────────────────────────────

pub struct SamplerService {
    engine: TriggerEngine,
    limits: SamplerConfig,
    phase: DeploymentPhase,
    /// Pump state as last acknowledged by the pump port.
    pump_on: bool,
    /// Seconds the pump has actually been running this deployment.
    pump_elapsed_secs: u32,
    /// Ticks the pump has been running, for the peak-flow warm-up.
    pumping_ticks: u32,
    peak_captured: bool,
    /// Flow-meter count at dive start; volume is measured from here.
    flow_base: Option<u32>,
    last_now: Option<u32>,
    last_snapshot: SensorSnapshot,
    last_start: Option<StartCondition>,
    last_stop: Option<StopCondition>,
    tick_count: u64,
}

impl SamplerService {
    pub fn new(limits: SamplerConfig) -> Self {
        Self {
            engine: TriggerEngine::new(limits),
            limits,
            phase: DeploymentPhase::NotReady,
            pump_on: false,
            pump_elapsed_secs: 0,
            pumping_ticks: 0,
            peak_captured: false,
            flow_base: None,
            last_now: None,
            last_snapshot: SensorSnapshot::default(),
            last_start: None,
            last_stop: None,
            tick_count: 0,
        }
    }

    // ── Configuration ─────────────────────────────────────────

    /// Install and validate a deployment.
    ///
    /// A valid configuration moves the service to `Ready`; an invalid one
    /// leaves it in `NotReady` so the pump can never run.
    pub fn configure(
        &mut self,
        params: &DeploymentParams,
        sink: &mut impl EventSink,
    ) -> Result<ConditionMask, ConfigError> {
        self.clear_run();
        self.engine.set_deployment_config(params);
        match self.engine.validate() {
            Ok(mask) => {
                self.set_phase(DeploymentPhase::Ready);
                sink.emit(&AppEvent::Configured(mask));
                Ok(mask)
            }
            Err(e) => {
                self.set_phase(DeploymentPhase::NotReady);
                sink.emit(&AppEvent::ConfigRejected(e));
                Err(e)
            }
        }
    }

    /// Fetch the deployment from `source`, then [`configure`](Self::configure).
    pub fn load_deployment(
        &mut self,
        source: &mut impl ConfigSource,
        sink: &mut impl EventSink,
    ) -> Result<ConditionMask, ConfigError> {
        let params = match source.fetch() {
            Ok(p) => p,
            Err(e) => {
                warn!("Deployment config fetch failed: {}", e);
                self.set_phase(DeploymentPhase::NotReady);
                sink.emit(&AppEvent::ConfigRejected(e));
                return Err(e);
            }
        };
        self.configure(&params, sink)
    }

    /// Abandon the current deployment: pump off, configuration cleared.
    pub fn reset(&mut self, pump: &mut impl PumpPort, sink: &mut impl EventSink) {
        self.apply(PumpCommand::Off, pump, sink);
        self.engine.set_deployment_config(&DeploymentParams::default());
        self.clear_run();
        self.set_phase(DeploymentPhase::NotReady);
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle: read sensors → flow estimate → phase logic →
    /// pump.  Returns the command applied this tick.
    ///
    /// `hw` satisfies both [`SensorPort`] and [`PumpPort`] to avoid a double
    /// mutable borrow of the board.
    pub fn tick(
        &mut self,
        hw: &mut (impl SensorPort + PumpPort),
        sink: &mut impl EventSink,
    ) -> PumpCommand {
        self.tick_count += 1;

        let snap = hw.read();
        self.last_snapshot = snap;
        // The window must advance every tick, pumping or not.
        self.engine.update_current_flowrate(snap.flow_ticks);

        // Credit the time since the previous tick to the pump if it was on.
        if let Some(prev) = self.last_now {
            if self.pump_on {
                self.pump_elapsed_secs = self
                    .pump_elapsed_secs
                    .saturating_add(snap.now.saturating_sub(prev));
            }
        }
        self.last_now = Some(snap.now);

        if self.phase == DeploymentPhase::Ready && snap.depth_m >= self.limits.dive_start_depth_m {
            self.engine.set_dive_start_time(snap.now);
            self.flow_base = Some(snap.flow_ticks);
            self.set_phase(DeploymentPhase::Deployed);
            sink.emit(&AppEvent::DiveStarted { at: snap.now });
        }

        let command = match self.phase {
            DeploymentPhase::Deployed => self.run_deployed(&snap, sink),
            DeploymentPhase::NotReady | DeploymentPhase::Ready | DeploymentPhase::Complete => {
                PumpCommand::Off
            }
        };

        self.apply(command, hw, sink);

        if self.pump_on && self.phase == DeploymentPhase::Deployed {
            self.pumping_ticks += 1;
            self.capture_peak_after_warmup(snap.flow_ticks, sink);
        }

        command
    }

    fn run_deployed(&mut self, snap: &SensorSnapshot, sink: &mut impl EventSink) -> PumpCommand {
        let decision = self.engine.evaluate(&TriggerInputs {
            depth_m: snap.depth_m,
            temperature_c: snap.temperature_c,
            now: snap.now,
            flow_ticks: self.deployment_flow_ticks(snap.flow_ticks),
            pump_elapsed_secs: self.pump_elapsed_secs,
        });
        self.last_start = decision.start;
        self.last_stop = decision.stop;

        if let Some(reason) = decision.stop {
            info!("Sampling complete at t={}: {}", snap.now, reason);
            self.set_phase(DeploymentPhase::Complete);
            sink.emit(&AppEvent::Completed {
                at: snap.now,
                reason,
            });
            return PumpCommand::Off;
        }

        if decision.command.is_on() && self.engine.pump_start_time().is_none() {
            self.engine.set_pump_start_time(snap.now);
            sink.emit(&AppEvent::PumpStarted { at: snap.now });
        }
        decision.command
    }

    fn capture_peak_after_warmup(&mut self, flow_ticks: u32, sink: &mut impl EventSink) {
        if self.peak_captured || self.pumping_ticks < self.limits.peak_capture_ticks {
            return;
        }
        if let Some(peak) = self.engine.compute_max_flowrate(flow_ticks) {
            self.peak_captured = true;
            sink.emit(&AppEvent::PeakFlowCaptured(peak));
        }
    }

    /// Forward `command` to the pump if it differs from the pump's state.
    ///
    /// On failure the acknowledged state is left untouched, so the switch
    /// is retried next tick.
    fn apply(&mut self, command: PumpCommand, pump: &mut impl PumpPort, sink: &mut impl EventSink) {
        let on = command.is_on();
        if on == self.pump_on {
            return;
        }
        let result = if on {
            pump.start_pump()
        } else {
            pump.stop_pump()
        };
        match result {
            Ok(()) => {
                self.pump_on = on;
                info!("Pump {}", if on { "ON" } else { "OFF" });
                sink.emit(&AppEvent::PumpSwitched {
                    on,
                    start: self.last_start,
                    stop: self.last_stop,
                });
            }
            Err(e) => {
                warn!("Pump command {:?} not applied: {}", command, e);
                sink.emit(&AppEvent::ActuatorFault(e));
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn telemetry(&self) -> TelemetryData {
        TelemetryData {
            phase: self.phase,
            now: self.last_snapshot.now,
            depth_m: self.last_snapshot.depth_m,
            temperature_c: self.last_snapshot.temperature_c,
            flow_ticks: self.deployment_flow_ticks(self.last_snapshot.flow_ticks),
            flowrate: self.engine.current_flowrate(),
            pump_on: self.pump_on,
            pump_elapsed_secs: self.pump_elapsed_secs,
        }
    }

    /// Emit a [`telemetry`](Self::telemetry) snapshot through `sink`.
    pub fn publish_telemetry(&self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Telemetry(self.telemetry()));
    }

    pub fn phase(&self) -> DeploymentPhase {
        self.phase
    }

    pub fn is_pump_on(&self) -> bool {
        self.pump_on
    }

    pub fn pump_elapsed_secs(&self) -> u32 {
        self.pump_elapsed_secs
    }

    /// Total control ticks executed since construction.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn engine(&self) -> &TriggerEngine {
        &self.engine
    }

    // ── Internal ──────────────────────────────────────────────

    fn set_phase(&mut self, next: DeploymentPhase) {
        if next != self.phase {
            info!("Phase {:?} -> {:?}", self.phase, next);
            self.phase = next;
        }
    }

    /// Ticks counted since the dive started.  The pulse counter is never
    /// reset between deployments, and it may wrap.
    fn deployment_flow_ticks(&self, total: u32) -> u32 {
        self.flow_base.map_or(0, |base| total.wrapping_sub(base))
    }

    fn clear_run(&mut self) {
        self.engine.reset_run();
        self.pump_elapsed_secs = 0;
        self.pumping_ticks = 0;
        self.peak_captured = false;
        self.flow_base = None;
        self.last_now = None;
        self.last_start = None;
        self.last_stop = None;
        debug!("Run state cleared");
    }
}
