//! Pump trigger engine.
//!
//! Decides, once per control tick, whether the sampling pump should run.
//!
//! ```text
//!   start = OR  over enabled start conditions (depth | temperature | dive wait)
//!   stop  = OR  over enabled stop conditions  (volume | duration | flow decay)
//!   pump  = start AND NOT stop
//! ```
//!
//! A stop condition always wins.  The decision is recomputed from scratch
//! every tick; the only memory carried between ticks is the flow history,
//! the captured peak flow rate and the two reference timestamps.
//!
//! Typical call order per deployment:
//!
//! 1. [`TriggerEngine::set_deployment_config`] then
//!    [`TriggerEngine::is_valid_user_config`] (or [`TriggerEngine::validate`]).
//! 2. Each tick: [`TriggerEngine::update_current_flowrate`] then
//!    [`TriggerEngine::check_pump_trigger`].
//! 3. On external events: [`TriggerEngine::set_dive_start_time`],
//!    [`TriggerEngine::set_pump_start_time`], and once the pump has been
//!    running for a while [`TriggerEngine::compute_max_flowrate`].

pub mod conditions;
pub mod flow;

use log::{debug, info, warn};

use crate::config::{ABS_ZERO_C, SamplerConfig};
use crate::deployment::{DeploymentConfig, DeploymentParams};
use crate::error::ConfigError;
use conditions::{ConditionMask, ConditionState, StartCondition, StopCondition};
use flow::FlowHistory;

/// Binary pump command produced each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpCommand {
    On,
    Off,
}

impl PumpCommand {
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

/// Live inputs for one evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TriggerInputs {
    /// Current depth (m).
    pub depth_m: f32,
    /// Current water temperature (°C).
    pub temperature_c: f32,
    /// Wall-clock time (unix seconds).
    pub now: u32,
    /// Cumulative flow-meter ticks since the deployment started.
    pub flow_ticks: u32,
    /// Seconds the pump has run so far.
    pub pump_elapsed_secs: u32,
}

/// Outcome of one evaluation, with the conditions that decided it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerDecision {
    pub command: PumpCommand,
    /// First enabled start condition that held, if any.
    pub start: Option<StartCondition>,
    /// First enabled stop condition that held, if any.
    pub stop: Option<StopCondition>,
}

/// The decision core.  One instance per device; single caller context.
pub struct TriggerEngine {
    limits: SamplerConfig,
    config: DeploymentConfig,
    mask: ConditionMask,
    state: ConditionState,
    flow: FlowHistory,
    peak_flowrate: f32,
    dive_start: Option<u32>,
    pump_start: Option<u32>,
}

impl TriggerEngine {
    pub fn new(limits: SamplerConfig) -> Self {
        Self {
            limits,
            config: DeploymentConfig::default(),
            mask: ConditionMask::default(),
            state: ConditionState::default(),
            flow: FlowHistory::new(),
            peak_flowrate: 0.0,
            dive_start: None,
            pump_start: None,
        }
    }

    // ── Configuration ─────────────────────────────────────────

    /// Store a deployment, converting operator units to device units.
    ///
    /// Every condition is disabled until the configuration is validated.
    pub fn set_deployment_config(&mut self, params: &DeploymentParams) {
        self.config = DeploymentConfig::from_params(params);
        self.mask = ConditionMask::default();
        info!("Deployment config set: {:?}", self.config);
    }

    /// Recompute the condition mask and report whether the deployment may
    /// proceed.
    pub fn is_valid_user_config(&mut self) -> bool {
        self.validate().is_ok()
    }

    /// Recompute the condition mask.  On success returns the mask; on
    /// failure the mask is still updated but the deployment must not run.
    pub fn validate(&mut self) -> Result<ConditionMask, ConfigError> {
        let cfg = &self.config;
        let limits = &self.limits;
        let mut mask = ConditionMask::default();

        mask.start.set(
            StartCondition::Depth,
            cfg.depth.is_some_and(|b| {
                b.target >= limits.min_depth_m && b.target < limits.max_depth_m && b.tolerance > 0.0
            }),
        );
        mask.start.set(
            StartCondition::Temperature,
            cfg.temperature.is_some_and(|b| {
                b.target > ABS_ZERO_C && b.target < limits.max_temperature_c && b.tolerance > 0.0
            }),
        );
        mask.start.set(
            StartCondition::DiveWait,
            cfg.wait_after_dive_secs.is_some_and(|s| s > 0),
        );

        mask.stop.set(
            StopCondition::Volume,
            cfg.target_volume_ticks.is_some_and(|t| t > 0),
        );
        mask.stop.set(
            StopCondition::Duration,
            cfg.max_pump_duration_secs.is_some_and(|s| s > 0),
        );
        let floor = limits.min_flowrate_l_per_min * cfg.ticks_per_litre as f32;
        mask.stop.set(
            StopCondition::Flowrate,
            cfg.min_flowrate_ticks_per_min.is_some_and(|r| r >= floor),
        );

        self.mask = mask;
        debug!("Condition mask: {:?}", mask);

        let verdict = if cfg.ticks_per_litre == 0 {
            Err(ConfigError::FlowmeterUncalibrated)
        } else if mask.start.is_empty() {
            Err(ConfigError::NoStartCondition)
        } else if mask.stop.is_empty() {
            Err(ConfigError::NoStopCondition)
        } else {
            Ok(mask)
        };
        match verdict {
            Ok(_) => info!("Deployment config valid"),
            Err(e) => warn!("Deployment config rejected: {}", e),
        }
        verdict
    }

    // ── Per-tick evaluation ───────────────────────────────────

    /// The pump command for this tick.
    pub fn check_pump_trigger(&mut self, inputs: &TriggerInputs) -> PumpCommand {
        self.evaluate(inputs).command
    }

    /// Evaluate every condition against `inputs` and combine them.
    pub fn evaluate(&mut self, inputs: &TriggerInputs) -> TriggerDecision {
        self.state = self.condition_state_for(inputs);

        let active = self.state.active(&self.mask);
        let start = active.start.first();
        let stop = active.stop.first();
        let command = if start.is_some() && stop.is_none() {
            PumpCommand::On
        } else {
            PumpCommand::Off
        };

        debug!(
            "Trigger t={} depth={:.2}m temp={:.2}C ticks={} pumped={}s -> {:?} (start={:?} stop={:?})",
            inputs.now,
            inputs.depth_m,
            inputs.temperature_c,
            inputs.flow_ticks,
            inputs.pump_elapsed_secs,
            command,
            start,
            stop
        );

        TriggerDecision {
            command,
            start,
            stop,
        }
    }

    fn condition_state_for(&self, inputs: &TriggerInputs) -> ConditionState {
        let cfg = &self.config;
        let now = inputs.now;
        let mut state = ConditionState::default();

        state.start.set(
            StartCondition::Depth,
            cfg.depth.is_some_and(|b| b.contains(inputs.depth_m)),
        );
        state.start.set(
            StartCondition::Temperature,
            cfg.temperature.is_some_and(|b| b.contains(inputs.temperature_c)),
        );
        // `now - dive_start` only once the dive start has been reached.
        state.start.set(
            StartCondition::DiveWait,
            match (self.dive_start, cfg.wait_after_dive_secs) {
                (Some(dive), Some(wait)) => dive <= now && now - dive >= wait,
                _ => false,
            },
        );

        state.stop.set(
            StopCondition::Volume,
            cfg.target_volume_ticks.is_some_and(|t| inputs.flow_ticks >= t),
        );
        state.stop.set(
            StopCondition::Duration,
            match (self.pump_start, cfg.max_pump_duration_secs) {
                (Some(start), Some(max)) => start <= now && inputs.pump_elapsed_secs >= max,
                _ => false,
            },
        );
        state.stop.set(
            StopCondition::Flowrate,
            cfg.min_flowrate_ticks_per_min
                .is_some_and(|min| self.peak_flowrate > 0.0 && self.flow.current() <= min),
        );

        state
    }

    // ── Flow rate ─────────────────────────────────────────────

    /// Feed this tick's cumulative flow count.  Call exactly once per tick.
    pub fn update_current_flowrate(&mut self, flow_ticks: u32) -> f32 {
        self.flow.push(flow_ticks)
    }

    /// Capture the reference peak flow rate that the flow-decay stop
    /// condition compares against.
    ///
    /// Meant to be called once, some ticks after the pump started.  Refused
    /// (returns `None`, peak unchanged) until the window reaches back to a
    /// real sample five ticks old; against the zero placeholder the peak
    /// would be inflated by whatever the counter already held.
    pub fn compute_max_flowrate(&mut self, flow_ticks: u32) -> Option<f32> {
        if !self.flow.is_primed() {
            warn!("Peak flow rate requested before the flow window filled; ignored");
            return None;
        }
        self.peak_flowrate = self.flow.rate_since_window_base(flow_ticks);
        info!("Peak flow rate captured: {:.1} ticks/min", self.peak_flowrate);
        Some(self.peak_flowrate)
    }

    // ── Event hooks ───────────────────────────────────────────

    pub fn set_dive_start_time(&mut self, t: u32) {
        self.dive_start = Some(t);
    }

    pub fn set_pump_start_time(&mut self, t: u32) {
        self.pump_start = Some(t);
    }

    /// Forget timestamps, flow history and peak, keeping the configuration
    /// and its mask.  Used between deployments.
    pub fn reset_run(&mut self) {
        self.flow.reset();
        self.peak_flowrate = 0.0;
        self.dive_start = None;
        self.pump_start = None;
        self.state = ConditionState::default();
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn current_flowrate(&self) -> f32 {
        self.flow.current()
    }

    pub fn peak_flowrate(&self) -> f32 {
        self.peak_flowrate
    }

    pub fn condition_mask(&self) -> ConditionMask {
        self.mask
    }

    /// Conditions as of the latest evaluation (mask not applied).
    pub fn condition_state(&self) -> ConditionState {
        self.state
    }

    pub fn dive_start_time(&self) -> Option<u32> {
        self.dive_start
    }

    pub fn pump_start_time(&self) -> Option<u32> {
        self.pump_start
    }

    pub fn deployment(&self) -> &DeploymentConfig {
        &self.config
    }
}
