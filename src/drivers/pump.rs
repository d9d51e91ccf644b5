//! Sampling pump switch.
//!
//! The pump is powered through a MOSFET on a single GPIO: high runs it,
//! low stops it.  Generic over any `embedded-hal` output pin so the same
//! driver runs on the target and against a mock pin in tests.
//!
//! ## Safety contract
//!
//! This driver is a dumb actuator.  Whether the pump *should* run is the
//! trigger engine's decision, applied by the application service.

use embedded_hal::digital::OutputPin;
use log::error;

use crate::app::ports::PumpPort;
use crate::error::ActuatorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpState {
    Stopped,
    Running,
}

pub struct PumpDriver<P> {
    pin: P,
    state: PumpState,
}

impl<P: OutputPin> PumpDriver<P> {
    /// Take ownership of the enable pin and force the pump off.
    pub fn new(mut pin: P) -> Self {
        if let Err(e) = pin.set_low() {
            error!("Pump pin init failed: {:?}", e);
        }
        Self {
            pin,
            state: PumpState::Stopped,
        }
    }

    pub fn state(&self) -> PumpState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, PumpState::Running)
    }

    /// Release the pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> PumpPort for PumpDriver<P> {
    fn start_pump(&mut self) -> Result<(), ActuatorError> {
        self.pin.set_high().map_err(|e| {
            error!("Pump start failed: {:?}", e);
            ActuatorError::GpioWriteFailed
        })?;
        self.state = PumpState::Running;
        Ok(())
    }

    fn stop_pump(&mut self) -> Result<(), ActuatorError> {
        self.pin.set_low().map_err(|e| {
            error!("Pump stop failed: {:?}", e);
            ActuatorError::GpioWriteFailed
        })?;
        self.state = PumpState::Stopped;
        Ok(())
    }
}
