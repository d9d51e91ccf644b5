//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (UART / USB-CDC on the target, whatever logger the
//! host installs in tests).  A data-file or radio adapter would implement
//! the same trait.

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | phase={:?} | t={} | depth={:.2}m | T={:.2}\u{00b0}C | \
                     ticks={} | rate={:.0}/min | pump={} ({}s)",
                    t.phase,
                    t.now,
                    t.depth_m,
                    t.temperature_c,
                    t.flow_ticks,
                    t.flowrate,
                    if t.pump_on { "ON" } else { "OFF" },
                    t.pump_elapsed_secs,
                );
            }
            AppEvent::Configured(mask) => {
                info!("CONFIG | accepted, start={:?} stop={:?}", mask.start, mask.stop);
            }
            AppEvent::ConfigRejected(e) => {
                warn!("CONFIG | rejected: {}", e);
            }
            AppEvent::DiveStarted { at } => {
                info!("DIVE | started t={}", at);
            }
            AppEvent::PumpStarted { at } => {
                info!("PUMP | first start t={}", at);
            }
            AppEvent::PumpSwitched { on, start, stop } => {
                info!(
                    "PUMP | {} start={:?} stop={:?}",
                    if *on { "ON" } else { "OFF" },
                    start,
                    stop
                );
            }
            AppEvent::PeakFlowCaptured(peak) => {
                info!("FLOW | peak {:.1} ticks/min", peak);
            }
            AppEvent::Completed { at, reason } => {
                info!("DONE | t={} reason={}", at, reason);
            }
            AppEvent::ActuatorFault(e) => {
                error!("FAULT | {}", e);
            }
        }
    }
}
