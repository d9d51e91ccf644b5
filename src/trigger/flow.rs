//! Flow-rate estimation from the cumulative flow-meter count.
//!
//! The flow meter only reports a running pulse total.  The rate is a
//! five-second derivative: each control tick pushes the total into a
//! five-slot history, and the difference against the sample pushed five
//! ticks earlier, scaled by 60 / 5, gives ticks per minute.
//!
//! Assumes one sample per second.  Until five samples have been pushed the
//! missing history reads as zero, which biases the first estimates upward.

use heapless::HistoryBuffer;

/// Number of samples in the derivative window (one per second).
pub const FLOW_WINDOW: usize = 5;

/// Scale from "ticks over the window" to "ticks per minute".
const WINDOW_TO_PER_MIN: f32 = 60.0 / FLOW_WINDOW as f32;

#[derive(Debug, Clone)]
pub struct FlowHistory {
    samples: HistoryBuffer<u32, FLOW_WINDOW>,
    /// Sample displaced by the most recent push: the total five ticks ago.
    window_base: u32,
    /// `window_base` is a real sample rather than the zero placeholder.
    has_base: bool,
    current: f32,
}

impl Default for FlowHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowHistory {
    pub const fn new() -> Self {
        Self {
            samples: HistoryBuffer::new(),
            window_base: 0,
            has_base: false,
            current: 0.0,
        }
    }

    /// Push this tick's cumulative total and return the updated rate
    /// (ticks/min).  Must be called exactly once per control tick.
    pub fn push(&mut self, total_ticks: u32) -> f32 {
        if self.samples.len() == self.samples.capacity() {
            self.window_base = self.samples.oldest_ordered().next().copied().unwrap_or(0);
            self.has_base = true;
        } else {
            self.window_base = 0;
        }
        self.samples.write(total_ticks);
        self.current = self.rate_since_window_base(total_ticks);
        self.current
    }

    /// Rate (ticks/min) of `total_ticks` against the total five ticks
    /// before the latest push.  Wrapping subtraction keeps the estimate
    /// correct across a counter roll-over.
    pub fn rate_since_window_base(&self, total_ticks: u32) -> f32 {
        total_ticks.wrapping_sub(self.window_base) as f32 * WINDOW_TO_PER_MIN
    }

    /// Latest estimate (ticks/min).
    pub fn current(&self) -> f32 {
        self.current
    }

    /// True once the rate is measured against a sample pushed five ticks
    /// earlier, i.e. from the sixth push on.
    pub fn is_primed(&self) -> bool {
        self.has_base
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
