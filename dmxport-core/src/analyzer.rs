//! Break / mark-after-break analyzer
//!
//! The UART only reports a break after its internal filtering, too late and
//! too coarse to measure the break itself. This state machine is driven by
//! an edge interrupt on the RX line instead and timestamps the transitions
//! directly:
//!
//! ```text
//!  ‾‾‾‾\________________/‾‾‾‾‾‾‾\_/‾ start code ...
//!      fall         rise      fall
//!      │◀─── break ───▶│◀ MAB ▶│
//!  Armed ─▶ InBreak ─▶ InMarkAfterBreak ─▶ Done
//! ```
//!
//! The receive engine moves the analyzer into `InBreak` when it detects a
//! break, and collects the measurement at the following break.

use dmxport_hal::Micros;
use dmxport_protocol::timing::RX_MIN_BREAK_US;

/// Analyzer states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnalyzerState {
    /// Analyzer disabled
    Idle,
    /// Waiting for a break
    Armed,
    /// Receive engine reported a break, waiting for the line to go high
    InBreak,
    /// Break measured, waiting for the start bit of the start code
    InMarkAfterBreak,
    /// Both durations measured
    Done,
}

/// Measured break and mark-after-break durations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BreakTiming {
    /// Break length (µs)
    pub break_us: u32,
    /// Mark-after-break length (µs)
    pub mab_us: u32,
}

/// Edge-driven break timing state machine
#[derive(Debug, Clone)]
pub struct BreakAnalyzer {
    state: AnalyzerState,
    break_us: u32,
    mab_us: u32,
    last_rise: Option<Micros>,
    last_fall: Option<Micros>,
}

fn elapsed_us(since: Micros, now: Micros) -> u32 {
    u32::try_from(now.saturating_sub(since)).unwrap_or(u32::MAX)
}

impl BreakAnalyzer {
    /// Create an analyzer, armed if `enabled`
    pub const fn new(enabled: bool) -> Self {
        Self {
            state: if enabled {
                AnalyzerState::Armed
            } else {
                AnalyzerState::Idle
            },
            break_us: 0,
            mab_us: 0,
            last_rise: None,
            last_fall: None,
        }
    }

    /// Current state
    pub fn state(&self) -> AnalyzerState {
        self.state
    }

    /// Latched measurement, only available in `Done`
    pub fn timing(&self) -> Option<BreakTiming> {
        match self.state {
            AnalyzerState::Done => Some(BreakTiming {
                break_us: self.break_us,
                mab_us: self.mab_us,
            }),
            _ => None,
        }
    }

    /// Handle an RX line transition
    ///
    /// `high` is the line level after the edge.
    pub fn on_edge(&mut self, high: bool, now: Micros) {
        if high {
            if let Some(fall) = self.last_fall {
                let low_us = elapsed_us(fall, now);
                // From Armed only a low period long enough to be a break
                // counts, so data bits never start a measurement.
                let is_break = match self.state {
                    AnalyzerState::InBreak => true,
                    AnalyzerState::Armed => low_us >= RX_MIN_BREAK_US,
                    _ => false,
                };
                if is_break {
                    self.break_us = low_us;
                    self.state = AnalyzerState::InMarkAfterBreak;
                }
            }
            self.last_rise = Some(now);
        } else {
            if self.state == AnalyzerState::InMarkAfterBreak {
                if let Some(rise) = self.last_rise {
                    self.mab_us = elapsed_us(rise, now);
                    self.state = AnalyzerState::Done;
                }
            }
            self.last_fall = Some(now);
        }
    }

    /// Handle a break detected by the receive engine
    ///
    /// Returns the measurement if the analyzer completed since the previous
    /// break, then rearms and enters `InBreak`. An unfinished measurement
    /// is discarded.
    pub fn on_break(&mut self) -> Option<BreakTiming> {
        if self.state == AnalyzerState::Idle {
            return None;
        }

        let timing = self.timing();
        self.state = AnalyzerState::InBreak;
        timing
    }
}
