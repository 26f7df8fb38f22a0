//! Frame events
//!
//! One event is produced per frame boundary (break) or receive error and
//! handed to the consumer through the event channel.

use dmxport_protocol::{check_rx_timing, StartCode, TimingViolation, DMX_MAX_PACKET_SIZE};

use crate::analyzer::BreakTiming;

/// Classification of a received frame or link error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Frame received and fully stored
    Valid,
    /// Zero slots, or more slots than a DMX packet can hold
    InvalidPacketSize,
    /// Frame is legal but longer than the configured buffer
    BufferTooSmall,
    /// RX FIFO overflowed, data was lost
    DataOverflow,
    /// Parity or framing error on a slot
    ImproperSlot,
}

impl Outcome {
    /// Check if this outcome reports a problem
    pub fn is_error(&self) -> bool {
        !matches!(self, Outcome::Valid)
    }

    /// Check if this outcome was raised by a line error rather than a break
    pub fn is_link_error(&self) -> bool {
        matches!(self, Outcome::DataOverflow | Outcome::ImproperSlot)
    }
}

/// Classify a frame closed by a break
///
/// `size` is the true number of slots received, start code included, which
/// may exceed `buf_size` when bytes had to be discarded.
pub fn classify(size: usize, buf_size: usize) -> Outcome {
    if size == 0 || size > DMX_MAX_PACKET_SIZE {
        Outcome::InvalidPacketSize
    } else if size > buf_size {
        Outcome::BufferTooSmall
    } else {
        Outcome::Valid
    }
}

/// Report of one received frame or receive error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameEvent {
    /// What happened
    pub outcome: Outcome,
    /// First slot of the frame, if one was stored
    pub start_code: Option<u8>,
    /// Slots received, start code included
    pub size: usize,
    /// Time since the previous break (µs), if one was seen
    pub period_us: Option<u32>,
    /// Measured break length (µs)
    pub break_us: Option<u32>,
    /// Measured mark-after-break length (µs)
    pub mab_us: Option<u32>,
    /// Frame sequence number, bumped at every break
    ///
    /// Identifies which frame the stable receive buffer holds; see
    /// `DmxPort::read_event_frame`.
    pub seq: u32,
}

impl FrameEvent {
    /// Event for a frame closed by a break
    pub(crate) fn at_break(
        size: usize,
        buf_size: usize,
        first_slot: u8,
        period_us: Option<u32>,
        timing: Option<BreakTiming>,
        seq: u32,
    ) -> Self {
        let outcome = classify(size, buf_size);
        let start_code = match outcome {
            Outcome::InvalidPacketSize => None,
            _ => Some(first_slot),
        };

        Self {
            outcome,
            start_code,
            size,
            period_us,
            break_us: timing.map(|t| t.break_us),
            mab_us: timing.map(|t| t.mab_us),
            seq,
        }
    }

    /// Event for an overflow or parity/framing error
    pub(crate) fn link_error(outcome: Outcome, size: usize, seq: u32) -> Self {
        Self {
            outcome,
            start_code: None,
            size,
            period_us: None,
            break_us: None,
            mab_us: None,
            seq,
        }
    }

    /// Check if this event reports a problem
    pub fn is_error(&self) -> bool {
        self.outcome.is_error()
    }

    /// Decoded start code
    pub fn start_code_kind(&self) -> Option<StartCode> {
        self.start_code.map(StartCode::from_byte)
    }

    /// Check if this is a valid RDM frame
    pub fn is_rdm(&self) -> bool {
        self.outcome == Outcome::Valid && self.start_code_kind() == Some(StartCode::Rdm)
    }

    /// First timing window the measured durations fall outside of
    pub fn timing_violation(&self) -> Option<TimingViolation> {
        check_rx_timing(self.period_us, self.break_us, self.mab_us)
    }
}
