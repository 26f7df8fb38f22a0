//! Packet timing windows
//!
//! DMX512 defines minimum durations for the break and the mark-after-break,
//! and a window for the break-to-break period. Receivers are expected to
//! accept somewhat looser timing than transmitters are allowed to produce.

/// Receiver: shortest break accepted (µs)
pub const RX_MIN_BREAK_US: u32 = 88;
/// Receiver: shortest mark-after-break accepted (µs)
pub const RX_MIN_MAB_US: u32 = 8;
/// Receiver: longest mark-after-break accepted (µs)
pub const RX_MAX_MAB_US: u32 = 999_999;
/// Receiver: shortest break-to-break period accepted (µs)
pub const RX_MIN_BREAK_TO_BREAK_US: u32 = 1_196;
/// Receiver: longest break-to-break period accepted (µs)
pub const RX_MAX_BREAK_TO_BREAK_US: u32 = 1_250_000;

/// A measured duration outside the receiver window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimingViolation {
    /// Break-to-break period shorter than allowed
    PacketTooShort,
    /// Break-to-break period longer than allowed
    PacketTooLong,
    /// Break shorter than allowed
    BreakTooShort,
    /// Mark-after-break shorter than allowed
    MarkAfterBreakTooShort,
    /// Mark-after-break longer than allowed
    MarkAfterBreakTooLong,
}

/// Check measured packet timing against the receiver windows
///
/// Unknown durations (`None`) are not checked. Returns the first violation
/// found, in wire order: period, break, mark-after-break.
pub fn check_rx_timing(
    period_us: Option<u32>,
    break_us: Option<u32>,
    mab_us: Option<u32>,
) -> Option<TimingViolation> {
    if let Some(period) = period_us {
        if period < RX_MIN_BREAK_TO_BREAK_US {
            return Some(TimingViolation::PacketTooShort);
        }
        if period > RX_MAX_BREAK_TO_BREAK_US {
            return Some(TimingViolation::PacketTooLong);
        }
    }

    if let Some(brk) = break_us {
        if brk < RX_MIN_BREAK_US {
            return Some(TimingViolation::BreakTooShort);
        }
    }

    match mab_us {
        Some(mab) if mab < RX_MIN_MAB_US => Some(TimingViolation::MarkAfterBreakTooShort),
        Some(mab) if mab > RX_MAX_MAB_US => Some(TimingViolation::MarkAfterBreakTooLong),
        _ => None,
    }
}
