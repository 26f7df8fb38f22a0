//! UART FIFO and interrupt abstractions
//!
//! Models the subset of a UART peripheral the DMX interrupt handler drives:
//! byte FIFOs in both directions and a set of individually maskable
//! interrupt causes.

use bitflags::bitflags;

bitflags! {
    /// UART interrupt causes relevant to DMX framing.
    ///
    /// The same bit layout is used for the pending status, the enable mask
    /// and the clear mask.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct InterruptCause: u32 {
        /// TX FIFO dropped below its refill threshold.
        const TX_FIFO_EMPTY = 1 << 0;
        /// Last byte of the TX FIFO has left the shift register.
        const TX_DONE = 1 << 1;
        /// Hardware-generated break has finished.
        const TX_BREAK_DONE = 1 << 2;
        /// Idle period (mark-after-break) following the break has finished.
        const TX_BREAK_IDLE = 1 << 3;
        /// RS-485 bus collision detected while transmitting.
        const RS485_CLASH = 1 << 4;
        /// RX FIFO reached its fill threshold.
        const RX_FIFO_FULL = 1 << 5;
        /// RX line went idle with data left in the FIFO.
        const RX_TIMEOUT = 1 << 6;
        /// Break condition detected on the RX line.
        ///
        /// UARTs that only report breaks as a framing error with an all-zero
        /// character must map that case here.
        const RX_BREAK = 1 << 7;
        /// Framing error on a data character.
        const RX_FRAMING_ERR = 1 << 8;
        /// RX FIFO overflowed and data was lost.
        const RX_FIFO_OVERFLOW = 1 << 9;
        /// Parity error on a data character.
        const RX_PARITY_ERR = 1 << 10;
    }
}

impl InterruptCause {
    /// Causes that close a frame on the receive side.
    pub const RX_ERR: Self = Self::RX_FIFO_OVERFLOW
        .union(Self::RX_PARITY_ERR)
        .union(Self::RX_FRAMING_ERR);

    /// Every receive-side cause.
    pub const RX_ALL: Self = Self::RX_FIFO_FULL
        .union(Self::RX_TIMEOUT)
        .union(Self::RX_BREAK)
        .union(Self::RX_ERR);

    /// Every transmit-side cause.
    pub const TX_ALL: Self = Self::TX_FIFO_EMPTY
        .union(Self::TX_DONE)
        .union(Self::TX_BREAK_DONE)
        .union(Self::TX_BREAK_IDLE)
        .union(Self::RS485_CLASH);
}

#[cfg(feature = "defmt")]
impl defmt::Format for InterruptCause {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "InterruptCause({=u32:#x})", self.bits())
    }
}

/// UART peripheral as seen by the DMX interrupt handler
///
/// Implementations are called from interrupt context. Every method must be
/// bounded in time and must not block or allocate.
pub trait DmxUart {
    /// Pending interrupt causes, already masked by the enabled set
    fn interrupt_status(&self) -> InterruptCause;

    /// Enable the given interrupt causes
    fn enable_interrupts(&mut self, causes: InterruptCause);

    /// Disable the given interrupt causes
    fn disable_interrupts(&mut self, causes: InterruptCause);

    /// Acknowledge the given pending interrupt causes
    fn clear_interrupts(&mut self, causes: InterruptCause);

    /// Number of bytes waiting in the RX FIFO
    fn rx_fifo_len(&self) -> usize;

    /// Read up to `buf.len()` bytes from the RX FIFO
    ///
    /// Returns the number of bytes read.
    fn read_rx_fifo(&mut self, buf: &mut [u8]) -> usize;

    /// Discard everything in the RX FIFO
    fn reset_rx_fifo(&mut self);

    /// Push as many bytes as the TX FIFO accepts
    ///
    /// Returns the number of bytes accepted, which may be fewer than
    /// `data.len()`.
    fn write_tx_fifo(&mut self, data: &[u8]) -> usize;
}
