//! Frame receive engine
//!
//! Rebuilds frames from RX FIFO batches using the break as the only frame
//! delimiter. Bytes that do not fit the buffer are discarded but still
//! counted, so an oversized frame is reported with its true length.
//!
//! After an overflow or parity/framing error the rest of the frame is
//! unreliable: the engine enters a frame-error state and silently drops
//! everything until the next break.

use dmxport_hal::{DmxUart, InterruptCause, Micros};

use crate::analyzer::BreakAnalyzer;
use crate::buffer::DoubleBuffer;
use crate::event::{FrameEvent, Outcome};

/// Position in the frame being received
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Cursor {
    /// Slots received since the last break, including discarded ones
    Slots(usize),
    /// Frame is corrupt; discard until the next break
    FrameError,
}

/// Most bytes moved out of the RX FIFO per handler pass
///
/// Bounds the time the port lock is held; a fuller FIFO is drained over
/// several passes before the pending flags are handled.
pub const RX_BATCH: usize = 16;

/// Receive side of a port
pub struct RxEngine<const N: usize> {
    buffers: DoubleBuffer<N>,
    cursor: Cursor,
    last_break: Option<Micros>,
    /// Breaks seen so far
    seq: u32,
    /// Sequence number of the frame in the stable buffer
    stable_seq: u32,
}

impl<const N: usize> Default for RxEngine<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RxEngine<N> {
    pub const fn new() -> Self {
        Self {
            buffers: DoubleBuffer::new(),
            cursor: Cursor::Slots(0),
            last_break: None,
            seq: 0,
            stable_seq: 0,
        }
    }

    /// Current position in the frame being received
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Time of the most recent RX break
    pub fn last_break(&self) -> Option<Micros> {
        self.last_break
    }

    /// Sequence number of the frame in the stable buffer
    pub fn stable_seq(&self) -> u32 {
        self.stable_seq
    }

    /// Copy the last completed frame into `out`
    ///
    /// At most `buf_size` bytes are copied. Returns the number of bytes
    /// copied.
    pub fn copy_stable(&self, out: &mut [u8], buf_size: usize) -> usize {
        let len = buf_size.min(out.len());
        self.copy_stable_at(0, &mut out[..len])
    }

    /// Copy the stable buffer from `offset` on into `out`
    pub fn copy_stable_at(&self, offset: usize, out: &mut [u8]) -> usize {
        let stable = self.buffers.stable_buf();
        if offset >= N {
            return 0;
        }
        let len = out.len().min(N - offset);
        out[..len].copy_from_slice(&stable[offset..offset + len]);
        len
    }

    /// Service one batch of receive-side interrupt causes
    ///
    /// Returns the event to publish, if the batch closed a frame or hit a
    /// line error while no frame error was pending. While the FIFO still
    /// holds bytes for the buffer after [`RX_BATCH`] of them, the flags are
    /// left pending for the next pass.
    pub fn on_interrupt<U: DmxUart + ?Sized>(
        &mut self,
        uart: &mut U,
        status: InterruptCause,
        now: Micros,
        buf_size: usize,
        analyzer: &mut BreakAnalyzer,
    ) -> Option<FrameEvent> {
        let buf_size = buf_size.min(N);
        let is_break = status.contains(InterruptCause::RX_BREAK);

        let fifo_len = uart.rx_fifo_len();
        if fifo_len > 0 {
            let cursor = self.cursor;
            self.cursor = match cursor {
                Cursor::Slots(count) if count < buf_size => {
                    let end = buf_size.min(count + RX_BATCH);
                    let space = &mut self.buffers.active_buf_mut()[count..end];
                    let mut received = uart.read_rx_fifo(space);

                    let rest = uart.rx_fifo_len();
                    if rest > 0 && received > 0 && count + received < buf_size {
                        self.cursor = Cursor::Slots(count + received);
                        return None;
                    }

                    // whatever did not fit is dropped but still counted
                    if rest > 0 {
                        uart.reset_rx_fifo();
                        received += rest;
                    }
                    Cursor::Slots(Self::slots_in_batch(count, received, is_break))
                }
                Cursor::Slots(count) => {
                    uart.reset_rx_fifo();
                    Cursor::Slots(Self::slots_in_batch(count, fifo_len, is_break))
                }
                Cursor::FrameError => {
                    uart.reset_rx_fifo();
                    Cursor::FrameError
                }
            };
        }

        // The idle timeout catches the end of a frame when no break follows.
        // Keep it armed while data flows and silence it once it fired.
        if status.contains(InterruptCause::RX_TIMEOUT) {
            uart.disable_interrupts(InterruptCause::RX_TIMEOUT);
        } else {
            uart.enable_interrupts(InterruptCause::RX_TIMEOUT);
        }

        let mut event = None;
        if is_break {
            let timing = analyzer.on_break();
            self.seq = self.seq.wrapping_add(1);
            if let Cursor::Slots(size) = self.cursor {
                let period_us = self
                    .last_break
                    .map(|t| u32::try_from(now.saturating_sub(t)).unwrap_or(u32::MAX));
                let first_slot = self.buffers.active_buf()[0];
                event = Some(FrameEvent::at_break(
                    size, buf_size, first_slot, period_us, timing, self.seq,
                ));
            }

            self.buffers.swap();
            self.stable_seq = self.seq;
            self.last_break = Some(now);
            self.cursor = Cursor::Slots(0);
        } else if status.intersects(InterruptCause::RX_ERR) {
            if let Cursor::Slots(size) = self.cursor {
                let outcome = if status.contains(InterruptCause::RX_FIFO_OVERFLOW) {
                    Outcome::DataOverflow
                } else {
                    Outcome::ImproperSlot
                };
                event = Some(FrameEvent::link_error(
                    outcome,
                    size,
                    self.seq.wrapping_add(1),
                ));
            }
            // buffers stay put until a break closes the frame
            self.cursor = Cursor::FrameError;
        }

        uart.clear_interrupts(InterruptCause::RX_ALL);
        event
    }

    /// Slot count after a batch of `received` bytes
    ///
    /// A break arrives as a null byte that is not a slot.
    fn slots_in_batch(count: usize, received: usize, is_break: bool) -> usize {
        let total = count.saturating_add(received);
        if is_break {
            total.saturating_sub(1)
        } else {
            total
        }
    }
}
