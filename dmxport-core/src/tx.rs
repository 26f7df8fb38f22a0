//! Frame transmit engine
//!
//! Feeds one prepared frame into the TX FIFO across as many "FIFO empty"
//! interrupts as it takes, then lets the FIFO drain. The line driver
//! generates the break and mark-after-break for the next frame on its own
//! once the FIFO runs dry.

use dmxport_hal::{DmxUart, InterruptCause, Micros};

use crate::buffer::DoubleBuffer;

/// Errors from frame submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxError {
    /// A frame is still being transmitted
    Busy,
    /// Frame has no slots
    Empty,
    /// Frame is longer than the configured buffer
    TooLong,
}

/// Most bytes handed to the TX FIFO per handler pass
pub const TX_BATCH: usize = 16;

/// Transmit side of a port
pub struct TxEngine<const N: usize> {
    buffers: DoubleBuffer<N>,
    /// Length of the frame in the active buffer
    len: usize,
    /// Bytes of the active frame already accepted by the FIFO
    cursor: usize,
    in_flight: bool,
    /// Length of the frame in the stable buffer
    sent_len: usize,
    /// Frames completed so far
    sent_seq: u32,
    last_break: Option<Micros>,
    prev_break: Option<Micros>,
}

impl<const N: usize> Default for TxEngine<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TxEngine<N> {
    pub const fn new() -> Self {
        Self {
            buffers: DoubleBuffer::new(),
            len: 0,
            cursor: 0,
            in_flight: false,
            sent_len: 0,
            sent_seq: 0,
            last_break: None,
            prev_break: None,
        }
    }

    /// Copy a frame into the active buffer and mark it in flight
    pub fn load(&mut self, frame: &[u8], buf_size: usize) -> Result<(), TxError> {
        if self.in_flight {
            return Err(TxError::Busy);
        }
        if frame.is_empty() {
            return Err(TxError::Empty);
        }
        if frame.len() > buf_size.min(N) {
            return Err(TxError::TooLong);
        }

        self.buffers.active_buf_mut()[..frame.len()].copy_from_slice(frame);
        self.len = frame.len();
        self.cursor = 0;
        self.in_flight = true;
        Ok(())
    }

    /// Check if a frame is loaded and not yet fully transmitted
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Refill the TX FIFO
    ///
    /// Writes at most [`TX_BATCH`] bytes. Once the whole frame is queued the
    /// FIFO-empty interrupt is disabled so the FIFO drains without further
    /// refill attempts.
    pub fn on_fifo_empty<U: DmxUart + ?Sized>(&mut self, uart: &mut U) {
        if self.in_flight && self.cursor < self.len {
            let end = self.len.min(self.cursor + TX_BATCH);
            let pending = &self.buffers.active_buf()[self.cursor..end];
            let written = uart.write_tx_fifo(pending);
            self.cursor += written;
        }

        if !self.in_flight || self.cursor >= self.len {
            uart.disable_interrupts(InterruptCause::TX_FIFO_EMPTY);
        }
    }

    /// Handle the last byte leaving the shift register
    ///
    /// Returns true if this completed the frame in flight. A transmit-done
    /// before the frame was fully queued is an underrun and is ignored.
    pub fn on_done(&mut self, now: Micros) -> bool {
        if !self.in_flight || self.cursor < self.len {
            return false;
        }

        self.buffers.publish(self.len);
        self.sent_len = self.len;
        self.sent_seq = self.sent_seq.wrapping_add(1);
        self.prev_break = self.last_break;
        self.last_break = Some(now);
        self.in_flight = false;
        true
    }

    /// Copy the last fully transmitted frame into `out`
    ///
    /// Returns the number of bytes copied.
    pub fn copy_sent(&self, out: &mut [u8]) -> usize {
        self.copy_sent_at(0, out)
    }

    /// Copy the last transmitted frame from `offset` on into `out`
    pub fn copy_sent_at(&self, offset: usize, out: &mut [u8]) -> usize {
        if offset >= self.sent_len {
            return 0;
        }
        let len = out.len().min(self.sent_len - offset);
        out[..len].copy_from_slice(&self.buffers.stable_buf()[offset..offset + len]);
        len
    }

    /// Length of the last transmitted frame
    pub fn sent_len(&self) -> usize {
        self.sent_len
    }

    /// Number of frames completed, wrapping
    pub fn sent_seq(&self) -> u32 {
        self.sent_seq
    }

    /// Time of the most recent TX break
    pub fn last_break(&self) -> Option<Micros> {
        self.last_break
    }

    /// Time between the two most recent TX breaks (µs)
    pub fn period_us(&self) -> Option<u32> {
        match (self.prev_break, self.last_break) {
            (Some(prev), Some(last)) => {
                Some(u32::try_from(last.saturating_sub(prev)).unwrap_or(u32::MAX))
            }
            _ => None,
        }
    }
}
