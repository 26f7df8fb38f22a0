//! Host-side UART double for driving the interrupt handlers in tests

use dmxport_hal::{DmxUart, InterruptCause, LineLevel, Micros, MicrosClock};
use heapless::Vec;

pub const RX_FIFO_SIZE: usize = 128;
pub const TX_FIFO_SIZE: usize = 128;

/// Simulated UART with FIFOs, interrupt masks and clock
pub struct MockUart {
    /// Raised interrupt causes, before masking
    pub raw: InterruptCause,
    pub enabled: InterruptCause,
    pub rx: Vec<u8, RX_FIFO_SIZE>,
    pub tx_fifo: Vec<u8, TX_FIFO_SIZE>,
    pub tx_fifo_capacity: usize,
    /// Everything shifted out of the TX FIFO
    pub wire: Vec<u8, 2048>,
    pub now: Micros,
}

impl MockUart {
    pub fn new() -> Self {
        Self {
            raw: InterruptCause::empty(),
            enabled: InterruptCause::empty(),
            rx: Vec::new(),
            tx_fifo: Vec::new(),
            tx_fifo_capacity: TX_FIFO_SIZE,
            wire: Vec::new(),
            now: 0,
        }
    }

    pub fn raise(&mut self, causes: InterruptCause) {
        self.raw |= causes;
    }

    /// Queue received bytes and raise the FIFO threshold interrupt
    pub fn receive(&mut self, bytes: &[u8]) {
        self.rx.extend_from_slice(bytes).unwrap();
        self.raise(InterruptCause::RX_FIFO_FULL);
    }

    /// Queue the null byte of a break and raise the break interrupt
    pub fn receive_break(&mut self) {
        self.rx.push(0x00).unwrap();
        self.raise(InterruptCause::RX_BREAK);
    }

    /// Move the TX FIFO contents onto the wire
    pub fn shift_out(&mut self) {
        self.wire.extend_from_slice(&self.tx_fifo).unwrap();
        self.tx_fifo.clear();
    }

    /// Shift out the TX FIFO and raise what the hardware would raise next
    ///
    /// While the refill interrupt is enabled the FIFO is topped up before it
    /// runs dry; once it is disabled the line goes idle.
    pub fn drain_tx(&mut self) {
        self.shift_out();
        if self.enabled.contains(InterruptCause::TX_FIFO_EMPTY) {
            self.raise(InterruptCause::TX_FIFO_EMPTY);
        } else {
            self.raise(InterruptCause::TX_DONE);
        }
    }
}

impl DmxUart for MockUart {
    fn interrupt_status(&self) -> InterruptCause {
        self.raw & self.enabled
    }

    fn enable_interrupts(&mut self, causes: InterruptCause) {
        self.enabled |= causes;
    }

    fn disable_interrupts(&mut self, causes: InterruptCause) {
        self.enabled -= causes;
    }

    fn clear_interrupts(&mut self, causes: InterruptCause) {
        self.raw -= causes;
    }

    fn rx_fifo_len(&self) -> usize {
        self.rx.len()
    }

    fn read_rx_fifo(&mut self, buf: &mut [u8]) -> usize {
        let n = buf.len().min(self.rx.len());
        buf[..n].copy_from_slice(&self.rx[..n]);
        self.rx.copy_within(n.., 0);
        self.rx.truncate(self.rx.len() - n);
        n
    }

    fn reset_rx_fifo(&mut self) {
        self.rx.clear();
    }

    fn write_tx_fifo(&mut self, data: &[u8]) -> usize {
        let space = self.tx_fifo_capacity.saturating_sub(self.tx_fifo.len());
        let n = space.min(data.len());
        self.tx_fifo.extend_from_slice(&data[..n]).unwrap();
        n
    }
}

impl MicrosClock for MockUart {
    fn now_micros(&self) -> Micros {
        self.now
    }
}

/// Simulated RX line
pub struct MockLine {
    pub level: bool,
}

impl LineLevel for MockLine {
    fn rx_level(&mut self) -> bool {
        self.level
    }
}

/// Clock of the edge interrupt
pub struct MockClock {
    pub now: Micros,
}

impl MicrosClock for MockClock {
    fn now_micros(&self) -> Micros {
        self.now
    }
}
