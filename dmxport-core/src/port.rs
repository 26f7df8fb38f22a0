//! DMX port handle
//!
//! Owns the HAL, the port state and the channels for one UART. The two
//! interrupt entry points and the consumer API all go through this handle;
//! nothing is looked up by port number.
//!
//! Port state lives in a critical-section mutex that is only ever held for
//! one bounded step: one interrupt cause with at most a FIFO batch of data,
//! or one chunk of a buffer copy. The break analyzer has a lock of its own
//! so the edge interrupt never waits on a buffer copy, and the edge is
//! timestamped before any lock is taken.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::{with_timeout, Duration};

use dmxport_hal::{DmxHal, InterruptCause, LineLevel, Micros, MicrosClock};

use crate::analyzer::{AnalyzerState, BreakAnalyzer};
use crate::channel::{EventChannel, TxSignal};
use crate::config::{ConfigError, PortConfig};
use crate::event::FrameEvent;
use crate::rx::RxEngine;
use crate::tx::{TxEngine, TxError};

/// Bytes copied per lock when reading a buffer from task context
const COPY_CHUNK: usize = 32;

/// Errors from waiting on the port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaitError {
    /// Nothing arrived within the timeout
    Timeout,
}

/// What one pass of the UART handler produced for the consumer
enum Dispatch {
    None,
    TxComplete,
    Event(FrameEvent),
}

/// Mutable state of one port, touched only inside the critical section
struct PortState<const N: usize> {
    tx: TxEngine<N>,
    rx: RxEngine<N>,
    buf_size: usize,
}

impl<const N: usize> PortState<N> {
    fn new(config: &PortConfig) -> Self {
        Self {
            tx: TxEngine::new(),
            rx: RxEngine::new(),
            buf_size: config.buf_size,
        }
    }

    /// Handle the highest-priority pending cause
    fn service<H: DmxHal>(
        &mut self,
        hal: &mut H,
        status: InterruptCause,
        now: Micros,
        analyzer: &mut BreakAnalyzer,
    ) -> Dispatch {
        if status.contains(InterruptCause::TX_FIFO_EMPTY) {
            self.tx.on_fifo_empty(hal);
            hal.clear_interrupts(InterruptCause::TX_FIFO_EMPTY);
            Dispatch::None
        } else if status.contains(InterruptCause::TX_DONE) {
            hal.clear_interrupts(InterruptCause::TX_DONE);
            if self.tx.on_done(now) {
                Dispatch::TxComplete
            } else {
                Dispatch::None
            }
        } else if status.contains(InterruptCause::TX_BREAK_DONE) {
            hal.clear_interrupts(InterruptCause::TX_BREAK_DONE);
            Dispatch::None
        } else if status.contains(InterruptCause::TX_BREAK_IDLE) {
            hal.clear_interrupts(InterruptCause::TX_BREAK_IDLE);
            Dispatch::None
        } else if status.contains(InterruptCause::RS485_CLASH) {
            // collision policy belongs to the RDM layer
            hal.clear_interrupts(InterruptCause::RS485_CLASH);
            Dispatch::None
        } else if status.intersects(InterruptCause::RX_ALL) {
            let rx_status = status & InterruptCause::RX_ALL;
            match self
                .rx
                .on_interrupt(hal, rx_status, now, self.buf_size, analyzer)
            {
                Some(event) => Dispatch::Event(event),
                None => Dispatch::None,
            }
        } else {
            // nothing handles this cause; mask it so it cannot spin the ISR
            hal.disable_interrupts(status);
            hal.clear_interrupts(status);
            Dispatch::None
        }
    }
}

struct Inner<H, const N: usize> {
    hal: H,
    state: PortState<N>,
}

/// One DMX port
///
/// `N` is the static buffer capacity, `Q` the event channel depth.
pub struct DmxPort<H, const N: usize, const Q: usize> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Inner<H, N>>>,
    analyzer: Mutex<CriticalSectionRawMutex, RefCell<BreakAnalyzer>>,
    config: PortConfig,
    tx_done: TxSignal,
    events: EventChannel<Q>,
}

impl<H: DmxHal, const N: usize, const Q: usize> DmxPort<H, N, Q> {
    /// Create a port around an initialized HAL
    ///
    /// No interrupt cause is enabled yet; see [`Self::enable_receive`] and
    /// [`Self::submit`].
    pub fn new(hal: H, config: PortConfig) -> Result<Self, ConfigError> {
        config.validate(N)?;

        Ok(Self {
            inner: Mutex::new(RefCell::new(Inner {
                hal,
                state: PortState::new(&config),
            })),
            analyzer: Mutex::new(RefCell::new(BreakAnalyzer::new(config.analyzer))),
            config,
            tx_done: TxSignal::new(),
            events: EventChannel::new(),
        })
    }

    /// Configuration the port was created with
    pub fn config(&self) -> &PortConfig {
        &self.config
    }

    fn with_inner<R>(&self, f: impl FnOnce(&mut Inner<H, N>) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    /// Run `f` with exclusive access to the HAL
    ///
    /// Runs inside the port's critical section; keep it short.
    pub fn with_hal<R>(&self, f: impl FnOnce(&mut H) -> R) -> R {
        self.with_inner(|inner| f(&mut inner.hal))
    }

    // Interrupt entry points

    /// Combined UART interrupt handler
    ///
    /// Services pending causes one at a time until none is left, taking
    /// the port lock once per cause.
    pub fn on_uart_interrupt(&self) {
        let now = self.with_hal(|hal| hal.now_micros());

        loop {
            let step = self.with_inner(|inner| {
                let status = inner.hal.interrupt_status();
                if status.is_empty() {
                    return None;
                }

                let Inner { hal, state } = inner;
                Some(self.analyzer.lock(|analyzer| {
                    state.service(hal, status, now, &mut analyzer.borrow_mut())
                }))
            });

            match step {
                None => break,
                Some(Dispatch::None) => {}
                Some(Dispatch::TxComplete) => {
                    trace!("tx frame done");
                    self.tx_done.raise();
                }
                Some(Dispatch::Event(event)) => self.publish(event),
            }
        }
    }

    /// RX line edge interrupt handler
    ///
    /// `clock` is read before anything else, so the timestamp does not
    /// depend on how long the analyzer lock takes to get.
    pub fn on_rx_edge(&self, line: &mut impl LineLevel, clock: &impl MicrosClock) {
        let now = clock.now_micros();
        let high = line.rx_level();
        self.analyzer
            .lock(|analyzer| analyzer.borrow_mut().on_edge(high, now));
    }

    fn publish(&self, event: FrameEvent) {
        if !self.config.report_events {
            return;
        }
        trace!("rx event {}", event);
        if !self.events.publish(event) {
            warn!("event channel full, dropping {}", event.outcome);
        }
    }

    /// Copy a buffer out in chunks, one lock per chunk
    ///
    /// `copy` fills one chunk from `offset` and returns the bytes written,
    /// or `None` if the buffer was replaced since the copy started.
    fn copy_chunked(
        &self,
        out: &mut [u8],
        copy: impl Fn(&PortState<N>, usize, &mut [u8]) -> Option<usize>,
    ) -> Option<usize> {
        let mut offset = 0;
        loop {
            let end = out.len().min(offset + COPY_CHUNK);
            let chunk = &mut out[offset..end];
            let copied = self.with_inner(|inner| copy(&inner.state, offset, chunk))?;
            offset += copied;
            if copied == 0 || offset >= out.len() {
                return Some(offset);
            }
        }
    }

    // Transmit side

    /// Queue a frame, start code included, for transmission
    ///
    /// The frame is copied; the caller may reuse `frame` right away. Fails
    /// with [`TxError::Busy`] while the previous frame is still going out.
    pub fn submit(&self, frame: &[u8]) -> Result<(), TxError> {
        self.with_inner(|inner| {
            inner.state.tx.load(frame, inner.state.buf_size)?;
            self.tx_done.reset();
            inner
                .hal
                .clear_interrupts(InterruptCause::TX_FIFO_EMPTY | InterruptCause::TX_DONE);
            inner
                .hal
                .enable_interrupts(InterruptCause::TX_FIFO_EMPTY | InterruptCause::TX_DONE);
            Ok(())
        })
    }

    /// Check if a submitted frame is still going out
    pub fn tx_busy(&self) -> bool {
        self.with_inner(|inner| inner.state.tx.in_flight())
    }

    /// Wait until the submitted frame has been fully transmitted
    ///
    /// `None` waits forever.
    pub async fn wait_tx_done(&self, timeout: Option<Duration>) -> Result<(), WaitError> {
        match timeout {
            None => {
                self.tx_done.wait().await;
                Ok(())
            }
            Some(timeout) => with_timeout(timeout, self.tx_done.wait())
                .await
                .map_err(|_| WaitError::Timeout),
        }
    }

    /// Copy the last fully transmitted frame into `out`
    ///
    /// Returns `None` if another frame completed during the copy.
    pub fn last_sent(&self, out: &mut [u8]) -> Option<usize> {
        let seq = self.with_inner(|inner| inner.state.tx.sent_seq());
        self.copy_chunked(out, |state, offset, chunk| {
            if state.tx.sent_seq() != seq {
                return None;
            }
            Some(state.tx.copy_sent_at(offset, chunk))
        })
    }

    /// Time between the two most recent transmitted breaks (µs)
    pub fn tx_period(&self) -> Option<u32> {
        self.with_inner(|inner| inner.state.tx.period_us())
    }

    // Receive side

    /// Enable the receive interrupt causes
    pub fn enable_receive(&self) {
        self.with_hal(|hal| {
            hal.clear_interrupts(InterruptCause::RX_ALL);
            hal.enable_interrupts(InterruptCause::RX_ALL);
        });
    }

    /// Wait for the next frame event
    ///
    /// `None` waits forever.
    pub async fn receive(&self, timeout: Option<Duration>) -> Result<FrameEvent, WaitError> {
        match timeout {
            None => Ok(self.events.receive().await),
            Some(timeout) => with_timeout(timeout, self.events.receive())
                .await
                .map_err(|_| WaitError::Timeout),
        }
    }

    /// Take the next frame event if one is queued
    pub fn try_receive(&self) -> Option<FrameEvent> {
        self.events.try_receive()
    }

    /// Copy the last completed frame into `out`
    ///
    /// The stable buffer is replaced at every break. Returns `None` if that
    /// happened during the copy.
    pub fn read_frame(&self, out: &mut [u8]) -> Option<usize> {
        let seq = self.with_inner(|inner| inner.state.rx.stable_seq());
        self.copy_received(seq, out)
    }

    /// Copy the frame `event` reports into `out`
    ///
    /// Returns `None` if a later break already replaced it.
    pub fn read_event_frame(&self, event: &FrameEvent, out: &mut [u8]) -> Option<usize> {
        self.copy_received(event.seq, out)
    }

    fn copy_received(&self, seq: u32, out: &mut [u8]) -> Option<usize> {
        let len = out.len().min(self.config.buf_size);
        self.copy_chunked(&mut out[..len], |state, offset, chunk| {
            if state.rx.stable_seq() != seq {
                return None;
            }
            Some(state.rx.copy_stable_at(offset, chunk))
        })
    }

    /// Events dropped because the channel was full
    pub fn dropped_events(&self) -> u32 {
        self.events.dropped_events()
    }

    /// Current break analyzer state
    pub fn analyzer_state(&self) -> AnalyzerState {
        self.analyzer.lock(|analyzer| analyzer.borrow().state())
    }

    /// Disable every DMX interrupt cause
    pub fn shutdown(&self) {
        debug!("dmx port shutdown");
        self.with_hal(|hal| {
            let all = InterruptCause::RX_ALL | InterruptCause::TX_ALL;
            hal.disable_interrupts(all);
            hal.clear_interrupts(all);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Outcome;
    use crate::mock::{MockClock, MockLine, MockUart};
    use dmxport_hal::DmxUart;
    use embassy_futures::block_on;
    use proptest::prelude::*;

    type Port<const N: usize> = DmxPort<MockUart, N, 8>;

    fn port<const N: usize>(buf_size: usize) -> Port<N> {
        let port = Port::<N>::new(MockUart::new(), PortConfig::with_buf_size(buf_size)).unwrap();
        port.enable_receive();
        port
    }

    /// Deliver bytes in FIFO-sized batches, one interrupt per batch
    fn feed<const N: usize>(port: &Port<N>, bytes: &[u8]) {
        for chunk in bytes.chunks(64) {
            port.with_hal(|hal| hal.receive(chunk));
            port.on_uart_interrupt();
        }
    }

    fn send_break<const N: usize>(port: &Port<N>, at: Micros) {
        port.with_hal(|hal| {
            hal.now = at;
            hal.receive_break();
        });
        port.on_uart_interrupt();
    }

    fn edge<const N: usize>(port: &Port<N>, high: bool, at: Micros) {
        port.on_rx_edge(&mut MockLine { level: high }, &MockClock { now: at });
    }

    /// Run the TX interrupt loop until the frame completes
    fn transmit<const N: usize>(port: &Port<N>) {
        for _ in 0..64 {
            port.with_hal(|hal| hal.drain_tx());
            port.on_uart_interrupt();
            if !port.tx_busy() {
                return;
            }
        }
        panic!("frame never completed");
    }

    #[test]
    fn test_config_checked_against_capacity() {
        let result = Port::<100>::new(MockUart::new(), PortConfig::with_buf_size(513));
        assert!(matches!(result, Err(ConfigError::BufferSizeExceedsCapacity)));
    }

    #[test]
    fn test_full_universe_is_valid() {
        let port = port::<513>(513);
        let mut frame = [0u8; 513];
        for (i, slot) in frame.iter_mut().enumerate().skip(1) {
            *slot = i as u8;
        }

        send_break(&port, 0);
        assert_eq!(port.try_receive().map(|e| e.outcome), Some(Outcome::InvalidPacketSize));

        feed(&port, &frame);
        send_break(&port, 22_760);

        let event = port.try_receive().unwrap();
        assert_eq!(event.outcome, Outcome::Valid);
        assert_eq!(event.size, 513);
        assert_eq!(event.start_code, Some(0x00));
        assert_eq!(event.period_us, Some(22_760));
        assert_eq!(port.try_receive(), None);

        let mut out = [0u8; 513];
        assert_eq!(port.read_frame(&mut out), Some(513));
        assert_eq!(out, frame);
    }

    #[test]
    fn test_oversized_frame_reports_true_size() {
        let port = port::<100>(100);
        let mut frame = [0xAAu8; 201];
        frame[0] = 0x00;

        send_break(&port, 0);
        port.try_receive();
        feed(&port, &frame);
        send_break(&port, 10_000);

        let event = port.try_receive().unwrap();
        assert_eq!(event.outcome, Outcome::BufferTooSmall);
        assert_eq!(event.size, 201);
        assert_eq!(event.start_code, Some(0x00));
    }

    #[test]
    fn test_empty_frame_is_invalid() {
        let port = port::<513>(513);
        send_break(&port, 0);
        port.try_receive();
        send_break(&port, 2_000);

        let event = port.try_receive().unwrap();
        assert_eq!(event.outcome, Outcome::InvalidPacketSize);
        assert_eq!(event.size, 0);
        assert_eq!(event.start_code, None);
    }

    #[test]
    fn test_overflow_discards_until_break() {
        let port = port::<513>(513);
        send_break(&port, 0);
        port.try_receive();

        feed(&port, &[0x00, 1, 2, 3, 4]);
        port.with_hal(|hal| {
            hal.receive(&[5, 6]);
            hal.raise(InterruptCause::RX_FIFO_OVERFLOW);
        });
        port.on_uart_interrupt();

        let event = port.try_receive().unwrap();
        assert_eq!(event.outcome, Outcome::DataOverflow);
        assert_eq!(event.size, 7);

        // rest of the corrupt frame is dropped without events
        feed(&port, &[7; 40]);
        send_break(&port, 5_000);
        assert_eq!(port.try_receive(), None);

        // next frame counts from zero
        feed(&port, &[0x00, 1, 2]);
        send_break(&port, 10_000);
        let event = port.try_receive().unwrap();
        assert_eq!(event.outcome, Outcome::Valid);
        assert_eq!(event.size, 3);
    }

    #[test]
    fn test_parity_error_is_improper_slot() {
        let port = port::<513>(513);
        feed(&port, &[0x00, 1]);
        port.with_hal(|hal| hal.raise(InterruptCause::RX_PARITY_ERR));
        port.on_uart_interrupt();

        let event = port.try_receive().unwrap();
        assert_eq!(event.outcome, Outcome::ImproperSlot);
        assert_eq!(event.size, 2);
    }

    #[test]
    fn test_analyzer_timing_attached_to_next_frame() {
        let port = port::<513>(513);

        edge(&port, false, 1_000);
        send_break(&port, 1_044);
        port.try_receive();
        assert_eq!(port.analyzer_state(), AnalyzerState::InBreak);

        edge(&port, true, 1_176);
        edge(&port, false, 1_188);
        assert_eq!(port.analyzer_state(), AnalyzerState::Done);

        feed(&port, &[0x00; 25]);
        send_break(&port, 24_000);

        let event = port.try_receive().unwrap();
        assert_eq!(event.break_us, Some(176));
        assert_eq!(event.mab_us, Some(12));
        assert_eq!(event.timing_violation(), None);
        assert_eq!(port.analyzer_state(), AnalyzerState::InBreak);
    }

    #[test]
    fn test_unfinished_analyzer_reports_unknown() {
        let port = port::<513>(513);

        edge(&port, false, 1_000);
        send_break(&port, 1_044);
        port.try_receive();
        edge(&port, true, 1_176);

        feed(&port, &[0x00; 10]);
        send_break(&port, 5_000);

        let event = port.try_receive().unwrap();
        assert_eq!(event.break_us, None);
        assert_eq!(event.mab_us, None);
    }

    #[test]
    fn test_edge_timestamps_come_from_edge_clock() {
        let port = port::<513>(513);

        edge(&port, false, 1_000);
        send_break(&port, 1_044);
        port.try_receive();

        // the UART clock runs elsewhere; only the edge clock counts
        port.with_hal(|hal| hal.now = 900_000);
        edge(&port, true, 1_100);
        edge(&port, false, 1_109);

        feed(&port, &[0x00; 4]);
        send_break(&port, 25_000);
        let event = port.try_receive().unwrap();
        assert_eq!(event.break_us, Some(100));
        assert_eq!(event.mab_us, Some(9));
    }

    #[test]
    fn test_full_fifo_handled_in_one_interrupt() {
        let port = port::<513>(513);
        port.with_hal(|hal| {
            hal.receive(&[0x00; 100]);
            hal.receive_break();
        });
        port.on_uart_interrupt();

        let event = port.try_receive().unwrap();
        assert_eq!(event.outcome, Outcome::Valid);
        assert_eq!(event.size, 100);
        port.with_hal(|hal| {
            assert!(hal.rx.is_empty());
            assert!(hal.interrupt_status().is_empty());
        });
    }

    #[test]
    fn test_event_frame_replaced_by_later_break() {
        let port = port::<513>(513);
        feed(&port, &[0xCC, 0x01, 24]);
        send_break(&port, 1_000);
        feed(&port, &[0x00, 7, 7]);
        send_break(&port, 2_000);

        let first = port.try_receive().unwrap();
        let second = port.try_receive().unwrap();

        let mut out = [0u8; 3];
        assert_eq!(port.read_event_frame(&first, &mut out), None);
        assert_eq!(port.read_event_frame(&second, &mut out), Some(3));
        assert_eq!(out, [0x00, 7, 7]);
    }

    #[test]
    fn test_events_disabled() {
        let config = PortConfig {
            report_events: false,
            ..PortConfig::default()
        };
        let port = Port::<513>::new(MockUart::new(), config).unwrap();
        port.enable_receive();

        feed(&port, &[0x00, 1, 2]);
        send_break(&port, 100);
        assert_eq!(port.try_receive(), None);

        // the frame itself is still received
        let mut out = [0u8; 3];
        assert_eq!(port.read_frame(&mut out), Some(3));
        assert_eq!(out, [0x00, 1, 2]);
    }

    #[test]
    fn test_full_channel_drops_events() {
        let port = port::<513>(513);
        for i in 0..10 {
            send_break(&port, i * 1_000);
        }
        assert_eq!(port.dropped_events(), 2);
    }

    #[test]
    fn test_line_driver_causes_are_cleared() {
        let port = port::<513>(513);
        port.with_hal(|hal| {
            hal.enabled = InterruptCause::all();
            hal.raw = InterruptCause::TX_BREAK_DONE | InterruptCause::RS485_CLASH;
        });
        port.on_uart_interrupt();
        port.with_hal(|hal| {
            assert!(hal.interrupt_status().is_empty());
            assert!(hal.enabled.contains(InterruptCause::RS485_CLASH));
        });
    }

    #[test]
    fn test_spurious_cause_is_masked() {
        let port = port::<513>(513);
        let unknown = InterruptCause::from_bits_retain(1 << 20);
        port.with_hal(|hal| {
            hal.enable_interrupts(unknown);
            hal.raise(unknown);
        });
        port.on_uart_interrupt();
        port.with_hal(|hal| {
            assert!(hal.interrupt_status().is_empty());
            assert!(!hal.enabled.intersects(unknown));
            assert!(hal.enabled.contains(InterruptCause::RX_ALL));
        });
    }

    #[test]
    fn test_transmit_frame() {
        let port = port::<513>(513);
        let mut frame = [0u8; 513];
        for (i, slot) in frame.iter_mut().enumerate() {
            *slot = (i % 251) as u8;
        }

        port.submit(&frame).unwrap();
        assert_eq!(port.submit(&frame), Err(TxError::Busy));
        transmit(&port);

        port.with_hal(|hal| assert_eq!(hal.wire.as_slice(), &frame[..]));
        assert!(block_on(port.wait_tx_done(None)).is_ok());

        let mut sent = [0u8; 513];
        assert_eq!(port.last_sent(&mut sent), Some(513));
        assert_eq!(sent, frame);
    }

    #[test]
    fn test_completion_raised_once_per_frame() {
        let port = port::<513>(513);
        port.with_hal(|hal| hal.now = 500);
        port.submit(&[0x00, 1, 2, 3]).unwrap();
        transmit(&port);
        block_on(port.wait_tx_done(None)).unwrap();

        // a stray transmit-done does not signal again
        port.with_hal(|hal| {
            hal.enable_interrupts(InterruptCause::TX_DONE);
            hal.raise(InterruptCause::TX_DONE);
        });
        port.on_uart_interrupt();
        assert!(!port.tx_done.is_raised());

        port.with_hal(|hal| hal.now = 23_500);
        port.submit(&[0x00, 4, 5, 6]).unwrap();
        assert!(!port.tx_done.is_raised());
        transmit(&port);
        assert!(port.tx_done.is_raised());
        assert_eq!(port.tx_period(), Some(23_000));
    }

    #[test]
    fn test_submit_checks_frame() {
        let port = port::<100>(50);
        assert_eq!(port.submit(&[]), Err(TxError::Empty));
        assert_eq!(port.submit(&[0; 51]), Err(TxError::TooLong));
        assert_eq!(port.submit(&[0; 50]), Ok(()));
    }

    #[test]
    fn test_wait_times_out() {
        let port = port::<513>(513);
        let result = block_on(port.receive(Some(Duration::from_millis(5))));
        assert_eq!(result, Err(WaitError::Timeout));

        let result = block_on(port.wait_tx_done(Some(Duration::from_millis(5))));
        assert_eq!(result, Err(WaitError::Timeout));
    }

    #[test]
    fn test_shutdown_masks_everything() {
        let port = port::<513>(513);
        port.submit(&[0x00]).unwrap();
        port.shutdown();
        port.with_hal(|hal| assert!(hal.enabled.is_empty()));
    }

    proptest! {
        #[test]
        fn test_any_valid_frame(channels in 1usize..=512, start_code in any::<u8>()) {
            let port = port::<513>(513);
            let mut frame = [0x55u8; 513];
            frame[0] = start_code;

            feed(&port, &frame[..channels + 1]);
            send_break(&port, 30_000);

            let event = port.try_receive().unwrap();
            prop_assert_eq!(event.outcome, Outcome::Valid);
            prop_assert_eq!(event.size, channels + 1);
            prop_assert_eq!(event.start_code, Some(start_code));
        }

        #[test]
        fn test_any_oversized_frame(channels in 100usize..=512) {
            let port = port::<100>(100);
            let frame = [0x01u8; 513];

            feed(&port, &frame[..channels + 1]);
            send_break(&port, 30_000);

            let event = port.try_receive().unwrap();
            prop_assert_eq!(event.outcome, Outcome::BufferTooSmall);
            prop_assert_eq!(event.size, channels + 1);
        }

        #[test]
        fn test_any_transmit_length(len in 1usize..=513) {
            let port = port::<513>(513);
            let frame = [0x7Eu8; 513];

            port.submit(&frame[..len]).unwrap();
            transmit(&port);

            port.with_hal(|hal| assert_eq!(hal.wire.len(), len));
            prop_assert!(port.tx_done.is_raised());
        }
    }
}
