//! Interrupt-to-task handoff
//!
//! Both primitives are written from interrupt context and never block
//! there. The RX event channel is lossy: when it is full, new events are
//! dropped and counted.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicU32, Ordering};

use crate::event::FrameEvent;

/// Bounded, ordered stream of frame events
pub struct EventChannel<const Q: usize> {
    channel: Channel<CriticalSectionRawMutex, FrameEvent, Q>,
    dropped: AtomicU32,
}

impl<const Q: usize> Default for EventChannel<Q> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const Q: usize> EventChannel<Q> {
    /// Create an empty channel
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
            dropped: AtomicU32::new(0),
        }
    }

    /// Publish an event without blocking
    ///
    /// Returns false if the channel was full and the event was dropped.
    pub fn publish(&self, event: FrameEvent) -> bool {
        match self.channel.try_send(event) {
            Ok(()) => true,
            Err(_) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// Wait for the next event
    pub async fn receive(&self) -> FrameEvent {
        self.channel.receive().await
    }

    /// Take the next event if one is queued
    pub fn try_receive(&self) -> Option<FrameEvent> {
        self.channel.try_receive().ok()
    }

    /// Number of queued events
    pub fn len(&self) -> usize {
        self.channel.len()
    }

    /// Check if no events are queued
    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    /// Events dropped because the channel was full
    pub fn dropped_events(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Single-slot "frame transmitted" signal
///
/// Raising an already raised signal is a no-op; completions never queue up.
pub struct TxSignal {
    signal: Signal<CriticalSectionRawMutex, ()>,
}

impl Default for TxSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl TxSignal {
    /// Create a lowered signal
    pub const fn new() -> Self {
        Self {
            signal: Signal::new(),
        }
    }

    /// Raise the signal
    pub fn raise(&self) {
        self.signal.signal(());
    }

    /// Lower the signal without waking anyone
    pub fn reset(&self) {
        self.signal.reset();
    }

    /// Check if the signal is raised
    pub fn is_raised(&self) -> bool {
        self.signal.signaled()
    }

    /// Wait until raised, then lower it
    pub async fn wait(&self) {
        self.signal.wait().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Outcome;
    use embassy_futures::block_on;

    fn event(size: usize) -> FrameEvent {
        FrameEvent::link_error(Outcome::DataOverflow, size, 0)
    }

    #[test]
    fn test_events_keep_order() {
        let channel = EventChannel::<4>::new();
        assert!(channel.publish(event(1)));
        assert!(channel.publish(event(2)));

        assert_eq!(channel.try_receive().map(|e| e.size), Some(1));
        assert_eq!(block_on(channel.receive()).size, 2);
        assert!(channel.is_empty());
    }

    #[test]
    fn test_full_channel_drops_newest() {
        let channel = EventChannel::<2>::new();
        assert!(channel.publish(event(1)));
        assert!(channel.publish(event(2)));
        assert!(!channel.publish(event(3)));

        assert_eq!(channel.len(), 2);
        assert_eq!(channel.dropped_events(), 1);
        assert_eq!(channel.try_receive().map(|e| e.size), Some(1));
        assert_eq!(channel.try_receive().map(|e| e.size), Some(2));
        assert_eq!(channel.try_receive(), None);
    }

    #[test]
    fn test_signal_is_idempotent() {
        let signal = TxSignal::new();
        assert!(!signal.is_raised());

        signal.raise();
        signal.raise();
        assert!(signal.is_raised());

        block_on(signal.wait());
        assert!(!signal.is_raised());
    }

    #[test]
    fn test_signal_reset() {
        let signal = TxSignal::new();
        signal.raise();
        signal.reset();
        assert!(!signal.is_raised());
    }
}
