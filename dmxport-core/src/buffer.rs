//! Two-slot frame buffer arena
//!
//! One slot belongs to the hardware side (being filled by the receiver or
//! being shifted out by the transmitter), the other is stable and may be
//! read by the consumer. Ownership is an explicit tag rather than a bare
//! index so the two roles cannot be mixed up.

/// One of the two slots of a [`DoubleBuffer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Slot {
    A,
    B,
}

impl Slot {
    /// The other slot
    pub fn other(self) -> Self {
        match self {
            Slot::A => Slot::B,
            Slot::B => Slot::A,
        }
    }

    fn index(self) -> usize {
        match self {
            Slot::A => 0,
            Slot::B => 1,
        }
    }
}

/// Pair of fixed-capacity frame buffers with an owner tag
pub struct DoubleBuffer<const N: usize> {
    slots: [[u8; N]; 2],
    active: Slot,
}

impl<const N: usize> Default for DoubleBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> DoubleBuffer<N> {
    /// Zeroed buffers, slot A active
    pub const fn new() -> Self {
        Self {
            slots: [[0; N]; 2],
            active: Slot::A,
        }
    }

    /// Slot currently owned by the hardware side
    pub fn active(&self) -> Slot {
        self.active
    }

    /// Slot currently visible to the consumer
    pub fn stable(&self) -> Slot {
        self.active.other()
    }

    /// Hardware-side buffer
    pub fn active_buf(&self) -> &[u8; N] {
        &self.slots[self.active.index()]
    }

    /// Hardware-side buffer, mutable
    pub fn active_buf_mut(&mut self) -> &mut [u8; N] {
        &mut self.slots[self.active.index()]
    }

    /// Consumer-side buffer
    pub fn stable_buf(&self) -> &[u8; N] {
        &self.slots[self.stable().index()]
    }

    /// Hand the active buffer to the consumer and take the other one
    pub fn swap(&mut self) {
        self.active = self.active.other();
    }

    /// Copy the first `len` bytes of the active buffer into the stable one
    ///
    /// Ownership does not change. `len` is clamped to the capacity.
    pub fn publish(&mut self, len: usize) {
        let len = len.min(N);
        let [a, b] = &mut self.slots;
        match self.active {
            Slot::A => b[..len].copy_from_slice(&a[..len]),
            Slot::B => a[..len].copy_from_slice(&b[..len]),
        }
    }
}
