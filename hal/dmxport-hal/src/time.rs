//! Monotonic time source

/// Microseconds since an arbitrary, fixed epoch
pub type Micros = u64;

/// Monotonic microsecond clock
///
/// Used to timestamp breaks and RX line edges. Must be readable from
/// interrupt context and must never go backwards.
pub trait MicrosClock {
    /// Current time in microseconds
    fn now_micros(&self) -> Micros;
}
