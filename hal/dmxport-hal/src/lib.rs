//! dmxport Hardware Abstraction Layer
//!
//! This crate defines the hardware boundary the DMX512 core is written
//! against. Chip-specific crates implement these traits on top of their UART
//! and timer peripherals; the core never touches registers directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application / RDM responder            │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  dmxport-core (ISRs, port state)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  dmxport-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!           chip-specific UART + timer
//! ```
//!
//! # Traits
//!
//! - [`uart::DmxUart`] - FIFO access and interrupt cause control
//! - [`gpio::LineLevel`] - RX line level sampling
//! - [`time::MicrosClock`] - Monotonic microsecond clock
//! - [`DmxHal`] - Everything the UART interrupt needs, as one bound
//!
//! All methods are called from interrupt context and must not block.
//!
//! The line level and clock used by the edge interrupt are passed in
//! separately, so the edge can be timestamped without waiting for the
//! UART side.

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod time;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use gpio::{LineLevel, PinLevel};
pub use time::{Micros, MicrosClock};
pub use uart::{DmxUart, InterruptCause};

/// UART side of one DMX port
///
/// FIFO/interrupt control plus a clock for break timestamps.
pub trait DmxHal: DmxUart + MicrosClock {}

// Blanket implementation
impl<T: DmxUart + MicrosClock> DmxHal for T {}
