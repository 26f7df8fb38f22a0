//! DMX512 / RDM wire definitions
//!
//! This crate holds what the wire itself defines: line settings, packet
//! size limits, start codes and the timing windows a receiver checks
//! incoming packets against.
//!
//! # Packet Overview
//!
//! A DMX packet has no length field. Its boundaries are timing events:
//! ```text
//!  ‾‾‾‾‾\_______________/‾‾‾‾‾‾\_/‾ start ‾\_/‾ slot 1 ‾\ ... \_/‾ slot n ‾\
//!       │     BREAK     │ MAB  │   code   │              │              │
//!       │   >= 88 µs    │>=8 µs│          │              │              │
//! ```
//!
//! A packet is one start code followed by up to 512 slots, sent at
//! 250 kbaud with 8 data bits, no parity and two stop bits.

#![no_std]
#![deny(unsafe_code)]

pub mod start_code;
pub mod timing;

pub use start_code::StartCode;
pub use timing::{check_rx_timing, TimingViolation};

/// Line rate in bits per second
pub const DMX_BAUD: u32 = 250_000;

/// Data bits per slot
pub const DMX_DATA_BITS: u8 = 8;

/// Stop bits per slot
pub const DMX_STOP_BITS: u8 = 2;

/// Maximum number of channel slots following the start code
pub const DMX_MAX_CHANNELS: usize = 512;

/// Maximum packet size: start code plus 512 slots
pub const DMX_MAX_PACKET_SIZE: usize = DMX_MAX_CHANNELS + 1;

// RDM framing
/// Sub-start code following the RDM start code
pub const RDM_SUB_START_CODE: u8 = 0x01;
/// Smallest well-formed RDM packet, start code included
pub const RDM_MIN_PACKET_SIZE: usize = 26;
/// Largest RDM packet, start code included
pub const RDM_MAX_PACKET_SIZE: usize = 257;

/// Highest valid DMX start address
pub const DMX_MAX_START_ADDRESS: u16 = 512;
