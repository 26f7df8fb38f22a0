//! Interrupt-driven DMX512 transceiver core
//!
//! This crate contains everything between the UART interrupt and the task
//! that consumes DMX frames, written against the `dmxport-hal` traits:
//!
//! - Frame transmit engine (TX FIFO refill, completion signal)
//! - Frame receive engine (break framing, double buffering, classification)
//! - Break / mark-after-break edge analyzer
//! - Event and completion channels between interrupt and task context
//! - Port handle tying the above to one UART
//! - Seam for an RDM responder layered on top
//!
//! # Wiring
//!
//! The application owns one [`DmxPort`] per UART, usually in a `static`,
//! and binds two interrupt handlers to it:
//!
//! ```text
//! UART combined IRQ  ──▶ DmxPort::on_uart_interrupt()
//! RX pin edge IRQ    ──▶ DmxPort::on_rx_edge(&mut line, &clock)
//! ```
//!
//! Tasks then use [`DmxPort::submit`], [`DmxPort::wait_tx_done`] and
//! [`DmxPort::receive`].

#![no_std]
#![deny(unsafe_code)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod analyzer;
pub mod buffer;
pub mod channel;
pub mod config;
pub mod event;
pub mod port;
pub mod rdm;
pub mod rx;
pub mod tx;

#[cfg(test)]
mod mock;

pub use analyzer::{AnalyzerState, BreakAnalyzer, BreakTiming};
pub use channel::{EventChannel, TxSignal};
pub use config::{ConfigError, PortConfig};
pub use event::{FrameEvent, Outcome};
pub use port::{DmxPort, WaitError};
pub use rdm::{RdmClient, RdmClientConfig, RdmClientHooks, RdmDevice, RdmError, RdmResponder};
pub use tx::TxError;
