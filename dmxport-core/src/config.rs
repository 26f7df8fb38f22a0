//! Port configuration
//!
//! Settings fixed at driver startup. Peripheral setup (baud rate, pins) is
//! the HAL's business; this only covers what the interrupt handlers need.

use dmxport_protocol::DMX_MAX_PACKET_SIZE;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration of one DMX port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PortConfig {
    /// Slots stored per frame, start code included
    ///
    /// Received frames longer than this are still counted but reported as
    /// buffer-too-small.
    pub buf_size: usize,
    /// Publish frame events to the event channel
    pub report_events: bool,
    /// Run the break / mark-after-break edge analyzer
    pub analyzer: bool,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            buf_size: DMX_MAX_PACKET_SIZE,
            report_events: true,
            analyzer: true,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Buffer size of zero
    BufferSizeZero,
    /// Buffer size larger than the port's static capacity
    BufferSizeExceedsCapacity,
    /// Buffer size larger than a DMX packet can ever be
    BufferSizeExceedsProtocol,
}

impl PortConfig {
    /// Config with the given buffer size and defaults otherwise
    pub fn with_buf_size(buf_size: usize) -> Self {
        Self {
            buf_size,
            ..Self::default()
        }
    }

    /// Check this config against a port with `capacity` bytes per buffer
    pub fn validate(&self, capacity: usize) -> Result<(), ConfigError> {
        if self.buf_size == 0 {
            return Err(ConfigError::BufferSizeZero);
        }
        if self.buf_size > DMX_MAX_PACKET_SIZE {
            return Err(ConfigError::BufferSizeExceedsProtocol);
        }
        if self.buf_size > capacity {
            return Err(ConfigError::BufferSizeExceedsCapacity);
        }
        Ok(())
    }
}
