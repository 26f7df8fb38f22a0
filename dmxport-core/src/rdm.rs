//! RDM responder seam
//!
//! RDM shares the DMX line: a controller sends a frame with start code
//! 0xCC and the addressed device answers on the same wire. This module only
//! routes such frames from a [`DmxPort`] to an [`RdmResponder`] and sends
//! back whatever it produces; parsing and building RDM messages is the
//! responder's job.
//!
//! Device state that RDM commands can change (start address, identify,
//! label) lives in [`RdmDevice`], which reports every change to the
//! application through [`RdmClientHooks`].

use embassy_time::Duration;
use heapless::String;

use dmxport_hal::DmxHal;
use dmxport_protocol::{
    DMX_MAX_CHANNELS, DMX_MAX_START_ADDRESS, RDM_MAX_PACKET_SIZE, RDM_MIN_PACKET_SIZE,
    RDM_SUB_START_CODE,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::event::FrameEvent;
use crate::port::{DmxPort, WaitError};
use crate::tx::TxError;

/// Maximum device label length in bytes
pub const RDM_LABEL_MAX_LEN: usize = 32;

/// RDM client configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RdmConfigError {
    /// Start address outside 1..=512
    StartAddressOutOfRange,
    /// Footprint does not fit the universe from the start address
    FootprintTooLarge,
    /// Label longer than [`RDM_LABEL_MAX_LEN`]
    LabelTooLong,
}

/// Identity of an RDM responder on the universe
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RdmClientConfig {
    /// First DMX channel used by the device (1-based)
    pub start_address: u16,
    /// Number of channels used by the device
    pub footprint: u16,
    /// Device label, not null-terminated
    pub label: String<RDM_LABEL_MAX_LEN>,
}

impl RdmClientConfig {
    pub fn new(start_address: u16, footprint: u16, label: &str) -> Result<Self, RdmConfigError> {
        let config = Self {
            start_address,
            footprint,
            label: label_from(label)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RdmConfigError> {
        check_address(self.start_address, self.footprint)
    }
}

fn label_from(label: &str) -> Result<String<RDM_LABEL_MAX_LEN>, RdmConfigError> {
    let mut out = String::new();
    out.push_str(label).map_err(|_| RdmConfigError::LabelTooLong)?;
    Ok(out)
}

fn check_address(start_address: u16, footprint: u16) -> Result<(), RdmConfigError> {
    if start_address == 0 || start_address > DMX_MAX_START_ADDRESS {
        return Err(RdmConfigError::StartAddressOutOfRange);
    }
    let last = usize::from(start_address) + usize::from(footprint);
    if footprint > 0 && last - 1 > DMX_MAX_CHANNELS {
        return Err(RdmConfigError::FootprintTooLarge);
    }
    Ok(())
}

/// Application callbacks for RDM-driven changes
///
/// All methods default to doing nothing.
pub trait RdmClientHooks {
    /// DMX start address was changed
    fn on_start_address_changed(&mut self, _start_address: u16) {}

    /// Identify mode was switched; while on, the device should make itself
    /// visible (blink, beep)
    fn on_identify(&mut self, _identify: bool) {}

    /// Device label was changed
    fn on_label_changed(&mut self, _label: &str) {}
}

impl RdmClientHooks for () {}

/// Device state shared between the responder and the application
pub struct RdmDevice<K> {
    config: RdmClientConfig,
    identify: bool,
    hooks: K,
}

impl<K: RdmClientHooks> RdmDevice<K> {
    pub fn new(config: RdmClientConfig, hooks: K) -> Result<Self, RdmConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            identify: false,
            hooks,
        })
    }

    pub fn config(&self) -> &RdmClientConfig {
        &self.config
    }

    pub fn start_address(&self) -> u16 {
        self.config.start_address
    }

    pub fn footprint(&self) -> u16 {
        self.config.footprint
    }

    pub fn label(&self) -> &str {
        &self.config.label
    }

    pub fn identifying(&self) -> bool {
        self.identify
    }

    pub fn hooks(&self) -> &K {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut K {
        &mut self.hooks
    }

    /// Change the start address, notifying the hooks if it changed
    pub fn set_start_address(&mut self, start_address: u16) -> Result<(), RdmConfigError> {
        check_address(start_address, self.config.footprint)?;
        if start_address != self.config.start_address {
            self.config.start_address = start_address;
            self.hooks.on_start_address_changed(start_address);
        }
        Ok(())
    }

    /// Switch identify mode, notifying the hooks if it changed
    pub fn set_identify(&mut self, identify: bool) {
        if identify != self.identify {
            self.identify = identify;
            self.hooks.on_identify(identify);
        }
    }

    /// Change the label, notifying the hooks
    pub fn set_label(&mut self, label: &str) -> Result<(), RdmConfigError> {
        self.config.label = label_from(label)?;
        self.hooks.on_label_changed(label);
        Ok(())
    }
}

/// RDM message handler
pub trait RdmResponder {
    /// Handle one received RDM frame
    ///
    /// `data` is the whole frame, start code included. Write a response
    /// frame into `response` and return its length, or return `None` to
    /// stay silent.
    fn handle_rdm_message<K: RdmClientHooks>(
        &mut self,
        device: &mut RdmDevice<K>,
        event: &FrameEvent,
        data: &[u8],
        response: &mut [u8],
    ) -> Option<usize>;
}

/// Errors from [`RdmClient::poll`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RdmError {
    /// No event arrived in time
    Wait(WaitError),
    /// The response to `event` could not be queued
    Tx { event: FrameEvent, error: TxError },
}

impl From<WaitError> for RdmError {
    fn from(e: WaitError) -> Self {
        RdmError::Wait(e)
    }
}

/// RDM responder bound to a device
pub struct RdmClient<R, K> {
    device: RdmDevice<K>,
    responder: R,
}

impl<R: RdmResponder, K: RdmClientHooks> RdmClient<R, K> {
    pub fn new(device: RdmDevice<K>, responder: R) -> Self {
        Self { device, responder }
    }

    pub fn device(&self) -> &RdmDevice<K> {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut RdmDevice<K> {
        &mut self.device
    }

    pub fn responder_mut(&mut self) -> &mut R {
        &mut self.responder
    }

    /// Receive one frame event and answer it if it carries RDM
    ///
    /// Every event is returned, RDM or not, so the caller still sees DMX
    /// data and errors. A request whose frame was already replaced by a
    /// later one is not answered. A response is submitted on the regular
    /// transmit path and is not waited for; if that fails the event comes
    /// back inside [`RdmError::Tx`].
    pub async fn poll<H: DmxHal, const N: usize, const Q: usize>(
        &mut self,
        port: &DmxPort<H, N, Q>,
        timeout: Option<Duration>,
    ) -> Result<FrameEvent, RdmError> {
        let event = port.receive(timeout).await?;
        if !event.is_rdm() || !(RDM_MIN_PACKET_SIZE..=RDM_MAX_PACKET_SIZE).contains(&event.size) {
            return Ok(event);
        }

        let mut data = [0u8; RDM_MAX_PACKET_SIZE];
        let Some(len) = port.read_event_frame(&event, &mut data[..event.size]) else {
            warn!("rdm request {} replaced before it was read", event.seq);
            return Ok(event);
        };
        let request = &data[..len];
        if request.get(1) != Some(&RDM_SUB_START_CODE) {
            debug!("not an rdm message, sub start code {}", request.get(1).copied());
            return Ok(event);
        }

        let mut response = [0u8; RDM_MAX_PACKET_SIZE];
        let reply = self
            .responder
            .handle_rdm_message(&mut self.device, &event, request, &mut response);

        if let Some(n) = reply {
            let n = n.min(response.len());
            if n > 0 {
                trace!("rdm response, {} bytes", n);
                port.submit(&response[..n])
                    .map_err(|error| RdmError::Tx { event, error })?;
            }
        }
        Ok(event)
    }
}
