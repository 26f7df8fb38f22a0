//! Start codes
//!
//! The first slot of every packet identifies what the remaining slots mean.

// Wire format values
const SC_NULL: u8 = 0x00;
const SC_TEXT: u8 = 0x17;
const SC_TEST: u8 = 0x55;
const SC_UTF8_TEXT: u8 = 0x90;
const SC_MANUFACTURER: u8 = 0x91;
const SC_RDM: u8 = 0xCC;
const SC_SYSTEM_INFORMATION: u8 = 0xCF;

/// Packet type announced by the start code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartCode {
    /// Dimmer/level data
    Null,
    /// ASCII text packet
    Text,
    /// Test packet
    Test,
    /// UTF-8 text packet
    Utf8Text,
    /// Manufacturer ID prefixed packet
    Manufacturer,
    /// Remote Device Management
    Rdm,
    /// System information packet
    SystemInformation,
    /// Any other (alternate or proprietary) start code
    Other(u8),
}

impl StartCode {
    /// Classify a start code byte
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            SC_NULL => StartCode::Null,
            SC_TEXT => StartCode::Text,
            SC_TEST => StartCode::Test,
            SC_UTF8_TEXT => StartCode::Utf8Text,
            SC_MANUFACTURER => StartCode::Manufacturer,
            SC_RDM => StartCode::Rdm,
            SC_SYSTEM_INFORMATION => StartCode::SystemInformation,
            other => StartCode::Other(other),
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            StartCode::Null => SC_NULL,
            StartCode::Text => SC_TEXT,
            StartCode::Test => SC_TEST,
            StartCode::Utf8Text => SC_UTF8_TEXT,
            StartCode::Manufacturer => SC_MANUFACTURER,
            StartCode::Rdm => SC_RDM,
            StartCode::SystemInformation => SC_SYSTEM_INFORMATION,
            StartCode::Other(byte) => byte,
        }
    }

    /// Returns true for packets carrying level data
    pub fn is_dimmer_data(&self) -> bool {
        matches!(self, StartCode::Null)
    }

    /// Returns true for RDM packets
    pub fn is_rdm(&self) -> bool {
        matches!(self, StartCode::Rdm)
    }
}

impl From<u8> for StartCode {
    fn from(byte: u8) -> Self {
        Self::from_byte(byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(StartCode::from_byte(0x00), StartCode::Null);
        assert_eq!(StartCode::from_byte(0xCC), StartCode::Rdm);
        assert_eq!(StartCode::from_byte(0x91), StartCode::Manufacturer);
        assert_eq!(StartCode::from_byte(0x42), StartCode::Other(0x42));
    }

    #[test]
    fn test_classification() {
        assert!(StartCode::Null.is_dimmer_data());
        assert!(!StartCode::Rdm.is_dimmer_data());
        assert!(StartCode::Rdm.is_rdm());
        assert!(!StartCode::Other(0xCD).is_rdm());
    }

    proptest! {
        #[test]
        fn test_every_byte_maps_back(byte in any::<u8>()) {
            prop_assert_eq!(StartCode::from_byte(byte).to_byte(), byte);
        }
    }
}
