//! N_PCI (Network Protocol Control Information): the frame-type header that
//! accompanies every ISO-TP data unit.

/// Plain discriminator of an [`NPci`] value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PciType {
    /// Frame could not be classified (not ISO-TP, malformed or unsupported).
    Invalid,
    /// SingleFrame (SF).
    SingleFrame,
    /// FirstFrame (FF).
    FirstFrame,
    /// ConsecutiveFrame (CF).
    ConsecutiveFrame,
    /// FlowControl (FC).
    FlowControl,
}

/// Decoded control information, one variant per frame type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NPci {
    #[default]
    Invalid,
    /// `sf_dl`: payload length of the single frame (1..=7).
    SingleFrame { sf_dl: u8 },
    /// `ff_dl`: total message length announced by the first frame (12-bit).
    FirstFrame { ff_dl: u16 },
    /// `sn`: sequence number (0..=15, wraps).
    ConsecutiveFrame { sn: u8 },
    /// Flow status nibble, block size and raw STmin byte.
    FlowControl { fs: u8, bs: u8, min_st: u8 },
}

impl NPci {
    /// Frame type carried by this control information.
    pub fn pci_type(&self) -> PciType {
        match self {
            NPci::Invalid => PciType::Invalid,
            NPci::SingleFrame { .. } => PciType::SingleFrame,
            NPci::FirstFrame { .. } => PciType::FirstFrame,
            NPci::ConsecutiveFrame { .. } => PciType::ConsecutiveFrame,
            NPci::FlowControl { .. } => PciType::FlowControl,
        }
    }

    /// `true` unless the frame was rejected by the classifier.
    pub fn is_valid(&self) -> bool {
        !matches!(self, NPci::Invalid)
    }

    /// Interpreted flow status for FC frames; `None` for other types or
    /// reserved status values.
    pub fn flow_status(&self) -> Option<FlowStatus> {
        match self {
            NPci::FlowControl { fs, .. } => FlowStatus::from_nibble(*fs),
            _ => None,
        }
    }
}

/// FlowStatus (FS) values of a flow control frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlowStatus {
    /// Sender may continue with consecutive frames.
    ClearToSend,
    /// Sender must wait for another flow control frame.
    Wait,
    /// Receiver buffer cannot hold the announced message.
    Overflow,
}

impl FlowStatus {
    /// Decode the low nibble of an FC header; values 3..=15 are reserved.
    pub fn from_nibble(fs: u8) -> Option<Self> {
        match fs & 0x0F {
            0 => Some(FlowStatus::ClearToSend),
            1 => Some(FlowStatus::Wait),
            2 => Some(FlowStatus::Overflow),
            _ => None,
        }
    }

    /// Nibble written into byte 0 of an FC frame.
    pub fn as_nibble(self) -> u8 {
        match self {
            FlowStatus::ClearToSend => 0,
            FlowStatus::Wait => 1,
            FlowStatus::Overflow => 2,
        }
    }
}

/// Interpret a raw STmin byte as a separation time in microseconds.
///
/// - `0x00..=0x7F`: 0 to 127 ms
/// - `0xF1..=0xF9`: 100 to 900 µs
/// - reserved values are treated as the longest legal gap (127 ms)
///
/// Only decoded for inspection; this crate does not pace transmissions.
pub fn separation_time_us(min_st: u8) -> u32 {
    match min_st {
        0x00..=0x7F => min_st as u32 * 1_000,
        0xF1..=0xF9 => (min_st - 0xF0) as u32 * 100,
        _ => 127_000,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flow_status_reserved_values() {
        assert_eq!(FlowStatus::from_nibble(0), Some(FlowStatus::ClearToSend));
        assert_eq!(FlowStatus::from_nibble(2), Some(FlowStatus::Overflow));
        assert_eq!(FlowStatus::from_nibble(3), None);
        let fc = NPci::FlowControl {
            fs: 1,
            bs: 8,
            min_st: 20,
        };
        assert_eq!(fc.flow_status(), Some(FlowStatus::Wait));
        assert_eq!(NPci::SingleFrame { sf_dl: 2 }.flow_status(), None);
    }

    #[test]
    fn st_min_ranges() {
        assert_eq!(separation_time_us(0x00), 0);
        assert_eq!(separation_time_us(0x7F), 127_000);
        assert_eq!(separation_time_us(0xF1), 100);
        assert_eq!(separation_time_us(0xF9), 900);
        assert_eq!(separation_time_us(0x80), 127_000);
        assert_eq!(separation_time_us(0xFA), 127_000);
    }
}
