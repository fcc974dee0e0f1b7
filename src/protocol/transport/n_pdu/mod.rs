//! N_PDU (Network Protocol Data Unit): control information plus the payload
//! bytes of exactly one frame.
//!
//! The decoder produces one `NPdu` per classified frame. Filtering code reads
//! it, edits it (or builds a new one with the constructors below) and hands it
//! back to [`IsoTp::override_n_pdu`](crate::protocol::isotp::IsoTp::override_n_pdu).
use crate::core::NData;
use crate::error::PduError;
use crate::protocol::transport::pci::{FlowStatus, NPci, PciType};
use crate::protocol::transport::{CF_SEGMENT_LEN, FF_DL_MAX, FF_SEGMENT_LEN, SF_MAX_DL};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NPdu {
    /// Frame type and type-specific header fields.
    pub n_pci: NPci,
    /// Payload carried by this frame only (never the reassembled message).
    pub n_data: NData,
}

impl NPdu {
    /// Single frame carrying 1 to 7 bytes.
    pub fn single_frame(payload: &[u8]) -> Result<Self, PduError> {
        if payload.is_empty() || payload.len() > SF_MAX_DL as usize {
            return Err(PduError::InvalidSingleFrameLength { len: payload.len() });
        }
        Ok(Self {
            n_pci: NPci::SingleFrame {
                sf_dl: payload.len() as u8,
            },
            n_data: NData::from_slice(payload),
        })
    }

    /// First frame announcing `ff_dl` bytes and carrying the first six.
    pub fn first_frame(ff_dl: u16, segment: &[u8]) -> Result<Self, PduError> {
        if ff_dl == 0 || ff_dl > FF_DL_MAX || (ff_dl as usize) < segment.len() {
            return Err(PduError::InvalidFirstFrameLength { ff_dl });
        }
        if segment.len() != FF_SEGMENT_LEN {
            return Err(PduError::InvalidFirstSegment { len: segment.len() });
        }
        Ok(Self {
            n_pci: NPci::FirstFrame { ff_dl },
            n_data: NData::from_slice(segment),
        })
    }

    /// Consecutive frame with sequence number `sn` (masked to 4 bits).
    pub fn consecutive_frame(sn: u8, segment: &[u8]) -> Result<Self, PduError> {
        if segment.is_empty() || segment.len() > CF_SEGMENT_LEN {
            return Err(PduError::InvalidConsecutiveLength { len: segment.len() });
        }
        Ok(Self {
            n_pci: NPci::ConsecutiveFrame { sn: sn & 0x0F },
            n_data: NData::from_slice(segment),
        })
    }

    /// Flow control frame; carries no payload.
    pub fn flow_control(status: FlowStatus, bs: u8, min_st: u8) -> Self {
        Self {
            n_pci: NPci::FlowControl {
                fs: status.as_nibble(),
                bs,
                min_st,
            },
            n_data: NData::new(),
        }
    }

    #[inline]
    pub fn pci_type(&self) -> PciType {
        self.n_pci.pci_type()
    }

    /// Payload bytes of this frame.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        self.n_data.as_slice()
    }

    /// Replace the payload while keeping the header consistent.
    ///
    /// For single frames `sf_dl` follows the new length. First frames keep
    /// their six-byte segment shape, so only the segment bytes change.
    pub fn with_payload(mut self, payload: &[u8]) -> Result<Self, PduError> {
        match &mut self.n_pci {
            NPci::SingleFrame { sf_dl } => {
                if payload.is_empty() || payload.len() > SF_MAX_DL as usize {
                    return Err(PduError::InvalidSingleFrameLength { len: payload.len() });
                }
                *sf_dl = payload.len() as u8;
            }
            NPci::FirstFrame { .. } => {
                if payload.len() != FF_SEGMENT_LEN {
                    return Err(PduError::InvalidFirstSegment { len: payload.len() });
                }
            }
            NPci::ConsecutiveFrame { .. } => {
                if payload.is_empty() || payload.len() > CF_SEGMENT_LEN {
                    return Err(PduError::InvalidConsecutiveLength { len: payload.len() });
                }
            }
            NPci::FlowControl { .. } | NPci::Invalid => {
                if !payload.is_empty() {
                    return Err(PduError::PayloadTooLong { len: payload.len() });
                }
            }
        }
        self.n_data.copy_from_slice(payload);
        Ok(self)
    }
}
