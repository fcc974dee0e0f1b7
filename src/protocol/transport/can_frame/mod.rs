//! In-memory representation of a classic CAN frame as seen by the ISO-TP core,
//! plus adapters to the `embedded-can` frame trait used by HAL drivers.
use embedded_can::{ExtendedId, Id, StandardId};

use crate::core::MAX_CAN_DL;
use crate::error::FrameError;
use crate::protocol::isotp::config::NTaType;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Raw CAN frame exchanged with the ISO-TP instance.
pub struct CanFrame {
    /// CAN identifier (11-bit or 29-bit, stored inside a `u32`).
    pub id: u32,
    /// Number of valid payload bytes (Data Length Code, 0 to 8).
    pub len: u8,
    /// Payload buffer. Bytes past `len` are kept at zero by the constructors.
    pub data: [u8; MAX_CAN_DL],
}

impl CanFrame {
    /// Build a frame from an identifier and up to eight payload bytes.
    pub fn new(id: u32, payload: &[u8]) -> Result<Self, FrameError> {
        if payload.len() > MAX_CAN_DL {
            return Err(FrameError::PayloadTooLong { len: payload.len() });
        }
        let mut data = [0u8; MAX_CAN_DL];
        data[..payload.len()].copy_from_slice(payload);
        Ok(Self {
            id,
            len: payload.len() as u8,
            data,
        })
    }

    /// Data length clamped to the classic CAN maximum.
    ///
    /// `len` is a public field; every consumer slices through this accessor so
    /// a corrupted length can never index past the payload array.
    #[inline]
    pub fn dlc(&self) -> usize {
        (self.len as usize).min(MAX_CAN_DL)
    }

    /// Populated payload bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.dlc()]
    }

    /// Zero-length frames are produced by the encoder for unknown PCI types
    /// and must not reach the bus.
    #[inline]
    pub fn is_transmittable(&self) -> bool {
        self.len > 0 && self.dlc() == self.len as usize
    }

    /// Copy a driver frame. Remote frames carry no payload and map to `len = 0`.
    pub fn from_embedded<F: embedded_can::Frame>(frame: &F) -> Self {
        let id = match frame.id() {
            Id::Standard(id) => id.as_raw() as u32,
            Id::Extended(id) => id.as_raw(),
        };
        let mut data = [0u8; MAX_CAN_DL];
        let payload = frame.data();
        let len = if frame.is_remote_frame() {
            0
        } else {
            payload.len().min(MAX_CAN_DL)
        };
        data[..len].copy_from_slice(&payload[..len]);
        Self {
            id,
            len: len as u8,
            data,
        }
    }

    /// Build a driver frame in the identifier format of `n_tatype`.
    pub fn to_embedded<F: embedded_can::Frame>(&self, n_tatype: NTaType) -> Result<F, FrameError> {
        let id = if n_tatype.uses_extended_id() {
            ExtendedId::new(self.id)
                .map(Id::Extended)
                .ok_or(FrameError::InvalidId { id: self.id })?
        } else {
            u16::try_from(self.id)
                .ok()
                .and_then(StandardId::new)
                .map(Id::Standard)
                .ok_or(FrameError::InvalidId { id: self.id })?
        };
        F::new(id, self.as_slice()).ok_or(FrameError::Rejected)
    }
}
