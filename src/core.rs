//! Fixed-size payload storage used across the decode/encode path.
//!
//! Every ISO-TP data unit carried by a classic CAN frame fits into
//! [`MAX_CAN_DL`] bytes, so the buffer never grows and never touches the heap.

/// Maximum CAN data length handled by the crate (classic CAN 2.0 frame).
pub const MAX_CAN_DL: usize = 8;

/// Payload bytes of one N_PDU together with the number of valid bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NData {
    len: u8,
    data: [u8; MAX_CAN_DL],
}

impl Default for NData {
    fn default() -> Self {
        Self::new()
    }
}

impl NData {
    /// Create an empty buffer.
    pub const fn new() -> Self {
        Self {
            len: 0,
            data: [0; MAX_CAN_DL],
        }
    }

    /// Build a buffer from a slice, keeping at most [`MAX_CAN_DL`] bytes.
    pub fn from_slice(slice: &[u8]) -> Self {
        let mut n_data = Self::new();
        n_data.copy_from_slice(slice);
        n_data
    }

    /// Number of valid bytes stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Checks whether the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reset the buffer and wipe previous content.
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
        self.data = [0; MAX_CAN_DL];
    }

    /// Copy bytes into the buffer and update `len`; extra bytes are dropped.
    #[inline]
    pub fn copy_from_slice(&mut self, slice: &[u8]) {
        let clamped = slice.len().min(MAX_CAN_DL);
        self.data = [0; MAX_CAN_DL];
        self.data[..clamped].copy_from_slice(&slice[..clamped]);
        self.len = clamped as u8;
    }

    /// Immutable view over the populated bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len()]
    }

    /// Mutable view over the populated bytes.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        let len = self.len();
        &mut self.data[..len]
    }

    /// Whole backing array, including bytes past `len` (always zero).
    #[inline]
    pub fn raw(&self) -> &[u8; MAX_CAN_DL] {
        &self.data
    }
}
