//! Transport parameters of an ISO-TP instance and the rules deriving the
//! values the caller must not set by hand.
use crate::core::MAX_CAN_DL;
use crate::error::ConfigError;

/// Network target address type (N_TAtype): CAN frame format crossed with
/// physical (1:1) or functional (1:n) communication.
///
/// The model is not carried by the frames themselves and must be preconfigured.
/// Only normal addressing is decoded; the value is kept for adapters that need
/// to pick the frame format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NTaType {
    /// Classical CAN, 11-bit identifier, physical.
    #[default]
    ClassicalBasePhysical,
    /// Classical CAN, 11-bit identifier, functional.
    ClassicalBaseFunctional,
    /// CAN FD, 11-bit identifier, physical.
    FdBasePhysical,
    /// CAN FD, 11-bit identifier, functional.
    FdBaseFunctional,
    /// Classical CAN, 29-bit identifier, physical.
    ClassicalExtendedPhysical,
    /// Classical CAN, 29-bit identifier, functional.
    ClassicalExtendedFunctional,
    /// CAN FD, 29-bit identifier, physical.
    FdExtendedPhysical,
    /// CAN FD, 29-bit identifier, functional.
    FdExtendedFunctional,
}

impl NTaType {
    /// Frames use 29-bit identifiers.
    pub fn uses_extended_id(self) -> bool {
        matches!(
            self,
            NTaType::ClassicalExtendedPhysical
                | NTaType::ClassicalExtendedFunctional
                | NTaType::FdExtendedPhysical
                | NTaType::FdExtendedFunctional
        )
    }
}

/// Configuration of an [`IsoTp`](super::IsoTp) instance.
///
/// Only `n_tatype` and `tx_dl` are caller input. `rx_dl` is learned from the
/// first frame of each message and `min_ff_dl` follows from `tx_dl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IsoTpConfig {
    /// Network target address type.
    pub n_tatype: NTaType,
    /// Largest CAN_DL used for transmitted frames (at least 8).
    pub tx_dl: u8,
    /// CAN_DL of the last received first frame. Derived.
    pub rx_dl: u8,
    /// Smallest FF_DL accepted for the current addressing scheme. Derived.
    pub min_ff_dl: u8,
}

impl IsoTpConfig {
    /// Classical CAN 2.0 with 11-bit physical addressing.
    pub const fn classic() -> Self {
        Self {
            n_tatype: NTaType::ClassicalBasePhysical,
            tx_dl: MAX_CAN_DL as u8,
            rx_dl: 0,
            min_ff_dl: 0,
        }
    }

    /// Check the caller-supplied fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if (self.tx_dl as usize) < MAX_CAN_DL {
            return Err(ConfigError::TxDlTooSmall { tx_dl: self.tx_dl });
        }
        Ok(())
    }

    /// Minimum FF_DL for normal addressing: 8 on classic frames, TX_DL - 1 above.
    ///
    /// Any shorter message would have fitted into a single frame.
    pub fn derive_min_ff_dl(&self) -> u8 {
        if self.tx_dl as usize > MAX_CAN_DL {
            self.tx_dl - 1
        } else {
            MAX_CAN_DL as u8
        }
    }
}
