//! Error definitions shared across library modules.
//! Each type models a specific failure scenario (configuration gate, frame
//! construction, data unit construction, relay I/O).
//!
//! Classification rejections, sequence gaps and slot backpressure are not
//! errors: the state machine reports them through events, flags and `bool`
//! returns so a passive bridge never stalls on malformed traffic.
use thiserror_no_std::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Transport parameters refused by the configuration gate.
pub enum ConfigError {
    /// TX_DL must cover at least a classic 8-byte CAN frame.
    #[error("TX_DL too small: {tx_dl} (minimum 8)")]
    TxDlTooSmall { tx_dl: u8 },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors raised while building or converting a CAN frame.
pub enum FrameError {
    /// Payload does not fit into a classic CAN frame.
    #[error("Frame payload too long: {len} bytes (maximum 8)")]
    PayloadTooLong { len: usize },
    /// Identifier exceeds the 11-bit or 29-bit range requested.
    #[error("CAN identifier out of range: {id:#x}")]
    InvalidId { id: u32 },
    /// The target driver refused to build the frame.
    #[error("Frame rejected by CAN driver")]
    Rejected,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors raised while building an N_PDU by hand (override path).
pub enum PduError {
    /// Single frames carry 1 to 7 bytes.
    #[error("Invalid SF_DL: {len}")]
    InvalidSingleFrameLength { len: usize },
    /// FF_DL is a 12-bit length and must be greater than zero.
    #[error("Invalid FF_DL: {ff_dl}")]
    InvalidFirstFrameLength { ff_dl: u16 },
    /// First frames carry exactly six bytes on classic CAN.
    #[error("First frame segment must hold 6 bytes, got {len}")]
    InvalidFirstSegment { len: usize },
    /// Consecutive frames carry 1 to 7 bytes.
    #[error("Invalid consecutive frame length: {len}")]
    InvalidConsecutiveLength { len: usize },
    /// Payload exceeds what the current PCI type can transport.
    #[error("Payload too long for PCI type: {len}")]
    PayloadTooLong { len: usize },
}

//==================================================================================BRIDGE_ERROR
#[derive(Debug, Error)]
/// Errors terminating the relay runner.
pub enum BridgeError<E: core::fmt::Debug> {
    /// The ISO-TP instance refused the configuration.
    #[error("Invalid ISO-TP configuration: {0}")]
    Config(#[from] ConfigError),
    /// Unable to receive frames from the source bus.
    #[error("CAN bus receive error: {0:?}")]
    Receive(E),
    /// The destination bus refused the frame.
    #[error("CAN bus send error: {0:?}")]
    Send(E),
}
