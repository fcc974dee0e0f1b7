//! Poll-driven ISO-TP instance: configuration gate, single-slot RX/TX
//! buffers, frame decoding and the override path used for filtering.
//!
//! ```text
//! push_frame(rx) ──► step() ──► get_n_pdu() ──► override_n_pdu(edited) ──► pop_frame()
//! ```
//!
//! Every call is non-blocking and bounded by the 8-byte frame size. The
//! instance holds no locks: drive it from one loop or serialize access.
use crate::core::NData;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::codec::decoder::{PduDecoder, ReassemblyState};
use crate::protocol::transport::codec::encoder::encode_n_pdu;
use crate::protocol::transport::n_pdu::NPdu;
use crate::protocol::transport::pci::NPci;

use self::config::{IsoTpConfig, NTaType};
use self::slot::FrameSlot;

pub mod config;
pub mod slot;

/// Outcome of one [`IsoTp::step`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IsoTpEvent {
    /// Nothing happened, keep polling.
    None,
    /// Configuration refused; fix it with `set_config`, the gate retries every step.
    InvalidConfig,
    /// A frame was classified; read it with `get_n_pdu`.
    NPduDetected,
}

/// Internal state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Waiting for a valid configuration.
    Config,
    /// Configuration locked, decoding pushed frames.
    ListenNPdu,
}

/// Main ISO-TP instance: one reassembly context, one RX and one TX slot.
#[derive(Debug, Clone, Copy)]
pub struct IsoTp {
    state: State,
    n_pdu: NPdu,
    config: IsoTpConfig,
    decoder: PduDecoder,
    rx_slot: FrameSlot,
    tx_slot: FrameSlot,
    /// Identifier of the last decoded frame, reused by the override path.
    last_rx_id: u32,
}

impl Default for IsoTp {
    fn default() -> Self {
        Self::new()
    }
}

impl IsoTp {
    /// Create an unconfigured instance.
    pub const fn new() -> Self {
        Self {
            state: State::Config,
            n_pdu: NPdu {
                n_pci: NPci::Invalid,
                n_data: NData::new(),
            },
            config: IsoTpConfig {
                n_tatype: NTaType::ClassicalBasePhysical,
                tx_dl: 0,
                rx_dl: 0,
                min_ff_dl: 0,
            },
            decoder: PduDecoder::new(),
            rx_slot: FrameSlot::new(),
            tx_slot: FrameSlot::new(),
            last_rx_id: 0,
        }
    }

    /// Return to the freshly created, unconfigured state.
    pub fn init(&mut self) {
        *self = Self::new();
    }

    //==================================================================================Configuration
    /// Current configuration, including the derived fields.
    pub fn get_config(&self) -> IsoTpConfig {
        self.config
    }

    /// Store `n_tatype` and `tx_dl` while the instance is still unconfigured.
    ///
    /// Derived fields of `config` are ignored. Once the gate has opened the
    /// configuration is locked for the lifetime of the instance and the call
    /// returns `false` without effect.
    pub fn set_config(&mut self, config: IsoTpConfig) -> bool {
        if self.state != State::Config {
            return false;
        }
        self.config.n_tatype = config.n_tatype;
        self.config.tx_dl = config.tx_dl;
        true
    }

    /// `true` once the configuration gate has opened.
    pub fn is_listening(&self) -> bool {
        self.state == State::ListenNPdu
    }

    //==================================================================================Slots
    /// Hand a received frame to the instance. Returns `false` when the
    /// instance is not listening yet or the previous frame was not stepped.
    pub fn push_frame(&mut self, frame: CanFrame) -> bool {
        if self.state != State::ListenNPdu {
            return false;
        }
        self.rx_slot.try_put(frame)
    }

    /// Take the frame produced by the last override, if any.
    pub fn pop_frame(&mut self) -> Option<CanFrame> {
        self.tx_slot.take()
    }

    //==================================================================================Data unit
    /// Data unit decoded by the last step (or set by the last override).
    pub fn get_n_pdu(&self) -> Option<NPdu> {
        self.n_pdu.n_pci.is_valid().then_some(self.n_pdu)
    }

    /// Sticky reassembly error, cleared by the next valid first frame.
    pub fn has_sequence_error(&self) -> bool {
        self.decoder.state().sequence_error()
    }

    /// Reassembly counters of the message in progress.
    pub fn reassembly(&self) -> &ReassemblyState {
        self.decoder.state()
    }

    /// Replace the active data unit and queue it for transmission.
    ///
    /// The outgoing frame reuses the identifier of the last received frame:
    /// the instance relays traffic, it is not an independent endpoint.
    /// Returns `false` while the TX slot still holds an unpopped frame.
    pub fn override_n_pdu(&mut self, n_pdu: &NPdu) -> bool {
        if self.tx_slot.is_occupied() {
            return false;
        }
        self.n_pdu = *n_pdu;
        let frame = encode_n_pdu(&self.n_pdu, self.last_rx_id);

        #[cfg(feature = "defmt")]
        defmt::trace!("Override queued: id={=u32:#x}, len={}", frame.id, frame.len);

        self.tx_slot.try_put(frame)
    }

    //==================================================================================State machine
    /// Advance the state machine by one non-blocking step.
    ///
    /// `delta_time_ms` is reserved for flow-control pacing and currently unused.
    pub fn step(&mut self, delta_time_ms: u32) -> IsoTpEvent {
        let _ = delta_time_ms;

        match self.state {
            State::Config => {
                if let Err(_err) = self.config.validate() {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("ISO-TP configuration refused: {}", _err);
                    return IsoTpEvent::InvalidConfig;
                }

                // Only normal addressing is handled: min(FF_DL) follows TX_DL alone.
                self.config.min_ff_dl = self.config.derive_min_ff_dl();
                self.state = State::ListenNPdu;

                #[cfg(feature = "defmt")]
                defmt::info!(
                    "ISO-TP listening: TX_DL={}, min(FF_DL)={}",
                    self.config.tx_dl,
                    self.config.min_ff_dl
                );

                IsoTpEvent::None
            }
            State::ListenNPdu => {
                self.n_pdu.n_pci = NPci::Invalid;

                // At most one decode per pushed frame; the slot is free again afterwards.
                let Some(frame) = self.rx_slot.take() else {
                    return IsoTpEvent::None;
                };
                self.last_rx_id = frame.id;
                self.n_pdu = self.decoder.decode(&frame, &mut self.config);

                if !self.n_pdu.n_pci.is_valid() {
                    #[cfg(feature = "defmt")]
                    defmt::trace!("Ignored frame id={=u32:#x}", frame.id);
                    return IsoTpEvent::None;
                }

                #[cfg(feature = "defmt")]
                defmt::trace!("N_PDU detected: {}", self.n_pdu);

                IsoTpEvent::NPduDetected
            }
        }
    }
}
