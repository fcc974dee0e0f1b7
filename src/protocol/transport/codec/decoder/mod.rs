//! ISO-TP frame classifier. Decodes one CAN frame at a time into an [`NPdu`]
//! and tracks the progress of the multi-frame message it belongs to.
//!
//! Rejected frames come back as [`NPci::Invalid`] instead of an error: a
//! monitor or bridge skips malformed traffic and keeps going. Frames of one
//! message are expected in wire order; there is no reordering window.
use crate::core::NData;
use crate::protocol::isotp::config::IsoTpConfig;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::n_pdu::NPdu;
use crate::protocol::transport::pci::NPci;
use crate::protocol::transport::{CF_SEGMENT_LEN, SF_MAX_DL};

//==================================================================================Reassembly state
/// Counters persisting between frames of one FF → CF… message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReassemblyState {
    bytes_remaining: u32,
    last_sn: u8,
    sequence_error: bool,
}

impl ReassemblyState {
    /// Bytes still expected after the last decoded segment.
    pub fn bytes_remaining(&self) -> u32 {
        self.bytes_remaining
    }

    /// Sequence number of the last decoded FF (0) or CF.
    pub fn last_sn(&self) -> u8 {
        self.last_sn
    }

    /// Sticky flag raised by a sequence gap or a rejected first frame.
    pub fn sequence_error(&self) -> bool {
        self.sequence_error
    }

    /// Whether a consecutive frame can currently be decoded.
    pub fn accepts_consecutive(&self) -> bool {
        self.bytes_remaining > 1
    }

    /// Only reachable from a valid first frame: the one place the sticky
    /// error is cleared.
    fn begin(&mut self, ff_dl: u16, segment_len: usize) {
        self.bytes_remaining = (ff_dl as u32).saturating_sub(segment_len as u32);
        self.last_sn = 0;
        self.sequence_error = false;
    }

    /// Consume one consecutive frame and return how many payload bytes it carries.
    fn advance(&mut self, sn: u8) -> usize {
        if sn != (self.last_sn.wrapping_add(1) & 0x0F) {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "CF sequence gap: expected {}, got {}",
                self.last_sn.wrapping_add(1) & 0x0F,
                sn
            );
            self.sequence_error = true;
        }
        self.last_sn = sn;

        let len = self.bytes_remaining.min(CF_SEGMENT_LEN as u32);
        self.bytes_remaining = self.bytes_remaining.saturating_sub(len);
        len as usize
    }
}

//==================================================================================Decoder
/// Frame decoder owning the reassembly counters of a single session.
#[derive(Debug, Clone, Copy, Default)]
pub struct PduDecoder {
    state: ReassemblyState,
}

impl PduDecoder {
    pub const fn new() -> Self {
        Self {
            state: ReassemblyState {
                bytes_remaining: 0,
                last_sn: 0,
                sequence_error: false,
            },
        }
    }

    /// Current reassembly counters.
    pub fn state(&self) -> &ReassemblyState {
        &self.state
    }

    /// Classify and decode a received frame (normal addressing).
    ///
    /// Based on the N_PCI summary of ISO 15765-2 (high nibble of byte 0).
    /// First frames also record `rx_dl` and refresh `min_ff_dl` in `config`.
    pub fn decode(&mut self, frame: &CanFrame, config: &mut IsoTpConfig) -> NPdu {
        let data = frame.as_slice();
        let Some(&pci) = data.first() else {
            return NPdu::default();
        };

        match pci & 0xF0 {
            0x00 => decode_single_frame(data),
            0x10 if data.len() >= 2 => self.decode_first_frame(data, config),
            0x20 if self.state.accepts_consecutive() => self.decode_consecutive_frame(frame),
            0x30 if data.len() >= 3 => decode_flow_control(data),
            _ => NPdu::default(),
        }
    }

    fn decode_first_frame(&mut self, data: &[u8], config: &mut IsoTpConfig) -> NPdu {
        let ff_dl = (((data[0] & 0x0F) as u16) << 8) | data[1] as u16;

        // Classic CAN only: RX_DL is the received CAN_DL.
        config.rx_dl = data.len() as u8;
        config.min_ff_dl = config.derive_min_ff_dl();

        let segment_len = data.len() - 2;
        if ff_dl == 0 || ff_dl < config.min_ff_dl as u16 || (ff_dl as usize) < segment_len {
            // A first frame was intended: whatever follows belongs to a lost message.
            #[cfg(feature = "defmt")]
            defmt::debug!("Rejected FF: FF_DL={}, CAN_DL={}", ff_dl, data.len());
            self.state.sequence_error = true;
            return NPdu::default();
        }

        self.state.begin(ff_dl, segment_len);

        NPdu {
            n_pci: NPci::FirstFrame { ff_dl },
            n_data: NData::from_slice(&data[2..]),
        }
    }

    fn decode_consecutive_frame(&mut self, frame: &CanFrame) -> NPdu {
        let sn = frame.data[0] & 0x0F;
        let len = self.state.advance(sn);

        // Payload is kept even after a gap so a monitor still sees the bytes.
        NPdu {
            n_pci: NPci::ConsecutiveFrame { sn },
            n_data: NData::from_slice(&frame.data[1..1 + len]),
        }
    }
}

fn decode_single_frame(data: &[u8]) -> NPdu {
    let sf_dl = data[0] & 0x0F;

    // SF_DL = 0 announces the CAN FD escape sequence, not supported here.
    if sf_dl == 0 || sf_dl > SF_MAX_DL || data.len() < 1 + sf_dl as usize {
        return NPdu::default();
    }

    NPdu {
        n_pci: NPci::SingleFrame { sf_dl },
        n_data: NData::from_slice(&data[1..1 + sf_dl as usize]),
    }
}

fn decode_flow_control(data: &[u8]) -> NPdu {
    NPdu {
        n_pci: NPci::FlowControl {
            fs: data[0] & 0x0F,
            bs: data[1],
            min_st: data[2],
        },
        n_data: NData::new(),
    }
}
