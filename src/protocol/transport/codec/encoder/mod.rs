//! ISO-TP frame encoder: serializes one N_PDU into one CAN frame (normal
//! addressing). The caller is responsible for putting the segment that belongs
//! to *this* frame into the data unit.
use crate::core::MAX_CAN_DL;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::n_pdu::NPdu;
use crate::protocol::transport::pci::NPci;
use crate::protocol::transport::{CF_SEGMENT_LEN, FF_SEGMENT_LEN, SF_MAX_DL};

/// Encode `n_pdu` into a frame carrying identifier `id`.
///
/// The frame starts zero-filled so no byte from a previous message leaks into
/// padding. A zero-length frame means "nothing to send": the PCI type is
/// invalid or its header cannot be represented.
pub fn encode_n_pdu(n_pdu: &NPdu, id: u32) -> CanFrame {
    let mut frame = CanFrame {
        id,
        len: 0,
        data: [0u8; MAX_CAN_DL],
    };
    let n_data = n_pdu.n_data.raw();

    match n_pdu.n_pci {
        // SF PCI: 0000 LLLL
        NPci::SingleFrame { sf_dl } => {
            if sf_dl <= SF_MAX_DL {
                let len = sf_dl as usize;
                frame.data[0] = sf_dl;
                frame.data[1..1 + len].copy_from_slice(&n_data[..len]);
                frame.len = 1 + sf_dl;
            }
        }
        // FF PCI: 0001 LLLL LLLL LLLL, always a full classic frame.
        NPci::FirstFrame { ff_dl } => {
            frame.data[0] = 0x10 | ((ff_dl >> 8) as u8 & 0x0F);
            frame.data[1] = (ff_dl & 0xFF) as u8;
            frame.data[2..].copy_from_slice(&n_data[..FF_SEGMENT_LEN]);
            frame.len = MAX_CAN_DL as u8;
        }
        // CF PCI: 0010 SSSS
        NPci::ConsecutiveFrame { sn } => {
            let len = n_pdu.n_data.len().min(CF_SEGMENT_LEN);
            frame.data[0] = 0x20 | (sn & 0x0F);
            frame.data[1..1 + len].copy_from_slice(&n_data[..len]);
            frame.len = 1 + len as u8;
        }
        // FC PCI: 0011 FFFF, BS, STmin, zero padded to 8 bytes.
        NPci::FlowControl { fs, bs, min_st } => {
            frame.data[0] = 0x30 | (fs & 0x0F);
            frame.data[1] = bs;
            frame.data[2] = min_st;
            frame.len = MAX_CAN_DL as u8;
        }
        NPci::Invalid => {}
    }

    frame
}
