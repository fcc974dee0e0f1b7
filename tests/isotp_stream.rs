//! Passive monitoring scenarios driven through the public `IsoTp` surface:
//! a UDS request/response exchange is decoded frame by frame and the
//! multi-frame response is rebuilt by the caller from the data units.

mod helpers;

use helpers::frame;
use korri_isotp::protocol::isotp::{config::IsoTpConfig, IsoTp, IsoTpEvent};
use korri_isotp::protocol::transport::pci::{FlowStatus, NPci, PciType};

const TESTER_ID: u32 = 0x7E0;
const ECU_ID: u32 = 0x7E8;

/// VIN read (ReadDataByIdentifier F190) as seen on the wire.
fn vin_exchange() -> Vec<(u32, Vec<u8>)> {
    vec![
        (TESTER_ID, vec![0x03, 0x22, 0xF1, 0x90, 0x00, 0x00, 0x00, 0x00]),
        (ECU_ID, vec![0x10, 0x14, 0x62, 0xF1, 0x90, 0x57, 0x30, 0x4C]),
        (TESTER_ID, vec![0x30, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]),
        (ECU_ID, vec![0x21, 0x30, 0x30, 0x30, 0x30, 0x34, 0x33, 0x4D]),
        (ECU_ID, vec![0x22, 0x42, 0x35, 0x34, 0x31, 0x33, 0x32, 0x36]),
    ]
}

fn listening() -> IsoTp {
    let mut isotp = IsoTp::new();
    let mut config = isotp.get_config();
    config.tx_dl = 8;
    isotp.set_config(config);
    assert_eq!(isotp.step(0), IsoTpEvent::None);
    isotp
}

#[test]
/// The caller can rebuild the 20-byte response from FF + CF data units.
fn test_rebuild_multi_frame_response() {
    let mut isotp = listening();
    let mut message = Vec::new();
    let mut expected_len = 0usize;
    let mut types = Vec::new();

    for (id, bytes) in vin_exchange() {
        assert!(isotp.push_frame(frame(id, &bytes)));
        assert_eq!(isotp.step(10), IsoTpEvent::NPduDetected);

        let n_pdu = isotp.get_n_pdu().expect("every frame of the exchange is ISO-TP");
        types.push(n_pdu.pci_type());

        match n_pdu.n_pci {
            NPci::FirstFrame { ff_dl } => {
                expected_len = ff_dl as usize;
                message.clear();
                message.extend_from_slice(n_pdu.payload());
            }
            NPci::ConsecutiveFrame { .. } => message.extend_from_slice(n_pdu.payload()),
            NPci::FlowControl { .. } => {
                assert_eq!(n_pdu.n_pci.flow_status(), Some(FlowStatus::ClearToSend));
            }
            _ => {}
        }
    }

    assert_eq!(
        types,
        vec![
            PciType::SingleFrame,
            PciType::FirstFrame,
            PciType::FlowControl,
            PciType::ConsecutiveFrame,
            PciType::ConsecutiveFrame,
        ]
    );
    assert_eq!(message.len(), expected_len);
    assert_eq!(&message[..3], &[0x62, 0xF1, 0x90]);
    assert_eq!(&message[3..], &b"W0L000043MB541326"[..]);
    assert!(!isotp.has_sequence_error());
    assert_eq!(isotp.reassembly().bytes_remaining(), 0);
}

#[test]
/// A lost CF is reported once the next one arrives, and cleared by a new FF.
fn test_lost_consecutive_frame_is_flagged() {
    let mut isotp = listening();
    let exchange = vin_exchange();

    // Drop the first CF (index 3).
    for (id, bytes) in exchange.iter().filter(|(_, b)| b[0] != 0x21) {
        isotp.push_frame(frame(*id, bytes));
        isotp.step(0);
    }
    assert!(isotp.has_sequence_error());
    // The late CF was still decoded.
    let last = isotp.get_n_pdu().unwrap();
    assert_eq!(last.n_pci, NPci::ConsecutiveFrame { sn: 2 });

    // Retransmission of the whole response starts with a fresh FF.
    isotp.push_frame(frame(ECU_ID, &exchange[1].1));
    assert_eq!(isotp.step(0), IsoTpEvent::NPduDetected);
    assert!(!isotp.has_sequence_error());
}

#[test]
/// Frames pushed before the gate opens are refused, not queued.
fn test_frames_refused_until_configured() {
    let mut isotp = IsoTp::new();
    assert!(!isotp.push_frame(frame(TESTER_ID, &[0x02, 0x3E, 0x00])));
    assert_eq!(isotp.step(0), IsoTpEvent::InvalidConfig);

    isotp.set_config(IsoTpConfig::classic());
    assert_eq!(isotp.step(0), IsoTpEvent::None);
    assert!(isotp.push_frame(frame(TESTER_ID, &[0x02, 0x3E, 0x00])));
    assert_eq!(isotp.step(0), IsoTpEvent::NPduDetected);
}

#[test]
/// Tamper with a request in flight: the relayed frame keeps the tester identifier.
fn test_override_rewrites_request() {
    let mut isotp = listening();
    isotp.push_frame(frame(TESTER_ID, &[0x02, 0x10, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00]));
    assert_eq!(isotp.step(0), IsoTpEvent::NPduDetected);

    // Downgrade an extended session request to the default session.
    let edited = isotp
        .get_n_pdu()
        .unwrap()
        .with_payload(&[0x10, 0x01])
        .unwrap();
    assert!(isotp.override_n_pdu(&edited));

    let tx = isotp.pop_frame().unwrap();
    assert_eq!(tx.id, TESTER_ID);
    assert_eq!(tx.len, 3);
    assert_eq!(tx.data, [0x02, 0x10, 0x01, 0, 0, 0, 0, 0]);
}
