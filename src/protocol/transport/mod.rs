//! ISO-TP transport layer: CAN frame representation, N_PCI/N_PDU types, the
//! frame codec, and bus abstraction traits.
//!
//! ## Normal addressing layout
//!
//! With normal addressing the N_PCI starts at byte 0 of the CAN payload and its
//! high nibble selects the frame type:
//!
//! | Byte 0    | Type | Header bytes |
//! |-----------|------|--------------|
//! | `0x0L`    | SF   | 1            |
//! | `0x1L LL` | FF   | 2            |
//! | `0x2S`    | CF   | 1            |
//! | `0x3F`    | FC   | 3            |

pub mod can_frame;
pub mod codec;
pub mod n_pdu;
pub mod pci;
pub mod traits;

/// Largest payload of a Single Frame on classic CAN with normal addressing.
pub const SF_MAX_DL: u8 = 7;

/// Payload bytes carried by a full First Frame on classic CAN.
pub const FF_SEGMENT_LEN: usize = 6;

/// Payload bytes carried by a full Consecutive Frame on classic CAN.
pub const CF_SEGMENT_LEN: usize = 7;

/// Largest message length expressible in the 12-bit FF_DL field.
pub const FF_DL_MAX: u16 = 0x0FFF;
