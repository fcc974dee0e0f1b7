//! `korri-isotp` library: ISO-TP (ISO 15765-2) segmentation primitives for a
//! `no_std` environment. The crate exposes the single-frame decoder/encoder
//! pair, the reassembly state carried between frames, a poll-driven state
//! machine, and an async relay runner for bus-to-bus filtering.
#![no_std]
//==================================================================================
/// Fixed-capacity payload buffer shared by the decoder, encoder and data units.
pub mod core;
/// Configuration, frame construction, data unit and relay errors.
pub mod error;
/// ISO-TP protocol implementation: CAN transport, PCI codec, state machine
/// and relay runner.
pub mod protocol;
//==================================================================================
