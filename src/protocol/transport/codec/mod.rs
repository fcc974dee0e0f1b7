//! Single-frame ISO-TP codec: classification/decoding of received frames
//! (with the reassembly counters that span a multi-frame message) and the
//! symmetric encoder used on the override path.
pub mod decoder;
pub mod encoder;
