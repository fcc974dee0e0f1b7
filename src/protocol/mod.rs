//! High-level components of the ISO-TP protocol: CAN/PCI transport primitives,
//! the poll-driven ISO-TP instance, and the async relay runner.
pub mod bridge;
pub mod isotp;
pub mod transport;
