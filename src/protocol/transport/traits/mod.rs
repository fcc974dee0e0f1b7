//! Abstraction traits used by the relay runner (CAN bus and timer).
pub mod can_bus;
pub mod korri_timer;
