//! One-deep frame holding cell, used for the RX and TX sides of an ISO-TP
//! instance. Behaves like a bounded channel of capacity one with non-blocking
//! `try_put`/`take`: a refused put is backpressure, not an error.
use crate::protocol::transport::can_frame::CanFrame;

#[derive(Debug, Clone, Copy, Default)]
pub struct FrameSlot {
    frame: Option<CanFrame>,
}

impl FrameSlot {
    pub const fn new() -> Self {
        Self { frame: None }
    }

    /// Store `frame` if the slot is free. Returns `false` when occupied.
    pub fn try_put(&mut self, frame: CanFrame) -> bool {
        if self.frame.is_some() {
            return false;
        }
        self.frame = Some(frame);
        true
    }

    /// Remove and return the buffered frame.
    pub fn take(&mut self) -> Option<CanFrame> {
        self.frame.take()
    }

    pub fn is_occupied(&self) -> bool {
        self.frame.is_some()
    }
}
