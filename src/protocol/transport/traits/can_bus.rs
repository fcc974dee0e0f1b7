//! Bus endpoint seen by the relay runner. One implementation per side of the
//! bridge: frames are read from the source bus and written to the destination.
use crate::protocol::transport::can_frame::CanFrame;
use futures_util::Future;

/// Asynchronous classic CAN endpoint.
///
/// The runner only hands transmittable frames (1 to 8 bytes) to `send`; a
/// driver may still reject them through `Error`, which ends the relay loop.
pub trait CanBus {
    type Error: core::fmt::Debug;
    /// Queue `frame` for transmission.
    fn send(&mut self, frame: CanFrame) -> impl Future<Output = Result<(), Self::Error>> + '_;
    /// Wait for the next received frame. Remote frames arrive with `len == 0`.
    fn recv(&mut self) -> impl Future<Output = Result<CanFrame, Self::Error>> + '_;
}
