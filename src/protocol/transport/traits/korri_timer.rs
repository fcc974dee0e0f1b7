//! Idle tick source of the relay runner.
use embassy_time::Duration;
use futures_util::Future;

/// Sleeps for the bridge idle tick while the source bus is silent.
pub trait KorriTimer {
    /// Complete after `duration`. Dropped early when a frame arrives first.
    fn delay(&mut self, duration: Duration) -> impl Future<Output = ()> + '_;
}
