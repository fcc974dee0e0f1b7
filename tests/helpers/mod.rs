/// Test doubles to simulate CAN buses and the timer during integration tests.
use korri_isotp::protocol::transport::{
    can_frame::CanFrame,
    traits::{can_bus::CanBus, korri_timer::KorriTimer},
};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::time::{sleep, Duration};

#[derive(Clone)]
#[allow(dead_code)]
/// In-memory CAN bus reproducing the `CanBus` trait behavior.
pub struct MockCanBus {
    tx: mpsc::UnboundedSender<CanFrame>,
    rx: Arc<Mutex<mpsc::UnboundedReceiver<CanFrame>>>,
}

#[allow(dead_code)]
impl MockCanBus {
    /// Construct a pair of interconnected buses (bridge side ↔ node side).
    pub fn create_pair() -> (Self, Self) {
        let (dut_tx, host_rx) = mpsc::unbounded_channel();
        let (host_tx, dut_rx) = mpsc::unbounded_channel();

        let dut_bus = Self {
            tx: dut_tx,
            rx: Arc::new(Mutex::new(dut_rx)),
        };

        let host_bus = Self {
            tx: host_tx,
            rx: Arc::new(Mutex::new(host_rx)),
        };

        (dut_bus, host_bus)
    }
}

impl CanBus for MockCanBus {
    type Error = ();

    async fn send(&mut self, frame: CanFrame) -> Result<(), Self::Error> {
        self.tx.send(frame).map_err(|_| ())?;
        Ok(())
    }

    async fn recv(&mut self) -> Result<CanFrame, Self::Error> {
        let mut rx = self.rx.lock().await;
        rx.recv().await.ok_or(())
    }
}

#[allow(dead_code)]
/// Timer based on `tokio::time::sleep` to drive idle ticks in tests.
pub struct MockTimer;

impl KorriTimer for MockTimer {
    async fn delay(&mut self, duration: embassy_time::Duration) {
        sleep(Duration::from_micros(duration.as_micros())).await;
    }
}

#[allow(dead_code)]
/// Build a frame from a literal, panicking on invalid test data.
pub fn frame(id: u32, bytes: &[u8]) -> CanFrame {
    CanFrame::new(id, bytes).expect("test frame must fit into 8 bytes")
}
