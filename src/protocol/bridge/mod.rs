//! Relay runner built on top of [`IsoTp`].
//!
//! Frames read from one bus are decoded, shown to a [`PduFilter`] and then
//! forwarded unchanged, re-encoded with an edited data unit, or dropped on the
//! way to the other bus. This is the real-time tampering/monitoring path of a
//! bus bridge: one frame in, at most one frame out, no reassembly buffer.
//!
//! Firmware can observe decoded traffic by providing a pre-allocated
//! [`embassy_sync::channel::Channel`]. Events are offered with `try_send`, so
//! a slow monitor loses events instead of stalling the bridge.
use embassy_sync::blocking_mutex::raw::{NoopRawMutex, RawMutex};
use embassy_sync::channel::Channel;
use embassy_time::Duration;
use futures_util::{future::select, future::Either, pin_mut};

use crate::error::{BridgeError, ConfigError};
use crate::protocol::isotp::config::IsoTpConfig;
use crate::protocol::isotp::{IsoTp, IsoTpEvent};
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::n_pdu::NPdu;
use crate::protocol::transport::traits::{can_bus::CanBus, korri_timer::KorriTimer};

//==================================================================================Filter
/// Decision taken for one decoded data unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FilterAction {
    /// Relay the received frame byte for byte.
    Forward,
    /// Relay this data unit instead, encoded with the received identifier.
    Replace(NPdu),
    /// Do not relay anything.
    Drop,
}

/// Inspection hook called for every classified frame.
pub trait PduFilter {
    /// `sequence_error` reports the sticky reassembly flag after decoding `n_pdu`.
    fn inspect(&mut self, rx_id: u32, n_pdu: &NPdu, sequence_error: bool) -> FilterAction;
}

impl<F> PduFilter for F
where
    F: FnMut(u32, &NPdu, bool) -> FilterAction,
{
    fn inspect(&mut self, rx_id: u32, n_pdu: &NPdu, sequence_error: bool) -> FilterAction {
        self(rx_id, n_pdu, sequence_error)
    }
}

/// Filter relaying every data unit unchanged (pure monitor).
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl PduFilter for PassThrough {
    fn inspect(&mut self, _rx_id: u32, _n_pdu: &NPdu, _sequence_error: bool) -> FilterAction {
        FilterAction::Forward
    }
}

//==================================================================================Config and results
/// Runner parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Interval at which the state machine is stepped while the bus is silent.
    pub idle_tick: Duration,
    /// Relay frames that are not ISO-TP (or malformed) instead of dropping them.
    pub passthrough_invalid: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            idle_tick: Duration::from_millis(10),
            passthrough_invalid: true,
        }
    }
}

/// What happened to one received frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RelayOutcome {
    /// The received frame must be sent as is.
    Forwarded(CanFrame),
    /// The filter replaced the data unit; this frame must be sent instead.
    Replaced(CanFrame),
    /// Nothing to send.
    Dropped,
}

impl RelayOutcome {
    /// Frame to put on the destination bus, if any.
    pub fn frame(&self) -> Option<&CanFrame> {
        match self {
            RelayOutcome::Forwarded(frame) | RelayOutcome::Replaced(frame) => Some(frame),
            RelayOutcome::Dropped => None,
        }
    }
}

/// Decoded traffic published to the optional monitor channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BridgeEvent {
    /// Identifier of the received frame.
    pub rx_id: u32,
    /// Data unit as decoded, before any filter edit.
    pub n_pdu: NPdu,
    /// Sticky reassembly flag after decoding.
    pub sequence_error: bool,
    /// Filter decision.
    pub action: FilterAction,
}

/// Result of [`IsoTpBridge::relay_frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relay {
    pub outcome: RelayOutcome,
    /// Present when the frame was classified as ISO-TP.
    pub event: Option<BridgeEvent>,
}

//==================================================================================Bridge
/// One-directional ISO-TP relay.
pub struct IsoTpBridge<F: PduFilter> {
    isotp: IsoTp,
    config: BridgeConfig,
    filter: F,
    missed_events: u32,
}

impl<F: PduFilter> IsoTpBridge<F> {
    /// Configure an ISO-TP instance and open its configuration gate.
    pub fn new(
        isotp_config: IsoTpConfig,
        config: BridgeConfig,
        filter: F,
    ) -> Result<Self, ConfigError> {
        isotp_config.validate()?;

        let mut isotp = IsoTp::new();
        isotp.set_config(isotp_config);
        // Validated above: this step opens the gate.
        isotp.step(0);

        Ok(Self {
            isotp,
            config,
            filter,
            missed_events: 0,
        })
    }

    /// Underlying ISO-TP instance (configuration, reassembly counters).
    pub fn isotp(&self) -> &IsoTp {
        &self.isotp
    }

    /// Events the monitor channel could not accept.
    pub fn missed_events(&self) -> u32 {
        self.missed_events
    }

    /// Run one relay cycle for `frame`: push, step, filter, override, pop.
    ///
    /// The RX slot is emptied by the step of the same cycle and the TX slot by
    /// its pop, so neither can refuse a frame here.
    pub fn relay_frame(&mut self, frame: CanFrame) -> Relay {
        let pushed = self.isotp.push_frame(frame);
        let n_pdu = match self.isotp.step(0) {
            IsoTpEvent::NPduDetected if pushed => self.isotp.get_n_pdu(),
            _ => None,
        };
        let Some(n_pdu) = n_pdu else {
            let outcome = if self.config.passthrough_invalid {
                RelayOutcome::Forwarded(frame)
            } else {
                RelayOutcome::Dropped
            };
            return Relay {
                outcome,
                event: None,
            };
        };

        let sequence_error = self.isotp.has_sequence_error();
        let action = self.filter.inspect(frame.id, &n_pdu, sequence_error);

        #[cfg(feature = "defmt")]
        defmt::debug!("Relay id={=u32:#x}: {}", frame.id, action);

        let outcome = match action {
            FilterAction::Forward => RelayOutcome::Forwarded(frame),
            FilterAction::Drop => RelayOutcome::Dropped,
            FilterAction::Replace(edited) => self.replace(&edited),
        };

        Relay {
            outcome,
            event: Some(BridgeEvent {
                rx_id: frame.id,
                n_pdu,
                sequence_error,
                action,
            }),
        }
    }

    fn replace(&mut self, edited: &NPdu) -> RelayOutcome {
        let queued = self.isotp.override_n_pdu(edited);
        match self.isotp.pop_frame() {
            Some(tx) if queued && tx.is_transmittable() => RelayOutcome::Replaced(tx),
            _ => RelayOutcome::Dropped,
        }
    }

    /// Relay frames from `rx_bus` to `tx_bus` until a bus error occurs.
    pub async fn drive<R, W, T>(
        &mut self,
        rx_bus: &mut R,
        tx_bus: &mut W,
        timer: &mut T,
    ) -> Result<(), BridgeError<R::Error>>
    where
        R: CanBus,
        W: CanBus<Error = R::Error>,
        T: KorriTimer,
    {
        self.run::<R, W, T, NoopRawMutex, 1>(rx_bus, tx_bus, timer, None)
            .await
    }

    /// Same as [`drive`](Self::drive), publishing every classified frame to `monitor`.
    pub async fn drive_with_monitor<R, W, T, M, const N: usize>(
        &mut self,
        rx_bus: &mut R,
        tx_bus: &mut W,
        timer: &mut T,
        monitor: &Channel<M, BridgeEvent, N>,
    ) -> Result<(), BridgeError<R::Error>>
    where
        R: CanBus,
        W: CanBus<Error = R::Error>,
        T: KorriTimer,
        M: RawMutex,
    {
        self.run(rx_bus, tx_bus, timer, Some(monitor)).await
    }

    async fn run<R, W, T, M, const N: usize>(
        &mut self,
        rx_bus: &mut R,
        tx_bus: &mut W,
        timer: &mut T,
        monitor: Option<&Channel<M, BridgeEvent, N>>,
    ) -> Result<(), BridgeError<R::Error>>
    where
        R: CanBus,
        W: CanBus<Error = R::Error>,
        T: KorriTimer,
        M: RawMutex,
    {
        let tick = self.config.idle_tick;
        let tick_ms = u32::try_from(tick.as_millis()).unwrap_or(u32::MAX);

        loop {
            let received = {
                let recv = rx_bus.recv();
                let idle = timer.delay(tick);
                pin_mut!(recv);
                pin_mut!(idle);

                match select(recv, idle).await {
                    Either::Left((result, _)) => Some(result.map_err(BridgeError::Receive)?),
                    Either::Right(_) => None,
                }
            };

            let Some(frame) = received else {
                // Keep the state machine polled while the bus is silent.
                self.isotp.step(tick_ms);
                continue;
            };

            let relay = self.relay_frame(frame);

            if let (Some(event), Some(channel)) = (relay.event, monitor) {
                if channel.try_send(event).is_err() {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Monitor channel full, event dropped");
                    self.missed_events = self.missed_events.saturating_add(1);
                }
            }

            if let Some(out) = relay.outcome.frame() {
                tx_bus.send(*out).await.map_err(BridgeError::Send)?;
            }
        }
    }
}
