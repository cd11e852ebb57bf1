//! Periodic tick driver.
//!
//! On the boards the tick came from a hardware timer overflow interrupt.
//! Here each device gets a tokio task that fires on a fixed interval,
//! samples the device inputs, and runs one tick under the device lock.
//! Events raised by the tick are forwarded to an optional channel after the
//! lock has been released.
//!
//! # Examples
//!
//! ```no_run
//! use std::time::Duration;
//! use statuslink_emulator::{Lever, SharedDevice, SimulatedContacts, TickDriver};
//! use tokio::sync::mpsc;
//!
//! # async fn example() {
//! let lever = SharedDevice::new(Lever::default());
//! let contacts = SimulatedContacts::new();
//! let (tx, mut rx) = mpsc::channel(16);
//!
//! let period = Duration::from_millis(2);
//! let driver = TickDriver::spawn(lever.clone(), period, contacts.clone(), Some(tx));
//! contacts.close();
//!
//! if let Some(event) = rx.recv().await {
//!     println!("{event}");
//! }
//! driver.shutdown().await;
//! # }
//! ```

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use statuslink_hardware::Level;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, warn};

use crate::events::DeviceEvent;
use crate::lever::LeverInputs;
use crate::shared::SharedDevice;

/// State advanced by a periodic tick.
pub trait Tick {
    /// Inputs sampled before every tick.
    type Input;

    /// Run one tick. Returns an event when the tick changed something the
    /// outside world should hear about.
    fn tick(&mut self, input: Self::Input) -> Option<DeviceEvent>;
}

/// Source of per-tick device inputs.
pub trait InputSource: Send + 'static {
    type Input;

    fn sample(&mut self) -> Self::Input;
}

/// Input source for devices without inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInputs;

impl InputSource for NoInputs {
    type Input = ();

    fn sample(&mut self) {}
}

/// Simulated lever contacts.
///
/// Clones share the same pins, so a test or the CLI can move the lever while
/// a [`TickDriver`] samples it. Both pins idle high (pulled up, contact open).
#[derive(Debug, Clone)]
pub struct SimulatedContacts {
    levels: Arc<Mutex<(Level, Level)>>,
}

impl SimulatedContacts {
    #[must_use]
    pub fn new() -> Self {
        Self {
            levels: Arc::new(Mutex::new((Level::High, Level::High))),
        }
    }

    /// Set the raw `(open, closed)` pin levels.
    pub fn set_levels(&self, open: Level, closed: Level) {
        *self.levels.lock().unwrap_or_else(PoisonError::into_inner) = (open, closed);
    }

    #[must_use]
    pub fn levels(&self) -> (Level, Level) {
        *self.levels.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move the lever to "open": only the open contact is made.
    pub fn open(&self) {
        self.set_levels(Level::Low, Level::High);
    }

    /// Move the lever to "closed": only the closed contact is made.
    pub fn close(&self) {
        self.set_levels(Level::High, Level::Low);
    }

    /// Lever between positions: neither contact made.
    pub fn release(&self) {
        self.set_levels(Level::High, Level::High);
    }

    /// Wiring fault: both contacts made at once.
    pub fn short(&self) {
        self.set_levels(Level::Low, Level::Low);
    }
}

impl Default for SimulatedContacts {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for SimulatedContacts {
    type Input = LeverInputs;

    fn sample(&mut self) -> LeverInputs {
        let (open, closed) = self.levels();
        LeverInputs::from_levels(open, closed)
    }
}

/// How a tick task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskTermination {
    /// Returned on its own.
    Finished,
    /// Aborted by shutdown.
    Cancelled,
    /// Panicked inside a tick.
    Panicked,
}

/// Handle to a running tick task.
#[derive(Debug)]
pub struct TickDriver {
    handle: JoinHandle<()>,
}

impl TickDriver {
    /// Spawn a task ticking `device` every `period`.
    ///
    /// Missed ticks are caught up in a burst so the number of logical ticks
    /// matches elapsed time. Events are offered to `events` without waiting;
    /// a full channel drops the event, a closed one stops forwarding.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero or if called outside a tokio runtime.
    pub fn spawn<S, I>(
        device: SharedDevice<S>,
        period: Duration,
        mut inputs: I,
        events: Option<mpsc::Sender<DeviceEvent>>,
    ) -> Self
    where
        S: Tick<Input = I::Input> + Send + 'static,
        I: InputSource,
    {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);

        let handle = tokio::spawn(async move {
            let mut events = events;
            loop {
                ticker.tick().await;

                let input = inputs.sample();
                let Some(event) = device.with(|state| state.tick(input)) else {
                    continue;
                };

                let Some(tx) = &events else {
                    continue;
                };
                match tx.try_send(event) {
                    Ok(()) => {}
                    Err(TrySendError::Full(event)) => {
                        warn!("event channel full, dropping {}", event);
                    }
                    Err(TrySendError::Closed(_)) => {
                        debug!("event receiver gone, no longer forwarding");
                        events = None;
                    }
                }
            }
        });

        Self { handle }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stop the tick task and wait for it to end.
    pub async fn shutdown(self) -> TaskTermination {
        self.handle.abort();
        let termination = Self::classify(self.handle.await);
        if termination == TaskTermination::Panicked {
            warn!("tick task panicked before shutdown");
        }
        termination
    }

    fn classify(result: Result<(), JoinError>) -> TaskTermination {
        match result {
            Ok(()) => TaskTermination::Finished,
            Err(e) if e.is_cancelled() => TaskTermination::Cancelled,
            Err(_) => TaskTermination::Panicked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IndicatorConfig, LeverConfig};
    use crate::{Indicator, LampOutput, Lever};
    use statuslink_core::{Color, IndicatorSetting, LeverStatus};
    use tokio::time::{sleep, timeout};

    fn lever(threshold: u8) -> SharedDevice<Lever> {
        SharedDevice::new(Lever::new(&LeverConfig {
            debounce_threshold: threshold,
            ..LeverConfig::default()
        }))
    }

    #[tokio::test(start_paused = true)]
    async fn test_lever_commit_forwarded() {
        let device = lever(5);
        let contacts = SimulatedContacts::new();
        let (tx, mut rx) = mpsc::channel(8);

        contacts.close();
        let driver =
            TickDriver::spawn(device.clone(), Duration::from_millis(2), contacts.clone(), Some(tx));

        let event = timeout(Duration::from_secs(1), rx.recv()).await.unwrap();
        assert_eq!(
            event,
            Some(DeviceEvent::LeverCommitted {
                status: LeverStatus::Closed
            })
        );
        assert_eq!(device.snapshot().status(), LeverStatus::Closed);
        assert!(device.snapshot().attention().is_asserted());

        assert_eq!(driver.shutdown().await, TaskTermination::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shorted_contacts_never_commit() {
        let device = lever(5);
        let contacts = SimulatedContacts::new();
        let (tx, mut rx) = mpsc::channel(8);

        contacts.open();
        let driver =
            TickDriver::spawn(device.clone(), Duration::from_millis(2), contacts.clone(), Some(tx));
        assert!(rx.recv().await.is_some());

        contacts.short();
        sleep(Duration::from_millis(500)).await;

        assert!(rx.try_recv().is_err());
        assert_eq!(device.snapshot().status(), LeverStatus::Open);
        driver.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_indicator_blinks_on_schedule() {
        let device = SharedDevice::new(Indicator::new(&IndicatorConfig {
            blink_threshold: 10,
            tick_period_ms: 10,
        }));
        device.with(|indicator| indicator.set_state(IndicatorSetting::new(Color::Green, true)));

        let driver = TickDriver::spawn(device.clone(), Duration::from_millis(10), NoInputs, None);

        let mut outputs = Vec::new();
        for _ in 0..8 {
            sleep(Duration::from_millis(50)).await;
            outputs.push(device.snapshot().output());
        }
        driver.shutdown().await;

        assert!(outputs.contains(&LampOutput::GREEN));
        assert!(outputs.iter().any(LampOutput::is_dark));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_receiver_keeps_ticking() {
        let device = lever(1);
        let contacts = SimulatedContacts::new();
        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        let driver =
            TickDriver::spawn(device.clone(), Duration::from_millis(2), contacts.clone(), Some(tx));
        contacts.open();
        sleep(Duration::from_millis(10)).await;
        contacts.close();
        sleep(Duration::from_millis(10)).await;

        assert!(!driver.is_finished());
        assert_eq!(device.snapshot().status(), LeverStatus::Closed);
        driver.shutdown().await;
    }
}
