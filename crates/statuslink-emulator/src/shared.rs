//! Device state shared between the tick task and the bus.
//!
//! The tick and command dispatch both mutate the same device state. Each of
//! them holds the one lock for its whole body, so a tick never observes a
//! half-applied command and a command never lands in the middle of a tick.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use statuslink_core::constants::RESPONSE_LEN;
use statuslink_hardware::BusTarget;

use crate::firmware::{Firmware, dispatch};

/// Cloneable handle to one device's state.
///
/// # Examples
///
/// ```
/// use statuslink_emulator::{Lever, SharedDevice};
/// use statuslink_hardware::BusTarget;
///
/// let lever = SharedDevice::new(Lever::default());
/// let mut target = lever.clone();
///
/// assert_eq!(target.respond(0x22), [0x01, 0xFE]); // set status 2
/// assert_eq!(lever.snapshot().get_status(), 2);
/// ```
#[derive(Debug)]
pub struct SharedDevice<S> {
    inner: Arc<Mutex<S>>,
}

impl<S> Clone for SharedDevice<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> SharedDevice<S> {
    pub fn new(state: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    /// Run `f` with exclusive access to the state.
    pub fn with<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, S> {
        // Every update is a plain assignment, so a panic while holding the
        // lock cannot leave the state half-written.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: Copy> SharedDevice<S> {
    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> S {
        *self.lock()
    }
}

impl<S: Firmware + Send> BusTarget for SharedDevice<S> {
    fn respond(&mut self, command: u8) -> [u8; RESPONSE_LEN] {
        self.with(|device| dispatch(device, command)).to_bytes()
    }
}
