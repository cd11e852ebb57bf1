//! Deterministic noise injection.
//!
//! Wraps any bus and spoils a fixed share of its transactions so retry logic
//! can be exercised without randomness.

use statuslink_core::BusAddress;
use statuslink_core::constants::RESPONSE_LEN;
use tracing::trace;

use crate::{BusError, Result, traits::Bus};

/// Bus wrapper that corrupts or drops every Nth transaction.
///
/// Transactions are counted from 1. With `corrupt_every(3)` the 3rd, 6th,
/// 9th... reply gets bit 0 of its check byte flipped. With `nack_every(n)`
/// the matching transactions never reach the inner bus. When both match the
/// same transaction the NACK wins.
///
/// # Examples
///
/// ```
/// use statuslink_core::BusAddress;
/// use statuslink_hardware::mock::{NoisyBus, ScriptedBus};
/// use statuslink_hardware::traits::Bus;
///
/// let inner = ScriptedBus::with_fallback([0x02, 0xFD]);
/// let mut bus = NoisyBus::new(inner).corrupt_every(2);
///
/// assert_eq!(bus.write_read_word(BusAddress::LEVER, 0x90).unwrap(), [0x02, 0xFD]);
/// assert_eq!(bus.write_read_word(BusAddress::LEVER, 0x90).unwrap(), [0x02, 0xFC]);
/// ```
#[derive(Debug)]
pub struct NoisyBus<B> {
    inner: B,
    corrupt_every: Option<usize>,
    nack_every: Option<usize>,
    count: usize,
}

impl<B: Bus> NoisyBus<B> {
    /// Wrap `inner` without any noise configured.
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            corrupt_every: None,
            nack_every: None,
            count: 0,
        }
    }

    /// Corrupt every `n`th reply. `0` disables corruption.
    #[must_use]
    pub fn corrupt_every(mut self, n: usize) -> Self {
        self.corrupt_every = (n > 0).then_some(n);
        self
    }

    /// Drop every `n`th transaction with a NACK. `0` disables dropping.
    #[must_use]
    pub fn nack_every(mut self, n: usize) -> Self {
        self.nack_every = (n > 0).then_some(n);
        self
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut B {
        &mut self.inner
    }

    pub fn into_inner(self) -> B {
        self.inner
    }

    fn hits(every: Option<usize>, count: usize) -> bool {
        every.is_some_and(|n| count % n == 0)
    }
}

impl<B: Bus> Bus for NoisyBus<B> {
    fn write_read_word(&mut self, address: BusAddress, command: u8) -> Result<[u8; RESPONSE_LEN]> {
        self.count += 1;

        if Self::hits(self.nack_every, self.count) {
            trace!("noise: dropping transaction {} to {}", self.count, address);
            return Err(BusError::nack(address));
        }

        let mut reply = self.inner.write_read_word(address, command)?;
        if Self::hits(self.corrupt_every, self.count) {
            trace!("noise: corrupting reply {} from {}", self.count, address);
            reply[1] ^= 0x01;
        }
        Ok(reply)
    }
}
