//! Address-routing simulated bus.
//!
//! Emulated peripherals register under their address; each transaction is
//! handed to the target at the requested address. Nothing registered there
//! means nobody acknowledges, just like on real wires.

use std::collections::HashMap;
use std::fmt;

use statuslink_core::BusAddress;
use statuslink_core::constants::RESPONSE_LEN;
use tracing::trace;

use crate::{
    BusError, Result,
    traits::{Bus, BusTarget},
};

/// Simulated shared bus.
///
/// # Examples
///
/// ```
/// use statuslink_core::BusAddress;
/// use statuslink_hardware::mock::SimulatedBus;
/// use statuslink_hardware::traits::{Bus, FnTarget};
///
/// let mut bus = SimulatedBus::new();
/// bus.attach(BusAddress::LEVER, FnTarget(|_command: u8| [0x03, 0xFC]));
///
/// assert_eq!(bus.write_read_word(BusAddress::LEVER, 0x90).unwrap(), [0x03, 0xFC]);
/// assert!(bus.write_read_word(BusAddress::INDICATOR, 0x90).is_err());
/// ```
#[derive(Default)]
pub struct SimulatedBus {
    targets: HashMap<BusAddress, Box<dyn BusTarget>>,
    transactions: usize,
}

impl SimulatedBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect a target at `address`, replacing whatever was there.
    pub fn attach<T>(&mut self, address: BusAddress, target: T)
    where
        T: BusTarget + 'static,
    {
        self.targets.insert(address, Box::new(target));
    }

    /// Disconnect the target at `address`. Returns whether one was attached.
    pub fn detach(&mut self, address: BusAddress) -> bool {
        self.targets.remove(&address).is_some()
    }

    #[must_use]
    pub fn is_attached(&self, address: BusAddress) -> bool {
        self.targets.contains_key(&address)
    }

    /// Total transactions issued, including unanswered ones.
    #[must_use]
    pub fn transaction_count(&self) -> usize {
        self.transactions
    }
}

impl fmt::Debug for SimulatedBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut addresses: Vec<_> = self.targets.keys().copied().collect();
        addresses.sort();
        f.debug_struct("SimulatedBus")
            .field("targets", &addresses)
            .field("transactions", &self.transactions)
            .finish()
    }
}

impl Bus for SimulatedBus {
    fn write_read_word(&mut self, address: BusAddress, command: u8) -> Result<[u8; RESPONSE_LEN]> {
        self.transactions += 1;

        let target = self
            .targets
            .get_mut(&address)
            .ok_or_else(|| BusError::nack(address))?;
        let reply = target.respond(command);

        trace!(
            "{} <- 0x{:02X}, reply [0x{:02X} 0x{:02X}]",
            address, command, reply[0], reply[1]
        );
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::FnTarget;

    #[test]
    fn test_routes_by_address() {
        let mut bus = SimulatedBus::new();
        bus.attach(BusAddress::INDICATOR, FnTarget(|_: u8| [0x80, 0x7F]));
        bus.attach(BusAddress::LEVER, FnTarget(|_: u8| [0x02, 0xFD]));

        assert_eq!(bus.write_read_word(BusAddress::INDICATOR, 0x90).unwrap(), [0x80, 0x7F]);
        assert_eq!(bus.write_read_word(BusAddress::LEVER, 0x90).unwrap(), [0x02, 0xFD]);
        assert_eq!(bus.transaction_count(), 2);
    }

    #[test]
    fn test_target_sees_raw_command() {
        let mut bus = SimulatedBus::new();
        bus.attach(BusAddress::LEVER, FnTarget(|command: u8| [command, !command]));

        assert_eq!(bus.write_read_word(BusAddress::LEVER, 0xA9).unwrap(), [0xA9, 0x56]);
    }

    #[test]
    fn test_unattached_address_nacks() {
        let mut bus = SimulatedBus::new();
        bus.attach(BusAddress::LEVER, FnTarget(|_: u8| [0x01, 0xFE]));
        assert!(bus.detach(BusAddress::LEVER));
        assert!(!bus.is_attached(BusAddress::LEVER));

        let result = bus.write_read_word(BusAddress::LEVER, 0x90);
        assert!(matches!(result, Err(BusError::Nack { .. })));
        assert_eq!(bus.transaction_count(), 1);
    }
}
