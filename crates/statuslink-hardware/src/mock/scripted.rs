//! Scripted bus for transport tests.
//!
//! Replies come from a queue; once the queue is empty every further
//! transaction gets the fallback. Every transaction is recorded so tests can
//! count attempts and inspect the bytes that went out.

use std::collections::VecDeque;

use statuslink_core::BusAddress;
use statuslink_core::constants::RESPONSE_LEN;

use crate::{BusError, Result, traits::Bus};

/// One scripted outcome of a bus transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedReply {
    /// The two bytes read back.
    Reply([u8; RESPONSE_LEN]),

    /// The address was not acknowledged.
    Nack,
}

/// A recorded bus transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transaction {
    pub address: BusAddress,
    pub command: u8,
}

/// Mock bus answering from a script.
///
/// # Examples
///
/// ```
/// use statuslink_core::BusAddress;
/// use statuslink_hardware::mock::{ScriptedBus, ScriptedReply};
/// use statuslink_hardware::traits::Bus;
///
/// let mut bus = ScriptedBus::with_fallback([0x00, 0xFF]);
/// bus.push_reply(ScriptedReply::Nack);
/// bus.push_reply(ScriptedReply::Reply([0x02, 0xFD]));
///
/// assert!(bus.write_read_word(BusAddress::LEVER, 0x90).is_err());
/// assert_eq!(bus.write_read_word(BusAddress::LEVER, 0x90).unwrap(), [0x02, 0xFD]);
/// assert_eq!(bus.write_read_word(BusAddress::LEVER, 0x90).unwrap(), [0x00, 0xFF]);
/// assert_eq!(bus.transaction_count(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct ScriptedBus {
    /// Replies handed out in order
    script: VecDeque<ScriptedReply>,

    /// Reply once the script runs dry
    fallback: ScriptedReply,

    /// Every transaction seen so far
    transactions: Vec<Transaction>,
}

impl ScriptedBus {
    /// Create a bus that NACKs everything not scripted.
    #[must_use]
    pub fn new() -> Self {
        Self {
            script: VecDeque::new(),
            fallback: ScriptedReply::Nack,
            transactions: Vec::new(),
        }
    }

    /// Create a bus that answers `reply` to everything not scripted.
    #[must_use]
    pub fn with_fallback(reply: [u8; RESPONSE_LEN]) -> Self {
        Self {
            fallback: ScriptedReply::Reply(reply),
            ..Self::new()
        }
    }

    /// Queue one outcome.
    pub fn push_reply(&mut self, reply: ScriptedReply) {
        self.script.push_back(reply);
    }

    /// Queue several well-formed-or-not reply pairs.
    pub fn push_replies<I>(&mut self, replies: I)
    where
        I: IntoIterator<Item = [u8; RESPONSE_LEN]>,
    {
        self.script
            .extend(replies.into_iter().map(ScriptedReply::Reply));
    }

    /// Number of queued outcomes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    #[must_use]
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }
}

impl Default for ScriptedBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for ScriptedBus {
    fn write_read_word(&mut self, address: BusAddress, command: u8) -> Result<[u8; RESPONSE_LEN]> {
        self.transactions.push(Transaction { address, command });

        match self.script.pop_front().unwrap_or(self.fallback) {
            ScriptedReply::Reply(bytes) => Ok(bytes),
            ScriptedReply::Nack => Err(BusError::nack(address)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bus_nacks() {
        let mut bus = ScriptedBus::default();
        let result = bus.write_read_word(BusAddress::INDICATOR, 0x90);
        assert!(matches!(
            result,
            Err(BusError::Nack { address }) if address == BusAddress::INDICATOR
        ));
    }

    #[test]
    fn test_script_then_fallback() {
        let mut bus = ScriptedBus::with_fallback([0x01, 0xFE]);
        bus.push_replies([[0x11, 0x22], [0x33, 0x44]]);
        assert_eq!(bus.remaining(), 2);

        assert_eq!(bus.write_read_word(BusAddress::LEVER, 0x00).unwrap(), [0x11, 0x22]);
        assert_eq!(bus.write_read_word(BusAddress::LEVER, 0x00).unwrap(), [0x33, 0x44]);
        assert_eq!(bus.write_read_word(BusAddress::LEVER, 0x00).unwrap(), [0x01, 0xFE]);
        assert_eq!(bus.remaining(), 0);
    }

    #[test]
    fn test_records_transactions() {
        let mut bus = ScriptedBus::with_fallback([0x01, 0xFE]);
        bus.write_read_word(BusAddress::INDICATOR, 0x21).unwrap();
        bus.write_read_word(BusAddress::LEVER, 0x90).unwrap();

        assert_eq!(
            bus.transactions(),
            &[
                Transaction {
                    address: BusAddress::INDICATOR,
                    command: 0x21
                },
                Transaction {
                    address: BusAddress::LEVER,
                    command: 0x90
                },
            ]
        );
    }
}
