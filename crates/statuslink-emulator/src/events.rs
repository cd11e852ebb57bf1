//! Events raised by emulated devices outside of bus transactions.

use std::fmt;

use serde::{Deserialize, Serialize};
use statuslink_core::LeverStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeviceEvent {
    /// The lever debounce committed a status different from the previous one.
    LeverCommitted { status: LeverStatus },
}

impl fmt::Display for DeviceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceEvent::LeverCommitted { status } => write!(f, "lever committed {status}"),
        }
    }
}
