//! Decoded events handed to whatever publishes the host's view of the world.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use statuslink_core::{IndicatorSetting, LeverDescription, LeverPosition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// The indicator accepted a new setting.
    ColorChanged(IndicatorSetting),

    /// The lever's decoded position differs from the last poll.
    LeverChanged {
        position: LeverPosition,
        description: LeverDescription,
        at: DateTime<Utc>,
    },
}

impl HostEvent {
    #[must_use]
    pub fn lever_changed(position: LeverPosition) -> Self {
        HostEvent::LeverChanged {
            position,
            description: position.describe(),
            at: Utc::now(),
        }
    }
}

impl fmt::Display for HostEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostEvent::ColorChanged(setting) => write!(f, "indicator set to {setting}"),
            HostEvent::LeverChanged { description, .. } => write!(f, "lever {description}"),
        }
    }
}
