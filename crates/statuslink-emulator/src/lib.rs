//! Statuslink device emulator.
//!
//! Software models of the two bus peripherals: the tri-color [`Indicator`]
//! and the debounced [`Lever`] switch. Each device is a plain `Copy` state
//! struct that implements [`Firmware`] for bus commands and [`Tick`] for
//! its periodic timer. [`SharedDevice`] puts one device behind a single lock
//! so it can sit on a simulated bus while a [`TickDriver`] ticks it.
//!
//! ```
//! use statuslink_core::BusAddress;
//! use statuslink_emulator::{Indicator, SharedDevice};
//! use statuslink_hardware::mock::SimulatedBus;
//! use statuslink_hardware::traits::Bus;
//!
//! let indicator = SharedDevice::new(Indicator::default());
//! let mut bus = SimulatedBus::new();
//! bus.attach(BusAddress::INDICATOR, indicator.clone());
//!
//! assert_eq!(bus.write_read_word(BusAddress::INDICATOR, 0x21).unwrap(), [0x01, 0xFE]);
//! assert_eq!(indicator.snapshot().get_state(), 0x81);
//! ```

pub mod config;
pub mod debounce;
pub mod driver;
pub mod events;
pub mod firmware;
pub mod indicator;
pub mod lever;
pub mod shared;

pub use config::{IndicatorConfig, LeverConfig};
pub use debounce::Debouncer;
pub use driver::{InputSource, NoInputs, SimulatedContacts, TaskTermination, Tick, TickDriver};
pub use events::DeviceEvent;
pub use firmware::{Firmware, dispatch};
pub use indicator::{Indicator, LampOutput};
pub use lever::{Lever, LeverInputs};
pub use shared::SharedDevice;
