//! Host side of the statuslink bus.
//!
//! This crate turns the single bus primitive into reliable peripheral
//! access. [`RetryTransport`] repeats each command frame until a reply
//! passes the complement check with a non-zero status, and the clients on
//! top of it speak the indicator and lever command sets.
//!
//! # Components
//!
//! - **RetryTransport**: bounded retry loop over any [`Bus`](statuslink_hardware::Bus)
//! - **IndicatorClient**: reset, read and set the indicator color/blink
//! - **LeverClient**: reset, read and set the lever status
//! - **LeverMonitor**: poll the lever and report position changes
//! - **Host**: both clients on one transport, driven by the polling loop
//!
//! # Example
//!
//! ```
//! use statuslink_core::BusAddress;
//! use statuslink_emulator::{Indicator, SharedDevice};
//! use statuslink_hardware::mock::SimulatedBus;
//! use statuslink_host::{Host, HostConfig};
//!
//! let mut bus = SimulatedBus::new();
//! bus.attach(BusAddress::INDICATOR, SharedDevice::new(Indicator::default()));
//!
//! let mut host = Host::new(bus, &HostConfig::default());
//! host.apply_command("green blink").unwrap();
//! assert_eq!(host.indicator_setting().unwrap().to_string(), "green blink");
//! ```

pub mod config;
pub mod events;
pub mod host;
pub mod indicator;
pub mod lever;
pub mod transport;

pub use config::{HostConfig, TransportConfig};
pub use events::HostEvent;
pub use host::Host;
pub use indicator::IndicatorClient;
pub use lever::{LeverClient, LeverMonitor};
pub use transport::{Result, RetryTransport, TransportError};
