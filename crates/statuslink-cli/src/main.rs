//! Statuslink simulation.
//!
//! Puts an emulated indicator and lever on a simulated bus, ticks both
//! devices in the background and runs the host polling loop against them
//! for a fixed script of lever moves and indicator commands.
//!
//! Log verbosity follows `RUST_LOG` (default `info`). A host configuration
//! in JSON can be supplied through the `STATUSLINK_CONFIG` file path.

use std::env;
use std::fs;
use std::time::Duration;

use anyhow::{Context, Result};
use statuslink_emulator::{
    DeviceEvent, Indicator, IndicatorConfig, Lever, LeverConfig, NoInputs, SharedDevice,
    SimulatedContacts, TickDriver,
};
use statuslink_hardware::mock::{NoisyBus, SimulatedBus};
use statuslink_host::{Host, HostConfig};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Lever move and indicator command applied at the start of each cycle.
const SCRIPT: &[(LeverMove, &str)] = &[
    (LeverMove::Close, "red"),
    (LeverMove::Close, "red blink"),
    (LeverMove::Open, "green"),
    (LeverMove::Chatter, "green blink"),
    (LeverMove::Short, "green"),
    (LeverMove::Close, "off"),
];

#[derive(Debug, Clone, Copy)]
enum LeverMove {
    Open,
    Close,
    Short,
    Chatter,
}

fn load_config() -> Result<HostConfig> {
    match env::var("STATUSLINK_CONFIG") {
        Ok(path) => {
            let json = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            HostConfig::from_json_str(&json).with_context(|| format!("loading {path}"))
        }
        Err(_) => Ok(HostConfig::default()),
    }
}

async fn move_lever(contacts: &SimulatedContacts, movement: LeverMove) {
    match movement {
        LeverMove::Open => contacts.open(),
        LeverMove::Close => contacts.close(),
        LeverMove::Short => contacts.short(),
        LeverMove::Chatter => {
            for _ in 0..20 {
                contacts.open();
                tokio::time::sleep(Duration::from_millis(1)).await;
                contacts.release();
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
            contacts.open();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting statuslink simulation v{}", statuslink_core::VERSION);

    let config = load_config()?;
    let indicator_config = IndicatorConfig::default();
    let lever_config = LeverConfig::default();

    let indicator = SharedDevice::new(Indicator::new(&indicator_config));
    let lever = SharedDevice::new(Lever::new(&lever_config));
    let contacts = SimulatedContacts::new();
    let (event_tx, mut event_rx) = mpsc::channel::<DeviceEvent>(16);

    let indicator_driver = TickDriver::spawn(
        indicator.clone(),
        indicator_config.tick_period(),
        NoInputs,
        None,
    );
    let lever_driver = TickDriver::spawn(
        lever.clone(),
        lever_config.tick_period(),
        contacts.clone(),
        Some(event_tx),
    );

    let mut bus = SimulatedBus::new();
    bus.attach(config.indicator_address, indicator.clone());
    bus.attach(config.lever_address, lever.clone());
    let mut host = Host::new(NoisyBus::new(bus).corrupt_every(4).nack_every(7), &config);

    let mut poll = tokio::time::interval(config.poll_interval());
    for (cycle, (movement, command)) in SCRIPT.iter().enumerate() {
        poll.tick().await;
        info!("Cycle {}: lever {:?}, indicator \"{}\"", cycle + 1, movement, command);

        match host.apply_command(command) {
            Ok(event) => info!("{}", event),
            Err(e) => warn!("Indicator command failed: {}", e),
        }
        move_lever(&contacts, *movement).await;

        // Give the debounce time to settle before polling.
        let settle = lever_config.tick_period() * u32::from(lever_config.debounce_threshold) * 2;
        tokio::time::sleep(settle).await;

        while let Ok(event) = event_rx.try_recv() {
            info!("Device event: {}", event);
        }
        match host.poll_lever() {
            Ok(Some(event)) => info!("{}", event),
            Ok(None) => {}
            Err(e) => warn!("Lever poll failed, keeping last known state: {}", e),
        }

        let snapshot = indicator.snapshot();
        info!(
            "Indicator lamps {} (setting {}), lever {} (attention {})",
            snapshot.output(),
            snapshot.setting(),
            lever.snapshot().status(),
            lever.snapshot().attention()
        );
    }

    indicator_driver.shutdown().await;
    lever_driver.shutdown().await;
    info!("Simulation finished");
    Ok(())
}
