//! Host clients against emulated peripherals on a simulated bus.

use std::time::Duration;

use statuslink_core::{
    BusAddress, Color, IndicatorSetting, LeverDescription, LeverPosition, LeverStatus,
};
use statuslink_emulator::{
    Indicator, LampOutput, Lever, LeverConfig, LeverInputs, SharedDevice, SimulatedContacts,
    TickDriver,
};
use statuslink_hardware::mock::{NoisyBus, SimulatedBus};
use statuslink_host::{Host, HostConfig, HostEvent, LeverClient, RetryTransport, TransportError};

const THRESHOLD: u8 = 5;

fn lever() -> SharedDevice<Lever> {
    SharedDevice::new(Lever::new(&LeverConfig {
        debounce_threshold: THRESHOLD,
        ..LeverConfig::default()
    }))
}

struct Rig {
    indicator: SharedDevice<Indicator>,
    lever: SharedDevice<Lever>,
    bus: SimulatedBus,
}

fn rig() -> Rig {
    let indicator = SharedDevice::new(Indicator::default());
    let lever = lever();

    let mut bus = SimulatedBus::new();
    bus.attach(BusAddress::INDICATOR, indicator.clone());
    bus.attach(BusAddress::LEVER, lever.clone());

    Rig { indicator, lever, bus }
}

fn tick_lever(lever: &SharedDevice<Lever>, inputs: LeverInputs, ticks: usize) {
    for _ in 0..ticks {
        lever.with(|l| l.on_tick(inputs));
    }
}

#[test]
fn test_set_then_get_indicator_state() {
    let Rig { indicator, bus, .. } = rig();
    let mut transport = RetryTransport::new(bus);

    assert_eq!(transport.send(BusAddress::INDICATOR, 0x2, 0x2).unwrap(), 0x01);
    let status = transport.send(BusAddress::INDICATOR, 0x1, 0x0).unwrap();

    assert_eq!(status & 0x07, 0x2);
    assert_eq!(status & 0x08, 0);
    assert_eq!(transport.bus().transaction_count(), 2);

    indicator.with(Indicator::on_tick);
    assert_eq!(indicator.snapshot().output(), LampOutput::GREEN);
}

#[test]
fn test_both_lever_inputs_never_change_status() {
    let Rig { lever, bus, .. } = rig();
    let mut host = Host::new(bus, &HostConfig::default());

    tick_lever(&lever, LeverInputs::new(false, true), usize::from(THRESHOLD));
    assert_eq!(host.poll_lever().unwrap(), None);
    assert_eq!(
        host.lever().last_position().map(|p| p.describe()),
        Some(LeverDescription::Closed)
    );

    tick_lever(&lever, LeverInputs::new(true, true), usize::from(THRESHOLD) * 20);
    assert_eq!(lever.snapshot().status(), LeverStatus::Closed);
    assert_eq!(host.poll_lever().unwrap(), None);
}

#[test]
fn test_lever_change_reported_and_attention_released() {
    let Rig { lever, bus, .. } = rig();
    let mut host = Host::new(bus, &HostConfig::default());

    // Unknown decodes as both flags set.
    host.poll_lever().unwrap();
    assert_eq!(
        host.lever().last_position(),
        Some(LeverPosition {
            open: true,
            closed: true
        })
    );

    tick_lever(&lever, LeverInputs::new(true, false), usize::from(THRESHOLD));
    assert!(lever.snapshot().attention().is_asserted());

    match host.poll_lever().unwrap() {
        Some(HostEvent::LeverChanged { description, .. }) => {
            assert_eq!(description, LeverDescription::Open)
        }
        other => panic!("expected lever change, got {other:?}"),
    }
    assert!(!lever.snapshot().attention().is_asserted());
}

#[test]
fn test_converges_on_noisy_bus() {
    let Rig { indicator, bus, .. } = rig();
    let noisy = NoisyBus::new(bus).corrupt_every(2).nack_every(3);
    let mut host = Host::new(noisy, &HostConfig::default());

    for command in ["red", "green blink", "red blink", "off"] {
        let event = host.apply_command(command).unwrap();
        let expected: IndicatorSetting = command.parse().unwrap();
        assert_eq!(event, HostEvent::ColorChanged(expected));
        assert_eq!(host.indicator_setting().unwrap(), expected);
        assert_eq!(indicator.snapshot().setting(), expected);
    }
}

#[test]
fn test_lever_set_status_round_trip() {
    let Rig { lever, bus, .. } = rig();
    let mut transport = RetryTransport::new(bus);
    let client = LeverClient::new(BusAddress::LEVER);

    client.set_status(&mut transport, 2).unwrap();
    assert_eq!(lever.snapshot().status(), LeverStatus::Open);
    assert_eq!(client.get_status(&mut transport).unwrap().describe(), LeverDescription::Open);
}

#[test]
fn test_invalid_lever_status_on_wire_exhausts() {
    let Rig { lever, bus, .. } = rig();
    let mut transport = RetryTransport::new(bus);

    // The device answers an invalid code with the zero sentinel, so the
    // transport keeps retrying until the budget is gone.
    let result = transport.send(BusAddress::LEVER, 0x2, 0x7);
    assert!(matches!(result, Err(TransportError::Exhausted { attempts: 20, .. })));
    assert_eq!(lever.snapshot().status(), LeverStatus::Unknown);
}

#[test]
fn test_missing_peripheral_exhausts() {
    let mut bus = SimulatedBus::new();
    bus.attach(BusAddress::LEVER, lever());
    let mut host = Host::new(bus, &HostConfig::default());

    let result = host.set_indicator(IndicatorSetting::new(Color::Red, false));
    assert!(result.is_err_and(|e| e.is_unreachable()));
}

#[tokio::test(start_paused = true)]
async fn test_polling_with_ticking_lever() {
    let Rig { lever, bus, .. } = rig();
    let contacts = SimulatedContacts::new();
    let driver = TickDriver::spawn(lever.clone(), Duration::from_millis(2), contacts.clone(), None);
    let mut host = Host::new(bus, &HostConfig::default());

    contacts.close();
    tokio::time::sleep(Duration::from_millis(50)).await;
    host.poll_lever().unwrap();

    contacts.open();
    tokio::time::sleep(Duration::from_millis(50)).await;
    let event = host.poll_lever().unwrap();
    assert_eq!(event.map(|e| e.to_string()), Some("lever open".to_string()));

    // Chatter shorter than the debounce window is ignored.
    for _ in 0..10 {
        contacts.close();
        tokio::time::sleep(Duration::from_millis(2)).await;
        contacts.open();
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(host.poll_lever().unwrap(), None);

    driver.shutdown().await;
}
