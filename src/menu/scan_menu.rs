use tracing::{debug, warn};

use crate::bluetooth::device::Device;
use crate::bluetooth::Controller;

use super::picker::Picker;
use super::{find_device, log_mutator, Screen, ACTION_BACK};

pub(crate) const ACTION_REFRESH: &str = "Refresh";
pub(crate) const ACTION_PAIR: &str = "Pair";
pub(crate) const ACTION_PAIR_AND_TRUST: &str = "Pair and Trust";

/// What a discovery-menu selection means.
#[derive(Debug, PartialEq)]
pub(crate) enum ScanAction {
    StopAndBack,
    Refresh,
    Inspect(Device),
    Redraw,
}

/// What a discovered-device selection means.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum DiscoveredAction {
    Pair,
    PairAndTrust,
    Back,
}

pub(crate) fn options(devices: &[Device]) -> Vec<String> {
    let mut options = vec![ACTION_REFRESH.to_string()];
    options.extend(
        devices
            .iter()
            .filter(|device| !device.name.is_empty())
            .map(Device::label),
    );
    options.push(ACTION_BACK.to_string());
    options
}

pub(crate) fn action_for(selection: &str, devices: &[Device]) -> ScanAction {
    match selection {
        // Leaving discovery always winds the scan down.
        "" | ACTION_BACK => ScanAction::StopAndBack,
        ACTION_REFRESH => ScanAction::Refresh,
        other => match find_device(other, devices) {
            Some(device) => ScanAction::Inspect(device.clone()),
            None => ScanAction::Redraw,
        },
    }
}

pub(crate) fn discovered_options() -> Vec<String> {
    vec![
        ACTION_PAIR.to_string(),
        ACTION_PAIR_AND_TRUST.to_string(),
        ACTION_BACK.to_string(),
    ]
}

pub(crate) fn discovered_action_for(selection: &str) -> DiscoveredAction {
    match selection {
        ACTION_PAIR => DiscoveredAction::Pair,
        ACTION_PAIR_AND_TRUST => DiscoveredAction::PairAndTrust,
        // Back and cancel alike return to the main menu.
        _ => DiscoveredAction::Back,
    }
}

pub(crate) async fn show(controller: &Controller, picker: &Picker) -> Screen {
    let devices = controller.unknown_devices().await.unwrap_or_else(|e| {
        warn!("discovery listing failed: {}", e);
        Vec::new()
    });

    let selection = picker.prompt(&options(&devices), "Discovery").await;

    match action_for(&selection, &devices) {
        ScanAction::StopAndBack => {
            log_mutator("scan stop", controller.set_scanning(false).await);
            Screen::Main
        }
        ScanAction::Refresh => Screen::Discovery,
        ScanAction::Inspect(device) => Screen::DiscoveredDevice(device),
        ScanAction::Redraw => {
            debug!("unrecognized selection: {:?}", selection);
            Screen::Discovery
        }
    }
}

pub(crate) async fn show_discovered(picker: &Picker, device: Device) -> Screen {
    let selection = picker.prompt(&discovered_options(), &device.name).await;

    match discovered_action_for(&selection) {
        DiscoveredAction::Pair => {
            log_mutator("pair", device.pair().await);
            Screen::Main
        }
        DiscoveredAction::PairAndTrust => {
            log_mutator("pair", device.pair().await);
            log_mutator("trust", device.trust().await);
            Screen::Main
        }
        DiscoveredAction::Back => Screen::Main,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::super::testing::{device, device_with_runner};
    use super::*;
    use crate::bluetooth::device::DeviceStatus;
    use crate::command::fake::FakeRunner;
    use crate::config::AppConfig;

    #[test]
    fn test_options_wrap_devices_with_refresh_and_back() {
        let devices = vec![
            device("Stranger Thing", "DD:DD:DD:DD:DD:DD", DeviceStatus::Discovered),
            device("", "EE:EE:EE:EE:EE:EE", DeviceStatus::Discovered),
        ];
        let opts = options(&devices);
        assert_eq!(
            opts,
            vec![
                ACTION_REFRESH.to_string(),
                devices[0].label(),
                ACTION_BACK.to_string(),
            ]
        );
    }

    #[test]
    fn test_every_label_is_recognized() {
        let devices = vec![device(
            "Stranger Thing",
            "DD:DD:DD:DD:DD:DD",
            DeviceStatus::Discovered,
        )];
        for label in options(&devices) {
            assert_ne!(
                action_for(&label, &devices),
                ScanAction::Redraw,
                "label {:?} fell through dispatch",
                label
            );
        }
        for label in discovered_options() {
            // Every discovered label maps to a concrete action; Back is the
            // catch-all and also the cancel behavior.
            let _ = discovered_action_for(&label);
        }
    }

    #[test]
    fn test_back_and_cancel_both_stop_the_scan() {
        assert_eq!(action_for("", &[]), ScanAction::StopAndBack);
        assert_eq!(action_for(ACTION_BACK, &[]), ScanAction::StopAndBack);
    }

    #[tokio::test]
    async fn test_leaving_discovery_stops_scanning() {
        let runner = Arc::new(FakeRunner::new());
        let controller = Controller::new(
            runner.clone(),
            Duration::from_millis(20),
            Duration::ZERO,
        );
        let picker = Picker::new(runner.clone(), &AppConfig::default());
        runner.push_selection(Some(ACTION_BACK));

        let next = show(&controller, &picker).await;

        assert!(matches!(next, Screen::Main));
        assert!(runner.calls().contains(&"bluetoothctl scan off".to_string()));
    }

    #[tokio::test]
    async fn test_selecting_a_discovered_device_inspects_it() {
        let runner = Arc::new(
            FakeRunner::new().with_output(
                "bluetoothctl devices",
                "Device DD:DD:DD:DD:DD:DD Stranger Thing\n",
            ),
        );
        let controller = Controller::new(
            runner.clone(),
            Duration::from_millis(20),
            Duration::ZERO,
        );
        let picker = Picker::new(runner.clone(), &AppConfig::default());
        let label = device("Stranger Thing", "DD:DD:DD:DD:DD:DD", DeviceStatus::Discovered).label();
        runner.push_selection(Some(&label));

        let next = show(&controller, &picker).await;
        match next {
            Screen::DiscoveredDevice(dev) => assert_eq!(dev.address, "DD:DD:DD:DD:DD:DD"),
            other => panic!("expected discovered-device screen, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_pair_and_trust_runs_both_then_returns_to_main() {
        let runner = Arc::new(FakeRunner::new());
        let dev = device_with_runner(
            "Stranger Thing",
            "DD:DD:DD:DD:DD:DD",
            DeviceStatus::Discovered,
            runner.clone(),
        );
        let picker = Picker::new(runner.clone(), &AppConfig::default());
        runner.push_selection(Some(ACTION_PAIR_AND_TRUST));

        let next = show_discovered(&picker, dev).await;

        assert!(matches!(next, Screen::Main));
        let calls = runner.calls();
        assert!(calls.contains(&"bluetoothctl pair DD:DD:DD:DD:DD:DD".to_string()));
        assert!(calls.contains(&"bluetoothctl trust DD:DD:DD:DD:DD:DD".to_string()));
    }

    #[tokio::test]
    async fn test_discovered_cancel_returns_to_main_without_pairing() {
        let runner = Arc::new(FakeRunner::new());
        let dev = device_with_runner(
            "Stranger Thing",
            "DD:DD:DD:DD:DD:DD",
            DeviceStatus::Discovered,
            runner.clone(),
        );
        let picker = Picker::new(runner.clone(), &AppConfig::default());
        runner.push_selection(None);

        let next = show_discovered(&picker, dev).await;

        assert!(matches!(next, Screen::Main));
        assert!(!runner
            .calls()
            .iter()
            .any(|call| call.starts_with("bluetoothctl pair")));
    }
}
