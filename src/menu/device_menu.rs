use tracing::debug;

use crate::bluetooth::device::Device;

use super::picker::Picker;
use super::{log_mutator, Screen, ACTION_BACK};

pub(crate) const ACTION_CONNECT: &str = "󰂲  Connect";
pub(crate) const ACTION_DISCONNECT: &str = "󰂱  Disconnect";
pub(crate) const ACTION_PAIR: &str = "󰌹  Pair";
pub(crate) const ACTION_UNPAIR: &str = "󰌺  Unpair";
pub(crate) const ACTION_TRUST: &str = "󱚩  Trust";
pub(crate) const ACTION_UNTRUST: &str = "󱎚  Untrust";

/// What a device-menu selection means.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum DeviceAction {
    Exit,
    Back,
    Connect,
    Disconnect,
    Pair,
    Unpair,
    Trust,
    Untrust,
    Redraw,
}

/// Each action pair is toggled by the status it changes, so the user sees
/// the new label on the redraw that follows the mutation.
pub(crate) fn options(connected: bool, paired: bool, trusted: bool) -> Vec<String> {
    vec![
        if connected {
            ACTION_DISCONNECT
        } else {
            ACTION_CONNECT
        }
        .to_string(),
        if paired { ACTION_UNPAIR } else { ACTION_PAIR }.to_string(),
        if trusted { ACTION_UNTRUST } else { ACTION_TRUST }.to_string(),
        ACTION_BACK.to_string(),
    ]
}

pub(crate) fn action_for(selection: &str) -> DeviceAction {
    match selection {
        "" => DeviceAction::Exit,
        ACTION_BACK => DeviceAction::Back,
        ACTION_CONNECT => DeviceAction::Connect,
        ACTION_DISCONNECT => DeviceAction::Disconnect,
        ACTION_PAIR => DeviceAction::Pair,
        ACTION_UNPAIR => DeviceAction::Unpair,
        ACTION_TRUST => DeviceAction::Trust,
        ACTION_UNTRUST => DeviceAction::Untrust,
        _ => DeviceAction::Redraw,
    }
}

pub(crate) async fn show(picker: &Picker, device: Device) -> Screen {
    let connected = device.is_connected().await;
    let paired = device.is_paired().await;
    let trusted = device.is_trusted().await;

    let selection = picker
        .prompt(&options(connected, paired, trusted), &device.name)
        .await;

    match action_for(&selection) {
        DeviceAction::Exit => Screen::Exit,
        DeviceAction::Back => Screen::Main,
        DeviceAction::Connect => {
            log_mutator("connect", device.connect().await);
            Screen::Device(device)
        }
        DeviceAction::Disconnect => {
            log_mutator("disconnect", device.disconnect().await);
            Screen::Device(device)
        }
        DeviceAction::Pair => {
            log_mutator("pair", device.pair().await);
            Screen::Device(device)
        }
        DeviceAction::Unpair => {
            log_mutator("unpair", device.unpair().await);
            Screen::Device(device)
        }
        DeviceAction::Trust => {
            log_mutator("trust", device.trust().await);
            Screen::Device(device)
        }
        DeviceAction::Untrust => {
            log_mutator("untrust", device.untrust().await);
            Screen::Device(device)
        }
        DeviceAction::Redraw => {
            debug!("unrecognized selection: {:?}", selection);
            Screen::Device(device)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::super::testing::device_with_runner;
    use super::*;
    use crate::bluetooth::device::DeviceStatus;
    use crate::command::fake::FakeRunner;
    use crate::config::AppConfig;

    #[test]
    fn test_options_toggle_against_current_status() {
        // Connected and paired but not trusted: each action inverts.
        assert_eq!(
            options(true, true, false),
            vec![ACTION_DISCONNECT, ACTION_UNPAIR, ACTION_TRUST, ACTION_BACK]
        );
        assert_eq!(
            options(false, false, true),
            vec![ACTION_CONNECT, ACTION_PAIR, ACTION_UNTRUST, ACTION_BACK]
        );
    }

    #[test]
    fn test_every_label_is_recognized() {
        for connected in [false, true] {
            for paired in [false, true] {
                for trusted in [false, true] {
                    for label in options(connected, paired, trusted) {
                        assert_ne!(
                            action_for(&label),
                            DeviceAction::Redraw,
                            "label {:?} fell through dispatch",
                            label
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_cancel_exits() {
        assert_eq!(action_for(""), DeviceAction::Exit);
    }

    #[tokio::test]
    async fn test_status_action_mutates_then_redraws_same_screen() {
        let runner = Arc::new(FakeRunner::new().with_output(
            "bluetoothctl info AA:AA:AA:AA:AA:AA",
            "Device AA:AA:AA:AA:AA:AA (public)\n\tConnected: yes\n\tPaired: yes\n\tTrusted: no\n",
        ));
        let dev = device_with_runner(
            "JBL Flip 5",
            "AA:AA:AA:AA:AA:AA",
            DeviceStatus::Connected,
            runner.clone(),
        );
        let picker = Picker::new(runner.clone(), &AppConfig::default());
        // Connected, so the menu offers Disconnect.
        runner.push_selection(Some(ACTION_DISCONNECT));

        let next = show(&picker, dev).await;

        assert!(matches!(next, Screen::Device(_)));
        assert!(runner
            .calls()
            .contains(&"bluetoothctl disconnect AA:AA:AA:AA:AA:AA".to_string()));
    }

    #[tokio::test]
    async fn test_trust_action_inverts_untrusted_state() {
        let runner = Arc::new(FakeRunner::new().with_output(
            "bluetoothctl info AA:AA:AA:AA:AA:AA",
            "Device AA:AA:AA:AA:AA:AA (public)\n\tConnected: yes\n\tPaired: yes\n\tTrusted: no\n",
        ));
        let dev = device_with_runner(
            "JBL Flip 5",
            "AA:AA:AA:AA:AA:AA",
            DeviceStatus::Connected,
            runner.clone(),
        );
        let picker = Picker::new(runner.clone(), &AppConfig::default());
        runner.push_selection(Some(ACTION_TRUST));

        let _ = show(&picker, dev).await;
        assert!(runner
            .calls()
            .contains(&"bluetoothctl trust AA:AA:AA:AA:AA:AA".to_string()));
    }

    #[tokio::test]
    async fn test_back_returns_to_main() {
        let runner = Arc::new(FakeRunner::new());
        let dev = device_with_runner(
            "JBL Flip 5",
            "AA:AA:AA:AA:AA:AA",
            DeviceStatus::Paired,
            runner.clone(),
        );
        let picker = Picker::new(runner.clone(), &AppConfig::default());
        runner.push_selection(Some(ACTION_BACK));

        let next = show(&picker, dev).await;
        assert!(matches!(next, Screen::Main));
    }
}
