use std::time::Duration;

use tracing::{debug, warn};

use crate::bluetooth::device::Device;
use crate::bluetooth::Controller;

use super::picker::Picker;
use super::{find_device, log_mutator, Screen, ACTION_EXIT};

pub(crate) const ACTION_ENABLE: &str = "󰂲  Enable Bluetooth";
pub(crate) const ACTION_DISABLE: &str = "󰂯  Disable Bluetooth";
pub(crate) const ACTION_SCAN: &str = "󱉶  Scan";
pub(crate) const ACTION_PAIRABLE_ON: &str = "󰌹  Enable pairable";
pub(crate) const ACTION_PAIRABLE_OFF: &str = "󰌺  Disable pairable";
pub(crate) const ACTION_DISCOVERABLE_ON: &str = "󰈈  Enable discoverable";
pub(crate) const ACTION_DISCOVERABLE_OFF: &str = "󰈉  Disable discoverable";

/// How long to give discovery before the first Discovery draw.
const SCAN_STARTUP_GRACE: Duration = Duration::from_millis(500);

/// What a main-menu selection means.
#[derive(Debug, PartialEq)]
pub(crate) enum MainAction {
    Exit,
    SetPower(bool),
    StartScan,
    SetPairable(bool),
    SetDiscoverable(bool),
    OpenDevice(Device),
    Redraw,
}

/// Build the main-menu labels. Devices come first (connected records carry
/// the connected glyph), then the adapter actions. Toggle labels always
/// offer the opposite of the current flag.
pub(crate) fn options(
    powered: bool,
    devices: &[Device],
    pairable: bool,
    discoverable: bool,
) -> Vec<String> {
    if !powered {
        return vec![ACTION_ENABLE.to_string(), ACTION_EXIT.to_string()];
    }

    let mut options: Vec<String> = devices
        .iter()
        .filter(|device| !device.name.is_empty())
        .map(Device::label)
        .collect();
    options.push(ACTION_SCAN.to_string());
    options.push(ACTION_DISABLE.to_string());
    options.push(
        if pairable {
            ACTION_PAIRABLE_OFF
        } else {
            ACTION_PAIRABLE_ON
        }
        .to_string(),
    );
    options.push(
        if discoverable {
            ACTION_DISCOVERABLE_OFF
        } else {
            ACTION_DISCOVERABLE_ON
        }
        .to_string(),
    );
    options.push(ACTION_EXIT.to_string());
    options
}

pub(crate) fn action_for(selection: &str, devices: &[Device]) -> MainAction {
    match selection {
        "" | ACTION_EXIT => MainAction::Exit,
        ACTION_ENABLE => MainAction::SetPower(true),
        ACTION_DISABLE => MainAction::SetPower(false),
        ACTION_SCAN => MainAction::StartScan,
        ACTION_PAIRABLE_ON => MainAction::SetPairable(true),
        ACTION_PAIRABLE_OFF => MainAction::SetPairable(false),
        ACTION_DISCOVERABLE_ON => MainAction::SetDiscoverable(true),
        ACTION_DISCOVERABLE_OFF => MainAction::SetDiscoverable(false),
        other => match find_device(other, devices) {
            Some(device) => MainAction::OpenDevice(device.clone()),
            None => MainAction::Redraw,
        },
    }
}

pub(crate) async fn show(controller: &Controller, picker: &Picker) -> Screen {
    let powered = controller.is_powered().await;

    let mut devices = Vec::new();
    let mut pairable = false;
    let mut discoverable = false;
    if powered {
        devices = controller.known_devices().await.unwrap_or_else(|e| {
            warn!("device listing failed: {}", e);
            Vec::new()
        });
        // While a scan runs, freshly discovered devices show up alongside
        // the known ones.
        if controller.is_scanning().await {
            let discovered = controller.discovered_devices().await.unwrap_or_else(|e| {
                warn!("discovered listing failed: {}", e);
                Vec::new()
            });
            for device in discovered {
                if !devices.contains(&device) {
                    devices.push(device);
                }
            }
        }
        pairable = controller.is_pairable().await;
        discoverable = controller.is_discoverable().await;
    }

    let selection = picker
        .prompt(
            &options(powered, &devices, pairable, discoverable),
            "Bluetooth",
        )
        .await;

    match action_for(&selection, &devices) {
        MainAction::Exit => Screen::Exit,
        MainAction::SetPower(on) => {
            log_mutator("power toggle", controller.set_power(on).await);
            Screen::Main
        }
        MainAction::StartScan => {
            log_mutator("scan start", controller.set_scanning(true).await);
            // Give discovery a moment to pick up the first advertisements.
            tokio::time::sleep(SCAN_STARTUP_GRACE).await;
            Screen::Discovery
        }
        MainAction::SetPairable(on) => {
            log_mutator("pairable toggle", controller.set_pairable(on).await);
            Screen::Main
        }
        MainAction::SetDiscoverable(on) => {
            log_mutator("discoverable toggle", controller.set_discoverable(on).await);
            Screen::Main
        }
        MainAction::OpenDevice(device) => {
            debug!("selected {}", device.raw_line);
            Screen::Device(device)
        }
        MainAction::Redraw => {
            debug!("unrecognized selection: {:?}", selection);
            Screen::Main
        }
    }
}
