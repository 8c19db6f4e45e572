pub mod device_menu;
pub mod main_menu;
pub mod picker;
pub mod scan_menu;

use tracing::warn;

use crate::bluetooth::device::{strip_glyph, Device};
use crate::bluetooth::Controller;
use crate::command::CommandError;
use picker::Picker;

// Sentinels shared across screens.
pub(crate) const ACTION_BACK: &str = "Back";
pub(crate) const ACTION_EXIT: &str = "Exit";

/// Which screen to draw next. Every variant re-derives its options from
/// fresh adapter queries when it is shown; nothing is memoized between
/// redraws.
#[derive(Debug)]
pub enum Screen {
    Main,
    Device(Device),
    Discovery,
    DiscoveredDevice(Device),
    Exit,
}

/// Drive the menu until the user exits or cancels out.
pub async fn run(controller: &Controller, picker: &Picker) {
    let mut screen = Screen::Main;
    loop {
        screen = match screen {
            Screen::Main => main_menu::show(controller, picker).await,
            Screen::Device(device) => device_menu::show(picker, device).await,
            Screen::Discovery => scan_menu::show(controller, picker).await,
            Screen::DiscoveredDevice(device) => scan_menu::show_discovered(picker, device).await,
            Screen::Exit => break,
        };
    }
}

/// Find the device whose name matches a selected label, after stripping the
/// rendered glyph. Names are compared exactly; the caller passes the same
/// list the labels were built from.
pub(crate) fn find_device<'a>(selection: &str, devices: &'a [Device]) -> Option<&'a Device> {
    let name = strip_glyph(selection);
    devices.iter().find(|device| device.name == name)
}

/// Mutators never block the menu; a failure is logged and the screen
/// redraws with whatever state the daemon reports next.
pub(crate) fn log_mutator(action: &str, result: Result<(), CommandError>) {
    if let Err(e) = result {
        warn!("{} failed: {}", action, e);
    }
}
