use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::command::{CommandError, CommandRunner};

/// How a device record was obtained. Not a canonical lifecycle state: the
/// same physical device can show up as separate records with different tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceStatus {
    Connected,
    Paired,
    Trusted,
    Discovered,
}

/// Coarse device category. Only used to pick a display glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    Phone,
    Headphones,
    Laptop,
    Tv,
    Controller,
    Generic,
}

pub const GLYPH_CONNECTED: &str = "󰂱";
const GLYPH_PHONE: &str = "\u{eadb}";
const GLYPH_HEADPHONES: &str = "󰋋";
const GLYPH_LAPTOP: &str = "\u{f109}";
const GLYPH_TV: &str = "󰍹";
const GLYPH_CONTROLLER: &str = "󰊴";
const GLYPH_GENERIC: &str = "󰾰";

const ALL_GLYPHS: [&str; 7] = [
    GLYPH_CONNECTED,
    GLYPH_PHONE,
    GLYPH_HEADPHONES,
    GLYPH_LAPTOP,
    GLYPH_TV,
    GLYPH_CONTROLLER,
    GLYPH_GENERIC,
];

impl DeviceKind {
    /// Guess a category from the advertised name. Best effort; anything
    /// unrecognized stays Generic.
    pub fn from_name(name: &str) -> Self {
        let name = name.to_lowercase();
        let has = |needles: &[&str]| needles.iter().any(|n| name.contains(n));

        // Headphone names often carry a phone brand ("Galaxy Buds"), so
        // they are checked first.
        if has(&["buds", "airpods", "headphone", "headset", "earphone", "wh-", "wf-"]) {
            DeviceKind::Headphones
        } else if has(&["phone", "pixel", "iphone", "galaxy"]) {
            DeviceKind::Phone
        } else if has(&["book", "laptop", "thinkpad"]) {
            DeviceKind::Laptop
        } else if has(&["tv", "bravia"]) {
            DeviceKind::Tv
        } else if has(&["controller", "gamepad", "dualshock", "dualsense", "joy-con"]) {
            DeviceKind::Controller
        } else {
            DeviceKind::Generic
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            DeviceKind::Phone => GLYPH_PHONE,
            DeviceKind::Headphones => GLYPH_HEADPHONES,
            DeviceKind::Laptop => GLYPH_LAPTOP,
            DeviceKind::Tv => GLYPH_TV,
            DeviceKind::Controller => GLYPH_CONTROLLER,
            DeviceKind::Generic => GLYPH_GENERIC,
        }
    }
}

/// Strip a leading device glyph (and the whitespace after it) from a menu
/// label, leaving the bare device name. Labels without a glyph pass through.
pub(crate) fn strip_glyph(label: &str) -> &str {
    for glyph in ALL_GLYPHS {
        if let Some(rest) = label.strip_prefix(glyph) {
            return rest.trim_start();
        }
    }
    label
}

/// A remote Bluetooth device as reported by one listing or info query.
///
/// Records are snapshots: the address is the only stable key, and mutators
/// just issue a command — callers re-query to observe the new state.
#[derive(Clone)]
pub struct Device {
    pub name: String,
    pub address: String,
    /// Original unparsed line, kept for diagnostics.
    pub raw_line: String,
    pub status: DeviceStatus,
    pub kind: DeviceKind,
    runner: Arc<dyn CommandRunner>,
}

impl PartialEq for Device {
    /// Two records are the same device iff their addresses match. Names are
    /// neither unique nor stable.
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("name", &self.name)
            .field("address", &self.address)
            .field("status", &self.status)
            .field("kind", &self.kind)
            .finish()
    }
}

impl Device {
    pub(crate) fn new(
        name: &str,
        address: &str,
        raw_line: &str,
        status: DeviceStatus,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            name: name.to_string(),
            address: address.to_string(),
            raw_line: raw_line.to_string(),
            status,
            kind: DeviceKind::from_name(name),
            runner,
        }
    }

    /// Menu label. A connected record always gets the connected glyph,
    /// otherwise the kind glyph.
    pub fn label(&self) -> String {
        let glyph = if self.status == DeviceStatus::Connected {
            GLYPH_CONNECTED
        } else {
            self.kind.glyph()
        };
        format!("{}  {}", glyph, self.name)
    }

    async fn info_contains(&self, marker: &str) -> bool {
        match self.runner.run("bluetoothctl", &["info", &self.address]).await {
            Ok(output) => output.contains(marker),
            Err(e) => {
                warn!("info query for {} failed: {}", self.address, e);
                false
            }
        }
    }

    pub async fn is_connected(&self) -> bool {
        self.info_contains("Connected: yes").await
    }

    pub async fn is_paired(&self) -> bool {
        self.info_contains("Paired: yes").await
    }

    pub async fn is_trusted(&self) -> bool {
        self.info_contains("Trusted: yes").await
    }

    async fn device_command(&self, action: &str) -> Result<(), CommandError> {
        self.runner
            .run("bluetoothctl", &[action, &self.address])
            .await
            .map(|_| ())
    }

    pub async fn connect(&self) -> Result<(), CommandError> {
        self.device_command("connect").await
    }

    pub async fn disconnect(&self) -> Result<(), CommandError> {
        self.device_command("disconnect").await
    }

    pub async fn pair(&self) -> Result<(), CommandError> {
        self.device_command("pair").await
    }

    /// `bluetoothctl` spells unpairing `remove`.
    pub async fn unpair(&self) -> Result<(), CommandError> {
        self.device_command("remove").await
    }

    pub async fn trust(&self) -> Result<(), CommandError> {
        self.device_command("trust").await
    }

    pub async fn untrust(&self) -> Result<(), CommandError> {
        self.device_command("untrust").await
    }
}
