//! Device listings scraped from `bluetoothctl devices` output.
//!
//! All parsing of the tool's line format lives here, pinned by tests to
//! literal example output, so drift in the format is caught at one boundary.

use tracing::{debug, info};

use super::device::{Device, DeviceStatus};
use super::Controller;
use crate::command::{CommandError, SharedRunner};

/// Every device record line starts with this literal prefix.
const DEVICE_PREFIX: &str = "Device ";

/// Parse listing output into records tagged with `status`.
///
/// A record line is `Device <address> <name>`; the name is everything after
/// the second field and may contain spaces. Lines without the prefix and
/// truncated records are skipped silently.
fn parse_device_lines(output: &str, status: DeviceStatus, runner: &SharedRunner) -> Vec<Device> {
    let mut devices = Vec::new();
    for line in output.lines() {
        if !line.starts_with(DEVICE_PREFIX) {
            continue;
        }
        let mut fields = line.splitn(3, ' ');
        let (Some(_), Some(address), Some(name)) = (fields.next(), fields.next(), fields.next())
        else {
            debug!("skipping malformed device line: {}", line);
            continue;
        };
        devices.push(Device::new(name, address, line, status, runner.clone()));
    }
    devices
}

impl Controller {
    async fn list(&self, args: &[&str], status: DeviceStatus) -> Result<Vec<Device>, CommandError> {
        let output = self.runner().run("bluetoothctl", args).await?;
        let devices = parse_device_lines(&output, status, self.runner());
        debug!("{:?} listing returned {} devices", args, devices.len());
        Ok(devices)
    }

    /// Every device the controller knows about, paired or merely seen.
    pub async fn all_devices(&self) -> Result<Vec<Device>, CommandError> {
        self.list(&["devices"], DeviceStatus::Discovered).await
    }

    pub async fn connected_devices(&self) -> Result<Vec<Device>, CommandError> {
        self.list(&["devices", "Connected"], DeviceStatus::Connected)
            .await
    }

    pub async fn paired_devices(&self) -> Result<Vec<Device>, CommandError> {
        self.list(&["devices", "Paired"], DeviceStatus::Paired).await
    }

    pub async fn trusted_devices(&self) -> Result<Vec<Device>, CommandError> {
        self.list(&["devices", "Trusted"], DeviceStatus::Trusted)
            .await
    }

    /// Connected ∪ paired ∪ trusted, one record per address. The first
    /// listing consulted wins, so a connected record shadows its paired and
    /// trusted duplicates.
    pub async fn known_devices(&self) -> Result<Vec<Device>, CommandError> {
        let mut known: Vec<Device> = Vec::new();
        for list in [
            self.connected_devices().await?,
            self.paired_devices().await?,
            self.trusted_devices().await?,
        ] {
            for device in list {
                if !known.contains(&device) {
                    known.push(device);
                }
            }
        }
        info!("{} known devices", known.len());
        Ok(known)
    }

    /// Devices visible in the general listing that are not yet known.
    pub async fn unknown_devices(&self) -> Result<Vec<Device>, CommandError> {
        let known = self.known_devices().await?;
        let devices = self
            .all_devices()
            .await?
            .into_iter()
            .filter(|device| !known.contains(device))
            .collect();
        Ok(devices)
    }

    /// Devices visible in the general listing but not paired. Only
    /// meaningful while a scan is filling the general listing.
    pub async fn discovered_devices(&self) -> Result<Vec<Device>, CommandError> {
        let paired = self.paired_devices().await?;
        let devices = self
            .all_devices()
            .await?
            .into_iter()
            .filter(|device| !paired.contains(device))
            .collect();
        Ok(devices)
    }
}
