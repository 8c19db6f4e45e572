pub mod device;
pub mod registry;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::command::{CommandError, SharedRunner};

const POWERED_MARKER: &str = "Powered: yes";
const DISCOVERING_MARKER: &str = "Discovering: yes";
const PAIRABLE_MARKER: &str = "Pairable: yes";
const DISCOVERABLE_MARKER: &str = "Discoverable: yes";
const RFKILL_BLOCKED_MARKER: &str = "blocked: yes";

struct ScanTask {
    handle: JoinHandle<()>,
    cancel: Arc<Notify>,
}

/// Handle to the local Bluetooth adapter, backed entirely by `bluetoothctl`
/// round trips.
///
/// Nothing is cached: every query re-reads the tool's output, so the daemon
/// stays the single source of truth and there is no staleness to invalidate.
pub struct Controller {
    runner: SharedRunner,
    scan_window: Duration,
    power_on_grace: Duration,
    scan_task: Mutex<Option<ScanTask>>,
}

impl Controller {
    pub fn new(runner: SharedRunner, scan_window: Duration, power_on_grace: Duration) -> Self {
        Self {
            runner,
            scan_window,
            power_on_grace,
            scan_task: Mutex::new(None),
        }
    }

    pub(crate) fn runner(&self) -> &SharedRunner {
        &self.runner
    }

    async fn show_contains(&self, marker: &str) -> bool {
        match self.runner.run("bluetoothctl", &["show"]).await {
            Ok(output) => output.contains(marker),
            Err(e) => {
                warn!("adapter status query failed: {}", e);
                false
            }
        }
    }

    pub async fn is_powered(&self) -> bool {
        self.show_contains(POWERED_MARKER).await
    }

    pub async fn is_pairable(&self) -> bool {
        self.show_contains(PAIRABLE_MARKER).await
    }

    pub async fn is_discoverable(&self) -> bool {
        self.show_contains(DISCOVERABLE_MARKER).await
    }

    /// True while the adapter reports active discovery or our own scan task
    /// is still inside its window.
    pub async fn is_scanning(&self) -> bool {
        if self.show_contains(DISCOVERING_MARKER).await {
            return true;
        }
        self.scan_task
            .lock()
            .await
            .as_ref()
            .is_some_and(|task| !task.handle.is_finished())
    }

    /// Power the adapter on or off. A soft-blocked radio ignores `power on`,
    /// so enabling first unblocks it and waits for the controller to come
    /// back up.
    pub async fn set_power(&self, on: bool) -> Result<(), CommandError> {
        if on {
            let rfkill = self
                .runner
                .run("rfkill", &["list", "bluetooth"])
                .await
                .unwrap_or_default();
            if rfkill.contains(RFKILL_BLOCKED_MARKER) {
                info!("adapter is rfkill-blocked, unblocking");
                self.runner.run("rfkill", &["unblock", "bluetooth"]).await?;
                tokio::time::sleep(self.power_on_grace).await;
            }
        }
        let state = if on { "on" } else { "off" };
        self.runner
            .run("bluetoothctl", &["power", state])
            .await
            .map(|_| ())
    }

    pub async fn set_pairable(&self, on: bool) -> Result<(), CommandError> {
        let state = if on { "on" } else { "off" };
        self.runner
            .run("bluetoothctl", &["pairable", state])
            .await
            .map(|_| ())
    }

    pub async fn set_discoverable(&self, on: bool) -> Result<(), CommandError> {
        let state = if on { "on" } else { "off" };
        self.runner
            .run("bluetoothctl", &["discoverable", state])
            .await
            .map(|_| ())
    }

    /// Start or stop discovery.
    ///
    /// Starting spawns a detached task the menu never awaits: it powers the
    /// adapter on, holds `scan on` open for the configured window, then
    /// issues an explicit `scan off`. Stopping cancels that task and makes
    /// sure discovery is off even when no window is running.
    pub async fn set_scanning(&self, on: bool) -> Result<(), CommandError> {
        if on {
            self.start_scan().await;
            Ok(())
        } else {
            self.stop_scan().await
        }
    }

    async fn start_scan(&self) {
        let mut slot = self.scan_task.lock().await;
        if slot.as_ref().is_some_and(|task| !task.handle.is_finished()) {
            // One scan at a time; the running window keeps collecting.
            return;
        }

        let runner = self.runner.clone();
        let cancel = Arc::new(Notify::new());
        let cancelled = cancel.clone();
        let window = self.scan_window;

        let handle = tokio::spawn(async move {
            if let Err(e) = runner.run("bluetoothctl", &["power", "on"]).await {
                warn!("scan: power on failed: {}", e);
            }
            info!("discovery window open ({:?})", window);
            // `scan on` never exits on its own. The deadline abandons the
            // future and the kill-on-drop child goes with it; cancellation
            // does the same early.
            tokio::select! {
                _ = tokio::time::timeout(window, runner.run("bluetoothctl", &["scan", "on"])) => {}
                _ = cancelled.notified() => {}
            }
            if let Err(e) = runner.run("bluetoothctl", &["scan", "off"]).await {
                warn!("scan: stop discovery failed: {}", e);
            }
            info!("discovery window closed");
        });

        *slot = Some(ScanTask { handle, cancel });
    }

    async fn stop_scan(&self) -> Result<(), CommandError> {
        let task = self.scan_task.lock().await.take();
        match task {
            Some(task) if !task.handle.is_finished() => {
                task.cancel.notify_one();
                // The task issues `scan off` as it winds down.
                let _ = task.handle.await;
                Ok(())
            }
            _ => self
                .runner
                .run("bluetoothctl", &["scan", "off"])
                .await
                .map(|_| ()),
        }
    }
}
