use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application configuration stored as TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Picker program used for every menu.
    #[serde(default = "default_picker")]
    pub picker: String,
    /// Base arguments passed before the prompt and line count.
    #[serde(default = "default_picker_args")]
    pub picker_args: Vec<String>,
    /// How long a discovery scan runs before it is stopped, in seconds.
    #[serde(default = "default_scan_window")]
    pub scan_window_secs: u64,
    /// Grace period after unblocking a soft-blocked radio, in seconds.
    #[serde(default = "default_power_on_grace")]
    pub power_on_grace_secs: u64,
}

fn default_picker() -> String {
    "wofi".to_string()
}

fn default_picker_args() -> Vec<String> {
    vec!["--dmenu".to_string(), "--insensitive".to_string()]
}

fn default_scan_window() -> u64 {
    8
}

fn default_power_on_grace() -> u64 {
    3
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            picker: default_picker(),
            picker_args: default_picker_args(),
            scan_window_secs: default_scan_window(),
            power_on_grace_secs: default_power_on_grace(),
        }
    }
}

impl AppConfig {
    /// Config file path: ~/.config/btmenu/config.toml
    pub fn path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("btmenu");
        config_dir.join("config.toml")
    }

    /// Load config from disk, or return defaults.
    pub fn load() -> Self {
        let path = Self::path();
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
        }
        Self::default()
    }
}
