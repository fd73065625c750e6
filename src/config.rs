use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::hid::device;
use crate::notifier::PopupSettings;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Seconds between scheduled battery polls.
    pub poll_interval: u64,
    pub popup_30: bool,
    pub popup_20: bool,
    pub popup_10: bool,
    /// Override the dongle VID/PID for future hardware revisions.
    pub vendor_id: Option<u16>,
    pub product_id: Option<u16>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            poll_interval: 10,
            popup_30: true,
            popup_20: true,
            popup_10: true,
            vendor_id: None,
            product_id: None,
        }
    }
}

impl AppConfig {
    pub fn popups(&self) -> PopupSettings {
        PopupSettings {
            popup_30: self.popup_30,
            popup_20: self.popup_20,
            popup_10: self.popup_10,
        }
    }

    /// Flips the popup switch for one warning threshold. Unknown thresholds
    /// (including the critical one) are ignored.
    pub fn set_popup(&mut self, threshold: u8, enabled: bool) {
        match threshold {
            30 => self.popup_30 = enabled,
            20 => self.popup_20 = enabled,
            10 => self.popup_10 = enabled,
            _ => {}
        }
    }

    pub fn target_vendor_id(&self) -> u16 {
        self.vendor_id.unwrap_or(device::VENDOR_ID)
    }

    pub fn target_product_id(&self) -> u16 {
        self.product_id.unwrap_or(device::PRODUCT_ID)
    }
}

pub fn get_config_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base = dirs::config_dir().ok_or("Could not determine config directory")?;
    Ok(base.join("ambattery"))
}

/// Loads `config.toml`, writing one with defaults on first run.
pub fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    let config_path = get_config_dir()?.join("config.toml");

    if !config_path.exists() {
        let default_config = AppConfig::default();
        store_config(&default_config)?;
        println!("Created default config file at: {:?}", config_path);
        return Ok(default_config);
    }

    let config_str = fs::read_to_string(&config_path)?;
    let config: AppConfig = toml::from_str(&config_str)?;
    validate_config(&config)?;
    Ok(config)
}

/// Writes the config back, e.g. after a tray menu toggle.
pub fn store_config(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = get_config_dir()?;
    fs::create_dir_all(&config_dir)?;

    let config_str = toml::to_string(config)?;
    fs::write(config_dir.join("config.toml"), config_str)?;
    Ok(())
}

pub fn validate_config(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    if config.poll_interval < 1 {
        return Err("poll_interval must be at least 1 second".into());
    }
    if config.poll_interval > 3600 {
        return Err("poll_interval must be at most 3600 seconds".into());
    }
    Ok(())
}
