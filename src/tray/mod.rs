#[cfg(target_os = "linux")]
pub mod linux;
#[cfg(target_os = "macos")]
pub mod macos;
#[cfg(target_os = "windows")]
pub mod windows;

use crate::config::AppConfig;
use crate::hid::report::BatteryReading;
use crate::notifier::{Notification, Severity};

/// User interactions collected from the tray, drained by the main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayCommand {
    /// Hover or double-click; the main loop throttles these to one poll per
    /// second.
    Refresh,
    /// A popup checkbox flipped: (threshold, new state).
    TogglePopup(u8, bool),
    /// The start-on-login checkbox flipped.
    ToggleStartup(bool),
    Exit,
}

pub trait TrayUpdater {
    /// Refreshes icon text and tooltip. Severity reflects the worst
    /// threshold currently below water and tints the rendered percentage.
    fn update(&mut self, reading: &BatteryReading, severity: Option<Severity>);

    /// Surfaces one low-battery alert.
    fn notify(&mut self, event: &Notification);

    /// Returns the interactions that happened since the last call.
    fn drain_commands(&mut self) -> Vec<TrayCommand>;
}

#[cfg(target_os = "windows")]
pub fn create_tray_for_platform(
    config: &AppConfig,
    startup_enabled: bool,
) -> Result<Box<dyn TrayUpdater>, Box<dyn std::error::Error>> {
    windows::create_tray(config, startup_enabled).map(|tray| Box::new(tray) as Box<dyn TrayUpdater>)
}

#[cfg(target_os = "linux")]
pub fn create_tray_for_platform(
    config: &AppConfig,
    startup_enabled: bool,
) -> Result<Box<dyn TrayUpdater>, Box<dyn std::error::Error>> {
    linux::create_tray(config, startup_enabled).map(|tray| Box::new(tray) as Box<dyn TrayUpdater>)
}

#[cfg(target_os = "macos")]
pub fn create_tray_for_platform(
    config: &AppConfig,
    startup_enabled: bool,
) -> Result<Box<dyn TrayUpdater>, Box<dyn std::error::Error>> {
    macos::create_tray(config, startup_enabled).map(|tray| Box::new(tray) as Box<dyn TrayUpdater>)
}

#[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
pub fn create_tray_for_platform(
    _config: &AppConfig,
    _startup_enabled: bool,
) -> Result<Box<dyn TrayUpdater>, Box<dyn std::error::Error>> {
    Err("Unsupported platform".into())
}
