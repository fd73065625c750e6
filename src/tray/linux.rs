use crate::config::AppConfig;
use crate::hid::report::BatteryReading;
use crate::notifier::{Notification, Severity};
use crate::tray::{TrayCommand, TrayUpdater};

/// Console-only stand-in until a KSNI backend lands. Readings and alerts are
/// printed instead of rendered.
pub struct LinuxTray;

pub fn create_tray(
    _config: &AppConfig,
    _startup_enabled: bool,
) -> Result<LinuxTray, Box<dyn std::error::Error>> {
    Ok(LinuxTray)
}

impl TrayUpdater for LinuxTray {
    fn update(&mut self, reading: &BatteryReading, _severity: Option<Severity>) {
        println!("{}", reading);
    }

    fn notify(&mut self, event: &Notification) {
        println!("{}: {}", event.title(), event.reading);
    }

    fn drain_commands(&mut self) -> Vec<TrayCommand> {
        Vec::new()
    }
}
