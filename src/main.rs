use std::sync::{Arc, Mutex};
use std::time::Instant;

use tokio::time::{interval, Duration};

mod config;
mod hid;
mod notifier;
mod startup;
mod tray;

use config::AppConfig;
use hid::device::DongleMonitor;
use hid::report::BatteryReading;
use notifier::ThresholdNotifier;
use startup::{AutoStart, StartupRegistration};
use tray::{TrayCommand, TrayUpdater};

/// Minimum spacing between hover-triggered polls.
const REFRESH_THROTTLE: Duration = Duration::from_secs(1);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("ambattery - Angry Miao Infinity battery monitor");

    let mut config = config::load_config()?;

    let monitor = DongleMonitor::new(config.target_vendor_id(), config.target_product_id())?;
    let monitor = Arc::new(Mutex::new(monitor));

    let autostart = AutoStart::new()?;
    if let Err(e) = autostart.repair() {
        eprintln!("Warning: could not repair the startup entry: {}", e);
    }

    let mut tray = match tray::create_tray_for_platform(&config, autostart.is_enabled()) {
        Ok(t) => Some(t),
        Err(e) => {
            eprintln!(
                "Warning: could not create a system tray, running headless. Error: {}",
                e
            );
            None
        }
    };

    let mut notifier = ThresholdNotifier::new();

    // Initial reading before the first timer tick.
    if let Some(reading) = poll_once(&monitor).await {
        handle_reading(reading, &mut notifier, &config, tray.as_deref_mut());
    }

    let mut poll_timer = interval(Duration::from_secs(config.poll_interval));
    let mut event_timer = interval(Duration::from_millis(100));
    let mut last_refresh = Instant::now();

    loop {
        tokio::select! {
            _ = poll_timer.tick() => {
                if let Some(reading) = poll_once(&monitor).await {
                    handle_reading(reading, &mut notifier, &config, tray.as_deref_mut());
                }
            },
            _ = event_timer.tick() => {
                let mut refresh_requested = false;

                if let Some(tray) = tray.as_deref_mut() {
                    for command in tray.drain_commands() {
                        match command {
                            TrayCommand::Refresh => refresh_requested = true,
                            TrayCommand::TogglePopup(threshold, enabled) => {
                                config.set_popup(threshold, enabled);
                                if let Err(e) = config::store_config(&config) {
                                    eprintln!("Warning: could not store config: {}", e);
                                }
                            }
                            TrayCommand::ToggleStartup(enabled) => {
                                if let Err(e) = autostart.set_enabled(enabled) {
                                    eprintln!("Warning: could not update the startup entry: {}", e);
                                }
                            }
                            TrayCommand::Exit => return Ok(()),
                        }
                    }
                }

                if refresh_requested && last_refresh.elapsed() >= REFRESH_THROTTLE {
                    last_refresh = Instant::now();
                    if let Some(reading) = poll_once(&monitor).await {
                        handle_reading(reading, &mut notifier, &config, tray.as_deref_mut());
                    }
                }
            },
        }
    }
}

/// Runs one blocking HID exchange off the event loop.
///
/// `try_lock` gives the drop-not-queue semantics: a poll requested while
/// another is still in flight returns `None` instead of piling up behind the
/// device channel.
async fn poll_once(monitor: &Arc<Mutex<DongleMonitor>>) -> Option<BatteryReading> {
    let monitor = Arc::clone(monitor);
    tokio::task::spawn_blocking(move || monitor.try_lock().ok().map(|mut m| m.poll()))
        .await
        .ok()
        .flatten()
}

fn handle_reading(
    reading: BatteryReading,
    notifier: &mut ThresholdNotifier,
    config: &AppConfig,
    tray: Option<&mut (dyn TrayUpdater + 'static)>,
) {
    let event = notifier.update(&reading, &config.popups());

    match tray {
        Some(tray) => {
            tray.update(&reading, notifier.severity());
            if let Some(event) = &event {
                tray.notify(event);
            }
        }
        None => {
            println!("{}", reading);
            if let Some(event) = &event {
                println!("{}: {}", event.title(), event.reading);
            }
        }
    }
}
