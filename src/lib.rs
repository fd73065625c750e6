pub mod config;
pub mod hid;
pub mod notifier;
pub mod startup;
pub mod tray;
