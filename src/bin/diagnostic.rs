//! Console diagnostic for the Infinity dongle.
//!
//! Performs one battery query against the configured VID/PID, then dumps
//! every connected HID interface so an unrecognized dongle revision can be
//! identified.
//!
//! Usage: cargo run --bin diagnostic

use hidapi::HidApi;

use ambattery::config;
use ambattery::hid::device::{find_device, list_devices, poll_battery, DEFAULT_ATTEMPTS};
use ambattery::hid::report::BatteryReading;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_config().unwrap_or_default();
    let vendor_id = config.target_vendor_id();
    let product_id = config.target_product_id();

    println!("ambattery diagnostic");
    println!(
        "Looking for dongle 0x{:04X}:0x{:04X}...",
        vendor_id, product_id
    );

    let api = HidApi::new()?;

    match find_device(&api, vendor_id, product_id) {
        Some(device) => {
            let reading = poll_battery(&device, DEFAULT_ATTEMPTS)
                .unwrap_or(BatteryReading::unavailable());
            println!("{}", reading);
        }
        None => println!("Device not found."),
    }

    println!("\nAll connected HID interfaces:");
    for summary in list_devices(&api) {
        println!(
            "  {:04x}:{:04x}  usage {:04x}/{:04x}  {}",
            summary.vendor_id,
            summary.product_id,
            summary.usage_page,
            summary.usage,
            summary.product
        );
    }

    Ok(())
}
