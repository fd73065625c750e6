use std::cmp::Reverse;
use std::io;
use std::thread;
use std::time::Duration;

use hidapi::{HidApi, HidDevice, HidError};

use crate::hid::report::{decode_battery, init_buffer, query_buffer, BatteryReading, FeatureBuffer};

/// Default VID/PID of the Infinity 2.4 GHz dongle. The shipped dongle
/// revision enumerates with these ids; `config.toml` can override them.
pub const VENDOR_ID: u16 = 0x3554;
pub const PRODUCT_ID: u16 = 0xF508;

pub const DEFAULT_ATTEMPTS: u32 = 3;

/// Time the firmware needs to populate its response after the init report.
const SETTLE_DELAY: Duration = Duration::from_millis(20);

/// Feature-report channel to one open device.
///
/// `hidapi::HidDevice` is the production implementation; tests script their
/// own. Both calls are blocking.
pub trait FeatureTransport {
    fn send_feature(&self, buffer: &FeatureBuffer) -> io::Result<()>;
    fn recv_feature(&self, buffer: &mut FeatureBuffer) -> io::Result<()>;
}

impl FeatureTransport for HidDevice {
    fn send_feature(&self, buffer: &FeatureBuffer) -> io::Result<()> {
        self.send_feature_report(buffer).map_err(io_error)
    }

    fn recv_feature(&self, buffer: &mut FeatureBuffer) -> io::Result<()> {
        self.get_feature_report(buffer).map(|_| ()).map_err(io_error)
    }
}

fn io_error(err: HidError) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err.to_string())
}

/// Performs one battery query against an open channel.
///
/// Each attempt writes the init report, waits for the firmware to settle,
/// reads the query report back and decodes it. Write failures, read failures
/// and stale report ids all count as one spent attempt. The first clean
/// decode wins; `None` means every attempt failed and the caller should treat
/// the battery state as temporarily unknown, not the device as removed.
pub fn poll_battery(device: &impl FeatureTransport, max_attempts: u32) -> Option<BatteryReading> {
    for _ in 0..max_attempts {
        if device.send_feature(&init_buffer()).is_err() {
            continue;
        }

        thread::sleep(SETTLE_DELAY);

        let mut response = query_buffer();
        if device.recv_feature(&mut response).is_err() {
            continue;
        }

        if let Ok(reading) = decode_battery(&response) {
            return Some(reading);
        }
    }

    None
}

/// One connected HID interface, as shown by the diagnostic listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSummary {
    pub vendor_id: u16,
    pub product_id: u16,
    pub usage_page: u16,
    pub usage: u16,
    pub product: String,
}

/// Opens the dongle's vendor interface.
///
/// A wireless mouse exposes several HID interfaces for the same VID/PID;
/// the feature exchange only works on the vendor-defined one, so candidates
/// are tried highest usage page first.
pub fn find_device(api: &HidApi, vendor_id: u16, product_id: u16) -> Option<HidDevice> {
    let mut candidates: Vec<_> = api
        .device_list()
        .filter(|info| info.vendor_id() == vendor_id && info.product_id() == product_id)
        .collect();

    candidates.sort_by_key(|info| Reverse(info.usage_page()));

    candidates
        .into_iter()
        .find_map(|info| info.open_device(api).ok())
}

/// Every connected HID interface, ordered by vendor id, product id, then
/// descending usage page.
pub fn list_devices(api: &HidApi) -> Vec<DeviceSummary> {
    let mut devices: Vec<_> = api
        .device_list()
        .map(|info| DeviceSummary {
            vendor_id: info.vendor_id(),
            product_id: info.product_id(),
            usage_page: info.usage_page(),
            usage: info.usage(),
            product: info.product_string().unwrap_or_default().to_string(),
        })
        .collect();

    devices.sort_by_key(|d| (d.vendor_id, d.product_id, Reverse(d.usage_page)));
    devices
}

/// Owns the dongle handle across polls.
///
/// The handle is acquired lazily and dropped on any terminal poll failure,
/// so the next poll re-enumerates. Callers see the same absent reading
/// whether the dongle is unplugged or merely unresponsive this cycle.
pub struct DongleMonitor {
    api: HidApi,
    device: Option<HidDevice>,
    vendor_id: u16,
    product_id: u16,
}

impl DongleMonitor {
    pub fn new(vendor_id: u16, product_id: u16) -> Result<Self, HidError> {
        Ok(Self {
            api: HidApi::new()?,
            device: None,
            vendor_id,
            product_id,
        })
    }

    pub fn poll(&mut self) -> BatteryReading {
        if self.device.is_none() {
            let _ = self.api.refresh_devices();
            self.device = find_device(&self.api, self.vendor_id, self.product_id);
        }

        let Some(device) = self.device.as_ref() else {
            return BatteryReading::unavailable();
        };

        match poll_battery(device, DEFAULT_ATTEMPTS) {
            Some(reading) => reading,
            None => {
                self.device = None;
                BatteryReading::unavailable()
            }
        }
    }
}
