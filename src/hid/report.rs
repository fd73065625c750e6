//! Feature-report codec for the Infinity 2.4 GHz dongle.
//!
//! Command values and payload offsets were determined by capturing the
//! official AM Master software with USBPcap. The firmware does not checksum
//! these reports; decoding is purely positional.

use std::fmt;

/// Report id byte + 64 bytes of payload.
pub const REPORT_LEN: usize = 65;

/// Report id used for the "initialize" request.
pub const REPORT_ID_INIT: u8 = 0x00;

/// Report id carried by the battery query and its response.
pub const REPORT_ID_QUERY: u8 = 0xF7;

/// Vendor command byte placed at offset 1 of every request.
const VENDOR_COMMAND: u8 = 0xF7;

const MOUSE_LEVEL_OFFSET: usize = 3;
const MOUSE_DISCONNECT_OFFSET: usize = 5;
const DONGLE_PRESENT_OFFSET: usize = 10;
const DONGLE_LEVEL_OFFSET: usize = 11;

pub type FeatureBuffer = [u8; REPORT_LEN];

/// Builds a zeroed feature buffer carrying the vendor command byte.
pub fn feature_buffer(report_id: u8) -> FeatureBuffer {
    let mut buffer = [0u8; REPORT_LEN];
    buffer[0] = report_id;
    buffer[1] = VENDOR_COMMAND;
    buffer
}

/// The "initialize" request, sent before every query so the firmware
/// refreshes its battery snapshot.
pub fn init_buffer() -> FeatureBuffer {
    feature_buffer(REPORT_ID_INIT)
}

/// The query buffer. Sent with the query report id, then read back in place
/// as the response.
pub fn query_buffer() -> FeatureBuffer {
    feature_buffer(REPORT_ID_QUERY)
}

/// Battery percentages reported by one query exchange.
///
/// `None` means that side is disconnected or unreachable, which is distinct
/// from a 0% reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatteryReading {
    pub mouse: Option<u8>,
    pub dongle: Option<u8>,
}

impl BatteryReading {
    /// The reading returned when no data could be obtained this cycle.
    pub const fn unavailable() -> Self {
        Self {
            mouse: None,
            dongle: None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        self.mouse.is_none() && self.dongle.is_none()
    }
}

impl fmt::Display for BatteryReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Mouse: {}% - Dongle: {}%",
            percent(self.mouse),
            percent(self.dongle)
        )
    }
}

fn percent(level: Option<u8>) -> String {
    match level {
        Some(level) => level.to_string(),
        None => "--".to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The response did not echo the query report id. Usually a stale or
    /// foreign frame; callers treat it as transient and retry.
    UnexpectedReportId(u8),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::UnexpectedReportId(id) => {
                write!(f, "unexpected report id 0x{:02X}", id)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Decodes a query response into a battery reading.
///
/// Offset 5 is non-zero while the mouse link is down; offset 10 is zero while
/// the dongle half reports no battery. The level bytes at offsets 3 and 11
/// are only meaningful when the corresponding sentinel says "connected".
pub fn decode_battery(buffer: &FeatureBuffer) -> Result<BatteryReading, DecodeError> {
    if buffer[0] != REPORT_ID_QUERY {
        return Err(DecodeError::UnexpectedReportId(buffer[0]));
    }

    let mouse_disconnected = buffer[MOUSE_DISCONNECT_OFFSET] > 0;
    let dongle_disconnected = buffer[DONGLE_PRESENT_OFFSET] < 1;

    Ok(BatteryReading {
        mouse: (!mouse_disconnected).then(|| buffer[MOUSE_LEVEL_OFFSET]),
        dongle: (!dongle_disconnected).then(|| buffer[DONGLE_LEVEL_OFFSET]),
    })
}
