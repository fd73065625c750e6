use ambattery::hid::report::{
    decode_battery, init_buffer, query_buffer, BatteryReading, DecodeError, REPORT_ID_INIT,
    REPORT_ID_QUERY, REPORT_LEN,
};

fn response(mouse_level: u8, mouse_down: u8, dongle_flag: u8, dongle_level: u8) -> [u8; REPORT_LEN] {
    let mut buffer = [0u8; REPORT_LEN];
    buffer[0] = REPORT_ID_QUERY;
    buffer[3] = mouse_level;
    buffer[5] = mouse_down;
    buffer[10] = dongle_flag;
    buffer[11] = dongle_level;
    buffer
}

#[test]
fn test_init_buffer_layout() {
    let buffer = init_buffer();
    assert_eq!(buffer.len(), 65);
    assert_eq!(buffer[0], REPORT_ID_INIT);
    assert_eq!(buffer[1], 0xF7);
    assert!(buffer[2..].iter().all(|&b| b == 0));
}

#[test]
fn test_query_buffer_layout() {
    let buffer = query_buffer();
    assert_eq!(buffer[0], REPORT_ID_QUERY);
    assert_eq!(buffer[1], 0xF7);
    assert!(buffer[2..].iter().all(|&b| b == 0));
}

#[test]
fn test_decode_both_connected() {
    let reading = decode_battery(&response(45, 0, 1, 80)).unwrap();
    assert_eq!(reading.mouse, Some(45));
    assert_eq!(reading.dongle, Some(80));
}

#[test]
fn test_decode_mouse_disconnected() {
    // The level byte still holds stale data; the sentinel wins.
    let reading = decode_battery(&response(45, 1, 1, 80)).unwrap();
    assert_eq!(reading.mouse, None);
    assert_eq!(reading.dongle, Some(80));
}

#[test]
fn test_decode_mouse_disconnect_any_nonzero_sentinel() {
    let reading = decode_battery(&response(45, 0xFF, 1, 80)).unwrap();
    assert_eq!(reading.mouse, None);
}

#[test]
fn test_decode_dongle_disconnected() {
    let reading = decode_battery(&response(45, 0, 0, 80)).unwrap();
    assert_eq!(reading.mouse, Some(45));
    assert_eq!(reading.dongle, None);
}

#[test]
fn test_decode_zero_percent_is_not_disconnected() {
    let reading = decode_battery(&response(0, 0, 1, 0)).unwrap();
    assert_eq!(reading.mouse, Some(0));
    assert_eq!(reading.dongle, Some(0));
}

#[test]
fn test_decode_rejects_init_report_id() {
    let mut buffer = response(45, 0, 1, 80);
    buffer[0] = REPORT_ID_INIT;

    assert_eq!(
        decode_battery(&buffer),
        Err(DecodeError::UnexpectedReportId(REPORT_ID_INIT))
    );
}

#[test]
fn test_decode_rejects_foreign_report_id() {
    let mut buffer = response(45, 0, 1, 80);
    buffer[0] = 0x42;

    assert_eq!(
        decode_battery(&buffer),
        Err(DecodeError::UnexpectedReportId(0x42))
    );
}

#[test]
fn test_decode_is_deterministic() {
    let buffer = response(73, 0, 1, 12);
    assert_eq!(decode_battery(&buffer), decode_battery(&buffer));
}

#[test]
fn test_reading_display() {
    let reading = BatteryReading {
        mouse: Some(45),
        dongle: Some(80),
    };
    assert_eq!(reading.to_string(), "Mouse: 45% - Dongle: 80%");

    let reading = BatteryReading {
        mouse: None,
        dongle: Some(80),
    };
    assert_eq!(reading.to_string(), "Mouse: --% - Dongle: 80%");

    assert_eq!(
        BatteryReading::unavailable().to_string(),
        "Mouse: --% - Dongle: --%"
    );
}

#[test]
fn test_unavailable_reading() {
    assert!(BatteryReading::unavailable().is_unavailable());
    assert!(!BatteryReading {
        mouse: Some(0),
        dongle: None
    }
    .is_unavailable());
}
