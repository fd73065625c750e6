use ambattery::config::{get_config_dir, validate_config, AppConfig};
use ambattery::hid::device;

#[test]
fn test_default_config() {
    let config = AppConfig::default();
    assert_eq!(config.poll_interval, 10);
    assert!(config.popup_30);
    assert!(config.popup_20);
    assert!(config.popup_10);
    assert_eq!(config.vendor_id, None);
    assert_eq!(config.product_id, None);
}

#[test]
fn test_config_dir_path() {
    if let Ok(config_dir) = get_config_dir() {
        assert!(config_dir.ends_with("ambattery"));
    }
}

#[test]
fn test_config_parsing() {
    let toml_str = r#"
        poll_interval = 60
        popup_30 = true
        popup_20 = false
        popup_10 = false
    "#;

    let config: AppConfig = toml::from_str(toml_str).expect("Failed to parse config");
    assert_eq!(config.poll_interval, 60);
    assert!(config.popup_30);
    assert!(!config.popup_20);
    assert!(!config.popup_10);
}

#[test]
fn test_partial_config_uses_defaults() {
    let config: AppConfig = toml::from_str("poll_interval = 30").expect("Failed to parse config");
    assert_eq!(config.poll_interval, 30);
    assert!(config.popup_30);
    assert_eq!(config.vendor_id, None);
}

#[test]
fn test_invalid_poll_interval_too_low() {
    let result = validate_config(&AppConfig {
        poll_interval: 0,
        ..Default::default()
    });
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("at least 1 second"));
}

#[test]
fn test_invalid_poll_interval_too_high() {
    let result = validate_config(&AppConfig {
        poll_interval: 5000,
        ..Default::default()
    });
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("3600 seconds"));
}

#[test]
fn test_config_roundtrip() {
    let original = AppConfig {
        poll_interval: 90,
        popup_30: false,
        popup_20: true,
        popup_10: false,
        vendor_id: Some(0x1234),
        product_id: Some(0x5678),
    };

    let toml_str = toml::to_string(&original).expect("Failed to serialize");
    let deserialized: AppConfig = toml::from_str(&toml_str).expect("Failed to deserialize");

    assert_eq!(original, deserialized);
}

#[test]
fn test_popup_settings_mapping() {
    let mut config = AppConfig::default();
    config.set_popup(20, false);

    let popups = config.popups();
    assert!(popups.popup_30);
    assert!(!popups.popup_20);
    assert!(popups.popup_10);

    // The critical threshold has no switch to flip.
    config.set_popup(5, false);
    assert_eq!(config.popups(), popups);
}

#[test]
fn test_target_ids_default_to_dongle_constants() {
    let config = AppConfig::default();
    assert_eq!(config.target_vendor_id(), device::VENDOR_ID);
    assert_eq!(config.target_product_id(), device::PRODUCT_ID);

    let config = AppConfig {
        vendor_id: Some(0x1234),
        product_id: Some(0x5678),
        ..Default::default()
    };
    assert_eq!(config.target_vendor_id(), 0x1234);
    assert_eq!(config.target_product_id(), 0x5678);
}
