use std::fs;

use gtop::core::config::{Config, PlotMarker, Theme, CONFIG_FILE_NAME};
use tempfile::TempDir;

#[test]
fn test_missing_file_gives_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(CONFIG_FILE_NAME);

    let config = Config::load_or_default(&path).unwrap();
    assert_eq!(config, Config::default());
    assert!(!path.exists());
}

#[test]
fn test_malformed_file_fails_with_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "{ \"update_time_interval\": ").unwrap();

    let err = Config::load_or_default(&path).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("Malformed config file"));
    assert!(message.contains(CONFIG_FILE_NAME));
}

#[test]
fn test_wrong_field_type_is_malformed() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, r#"{ "dashboard_theme": "neon" }"#).unwrap();

    assert!(Config::load_from(&path).is_err());
}

#[test]
fn test_saved_config_loads_back() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join(CONFIG_FILE_NAME);

    let config = Config {
        device_index: 1,
        update_time_interval: 0.5,
        dashboard_theme: Theme::Clear,
        dashboard_plot_marker: Some(PlotMarker::Dot),
        dashboard_plot_bar: true,
        ..Default::default()
    };
    config.save_to(&path).unwrap();

    assert_eq!(Config::load_from(&path).unwrap(), config);
}

#[test]
fn test_default_file_lists_every_key() {
    let json = serde_json::to_value(Config::default()).unwrap();
    let keys = [
        "device_index",
        "text_mode",
        "update_time_interval",
        "min_time_interval",
        "dashboard_theme",
        "dashboard_plot_time_interval",
        "dashboard_plot_marker",
        "dashboard_plot_bar",
    ];

    for key in keys {
        assert!(json.get(key).is_some(), "missing key {}", key);
    }
    assert_eq!(json["dashboard_theme"], "pro");
}

#[test]
fn test_negative_min_interval_rejected() {
    let config = Config {
        min_time_interval: -0.1,
        ..Default::default()
    };
    assert!(config.validate().is_err());
}
