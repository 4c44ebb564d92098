use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use gtop::core::config::{Config, CONFIG_FILE_NAME};
use tempfile::TempDir;

fn gtop(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gtop"))
        .args(args)
        .env("HOME", home)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_generate_config_writes_defaults() {
    let home = TempDir::new().unwrap();

    let output = gtop(home.path(), &["--generate-config"]);
    assert!(output.status.success());

    let data = fs::read_to_string(home.path().join(CONFIG_FILE_NAME)).unwrap();
    let written: Config = serde_json::from_str(&data).unwrap();
    assert_eq!(written, Config::default());
}

#[test]
fn test_generate_config_replaces_existing_file() {
    let home = TempDir::new().unwrap();
    let path = home.path().join(CONFIG_FILE_NAME);
    fs::write(&path, r#"{ "device_index": 3 }"#).unwrap();

    let output = gtop(home.path(), &["-g"]);
    assert!(output.status.success());

    let written: Config = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written.device_index, 0);
}

#[test]
fn test_malformed_config_fails_fast() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join(CONFIG_FILE_NAME), "not json").unwrap();

    let output = gtop(home.path(), &[]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Malformed config file"));
}

#[test]
fn test_invalid_interval_rejected() {
    let home = TempDir::new().unwrap();

    let output = gtop(home.path(), &["--update-time-interval", "0"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("update_time_interval"));
}

#[test]
fn test_unknown_flag_is_usage_error() {
    let home = TempDir::new().unwrap();

    let output = gtop(home.path(), &["--bogus"]);
    assert!(!output.status.success());
}

#[cfg(not(feature = "nvml"))]
#[test]
fn test_without_gpu_support_reports_missing_gpu() {
    let home = TempDir::new().unwrap();

    let output = gtop(home.path(), &["--text-mode"]);
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("GPU Not Detected!"));
}
