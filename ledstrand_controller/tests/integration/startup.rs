//! Integration test: startup sequence.
//!
//! Validates: the shipped settings file loads and validates → controller
//! starts dark with every channel off → initial state publications.

use std::path::Path;
use std::process::Command;

use ledstrand_common::config::ConfigError;
use ledstrand_common::settings::{load_settings, load_settings_from_str};
use ledstrand_controller::controller::Controller;

fn shipped_config() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/../config/ledstrand.toml"))
}

#[test]
fn shipped_config_is_valid() {
    let settings = load_settings(shipped_config()).expect("shipped config should load");
    assert_eq!(settings.channels().len(), 2);
    assert_eq!(settings.topic_base(), "home/topic_name");

    let controller = Controller::new(&settings);
    assert_eq!(controller.render(0), [0, 0]);
    assert!(!controller.is_animating(0));

    let publications = controller.state_publications();
    assert_eq!(publications.len(), 3);
    assert!(publications.iter().all(|p| p.payload == "OFF"));
}

#[test]
fn invalid_config_never_reaches_controller() {
    let result = load_settings_from_str(
        r#"
[led]
pins = [12, 14]
root_scaling = [1.0]
"#,
    );
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));
}

#[test]
fn missing_config_is_reported_once() {
    let output = Command::new(env!("CARGO_BIN_EXE_ledstrand"))
        .args(["--json", "--config", "/nonexistent/ledstrand.toml"])
        .env_remove("RUST_LOG")
        .output()
        .expect("binary should start");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    let reports: Vec<_> = stderr
        .lines()
        .filter(|line| line.contains("Configuration file not found"))
        .collect();
    assert_eq!(reports.len(), 1, "{stderr}");
    assert!(reports[0].contains("ledstrand failed"));
}

#[test]
fn built_in_settings_are_used_without_config() {
    let output = Command::new(env!("CARGO_BIN_EXE_ledstrand"))
        .args(["--check", "--json"])
        .env_remove("RUST_LOG")
        .output()
        .expect("binary should start");

    assert!(output.status.success());
    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let commands: Vec<_> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["command"].as_str().unwrap())
        .collect();
    assert_eq!(
        commands,
        ["home/topic_name/set", "home/topic_name0/set", "home/topic_name1/set"]
    );
}

#[test]
fn subscriptions_follow_channel_count() {
    let settings = load_settings_from_str(
        r#"
[led]
pins = [0, 2, 4, 5]
root_scaling = [1.0, 1.0, 1.0, 1.0]
topic_base = "lights/deck"
"#,
    )
    .unwrap();
    let controller = Controller::new(&settings);
    assert_eq!(
        controller.topics().subscriptions(),
        [
            "lights/deck/set",
            "lights/deck0/set",
            "lights/deck1/set",
            "lights/deck2/set",
            "lights/deck3/set",
        ]
    );
}
