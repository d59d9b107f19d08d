//! Configuration loading and validation tests

use std::io::Write;

use analog_osc_bridge::config::{load_config, BridgeConfig, ConfigError};
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_defaults_match_demo_setup() {
    let config = BridgeConfig::default();

    assert_eq!(config.network.local_port, 7562);
    assert_eq!(config.network.remote_port, 7563);
    assert_eq!(config.network.remote_host, "192.168.7.1");
    assert_eq!(config.network.handshake_timeout_ms, 1000);
    assert_eq!(config.osc.send_interval_ms, 500.0);
    assert_eq!(config.analog.red_output, 0);
    assert_eq!(config.analog.green_output, 1);
    assert_eq!(config.analog.pressure_input, 0);
    assert_eq!(config.led.default_frequency_hz, 3.0);
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let file = write_config(
        r#"
[network]
remote_host = "127.0.0.1"

[osc]
address_prefix = "/bela"
"#,
    );

    let config = load_config(Some(file.path())).unwrap();
    assert_eq!(config.network.remote_host, "127.0.0.1");
    assert_eq!(config.network.remote_port, 7563);
    assert_eq!(config.osc.address_prefix, "/bela");
    assert_eq!(config.analog.sample_rate, 22050.0);
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");

    let err = load_config(Some(missing.as_path())).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound(_)));
}

#[test]
fn test_bad_toml_is_a_parse_error() {
    let file = write_config("[network\nlocal_port = ");
    let err = load_config(Some(file.path())).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_wrong_type_is_a_parse_error() {
    let err = BridgeConfig::from_toml_str("[network]\nlocal_port = \"seven\"").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_validation_collects_every_problem() {
    let mut config = BridgeConfig::default();
    config.analog.sample_rate = 0.0;
    config.analog.frames_per_block = 0;
    config.analog.green_output = 0;
    config.osc.address_prefix = "bela/".to_string();

    match config.validate() {
        Err(ConfigError::Validation(msg)) => {
            assert!(msg.contains("sample_rate"));
            assert!(msg.contains("frames_per_block"));
            assert!(msg.contains("both use channel 0"));
            assert!(msg.contains("address_prefix"));
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn test_pins_must_exist() {
    let mut config = BridgeConfig::default();
    config.analog.output_channels = 1;
    config.analog.pressure_input = 9;

    let err = config.validate().unwrap_err().to_string();
    assert!(err.contains("green_output"));
    assert!(err.contains("pressure_input"));
}

#[test]
fn test_round_trips_through_toml() {
    let mut config = BridgeConfig::default();
    config.osc.address_prefix = "/bela".to_string();
    config.analog.frames_per_block = 16;

    let text = toml::to_string(&config).unwrap();
    assert_eq!(BridgeConfig::from_toml_str(&text).unwrap(), config);
}
