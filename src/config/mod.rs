//! Module: config
//!
//! Purpose: Endpoint and signal configuration for the bridge.
//!
//! Architecture:
//! - [`BridgeConfig`]: typed sections, every field defaulted, so an empty
//!   TOML file (or none at all) yields the stock demo setup
//! - [`loader`]: TOML file → `ANALOG_OSC_*` environment → CLI, in that order
//! - [`BridgeConfig::validate`]: checked once at startup
//!
//! Fixed at startup and never mutated while rendering.

pub mod loader;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use loader::{apply_environment_overrides, find_config_file, load_config, CONFIG_PATH_ENV};

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(String),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration:\n{0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Complete bridge configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub network: NetworkConfig,
    pub analog: AnalogConfig,
    pub osc: OscConfig,
    pub led: LedConfig,
}

/// Local and remote UDP endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub local_port: u16,
    pub remote_host: String,
    pub remote_port: u16,
    pub handshake_timeout_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            local_port: 7562,
            remote_host: "192.168.7.1".to_string(),
            remote_port: 7563,
            handshake_timeout_ms: 1000,
        }
    }
}

/// Analog block geometry and pin assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalogConfig {
    /// Analog frames per second.
    pub sample_rate: f32,
    /// Frames per render block.
    pub frames_per_block: usize,
    pub input_channels: usize,
    pub output_channels: usize,
    pub red_output: usize,
    pub green_output: usize,
    pub pressure_input: usize,
}

impl Default for AnalogConfig {
    fn default() -> Self {
        Self {
            sample_rate: 22050.0,
            frames_per_block: 8,
            input_channels: 8,
            output_channels: 8,
            red_output: 0,
            green_output: 1,
            pressure_input: 0,
        }
    }
}

/// Message cadence and addressing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OscConfig {
    /// Interval between sensor messages.
    pub send_interval_ms: f32,
    /// Inbound messages routed per render block; the rest wait a block.
    pub max_messages_per_block: usize,
    /// Prepended to the analog paths, e.g. `/bela`.
    pub address_prefix: String,
}

impl Default for OscConfig {
    fn default() -> Self {
        Self {
            send_interval_ms: 500.0,
            max_messages_per_block: 32,
            address_prefix: String::new(),
        }
    }
}

/// Start-up LED parameters, until the peer sends its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedConfig {
    pub default_frequency_hz: f32,
    pub default_amplitude: f32,
}

impl Default for LedConfig {
    fn default() -> Self {
        Self {
            default_frequency_hz: 3.0,
            default_amplitude: 0.0,
        }
    }
}

impl BridgeConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Check ranges and cross-field consistency.
    ///
    /// Collects every problem instead of stopping at the first one.
    pub fn validate(&self) -> ConfigResult<()> {
        let mut errors = Vec::new();
        let analog = &self.analog;

        if !(analog.sample_rate.is_finite() && analog.sample_rate > 0.0) {
            errors.push(format!("analog.sample_rate must be > 0, got {}", analog.sample_rate));
        }
        if analog.frames_per_block == 0 {
            errors.push("analog.frames_per_block must be > 0".to_string());
        }
        for (name, pin) in [("red_output", analog.red_output), ("green_output", analog.green_output)] {
            if pin >= analog.output_channels {
                errors.push(format!(
                    "analog.{} = {} but only {} output channels",
                    name, pin, analog.output_channels
                ));
            }
        }
        if analog.red_output == analog.green_output {
            errors.push(format!(
                "analog.red_output and analog.green_output both use channel {}",
                analog.red_output
            ));
        }
        if analog.pressure_input >= analog.input_channels {
            errors.push(format!(
                "analog.pressure_input = {} but only {} input channels",
                analog.pressure_input, analog.input_channels
            ));
        }

        if !(self.osc.send_interval_ms.is_finite() && self.osc.send_interval_ms >= 0.0) {
            errors.push(format!(
                "osc.send_interval_ms must be >= 0, got {}",
                self.osc.send_interval_ms
            ));
        }
        if self.osc.max_messages_per_block == 0 {
            errors.push("osc.max_messages_per_block must be > 0".to_string());
        }
        let prefix = &self.osc.address_prefix;
        if !prefix.is_empty() && (!prefix.starts_with('/') || prefix.ends_with('/')) {
            errors.push(format!(
                "osc.address_prefix must start with '/' and not end with one, got {:?}",
                prefix
            ));
        }

        if self.network.remote_host.is_empty() {
            errors.push("network.remote_host must not be empty".to_string());
        }
        if self.network.remote_port == 0 {
            errors.push("network.remote_port must not be 0".to_string());
        }

        if !self.led.default_frequency_hz.is_finite() || !self.led.default_amplitude.is_finite() {
            errors.push("led defaults must be finite".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            let list = errors
                .iter()
                .map(|e| format!("  - {}", e))
                .collect::<Vec<_>>()
                .join("\n");
            Err(ConfigError::Validation(list))
        }
    }
}
