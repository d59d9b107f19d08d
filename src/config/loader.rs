//! Configuration loading.
//!
//! Three tiers, later ones win:
//! 1. TOML file (explicit path, else `ANALOG_OSC_CONFIG_PATH`, else none)
//! 2. `ANALOG_OSC_*` environment variables
//! 3. CLI flags, applied by the binary on the returned config

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::{BridgeConfig, ConfigError, ConfigResult};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "ANALOG_OSC_CONFIG_PATH";

/// Config file named by [`CONFIG_PATH_ENV`], if set.
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if the variable points nowhere.
pub fn find_config_file() -> ConfigResult<Option<PathBuf>> {
    match env::var(CONFIG_PATH_ENV) {
        Ok(value) => {
            let path = PathBuf::from(value);
            if path.exists() {
                Ok(Some(path))
            } else {
                Err(ConfigError::FileNotFound(format!(
                    "{} (from {})",
                    path.display(),
                    CONFIG_PATH_ENV
                )))
            }
        }
        Err(_) => Ok(None),
    }
}

/// Load configuration from file (if any) and environment.
///
/// Without a file, every section takes its defaults. The result is not yet
/// validated: the caller applies CLI overrides first, then validates.
pub fn load_config(config_path: Option<&Path>) -> ConfigResult<BridgeConfig> {
    let file = match config_path {
        Some(path) if !path.exists() => {
            return Err(ConfigError::FileNotFound(path.display().to_string()))
        }
        Some(path) => Some(path.to_path_buf()),
        None => find_config_file()?,
    };

    let mut config = match file {
        Some(path) => BridgeConfig::from_toml_str(&fs::read_to_string(path)?)?,
        None => BridgeConfig::default(),
    };

    apply_environment_overrides(&mut config);
    Ok(config)
}

/// Apply environment variable overrides.
///
/// Supported variables:
/// - `ANALOG_OSC_LOCAL_PORT` -> `network.local_port`
/// - `ANALOG_OSC_REMOTE_HOST` -> `network.remote_host`
/// - `ANALOG_OSC_REMOTE_PORT` -> `network.remote_port`
/// - `ANALOG_OSC_HANDSHAKE_TIMEOUT_MS` -> `network.handshake_timeout_ms`
/// - `ANALOG_OSC_SAMPLE_RATE` -> `analog.sample_rate`
/// - `ANALOG_OSC_FRAMES_PER_BLOCK` -> `analog.frames_per_block`
/// - `ANALOG_OSC_SEND_INTERVAL_MS` -> `osc.send_interval_ms`
/// - `ANALOG_OSC_ADDRESS_PREFIX` -> `osc.address_prefix`
///
/// Values that fail to parse are ignored.
pub fn apply_environment_overrides(config: &mut BridgeConfig) {
    apply_overrides_from(config, |key| env::var(key).ok());
}

/// Same as [`apply_environment_overrides`] with an arbitrary lookup.
pub fn apply_overrides_from<F>(config: &mut BridgeConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    parse_into(&lookup, "ANALOG_OSC_LOCAL_PORT", &mut config.network.local_port);
    if let Some(value) = lookup("ANALOG_OSC_REMOTE_HOST") {
        config.network.remote_host = value;
    }
    parse_into(&lookup, "ANALOG_OSC_REMOTE_PORT", &mut config.network.remote_port);
    parse_into(
        &lookup,
        "ANALOG_OSC_HANDSHAKE_TIMEOUT_MS",
        &mut config.network.handshake_timeout_ms,
    );
    parse_into(&lookup, "ANALOG_OSC_SAMPLE_RATE", &mut config.analog.sample_rate);
    parse_into(&lookup, "ANALOG_OSC_FRAMES_PER_BLOCK", &mut config.analog.frames_per_block);
    parse_into(&lookup, "ANALOG_OSC_SEND_INTERVAL_MS", &mut config.osc.send_interval_ms);
    if let Some(value) = lookup("ANALOG_OSC_ADDRESS_PREFIX") {
        config.osc.address_prefix = value;
    }
}

fn parse_into<F, T>(lookup: &F, key: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    if let Some(parsed) = lookup(key).and_then(|v| v.trim().parse().ok()) {
        *target = parsed;
    }
}
