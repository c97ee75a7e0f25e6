//! Configuration Vault – reads/writes `~/.rovos/config.toml`.

use rovos_runtime::DriveConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Persisted vehicle configuration stored in `~/.rovos/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Serial device node carrying sensor frames in and motor commands out.
    #[serde(default = "default_serial_device")]
    pub serial_device: String,

    /// `host:port` of the telemetry monitoring peer.
    #[serde(default = "default_telemetry_addr")]
    pub telemetry_addr: String,

    /// Path to the trained network description (JSON).
    #[serde(default = "default_network_path")]
    pub network_path: String,

    /// Decision-layer tunables (`[drive]` table).
    #[serde(default)]
    pub drive: DriveConfig,
}

fn default_serial_device() -> String {
    "/dev/ttyACM0".to_string()
}
fn default_telemetry_addr() -> String {
    "127.0.0.1:3000".to_string()
}
fn default_network_path() -> String {
    config_dir().join("network.json").display().to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            serial_device: default_serial_device(),
            telemetry_addr: default_telemetry_addr(),
            network_path: default_network_path(),
            drive: DriveConfig::default(),
        }
    }
}

/// Return `~/.rovos`.
fn config_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".rovos")
}

/// Return the path to `~/.rovos/config.toml`.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Load the config from disk.  Returns `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, String> {
    load_from(&config_path())
}

/// Load the config from a specific path.
/// Extracted for testability without mutating environment variables.
pub(crate) fn load_from(path: &PathBuf) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let mut cfg: Config =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse config: {}", e))?;
    apply_env_overrides(&mut cfg);
    Ok(Some(cfg))
}

/// Apply `ROVOS_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `ROVOS_SERIAL_DEVICE` | `serial_device` |
/// | `ROVOS_TELEMETRY_ADDR` | `telemetry_addr` |
/// | `ROVOS_NETWORK_PATH` | `network_path` |
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("ROVOS_SERIAL_DEVICE") {
        cfg.serial_device = v;
    }
    if let Ok(v) = std::env::var("ROVOS_TELEMETRY_ADDR") {
        cfg.telemetry_addr = v;
    }
    if let Ok(v) = std::env::var("ROVOS_NETWORK_PATH") {
        cfg.network_path = v;
    }
}

/// Save the config to disk, creating `~/.rovos/` if necessary.
pub fn save(cfg: &Config) -> Result<(), String> {
    save_to(cfg, &config_path())
}

/// Save the config to a specific path.
pub(crate) fn save_to(cfg: &Config, path: &PathBuf) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let raw = toml::to_string_pretty(cfg)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(path, raw).map_err(|e| format!("Failed to write config: {}", e))
}
