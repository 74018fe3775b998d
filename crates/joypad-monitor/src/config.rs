//! Monitor configuration
//!
//! TOML-backed settings for the monitor, looked up in the working directory
//! first and the system config directory second. A missing file just means
//! defaults; a malformed one is a startup error.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// System-wide configuration directory
pub const CONFIG_DIR: &str = "/etc/joypad";

/// Configuration file name searched for in the working directory
pub const LOCAL_CONFIG: &str = "joypad.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Device node to watch; overrides `device_index` when set
    #[serde(default)]
    pub device_path: Option<PathBuf>,

    /// Joystick index, expanded to /dev/input/jsN
    #[serde(default)]
    pub device_index: u8,

    /// Milliseconds between refresh calls
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Labels printed for the first buttons, in button order
    #[serde(default = "default_button_labels")]
    pub button_labels: Vec<String>,
}

fn default_poll_interval_ms() -> u64 {
    16
}

fn default_button_labels() -> Vec<String> {
    ["A", "B", "X", "Y", "LB", "RB"]
        .into_iter()
        .map(Into::into)
        .collect()
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            device_path: None,
            device_index: 0,
            poll_interval_ms: default_poll_interval_ms(),
            button_labels: default_button_labels(),
        }
    }
}

impl MonitorConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load_default() -> Result<Self, ConfigError> {
        let local = PathBuf::from(LOCAL_CONFIG);
        if local.exists() {
            return Self::load(&local);
        }

        let system = Path::new(CONFIG_DIR).join("config.toml");
        if system.exists() {
            return Self::load(&system);
        }

        tracing::debug!("no configuration file found, using defaults");
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = MonitorConfig::default();
        assert!(config.device_path.is_none());
        assert_eq!(config.device_index, 0);
        assert_eq!(config.poll_interval_ms, 16);
        assert_eq!(config.button_labels.len(), 6);
        assert_eq!(config.button_labels[0], "A");
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "device_index = 2").unwrap();

        let config = MonitorConfig::load(file.path()).unwrap();
        assert_eq!(config.device_index, 2);
        assert_eq!(config.poll_interval_ms, 16);
        assert_eq!(config.button_labels[5], "RB");
    }

    #[test]
    fn test_load_full_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "device_path = \"/dev/input/js1\"").unwrap();
        writeln!(file, "poll_interval_ms = 50").unwrap();
        writeln!(file, "button_labels = [\"south\", \"east\"]").unwrap();

        let config = MonitorConfig::load(file.path()).unwrap();
        assert_eq!(
            config.device_path,
            Some(PathBuf::from("/dev/input/js1"))
        );
        assert_eq!(config.poll_interval_ms, 50);
        assert_eq!(config.button_labels, vec!["south", "east"]);
    }

    #[test]
    fn test_load_malformed_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "poll_interval_ms = \"fast\"").unwrap();

        assert!(matches!(
            MonitorConfig::load(file.path()),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn test_load_missing_file_is_an_io_error() {
        let result = MonitorConfig::load(Path::new("/joypad-test/absent.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_round_trip() {
        let config = MonitorConfig {
            device_path: Some(PathBuf::from("/dev/input/js3")),
            device_index: 3,
            poll_interval_ms: 8,
            button_labels: vec!["A".into(), "B".into()],
        };

        let serialized = toml::to_string(&config).unwrap();
        let parsed: MonitorConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.device_index, 3);
        assert_eq!(parsed.poll_interval_ms, 8);
        assert_eq!(parsed.button_labels, config.button_labels);
    }
}
