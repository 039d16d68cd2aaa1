//! Application settings for wg-nord

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base address of the directory API.
    pub api_base: String,
    /// DNS servers written into generated profiles.
    pub dns: String,
    /// Directory holding saved profiles.
    pub profile_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: crate::api::DEFAULT_API_BASE.to_string(),
            dns: crate::profile::DEFAULT_DNS.to_string(),
            profile_dir: default_profile_dir(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).expect("Failed to serialize config");
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Default location of the settings file.
    pub fn default_path() -> PathBuf {
        default_profile_dir().join("config.toml")
    }
}

fn default_profile_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wg-nord")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_base, "https://api.nordvpn.com/v1");
        assert_eq!(config.dns, "1.1.1.1,8.8.8.8");
        assert!(config.profile_dir.ends_with("wg-nord"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.dns = "9.9.9.9".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.dns, "9.9.9.9");
        assert_eq!(loaded.api_base, config.api_base);
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is not = [valid toml").unwrap();

        assert!(matches!(Config::load(&path), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let path = Path::new("/nonexistent/wg-nord/config.toml");
        assert!(matches!(Config::load(path), Err(ConfigError::ReadError(_))));
    }
}
