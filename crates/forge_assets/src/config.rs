//! Editor configuration.
//!
//! Persistent settings that survive editor restarts, stored as TOML.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::paths::DEFAULT_INFO_EXTENSION;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Extension of info documents, without the dot
    pub info_extension: String,
    /// Upper bound on dependency loads running at once
    pub max_concurrent_preloads: usize,
    /// Default `env_logger` filter
    pub log_filter: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            info_extension: DEFAULT_INFO_EXTENSION.to_string(),
            max_concurrent_preloads: 8,
            log_filter: "info".to_string(),
        }
    }
}

impl EditorConfig {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content)?;
        log::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is absent
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("no config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Save configuration to a file, creating its directory if needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_error = |source: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(io_error)?;
        log::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Get the default config path.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("forge");
            p.push("editor.toml");
            p
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forge").join("editor.toml");

        let config = EditorConfig {
            max_concurrent_preloads: 2,
            log_filter: "debug".to_string(),
            ..EditorConfig::default()
        };
        config.save(&path).unwrap();

        assert_eq!(EditorConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.toml");
        fs::write(&path, "log_filter = \"warn\"\n").unwrap();

        let config = EditorConfig::load(&path).unwrap();
        assert_eq!(config.log_filter, "warn");
        assert_eq!(config.info_extension, "asset");
        assert_eq!(config.max_concurrent_preloads, 8);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert_eq!(EditorConfig::load_or_default(&path).unwrap(), EditorConfig::default());
        assert!(matches!(EditorConfig::load(&path), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.toml");
        fs::write(&path, "max_concurrent_preloads = \"many\"\n").unwrap();
        assert!(matches!(EditorConfig::load(&path), Err(ConfigError::Parse(_))));
    }
}
