//! User configuration
//!
//! Read from `config.yaml` in the config directory (`~/.config/cppad` on
//! Unix-likes). The file is optional and never written by the app; every
//! field has a default, so a partial file is fine.

use crate::compile::{DEFAULT_ENDPOINT, DEFAULT_MAX_RESPONSE_BYTES};
use crate::editor::DEFAULT_TAB_WIDTH;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const APP_DIR: &str = "cppad";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("YAML parse error in config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// URL that compile requests are POSTed to
    pub endpoint: String,
    /// Directory that exported sources are written into
    pub export_dir: PathBuf,
    /// Indent width used by the editor's Tab key
    pub tab_width: usize,
    /// Client-side request deadline; none by default
    pub request_timeout_secs: Option<u64>,
    /// Largest response body accepted from the service
    pub max_response_bytes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            export_dir: PathBuf::from("."),
            tab_width: DEFAULT_TAB_WIDTH,
            request_timeout_secs: None,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }
}

impl Config {
    /// Load from the default location
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No config at {:?}, using defaults", path);
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        log::info!("Loading config from {:?}", path);
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// `~/.config/cppad` (XDG layout), or the platform config dir on Windows
    pub fn config_dir() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .unwrap_or_else(|| PathBuf::from("."))
        }
        #[cfg(not(target_os = "windows"))]
        {
            dirs::home_dir()
                .map(|home| home.join(".config").join(APP_DIR))
                .unwrap_or_else(|| PathBuf::from("."))
        }
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// File holding persisted preferences (the theme)
    pub fn state_path() -> PathBuf {
        Self::config_dir().join("state.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.yaml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.endpoint, "http://localhost:8080/api/compile");
        assert!(config.request_timeout().is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "endpoint: https://compile.example.com/run\nrequest_timeout_secs: 15\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.endpoint, "https://compile.example.com/run");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.tab_width, DEFAULT_TAB_WIDTH);
        assert_eq!(config.export_dir, PathBuf::from("."));
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "tab_width: [not a number").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        Config::load_from(&path).unwrap();
        assert!(!path.exists());
    }
}
