//! Persisted key/value preferences
//!
//! The store is a flat JSON object of string keys to string values kept in
//! `state.json` under the config directory. Writes go to a temp file first and
//! are renamed into place.

use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("I/O error on preference file: {0}")]
    Io(#[from] io::Error),
    #[error("preference file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Load/save effects for preferences, injected into [`super::ThemeStore`]
pub trait PreferenceStore {
    fn load(&self, key: &str) -> Result<Option<String>, PreferenceError>;
    fn save(&mut self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// Preferences kept in a JSON file on disk
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FilePreferenceStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, PreferenceError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.read_all()?.remove(key))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut all = match self.read_all() {
            Ok(all) => all,
            Err(PreferenceError::Parse(e)) => {
                log::warn!("Discarding unreadable preferences at {:?}: {}", self.path, e);
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        all.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&all)?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

/// In-process store; nothing is written to disk
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    values: FxHashMap<String, String>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.values.insert(key.to_string(), value.to_string());
        store
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
