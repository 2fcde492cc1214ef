//! Light/dark theme preference
//!
//! [`ThemeStore`] holds the current [`ThemeMode`] and persists every change
//! through an injected [`PreferenceStore`]. It is built once in `main` and
//! owned by the app; nothing here is global.

pub mod preferences;

pub use preferences::{FilePreferenceStore, MemoryPreferenceStore, PreferenceError, PreferenceStore};

use std::fmt;
use std::str::FromStr;

/// Key the preference is stored under
pub const THEME_KEY: &str = "preferred-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    /// The terminal's preferred scheme, read from `COLORFGBG`. Dark if unknown.
    pub fn from_environment() -> Self {
        Self::from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
    }

    /// Interpret a `COLORFGBG` value such as `"15;0"` (fg;bg) or `"0;default;15"`.
    ///
    /// Background colours 7 and 9-15 are the light half of the 16-colour palette.
    pub fn from_colorfgbg(value: Option<&str>) -> Self {
        let background = value
            .and_then(|v| v.rsplit(';').next())
            .and_then(|bg| bg.trim().parse::<u8>().ok());
        match background {
            Some(7) | Some(9..=15) => ThemeMode::Light,
            _ => ThemeMode::Dark,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(format!("unknown theme '{}', expected light or dark", other)),
        }
    }
}

/// Current theme plus the store it is persisted to
pub struct ThemeStore {
    mode: ThemeMode,
    store: Box<dyn PreferenceStore>,
}

impl ThemeStore {
    /// Resolve the starting theme: the stored value if valid, else `system_default`
    pub fn load(store: Box<dyn PreferenceStore>, system_default: ThemeMode) -> Self {
        let mode = match store.load(THEME_KEY) {
            Ok(Some(saved)) => saved.parse().unwrap_or_else(|e| {
                log::warn!("Ignoring stored theme: {}", e);
                system_default
            }),
            Ok(None) => system_default,
            Err(e) => {
                log::warn!("Failed to read theme preference: {}", e);
                system_default
            }
        };
        log::info!("Theme resolved to {}", mode);
        ThemeStore { mode, store }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    /// Flip between light and dark and persist the result
    pub fn toggle(&mut self) -> ThemeMode {
        self.set(self.mode.toggled());
        self.mode
    }

    /// Change and persist the theme. A failed write is logged, not fatal.
    pub fn set(&mut self, mode: ThemeMode) {
        self.mode = mode;
        if let Err(e) = self.store.save(THEME_KEY, mode.as_str()) {
            log::error!("Failed to persist theme preference: {}", e);
        }
    }

    /// Use `mode` for this run only, without touching the stored value
    pub fn override_mode(&mut self, mode: ThemeMode) {
        self.mode = mode;
    }
}
