//! Configuration loading.
//!
//! Settings are read from `~/.termtick/config.toml`; a missing or malformed
//! file falls back to defaults.
//!
//! ```toml
//! # Switch to the alternate screen for the session (default: true)
//! alternate_screen = true
//!
//! # Hide the cursor for the session (default: true)
//! hide_cursor = true
//!
//! # Terminal window title (default: none)
//! title = "walk"
//! ```

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Terminal driver options consumed by [`Session::start`].
///
/// [`Session::start`]: crate::session::Session::start
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Switch to the alternate screen while the session is active
    pub alternate_screen: bool,
    /// Hide the cursor while the session is active
    pub hide_cursor: bool,
    /// Terminal window title to set on startup
    pub title: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            alternate_screen: true,
            hide_cursor: true,
            title: None,
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults
    pub fn load() -> Self {
        if let Some(path) = Self::get_config_path() {
            if path.exists() {
                if let Ok(content) = fs::read_to_string(&path) {
                    if let Ok(config) = toml::from_str(&content) {
                        return config;
                    }
                }
            }
        }
        Self::default()
    }

    /// Get config file path
    fn get_config_path() -> Option<PathBuf> {
        home_dir().map(|home| home.join(".termtick").join("config.toml"))
    }
}

// Get home directory
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE")
        .or_else(|| std::env::var_os("HOME"))
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.alternate_screen);
        assert!(config.hide_cursor);
        assert!(config.title.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str("alternate_screen = false").expect("valid toml");
        assert!(!config.alternate_screen);
        assert!(config.hide_cursor);
    }
}
