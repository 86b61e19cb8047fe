use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{fmt, fs, io};

use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme {other:?}, expected light or dark")),
        }
    }
}

/// State the client persists between runs: the last issued session token
/// and the theme preference. Read once at startup, written on login,
/// logout, and theme toggle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
    #[serde(default)]
    pub theme: Theme,
}

/// TOML-file-backed store for `LocalState`.
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted state. A missing file is a fresh install and
    /// yields the default; an unreadable or corrupt file is logged and
    /// also yields the default rather than blocking startup.
    pub fn load(&self) -> LocalState {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(path = ?self.path, "no persisted state, starting fresh");
                return LocalState::default();
            }
            Err(err) => {
                warn!(path = ?self.path, error = %err, "failed to read persisted state");
                return LocalState::default();
            }
        };
        match toml::from_str(&content) {
            Ok(state) => state,
            Err(err) => {
                warn!(path = ?self.path, error = %err, "persisted state is corrupt, ignoring it");
                LocalState::default()
            }
        }
    }

    pub fn save(&self, state: &LocalState) -> Result<(), io::Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = toml::to_string_pretty(state)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        fs::write(&self.path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_token_and_theme() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path().join("state.toml"));

        let state = LocalState {
            session_token: Some("abc123".to_string()),
            theme: Theme::Dark,
        };
        store.save(&state).unwrap();
        assert_eq!(store.load(), state);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path().join("nope.toml"));
        assert_eq!(store.load(), LocalState::default());
    }

    #[test]
    fn corrupt_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.toml");
        fs::write(&path, "session_token = [not toml").unwrap();
        assert_eq!(LocalStore::new(path).load(), LocalState::default());
    }

    #[test]
    fn logout_persists_a_tokenless_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path().join("state.toml"));
        store
            .save(&LocalState {
                session_token: Some("abc".to_string()),
                theme: Theme::Dark,
            })
            .unwrap();

        let mut state = store.load();
        state.session_token = None;
        store.save(&state).unwrap();

        let reloaded = store.load();
        assert!(reloaded.session_token.is_none());
        // Theme preference survives logout.
        assert_eq!(reloaded.theme, Theme::Dark);
    }

    #[test]
    fn theme_toggle_flips_both_ways() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("blue".parse::<Theme>().is_err());
    }
}
