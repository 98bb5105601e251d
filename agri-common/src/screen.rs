//! Screen navigation state
//!
//! The application has a fixed set of screens. The current screen is
//! explicit state owned by whoever drives the UI (the service holds one
//! `ScreenStore`). Only the last viewed screen survives a restart: it is
//! written to `session.toml` under the single key `last_screen`.

use crate::config::atomic_write;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

/// File name of the persisted session inside the state directory
pub const SESSION_FILE_NAME: &str = "session.toml";

/// Application screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    #[default]
    Home,
    /// Water need estimation from an uploaded image
    Water,
    /// Disease detection from an uploaded image
    Disease,
    /// Crop calendar lookup
    Calendar,
    /// Voice assistant
    Voice,
}

impl Screen {
    pub const ALL: [Screen; 5] = [
        Screen::Home,
        Screen::Water,
        Screen::Disease,
        Screen::Calendar,
        Screen::Voice,
    ];

    /// Stable identifier used for persistence and the API
    pub fn id(&self) -> &'static str {
        match self {
            Screen::Home => "home",
            Screen::Water => "water",
            Screen::Disease => "disease",
            Screen::Calendar => "calendar",
            Screen::Voice => "voice",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Screen {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Screen::ALL
            .iter()
            .copied()
            .find(|screen| screen.id() == wanted)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown screen: {}", s)))
    }
}

/// On-disk shape of `session.toml`
#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_screen: Option<String>,
}

/// Current screen plus its persistence location
#[derive(Debug)]
pub struct ScreenStore {
    path: PathBuf,
    current: Screen,
}

impl ScreenStore {
    /// Open the store in `state_dir`, restoring the last viewed screen
    ///
    /// Never fails: a missing, unreadable or unknown value falls back to
    /// the home screen.
    pub fn open(state_dir: &Path) -> Self {
        let path = state_dir.join(SESSION_FILE_NAME);
        let current = restore(&path);
        Self { path, current }
    }

    pub fn current(&self) -> Screen {
        self.current
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Switch to `screen` and persist it as the last viewed screen
    ///
    /// The in-memory state changes even when the write fails; the error is
    /// returned so the caller can report that persistence did not happen.
    pub fn navigate(&mut self, screen: Screen) -> Result<()> {
        self.current = screen;

        let session = SessionFile {
            last_screen: Some(screen.id().to_string()),
        };
        let content = toml::to_string(&session)
            .map_err(|e| Error::Internal(format!("Serialize session failed: {}", e)))?;
        atomic_write(&self.path, &content)?;

        info!(screen = %screen, "Navigated");
        Ok(())
    }
}

/// Read the last viewed screen from `path`
fn restore(path: &Path) -> Screen {
    if !path.exists() {
        debug!(path = %path.display(), "No saved session, starting at home");
        return Screen::Home;
    }

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not read session, starting at home");
            return Screen::Home;
        }
    };

    let session: SessionFile = match toml::from_str(&content) {
        Ok(s) => s,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Malformed session, starting at home");
            return Screen::Home;
        }
    };

    match session.last_screen.as_deref().map(Screen::from_str) {
        Some(Ok(screen)) => {
            debug!(screen = %screen, "Restored last screen");
            screen
        }
        Some(Err(e)) => {
            warn!(error = %e, "Ignoring saved screen");
            Screen::Home
        }
        None => Screen::Home,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_ids_round_trip() {
        for screen in Screen::ALL {
            assert_eq!(screen.id().parse::<Screen>().unwrap(), screen);
        }
    }

    #[test]
    fn test_screen_parse_is_case_insensitive() {
        assert_eq!(" Calendar ".parse::<Screen>().unwrap(), Screen::Calendar);
    }

    #[test]
    fn test_unknown_screen_is_invalid_input() {
        let err = "settings".parse::<Screen>().unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_default_screen_is_home() {
        assert_eq!(Screen::default(), Screen::Home);
    }
}
