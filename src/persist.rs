//! JSON persistence for the player profile in ~/.flappy-dopamine/.
//!
//! Loads fall back to defaults on any error so a missing or corrupt save
//! never blocks play. Saves report `io::Result` and the caller decides how
//! loudly to complain.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const PROFILE_FILE: &str = "profile.json";

/// Display name used until the player picks one.
pub const DEFAULT_NAME: &str = "Flappy Boys";

const NAME_MAX_CHARS: usize = 24;

/// Trim surrounding whitespace and cap length; an empty result falls back
/// to [`DEFAULT_NAME`].
pub fn sanitize_name(raw: &str) -> String {
    let trimmed: String = raw.trim().chars().take(NAME_MAX_CHARS).collect();
    if trimmed.is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        trimmed
    }
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerProfile {
    #[serde(default)]
    pub best: u32,
    #[serde(default = "default_name")]
    pub name: String,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            best: 0,
            name: default_name(),
        }
    }
}

/// Handle on the save directory. A store with no directory (no resolvable
/// home, or [`ProfileStore::disabled`]) loads defaults and drops saves.
pub struct ProfileStore {
    dir: Option<PathBuf>,
}

impl ProfileStore {
    /// Resolve ~/.flappy-dopamine. The directory itself is only created on
    /// the first save.
    pub fn open() -> Self {
        Self {
            dir: dirs::home_dir().map(|home| home.join(".flappy-dopamine")),
        }
    }

    /// Store that never touches the filesystem.
    pub fn disabled() -> Self {
        Self { dir: None }
    }

    fn at(dir: PathBuf) -> Self {
        Self { dir: Some(dir) }
    }

    fn profile_path(&self) -> io::Result<PathBuf> {
        let dir = self.dir.as_ref().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "could not determine home directory",
            )
        })?;
        fs::create_dir_all(dir)?;
        Ok(dir.join(PROFILE_FILE))
    }

    /// Load the saved profile, or defaults if missing or unreadable.
    pub fn load(&self) -> PlayerProfile {
        let path = match &self.dir {
            Some(dir) => dir.join(PROFILE_FILE),
            None => return PlayerProfile::default(),
        };
        match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_default(),
            Err(_) => PlayerProfile::default(),
        }
    }

    /// Write the profile as pretty-printed JSON, creating the directory if
    /// needed.
    pub fn save(&self, profile: &PlayerProfile) -> io::Result<()> {
        let path = self.profile_path()?;
        let json = serde_json::to_string_pretty(profile)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, json)?;
        Ok(())
    }
}
