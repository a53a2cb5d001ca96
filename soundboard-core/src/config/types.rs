//! Configuration types for soundboard definitions.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::controller::{ControlId, SoundId};
use crate::error::{Error, Result};
use crate::resolve::{filename_from_label, sanitize_label};

/// Complete board configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BoardConfig {
    pub name: String,
    /// Directory holding the sound files, relative to the board file unless absolute.
    #[serde(default = "default_sounds_dir")]
    pub sounds_dir: PathBuf,
    /// Extension appended to ids derived from button labels.
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Optional single-character shortcut for stop.
    #[serde(default)]
    pub stop_key: Option<String>,
    #[serde(default)]
    pub buttons: Vec<ButtonConfig>,
    /// Full path to the source YAML file this board was loaded from.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl BoardConfig {
    /// Returns the sounds directory, resolved against the board file's directory.
    pub fn sounds_path(&self) -> PathBuf {
        if self.sounds_dir.is_absolute() {
            return self.sounds_dir.clone();
        }
        match self.source_path.as_deref().and_then(Path::parent) {
            Some(base) => base.join(&self.sounds_dir),
            None => self.sounds_dir.clone(),
        }
    }

    /// Returns the stop shortcut as a lowercase character, if one is configured.
    pub fn stop_char(&self) -> Option<char> {
        self.stop_key.as_deref().and_then(single_char)
    }
}

fn default_sounds_dir() -> PathBuf {
    PathBuf::from("sounds")
}

fn default_extension() -> String {
    "mp3".to_string()
}

/// A single soundboard button.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ButtonConfig {
    /// Text shown on the button; also the source of the derived sound id.
    pub label: String,
    /// Explicit sound file, used instead of deriving one from the label.
    #[serde(default)]
    pub file: Option<String>,
    /// Optional single-character keyboard shortcut.
    #[serde(default)]
    pub key: Option<String>,
}

impl ButtonConfig {
    /// Returns the file this button plays: the override, or the label-derived name.
    pub fn sound_file(&self, extension: &str) -> String {
        match self.override_file() {
            Some(file) => file.to_string(),
            None => filename_from_label(&self.label, extension),
        }
    }

    /// Returns the sound id for this button.
    ///
    /// Fails with `Error::EmptySoundId` when the label sanitizes to nothing
    /// and there is no file override.
    pub fn sound_id(&self, extension: &str) -> Result<SoundId> {
        if self.override_file().is_none() && sanitize_label(&self.label).is_empty() {
            return Err(Error::EmptySoundId);
        }
        SoundId::new(self.sound_file(extension))
    }

    fn override_file(&self) -> Option<&str> {
        self.file.as_deref().map(str::trim).filter(|f| !f.is_empty())
    }

    /// Returns the control identity for this button (its trimmed label).
    pub fn control_id(&self) -> ControlId {
        ControlId::new(self.label.trim())
    }

    /// Returns the shortcut as a lowercase character, if one is configured.
    pub fn key_char(&self) -> Option<char> {
        self.key.as_deref().and_then(single_char)
    }
}

/// Parses a one-character key binding, lowercased.
pub(crate) fn single_char(key: &str) -> Option<char> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.to_lowercase().next(),
        _ => None,
    }
}
