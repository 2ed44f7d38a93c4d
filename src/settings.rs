use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::PlayerApp;

/// Returns the path to the settings file: `~/.config/tapedeck/settings.json`
fn settings_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("tapedeck");
    path.push("settings.json");
    path
}

/// What to do when the startup track cannot be found or loaded.
///
/// `Fatal` exits the process with an error, `Lenient` runs the app with
/// playback unavailable. Both behaviors are intentional; neither is assumed
/// to be the right one for every deployment.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadPolicy {
    Fatal,
    #[default]
    Lenient,
}

/// Persisted application settings.
///
/// Serialized as JSON to the platform config directory.
/// Fields use `#[serde(default)]` so that adding new settings
/// won't break existing config files.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    // Playback
    pub volume: f32,
    pub loop_enabled: bool,

    // Startup track
    pub load_policy: LoadPolicy,
    /// Overrides the bundled track when set.
    pub track: Option<PathBuf>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            volume: 1.0,
            loop_enabled: false,
            load_policy: LoadPolicy::default(),
            track: None,
        }
    }
}

impl AppSettings {
    /// Load settings from disk, falling back to defaults on any error.
    pub fn load() -> Self {
        Self::load_from(&settings_path())
    }

    fn load_from(path: &PathBuf) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Failed to parse settings ({}), using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                log::info!("No settings file found ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings to disk as pretty JSON.
    pub fn save(&self) {
        self.save_to(&settings_path());
    }

    fn save_to(&self, path: &PathBuf) {
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::warn!("Failed to create config directory: {}", e);
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    log::warn!("Failed to write settings: {}", e);
                }
            }
            Err(e) => {
                log::warn!("Failed to serialize settings: {}", e);
            }
        }
    }

    /// Extract current settings from the running application.
    pub fn from_app(app: &PlayerApp) -> Self {
        Self {
            volume: app.player.volume,
            loop_enabled: app.player.loop_playback,
            load_policy: app.load_policy,
            track: app.track_override.clone(),
        }
    }

    /// Apply loaded settings to the running application.
    pub fn apply(&self, app: &mut PlayerApp) {
        app.player.volume = self.volume.clamp(0.0, 1.0);
        app.player.sync_volume();
        app.player.loop_playback = self.loop_enabled;
        app.load_policy = self.load_policy;
        app.track_override = self.track.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let settings = AppSettings {
            volume: 0.4,
            loop_enabled: true,
            load_policy: LoadPolicy::Fatal,
            track: Some(PathBuf::from("/music/other.flac")),
        };
        settings.save_to(&path);

        let loaded = AppSettings::load_from(&path);
        assert_eq!(loaded.volume, 0.4);
        assert!(loaded.loop_enabled);
        assert_eq!(loaded.load_policy, LoadPolicy::Fatal);
        assert_eq!(loaded.track, Some(PathBuf::from("/music/other.flac")));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = AppSettings::load_from(&dir.path().join("absent.json"));
        assert_eq!(loaded.volume, 1.0);
        assert!(!loaded.loop_enabled);
        assert_eq!(loaded.load_policy, LoadPolicy::Lenient);
        assert!(loaded.track.is_none());
    }

    #[test]
    fn unknown_fields_are_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"volume": 0.5, "theme": "green"}"#).unwrap();

        let loaded = AppSettings::load_from(&path);
        assert_eq!(loaded.volume, 0.5);
        assert_eq!(loaded.load_policy, LoadPolicy::Lenient);
    }
}
