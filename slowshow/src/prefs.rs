//! slowShow preferences, stored as JSON in the app's config directory.

use crate::display::DisplayRect;
use serde::{Deserialize, Serialize};
use slowcore::storage::{config_dir, JsonStore};
use std::path::{Path, PathBuf};

/// Main window position and size at last exit, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Folder the playlist is built from; empty until the user picks one.
    pub source_directory: String,
    pub window: Option<WindowGeometry>,
    /// Monitors beyond the one hosting the main window.
    pub displays: Vec<DisplayRect>,
}

impl JsonStore for Preferences {}

impl Preferences {
    pub fn default_path() -> PathBuf {
        config_dir("slowshow").join("prefs.json")
    }

    pub fn source_dir(&self) -> Option<PathBuf> {
        let trimmed = self.source_directory.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(PathBuf::from(trimmed))
        }
    }

    pub fn set_source_directory(&mut self, dir: &Path) {
        self.source_directory = dir.to_string_lossy().to_string();
    }

    /// Save, logging rather than failing: losing a preference is not fatal.
    pub fn persist(&self, path: &Path) {
        match self.save(path) {
            Ok(()) => log::info!("preferences saved to {}", path.display()),
            Err(e) => log::error!("error saving preferences to {}: {}", path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_run_creates_empty_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slowshow").join("prefs.json");
        let prefs = Preferences::load_or_init(&path).unwrap();
        assert!(path.exists());
        assert_eq!(prefs.source_dir(), None);
        assert!(prefs.displays.is_empty());
    }

    #[test]
    fn blank_source_counts_as_unset() {
        let prefs = Preferences {
            source_directory: "   ".into(),
            ..Default::default()
        };
        assert_eq!(prefs.source_dir(), None);
    }

    #[test]
    fn settings_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let mut prefs = Preferences::default();
        prefs.set_source_directory(Path::new("/home/me/slides"));
        prefs.window = Some(WindowGeometry { x: 10.0, y: 20.0, width: 700.0, height: 400.0 });
        prefs.displays.push(DisplayRect::new(1920.0, 0.0, 1280.0, 1024.0));
        prefs.persist(&path);

        let loaded = Preferences::load(&path).unwrap();
        assert_eq!(loaded, prefs);
        assert_eq!(loaded.source_dir(), Some(PathBuf::from("/home/me/slides")));
    }

    #[test]
    fn older_files_without_new_keys_still_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, r#"{ "source_directory": "/pics" }"#).unwrap();
        let prefs = Preferences::load(&path).unwrap();
        assert_eq!(prefs.source_dir(), Some(PathBuf::from("/pics")));
        assert_eq!(prefs.window, None);
    }
}
