//! Storage utilities for Slow Computer apps
//!
//! Handles JSON preference files, config locations and the directory browser
//! used by "choose folder" dialogs.

use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("File not found: {0}")]
    NotFound(PathBuf),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// A value persisted as a single pretty-printed JSON document.
///
/// Implement it with an empty `impl` block on any serde type with a
/// `Default`; the methods below come for free.
pub trait JsonStore: Serialize + DeserializeOwned + Default {
    fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(StorageError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn save(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Load the document, or write and return the default on first run.
    /// A file that exists but cannot be parsed is an error, not a reset.
    fn load_or_init(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(StorageError::NotFound(_)) => {
                log::info!("creating {}", path.display());
                let fresh = Self::default();
                fresh.save(path)?;
                Ok(fresh)
            }
            other => other,
        }
    }
}

/// Directory browser state for folder pickers.
#[derive(Debug, Clone)]
pub struct DirectoryBrowser {
    pub current_dir: PathBuf,
    pub entries: Vec<DirEntry>,
    pub selected_index: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct DirEntry {
    pub name: String,
    pub path: PathBuf,
}

impl DirectoryBrowser {
    pub fn new(start_dir: PathBuf) -> Self {
        let mut browser = Self {
            current_dir: start_dir,
            entries: Vec::new(),
            selected_index: None,
        };
        browser.refresh();
        browser
    }

    pub fn refresh(&mut self) {
        self.entries.clear();
        self.selected_index = None;

        if let Some(parent) = self.current_dir.parent() {
            self.entries.push(DirEntry {
                name: "..".to_string(),
                path: parent.to_path_buf(),
            });
        }

        let Ok(read_dir) = std::fs::read_dir(&self.current_dir) else {
            log::warn!("cannot read {}", self.current_dir.display());
            return;
        };

        let mut dirs: Vec<DirEntry> = read_dir
            .flatten()
            .filter(|e| e.path().is_dir())
            .map(|e| DirEntry {
                name: e.file_name().to_string_lossy().to_string(),
                path: e.path(),
            })
            // Skip hidden folders
            .filter(|e| !e.name.starts_with('.'))
            .collect();
        dirs.sort_by_key(|d| d.name.to_lowercase());
        self.entries.extend(dirs);
    }

    pub fn navigate_to(&mut self, path: PathBuf) {
        if path.is_dir() {
            self.current_dir = path;
            self.refresh();
        }
    }

    pub fn selected_entry(&self) -> Option<&DirEntry> {
        self.selected_index.and_then(|i| self.entries.get(i))
    }

    /// The folder a "choose" button should return: the selected child,
    /// or the folder being browsed when nothing (or "..") is selected.
    pub fn chosen_dir(&self) -> PathBuf {
        match self.selected_entry() {
            Some(entry) if entry.name != ".." => entry.path.clone(),
            _ => self.current_dir.clone(),
        }
    }
}

/// Get the config directory for Slow Computer apps
pub fn config_dir(app_name: &str) -> PathBuf {
    directories::ProjectDirs::from("co", "slowcomputer", app_name)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the pictures directory
pub fn pictures_dir() -> PathBuf {
    directories::UserDirs::new()
        .and_then(|dirs| dirs.picture_dir().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    impl JsonStore for Sample {}

    #[test]
    fn load_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = Sample::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[test]
    fn load_or_init_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");
        let loaded = Sample::load_or_init(&path).unwrap();
        assert_eq!(loaded, Sample::default());
        assert!(path.exists());
    }

    #[test]
    fn load_or_init_keeps_existing_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        let saved = Sample { name: "slides".into(), count: 3 };
        saved.save(&path).unwrap();
        assert_eq!(Sample::load_or_init(&path).unwrap(), saved);
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = Sample::load_or_init(&path).unwrap_err();
        assert!(matches!(err, StorageError::Json(_)));
    }

    #[test]
    fn browser_lists_only_visible_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("Beta")).unwrap();
        std::fs::create_dir(dir.path().join("alpha")).unwrap();
        std::fs::create_dir(dir.path().join(".hidden")).unwrap();
        std::fs::write(dir.path().join("photo.jpg"), b"x").unwrap();

        let browser = DirectoryBrowser::new(dir.path().to_path_buf());
        let names: Vec<&str> = browser.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["..", "alpha", "Beta"]);
    }

    #[test]
    fn chosen_dir_falls_back_to_current() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("shows")).unwrap();
        let mut browser = DirectoryBrowser::new(dir.path().to_path_buf());
        assert_eq!(browser.chosen_dir(), dir.path());

        browser.selected_index = Some(0); // ".."
        assert_eq!(browser.chosen_dir(), dir.path());

        browser.selected_index = Some(1);
        assert_eq!(browser.chosen_dir(), dir.path().join("shows"));
    }
}
