//! Playlist: the ordered images of the source directory.
//!
//! Slides are expected to be named `<anything>_<number>.<ext>` and play in
//! numeric order. Files that don't follow the pattern sort first.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// Extensions accepted into the playlist (compared case-insensitively)
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// The number between the first `_` and the last `.` of a file name,
/// or 0 when there is no such number or it does not fit an `i32`.
pub fn sequence_number(file_name: &str) -> i32 {
    let start = file_name.find('_').map(|i| i + 1).unwrap_or(0);
    let Some(end) = file_name.rfind('.') else {
        return 0;
    };
    file_name
        .get(start..end)
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn slide_order(a: &Path, b: &Path) -> Ordering {
    let (na, nb) = (file_name(a), file_name(b));
    sequence_number(&na)
        .cmp(&sequence_number(&nb))
        .then_with(|| na.cmp(&nb))
}

/// Supported images directly inside `dir`, in slide order.
/// An unreadable directory yields an empty list.
pub fn scan_directory(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && is_supported(p))
            .collect(),
        Err(e) => {
            log::warn!("cannot read {}: {}", dir.display(), e);
            Vec::new()
        }
    };
    files.sort_by(|a, b| slide_order(a, b));
    files
}

/// File name without its final extension, used as the row label.
pub fn display_name(path: &Path) -> String {
    let name = file_name(path);
    match name.rfind('.') {
        Some(dot) if dot > 0 => name[..dot].to_string(),
        _ => name,
    }
}

/// Playlist state shown in the main window.
#[derive(Debug, Default)]
pub struct Playlist {
    source: PathBuf,
    entries: Vec<PathBuf>,
    selected: Option<usize>,
}

impl Playlist {
    /// Replace the contents; the first entry becomes selected.
    pub fn load(&mut self, source: PathBuf, entries: Vec<PathBuf>) {
        self.selected = if entries.is_empty() { None } else { Some(0) };
        self.source = source;
        self.entries = entries;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.selected = None;
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_path(&self) -> Option<&Path> {
        self.selected.and_then(|i| self.entries.get(i)).map(|p| p.as_path())
    }

    pub fn select(&mut self, index: usize) {
        if index < self.entries.len() {
            self.selected = Some(index);
        }
    }

    pub fn select_next(&mut self) {
        match self.selected {
            Some(i) => self.select((i + 1).min(self.entries.len().saturating_sub(1))),
            None => self.select(0),
        }
    }

    pub fn select_prev(&mut self) {
        match self.selected {
            Some(i) => self.select(i.saturating_sub(1)),
            None => self.select(0),
        }
    }

    pub fn status_text(&self) -> String {
        format!("{}: {} files", self.source.display(), self.entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"").unwrap();
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths.iter().map(|p| file_name(p)).collect()
    }

    #[test]
    fn sequence_number_between_underscore_and_dot() {
        assert_eq!(sequence_number("slide_12.jpg"), 12);
        assert_eq!(sequence_number("show_007.png"), 7);
        assert_eq!(sequence_number("a_b_3.jpeg"), 0);
        assert_eq!(sequence_number("42.png"), 42);
        assert_eq!(sequence_number("cover.png"), 0);
        assert_eq!(sequence_number("no_extension"), 0);
        assert_eq!(sequence_number("odd.name_5"), 0);
        assert_eq!(sequence_number("neg_-4.jpg"), -4);
        assert_eq!(sequence_number("slide_2147483647.jpg"), i32::MAX);
        assert_eq!(sequence_number("slide_3000000000.jpg"), 0);
    }

    #[test]
    fn extension_filter_is_case_insensitive() {
        assert!(is_supported(Path::new("a.JPG")));
        assert!(is_supported(Path::new("a.Jpeg")));
        assert!(is_supported(Path::new("a.png")));
        assert!(!is_supported(Path::new("a.gif")));
        assert!(!is_supported(Path::new("jpg")));
    }

    #[test]
    fn scan_sorts_numerically_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["slide_10.jpg", "slide_2.PNG", "slide_1.jpeg", "notes.txt", "title.png"] {
            touch(dir.path(), name);
        }
        std::fs::create_dir(dir.path().join("folder_3.jpg")).unwrap();

        let files = scan_directory(dir.path());
        assert_eq!(
            names(&files),
            vec!["title.png", "slide_1.jpeg", "slide_2.PNG", "slide_10.jpg"]
        );
    }

    #[test]
    fn ties_fall_back_to_name() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.png", "x_1.png", "y_1.png"] {
            touch(dir.path(), name);
        }
        let files = scan_directory(dir.path());
        assert_eq!(names(&files), vec!["a.png", "b.png", "x_1.png", "y_1.png"]);
    }

    #[test]
    fn missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_directory(&dir.path().join("gone")).is_empty());
    }

    #[test]
    fn display_name_strips_last_extension() {
        assert_eq!(display_name(Path::new("/x/slide_1.jpg")), "slide_1");
        assert_eq!(display_name(Path::new("/x/a.b.png")), "a.b");
        assert_eq!(display_name(Path::new("/x/.png")), ".png");
    }

    #[test]
    fn load_selects_first_and_selection_clamps() {
        let mut playlist = Playlist::default();
        playlist.load(
            PathBuf::from("/shows"),
            vec![PathBuf::from("/shows/a_1.png"), PathBuf::from("/shows/a_2.png")],
        );
        assert_eq!(playlist.selected_index(), Some(0));
        playlist.select_prev();
        assert_eq!(playlist.selected_index(), Some(0));
        playlist.select_next();
        playlist.select_next();
        assert_eq!(playlist.selected_index(), Some(1));
        playlist.select(9);
        assert_eq!(playlist.selected_index(), Some(1));
        assert_eq!(playlist.status_text(), "/shows: 2 files");
    }

    #[test]
    fn empty_load_has_no_selection() {
        let mut playlist = Playlist::default();
        playlist.load(PathBuf::from("/empty"), Vec::new());
        assert_eq!(playlist.selected_index(), None);
        assert!(playlist.selected_path().is_none());
        playlist.select_next();
        assert_eq!(playlist.selected_index(), None);
    }
}
