//! Playlist thumbnails and the in-memory thumbnail cache.

use crate::loader::{check_decodable, decode, LoadError};
use image::imageops::FilterType;
use image::RgbaImage;
use std::collections::HashMap;
use std::path::Path;

/// Longest edge of a playlist thumbnail, in pixels.
pub const THUMBNAIL_EDGE: u32 = 96;

/// A small preview that remembers the size of the image it came from.
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub pixels: RgbaImage,
    pub original_width: u32,
    pub original_height: u32,
}

impl Thumbnail {
    /// Decode `path` and shrink it to fit a `max_edge` square.
    /// Images already smaller are kept at their own size.
    pub fn generate(path: &Path, max_edge: u32) -> Result<Self, LoadError> {
        let (original_width, original_height) = check_decodable(path)?;
        let decoded = decode(path)?;

        let pixels = if original_width > max_edge || original_height > max_edge {
            decoded.resize(max_edge, max_edge, FilterType::Triangle).to_rgba8()
        } else {
            decoded.to_rgba8()
        };

        Ok(Self {
            pixels,
            original_width,
            original_height,
        })
    }

    pub fn size(&self) -> [usize; 2] {
        [self.pixels.width() as usize, self.pixels.height() as usize]
    }

    /// `[WxH]` label suffix with the original dimensions.
    pub fn dimensions_label(&self) -> String {
        format!("[{}x{}]", self.original_width, self.original_height)
    }
}

/// Thumbnails keyed by file name. The first thumbnail stored under a name wins.
#[derive(Debug, Default)]
pub struct ThumbnailCache {
    entries: HashMap<String, Thumbnail>,
}

impl ThumbnailCache {
    /// Store `thumbnail` unless `name` is already cached.
    /// Returns whether it was stored.
    pub fn insert(&mut self, name: &str, thumbnail: Thumbnail) -> bool {
        if self.entries.contains_key(name) {
            log::info!("thumbnail cache already contains {}; not adding", name);
            return false;
        }
        log::info!("adding {} to thumbnail cache", name);
        self.entries.insert(name.to_string(), thumbnail);
        true
    }

    pub fn get(&self, name: &str) -> Option<&Thumbnail> {
        self.entries.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        log::info!("thumbnail cache cleared");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
