//! On-disk layout persistence: default session, favorite layouts, and path
//! favorites.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use itertools::Itertools;
use panehub_core::HubConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LayoutError;
use crate::snapshot::LayoutSnapshot;

pub const SESSION_FILE: &str = "default_session.json";
pub const FAVORITES_FILE: &str = "favorites_dict.json";
pub const PATH_FAVORITES_FILE: &str = "path_favorites.json";
pub const FAVORITE_LAYOUTS_DIR: &str = "FavoriteLayouts";

/// Color of a newly saved favorite layout.
pub const DEFAULT_FAVORITE_COLOR: &str = "#c1e9eb";
/// Color of a newly added path favorite.
pub const DEFAULT_PATH_FAVORITE_COLOR: &str = "#C1D6EE";
/// Color given to favorite layouts stored by older versions without one.
const LEGACY_FAVORITE_COLOR: &str = "white";

/// A named shortcut: a file or directory plus a display color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    pub path: PathBuf,
    pub color: String,
}

impl FavoriteEntry {
    pub fn new(path: impl Into<PathBuf>, color: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            color: color.into(),
        }
    }
}

/// Layout files and favorite indexes kept in one config directory.
#[derive(Debug)]
pub struct LayoutStore {
    dir: PathBuf,
    favorite_limit: usize,
    favorites: IndexMap<String, FavoriteEntry>,
    path_favorites: IndexMap<String, FavoriteEntry>,
}

impl LayoutStore {
    /// Open the store in the configured directory.
    pub fn open(config: &HubConfig) -> Self {
        Self::open_in(config.resolved_config_dir(), config.favorite_limit)
    }

    /// Open the store in `dir`, loading both favorite indexes.
    ///
    /// Missing or unreadable indexes start out empty.
    pub fn open_in(dir: impl Into<PathBuf>, favorite_limit: usize) -> Self {
        let dir = dir.into();
        let favorites = load_index(&dir.join(FAVORITES_FILE), LEGACY_FAVORITE_COLOR);
        let path_favorites = load_index(&dir.join(PATH_FAVORITES_FILE), DEFAULT_PATH_FAVORITE_COLOR);
        tracing::debug!(
            dir = %dir.display(),
            favorites = favorites.len(),
            path_favorites = path_favorites.len(),
            "Opened layout store"
        );

        Self {
            dir,
            favorite_limit,
            favorites,
            path_favorites,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    /// Save `snapshot` as the layout restored on startup.
    pub fn save_session(&self, snapshot: &LayoutSnapshot) -> Result<PathBuf, LayoutError> {
        let path = self.session_path();
        snapshot.write(&path)?;
        Ok(path)
    }

    /// The startup layout, or `None` if none was saved.
    pub fn load_session(&self) -> Result<Option<LayoutSnapshot>, LayoutError> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(None);
        }
        LayoutSnapshot::read(&path).map(Some)
    }

    // --- favorite layouts ---

    /// Favorite layouts in the order they were added.
    pub fn favorites(&self) -> impl Iterator<Item = (&str, &FavoriteEntry)> {
        self.favorites.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn favorite(&self, name: &str) -> Option<&FavoriteEntry> {
        self.favorites.get(name)
    }

    /// Whether another favorite layout can be added.
    pub fn can_add_favorite(&self) -> bool {
        self.favorites.len() < self.favorite_limit
    }

    /// Save `snapshot` as a new favorite layout.
    pub fn add_favorite(
        &mut self,
        name: &str,
        snapshot: &LayoutSnapshot,
    ) -> Result<&FavoriteEntry, LayoutError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LayoutError::EmptyName);
        }
        if self.favorites.contains_key(name) {
            return Err(LayoutError::DuplicateName(name.to_string()));
        }
        if !self.can_add_favorite() {
            return Err(LayoutError::FavoriteLimit(self.favorite_limit));
        }

        let path = self.unused_layout_path(name);
        snapshot.write(&path)?;
        tracing::debug!(name, path = %path.display(), "Saved favorite layout");

        self.favorites.insert(
            name.to_string(),
            FavoriteEntry::new(path, DEFAULT_FAVORITE_COLOR),
        );
        self.save_favorites()?;
        self.favorite(name)
            .ok_or_else(|| LayoutError::UnknownFavorite(name.to_string()))
    }

    /// Overwrite an existing favorite with `snapshot`, keeping its file and
    /// color.
    pub fn overwrite_favorite(
        &mut self,
        name: &str,
        snapshot: &LayoutSnapshot,
    ) -> Result<(), LayoutError> {
        let entry = self
            .favorites
            .get(name)
            .ok_or_else(|| LayoutError::UnknownFavorite(name.to_string()))?;
        snapshot.write(&entry.path)
    }

    /// Read the layout a favorite points at.
    pub fn load_favorite(&self, name: &str) -> Result<LayoutSnapshot, LayoutError> {
        let entry = self
            .favorites
            .get(name)
            .ok_or_else(|| LayoutError::UnknownFavorite(name.to_string()))?;
        if !entry.path.exists() {
            return Err(LayoutError::FavoriteFileMissing {
                name: name.to_string(),
                path: entry.path.clone(),
            });
        }
        LayoutSnapshot::read(&entry.path)
    }

    /// Forget a favorite. Its layout file is left on disk.
    pub fn delete_favorite(&mut self, name: &str) -> Result<FavoriteEntry, LayoutError> {
        let entry = self
            .favorites
            .shift_remove(name)
            .ok_or_else(|| LayoutError::UnknownFavorite(name.to_string()))?;
        self.save_favorites()?;
        Ok(entry)
    }

    pub fn set_favorite_color(&mut self, name: &str, color: &str) -> Result<(), LayoutError> {
        let entry = self
            .favorites
            .get_mut(name)
            .ok_or_else(|| LayoutError::UnknownFavorite(name.to_string()))?;
        entry.color = color.to_string();
        self.save_favorites()
    }

    /// Remove every favorite layout, its index, and all saved layout files.
    pub fn reset_favorites(&mut self) -> Result<(), LayoutError> {
        self.favorites.clear();
        remove_file_if_exists(&self.dir.join(FAVORITES_FILE))?;

        let layouts = self.layouts_dir();
        if layouts.is_dir() {
            fs::remove_dir_all(&layouts).map_err(|e| LayoutError::io(&layouts, e))?;
        }
        tracing::debug!(dir = %self.dir.display(), "Reset favorite layouts");
        Ok(())
    }

    fn layouts_dir(&self) -> PathBuf {
        self.dir.join(FAVORITE_LAYOUTS_DIR)
    }

    /// A file name derived from `name` that no existing file uses.
    fn unused_layout_path(&self, name: &str) -> PathBuf {
        let base: String = name
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();
        let dir = self.layouts_dir();

        let mut path = dir.join(format!("{base}.json"));
        let mut counter = 1;
        while path.exists() {
            path = dir.join(format!("{base}_{counter}.json"));
            counter += 1;
        }
        path
    }

    fn save_favorites(&self) -> Result<(), LayoutError> {
        save_index(&self.dir.join(FAVORITES_FILE), &self.favorites)
    }

    // --- path favorites ---

    /// Path favorites sorted by name.
    pub fn path_favorites(&self) -> impl Iterator<Item = (&str, &FavoriteEntry)> {
        self.path_favorites
            .iter()
            .sorted_by(|a, b| a.0.cmp(b.0))
            .map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn path_favorite(&self, name: &str) -> Option<&FavoriteEntry> {
        self.path_favorites.get(name)
    }

    /// Add a shortcut to an existing directory.
    pub fn add_path_favorite(&mut self, name: &str, path: &Path) -> Result<(), LayoutError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LayoutError::EmptyName);
        }
        if !path.is_dir() {
            return Err(LayoutError::NotADirectory {
                path: path.to_path_buf(),
            });
        }
        if self.path_favorites.contains_key(name) {
            return Err(LayoutError::DuplicateName(name.to_string()));
        }

        self.path_favorites.insert(
            name.to_string(),
            FavoriteEntry::new(path, DEFAULT_PATH_FAVORITE_COLOR),
        );
        self.save_path_favorites()
    }

    /// Rename a path favorite and/or point it somewhere else. The color is
    /// kept.
    pub fn edit_path_favorite(
        &mut self,
        old_name: &str,
        new_name: &str,
        new_path: &Path,
    ) -> Result<(), LayoutError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(LayoutError::EmptyName);
        }
        if !new_path.is_dir() {
            return Err(LayoutError::NotADirectory {
                path: new_path.to_path_buf(),
            });
        }
        if new_name != old_name && self.path_favorites.contains_key(new_name) {
            return Err(LayoutError::DuplicateName(new_name.to_string()));
        }

        let old = self
            .path_favorites
            .shift_remove(old_name)
            .ok_or_else(|| LayoutError::UnknownFavorite(old_name.to_string()))?;
        self.path_favorites
            .insert(new_name.to_string(), FavoriteEntry::new(new_path, old.color));
        self.save_path_favorites()
    }

    pub fn delete_path_favorite(&mut self, name: &str) -> Result<FavoriteEntry, LayoutError> {
        let entry = self
            .path_favorites
            .shift_remove(name)
            .ok_or_else(|| LayoutError::UnknownFavorite(name.to_string()))?;
        self.save_path_favorites()?;
        Ok(entry)
    }

    pub fn set_path_favorite_color(&mut self, name: &str, color: &str) -> Result<(), LayoutError> {
        let entry = self
            .path_favorites
            .get_mut(name)
            .ok_or_else(|| LayoutError::UnknownFavorite(name.to_string()))?;
        entry.color = color.to_string();
        self.save_path_favorites()
    }

    /// Remove every path favorite and the index file.
    pub fn reset_path_favorites(&mut self) -> Result<(), LayoutError> {
        self.path_favorites.clear();
        remove_file_if_exists(&self.dir.join(PATH_FAVORITES_FILE))
    }

    fn save_path_favorites(&self) -> Result<(), LayoutError> {
        save_index(&self.dir.join(PATH_FAVORITES_FILE), &self.path_favorites)
    }
}

/// Read a favorite index, upgrading plain-string entries to `legacy_color`.
fn load_index(path: &Path, legacy_color: &str) -> IndexMap<String, FavoriteEntry> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(_) => return IndexMap::new(),
    };
    let raw: IndexMap<String, Value> = match serde_json::from_slice(&bytes) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(path = %path.display(), "Ignoring unreadable favorite index: {}", e);
            return IndexMap::new();
        }
    };

    raw.into_iter()
        .filter_map(|(name, value)| {
            let entry = match value {
                Value::String(target) => FavoriteEntry::new(target, legacy_color),
                Value::Object(map) => {
                    let target = map.get("path")?.as_str()?;
                    let color = map
                        .get("color")
                        .and_then(Value::as_str)
                        .unwrap_or(legacy_color);
                    FavoriteEntry::new(target, color)
                }
                other => {
                    tracing::warn!(name = %name, value = %other, "Skipping malformed favorite");
                    return None;
                }
            };
            Some((name, entry))
        })
        .collect()
}

fn save_index(path: &Path, index: &IndexMap<String, FavoriteEntry>) -> Result<(), LayoutError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| LayoutError::io(parent, e))?;
    }
    let bytes = serde_json::to_vec_pretty(index).map_err(|e| LayoutError::malformed(path, e))?;
    fs::write(path, bytes).map_err(|e| LayoutError::io(path, e))
}

fn remove_file_if_exists(path: &Path) -> Result<(), LayoutError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(LayoutError::io(path, e)),
    }
}
