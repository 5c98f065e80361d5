//! Runtime configuration.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Name of the settings file inside the config directory.
const SETTINGS_FILE: &str = "settings.toml";

/// Size of the area panels are arranged in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1200, 800)
    }
}

/// Configuration for file operations and layout persistence.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct HubConfig {
    /// Maximum number of undo records kept.
    #[builder(default = "10")]
    pub max_undo: usize,

    /// Base name used when creating a new directory.
    #[builder(default = "\"New Folder\".to_string()")]
    pub new_folder_name: String,

    /// Directory the per-run backup area is created in (None = OS temp dir).
    #[builder(default)]
    pub backup_root: Option<PathBuf>,

    /// Prefix of the per-run backup directory.
    #[builder(default = "\"panehub-undo-\".to_string()")]
    pub backup_prefix: String,

    /// Carry access and modification times over to copies.
    #[builder(default = "true")]
    pub preserve_timestamps: bool,

    /// Line capacities used when none (or no valid ones) are configured.
    #[builder(default = "vec![3]")]
    pub default_capacities: Vec<u32>,

    /// Maximum number of favorite layouts.
    #[builder(default = "20")]
    pub favorite_limit: usize,

    /// Directory holding sessions and favorites (None = platform config dir).
    #[builder(default)]
    pub config_dir: Option<PathBuf>,

    /// Initial arrangement area.
    #[builder(default)]
    pub viewport: Viewport,
}

impl HubConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.max_undo == Some(0) {
            return Err("max_undo must be at least 1".to_string());
        }
        if let Some(ref name) = self.new_folder_name {
            if name.trim().is_empty() {
                return Err("new_folder_name cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

impl HubConfig {
    /// Create a new config builder.
    pub fn builder() -> HubConfigBuilder {
        HubConfigBuilder::default()
    }

    /// The directory sessions and favorites are stored in.
    pub fn resolved_config_dir(&self) -> PathBuf {
        self.config_dir.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("panehub")
        })
    }

    /// Path of the settings file for this config.
    pub fn settings_path(&self) -> PathBuf {
        self.resolved_config_dir().join(SETTINGS_FILE)
    }

    /// Load settings from the platform config dir, or return defaults.
    pub fn load() -> Self {
        Self::default().reload()
    }

    /// Re-read settings from this config's settings file.
    ///
    /// Falls back to `self` when the file is missing or malformed.
    pub fn reload(self) -> Self {
        let path = self.settings_path();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(_) => return self,
        };
        match toml::from_str::<HubConfig>(&content) {
            Ok(mut loaded) => {
                if loaded.config_dir.is_none() {
                    loaded.config_dir = self.config_dir;
                }
                loaded.sanitized()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "Ignoring malformed settings: {}", e);
                self
            }
        }
    }

    /// Save settings to disk.
    pub fn save(&self) -> std::io::Result<()> {
        let path = self.settings_path();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        std::fs::write(&path, content)
    }

    /// Replace values a hand-edited settings file may have broken.
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.max_undo == 0 {
            self.max_undo = defaults.max_undo;
        }
        if self.new_folder_name.trim().is_empty() {
            self.new_folder_name = defaults.new_folder_name;
        }
        if self.default_capacities.is_empty() || self.default_capacities.contains(&0) {
            self.default_capacities = defaults.default_capacities;
        }
        self
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            max_undo: 10,
            new_folder_name: "New Folder".to_string(),
            backup_root: None,
            backup_prefix: "panehub-undo-".to_string(),
            preserve_timestamps: true,
            default_capacities: vec![3],
            favorite_limit: 20,
            config_dir: None,
            viewport: Viewport::default(),
        }
    }
}
