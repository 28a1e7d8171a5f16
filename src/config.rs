use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::column::DEFAULT_WIDTH;
use crate::exercise::grid::DEFAULT_SPACING;
use crate::playback::{CLASSIC_DEFAULT_WPM, WALL_DEFAULT_WPM};
use crate::stimulus::schulte::DEFAULT_GRID_SIZE;
use crate::stimulus::SupportedLanguage;

/// Persisted defaults. Missing fields fall back to their defaults so older
/// files keep loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub language: SupportedLanguage,
    pub rsvp_wpm: u32,
    pub wall_wpm: u32,
    pub chunk_size: usize,
    pub column_width: usize,
    pub schulte_size: usize,
    pub grid_spacing: u16,
    pub generator_cmd: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: SupportedLanguage::Polish,
            rsvp_wpm: CLASSIC_DEFAULT_WPM,
            wall_wpm: WALL_DEFAULT_WPM,
            chunk_size: 1,
            column_width: DEFAULT_WIDTH,
            schulte_size: DEFAULT_GRID_SIZE,
            grid_spacing: DEFAULT_SPACING,
            generator_cmd: None,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("glance_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return Config::default(),
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
