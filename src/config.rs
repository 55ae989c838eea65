use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::share::ShareFlags;

/// Display settings; none of them affect scoring
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Keep the exports visualization hidden until the player asks for it
    pub hide_image_mode: bool,
    pub rotation_mode: bool,
}

impl Config {
    /// Settings switched on from the command line are added to the stored ones
    pub fn with_overrides(self, hide_image_mode: bool, rotation_mode: bool) -> Self {
        Self {
            hide_image_mode: self.hide_image_mode || hide_image_mode,
            rotation_mode: self.rotation_mode || rotation_mode,
        }
    }
}

impl From<Config> for ShareFlags {
    fn from(cfg: Config) -> Self {
        Self {
            hide_image_mode: cfg.hide_image_mode,
            rotation_mode: cfg.rotation_mode,
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
        let path = if let Some(pd) = ProjectDirs::from("", "", "tradle") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("tradle_config.json")
        };
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
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<Config>(&bytes) {
                return cfg;
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
