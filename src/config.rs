use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app_dirs::AppDirs;
use crate::query::SortMode;
use crate::theme::Theme;

pub const DEFAULT_PAGE_SIZE: usize = 8;
const MOTION_MS: u64 = 180;
const SKELETON_MS: u64 = 200;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub theme: Theme,
    pub page_size: usize,
    pub reduced_motion: bool,
    pub default_sort: SortMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            page_size: DEFAULT_PAGE_SIZE,
            reduced_motion: false,
            default_sort: SortMode::CreatedDesc,
        }
    }
}

impl Config {
    /// Transition speed; zero when motion is reduced
    pub fn motion_speed(&self) -> Duration {
        if self.reduced_motion {
            Duration::ZERO
        } else {
            Duration::from_millis(MOTION_MS)
        }
    }

    /// How long placeholder rows show before the first real render
    pub fn skeleton_delay(&self) -> Duration {
        if self.reduced_motion {
            Duration::ZERO
        } else {
            Duration::from_millis(SKELETON_MS)
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
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
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
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), error = %e, "ignoring malformed config")
                }
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(std::io::Error::other)?;
        fs::write(&self.path, data)?;
        tracing::debug!(path = %self.path.display(), theme = %cfg.theme, "saved config");
        Ok(())
    }
}

/// Config store that never touches disk
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    cfg: std::cell::RefCell<Config>,
}

impl MemoryConfigStore {
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg: std::cell::RefCell::new(cfg),
        }
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Config {
        self.cfg.borrow().clone()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        *self.cfg.borrow_mut() = cfg.clone();
        Ok(())
    }
}
