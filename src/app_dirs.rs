use directories::ProjectDirs;
use std::path::PathBuf;

/// File holding the stored app list
pub const APP_LIST_FILE: &str = "ai_apps_list_v3.json";
pub const CONFIG_FILE: &str = "config.json";
pub const LOG_FILE: &str = "appdeck.log";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "appdeck")
    }

    pub fn data_path() -> PathBuf {
        Self::project()
            .map(|pd| pd.data_local_dir().join(APP_LIST_FILE))
            .unwrap_or_else(|| PathBuf::from(APP_LIST_FILE))
    }

    pub fn config_path() -> PathBuf {
        Self::project()
            .map(|pd| pd.config_dir().join(CONFIG_FILE))
            .unwrap_or_else(|| PathBuf::from("appdeck_config.json"))
    }

    pub fn log_path() -> PathBuf {
        Self::project()
            .map(|pd| pd.data_local_dir().join(LOG_FILE))
            .unwrap_or_else(|| PathBuf::from(LOG_FILE))
    }
}
