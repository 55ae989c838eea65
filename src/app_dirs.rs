use directories::ProjectDirs;
use std::path::{Path, PathBuf};

const STATE_DB: &str = "state.db";
const LOG_FILE: &str = "tradle.log";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// `$HOME/.local/state/tradle`, falling back to the platform data dir
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("tradle"),
            )
        } else {
            ProjectDirs::from("", "", "tradle").map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }

    pub fn db_path(state_dir: Option<&Path>) -> Option<PathBuf> {
        Self::resolve(state_dir).map(|dir| dir.join(STATE_DB))
    }

    pub fn log_path(state_dir: Option<&Path>) -> Option<PathBuf> {
        Self::resolve(state_dir).map(|dir| dir.join(LOG_FILE))
    }

    fn resolve(state_dir: Option<&Path>) -> Option<PathBuf> {
        match state_dir {
            Some(dir) => Some(dir.to_path_buf()),
            None => Self::state_dir(),
        }
    }
}
