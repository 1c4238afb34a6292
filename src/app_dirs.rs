use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Default location for the log file when `--log-file` is given without a path
    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("alphabet-typer");
            Some(state_dir.join("alphabet-typer.log"))
        } else {
            ProjectDirs::from("", "", "alphabet-typer")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("alphabet-typer.log"))
        }
    }
}
