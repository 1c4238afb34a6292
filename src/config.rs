use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::alphabet::BuiltinAlphabet;
use crate::session::{SessionConfig, DEFAULT_COUNTDOWN_TICKS};
use crate::share::PROMO_URL;

pub const MAX_COUNTDOWN: u8 = 9;
pub const MIN_REFRESH_MS: u64 = 1;

/// Preferences persisted between runs. Scores are never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub alphabet: BuiltinAlphabet,
    pub countdown: u8,
    pub refresh_ms: u64,
    pub promo_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            alphabet: BuiltinAlphabet::Russian,
            countdown: DEFAULT_COUNTDOWN_TICKS,
            refresh_ms: 10,
            promo_url: PROMO_URL.to_string(),
        }
    }
}

impl Config {
    /// Clamp out-of-range values loaded from disk or given on the command line.
    pub fn sanitized(mut self) -> Self {
        self.countdown = self.countdown.clamp(1, MAX_COUNTDOWN);
        self.refresh_ms = self.refresh_ms.max(MIN_REFRESH_MS);
        self
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            countdown_ticks: self.countdown,
            refresh_period: Duration::from_millis(self.refresh_ms),
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
        let path = if let Some(pd) = ProjectDirs::from("", "", "alphabet-typer") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("alphabet_typer_config.json")
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
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg.sanitized(),
            Err(err) => {
                warn!(path = %self.path.display(), %err, "ignoring unreadable config");
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

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            alphabet: BuiltinAlphabet::Greek,
            countdown: 5,
            refresh_ms: 33,
            promo_url: "https://example.org/".into(),
        };
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("nope.json"));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn garbage_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, b"{ not json").unwrap();
        let store = FileConfigStore::with_path(&path);
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn partial_file_fills_defaults_and_clamps() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{"alphabet": "english", "countdown": 0}"#).unwrap();
        let loaded = FileConfigStore::with_path(&path).load();

        assert_eq!(loaded.alphabet, BuiltinAlphabet::English);
        assert_eq!(loaded.countdown, 1);
        assert_eq!(loaded.refresh_ms, Config::default().refresh_ms);
    }

    #[test]
    fn session_config_from_config() {
        let cfg = Config::default();
        let session = cfg.session_config();
        assert_eq!(session.countdown_ticks, 3);
        assert_eq!(session.refresh_period, Duration::from_millis(10));
    }
}
