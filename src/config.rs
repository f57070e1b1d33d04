use crate::app_dirs::AppDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_ADVANCE_DELAY_MS: u64 = 1500;
pub const MIN_ADVANCE_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Pause between a correct answer and the next word
    pub advance_delay_ms: u64,
    /// Word packs to load instead of the bundled ones
    pub packs_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            advance_delay_ms: DEFAULT_ADVANCE_DELAY_MS,
            packs_file: None,
        }
    }
}

impl Config {
    /// Advance delay clamped to the supported 1000..=1500 ms window
    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(
            self.advance_delay_ms
                .clamp(MIN_ADVANCE_DELAY_MS, DEFAULT_ADVANCE_DELAY_MS),
        )
    }

    /// Command line flags win over the stored file
    pub fn with_overrides(mut self, advance_delay_ms: Option<u64>, packs_file: Option<PathBuf>) -> Self {
        if let Some(ms) = advance_delay_ms {
            self.advance_delay_ms = ms;
        }
        if packs_file.is_some() {
            self.packs_file = packs_file;
        }
        self
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
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

    #[cfg(test)]
    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(std::io::Error::other)?;
        fs::write(&self.path, data)
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
            Ok(cfg) => cfg,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "ignoring invalid config file");
                Config::default()
            }
        }
    }
}
