//! Engine configuration, read from `lexigrow.toml` in the data directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "lexigrow.toml";
pub const TEACHER_PASSWORD_ENV: &str = "TEACHER_PASSWORD";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Top-level LexiGrow configuration.
///
/// Note: Custom Debug impl masks the teacher password so it never reaches logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexiGrowConfig {
    /// Directory holding the database and config file.
    pub data_dir: PathBuf,
    /// Database file name inside `data_dir`.
    pub database_file: String,
    /// How long a writer waits for the database lock.
    pub busy_timeout_ms: u64,
    /// Shared secret for the teacher gate.
    pub teacher_password: Option<String>,
    /// Number of XP events shown on a profile.
    pub recent_events_limit: usize,
}

impl std::fmt::Debug for LexiGrowConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LexiGrowConfig")
            .field("data_dir", &self.data_dir)
            .field("database_file", &self.database_file)
            .field("busy_timeout_ms", &self.busy_timeout_ms)
            .field(
                "teacher_password",
                &self.teacher_password.as_ref().map(|_| "***"),
            )
            .field("recent_events_limit", &self.recent_events_limit)
            .finish()
    }
}

impl Default for LexiGrowConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir().unwrap_or_else(|| PathBuf::from(".lexigrow")),
            database_file: "lexigrow.db".to_string(),
            busy_timeout_ms: 5000,
            teacher_password: None,
            recent_events_limit: 10,
        }
    }
}

/// Get the default data directory
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join("lexigrow"))
}

impl LexiGrowConfig {
    /// Load configuration for a data directory (or the default one).
    ///
    /// Missing config file means defaults. `TEACHER_PASSWORD` in the
    /// environment takes precedence over the file.
    pub fn load(data_dir: Option<PathBuf>) -> Result<Self, ConfigError> {
        let dir = match data_dir.clone() {
            Some(dir) => dir,
            None => Self::default().data_dir,
        };

        let mut config = Self::from_file(&dir.join(CONFIG_FILE_NAME))?;
        if data_dir.is_some() || config.data_dir.as_os_str().is_empty() {
            config.data_dir = dir;
        }

        if let Ok(password) = std::env::var(TEACHER_PASSWORD_ENV) {
            if !password.is_empty() {
                config.teacher_password = Some(password);
            }
        }

        Ok(config)
    }

    /// Read a config file; defaults when it does not exist.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        log::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}
