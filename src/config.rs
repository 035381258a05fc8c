// Application configuration
//
// Defaults come from the platform directories; an optional RON file can
// override any field:
//
//   (
//       storage_path: "/home/me/tally/voting_data.json",
//       export_dir: "/home/me/Desktop",
//       pulse_duration_ms: 400,
//       log_filter: "voting_tally=debug",
//   )

use crate::session::store::SNAPSHOT_FILE_NAME;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory name used under the platform data/config directories
pub const APP_DIR_NAME: &str = "voting_tally";

/// Configuration file name inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.ron";

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Snapshot file holding the session
    pub storage_path: PathBuf,
    /// Directory exports are written to
    pub export_dir: PathBuf,
    /// Length of the button pulse after a tap
    pub pulse_duration_ms: u64,
    /// tracing filter directive, overridden by `VOTING_TALLY_LOG`
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("."));

        let export_dir = dirs::download_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            storage_path: data_dir.join(SNAPSHOT_FILE_NAME),
            export_dir,
            pulse_duration_ms: 300,
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Default location of the configuration file, if the platform has one
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load the configuration file at `path`; a missing file yields the defaults
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(contents) => Self::from_ron(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::Io(e)),
        }
    }

    pub fn from_ron(contents: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(contents)?)
    }

    pub fn pulse_duration(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.pulse_duration_ms)
    }
}
