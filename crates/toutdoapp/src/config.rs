//! # Configuration
//!
//! Configuration is managed by [`confique`], which handles layered loading
//! from a TOML file, environment variables, and compiled defaults.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `TOUTDO_DATA_DIR`, `TOUTDO_NOTES_FILE`, `TOUTDO_LOG`.
//! 2. **Config file**: `toutdo.toml` in the OS config directory (via `directories`).
//! 3. **Compiled defaults**: `#[config(default = ...)]`.
//!
//! Callers (the CLI's `--data-dir`) may override fields after loading.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `data_dir` | OS data dir | Directory holding the notes file |
//! | `notes_file` | `notes.json` | File name inside `data_dir` |
//! | `log_level` | `warn` | `env_logger` filter for the CLI |

use crate::error::{Result, ToutdoError};
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "toutdo.toml";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ToutdoConfig {
    /// Directory holding the notes file. Defaults to the OS data directory.
    #[config(env = "TOUTDO_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Name of the notes file inside `data_dir`.
    #[config(env = "TOUTDO_NOTES_FILE", default = "notes.json")]
    pub notes_file: String,

    /// Log filter, e.g. "warn", "debug", "toutdoapp=debug".
    #[config(env = "TOUTDO_LOG", default = "warn")]
    pub log_level: String,
}

impl Default for ToutdoConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            notes_file: "notes.json".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "toutdo", "toutdo")
}

impl ToutdoConfig {
    /// Loads from the environment and the default config file.
    pub fn load() -> Result<Self> {
        match default_config_file() {
            Some(file) => Self::load_from(&file),
            None => Ok(Self::builder().env().load()?),
        }
    }

    /// Loads from the environment and `file`. A missing file is skipped.
    pub fn load_from(file: &Path) -> Result<Self> {
        Ok(Self::builder().env().file(file).load()?)
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| {
                ToutdoError::Config("Could not determine a data directory".to_string())
            })
    }

    /// Full path of the notes file.
    pub fn notes_path(&self) -> Result<PathBuf> {
        let name = self.notes_file.trim();
        if name.is_empty() {
            return Err(ToutdoError::Config("notes_file cannot be empty".to_string()));
        }
        Ok(self.data_dir()?.join(name))
    }
}

/// `toutdo.toml` in the OS config directory.
pub fn default_config_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
