//! User configuration (~/.sgfrename/config.json)
//!
//! Every key is optional; command-line flags take precedence over the file.

use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::services::template::DEFAULT_FORMAT;
use crate::types::{Result, SgfRenameError};

/// Environment variable pointing at an alternative config file
pub const CONFIG_ENV: &str = "SGFRENAME_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenameConfig {
    /// Filename template
    pub format: String,
    /// Record file extension, without the dot
    pub extension: String,
    /// Descend into subdirectories
    pub recursive: bool,
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_FORMAT.to_string(),
            extension: "sgf".to_string(),
            recursive: false,
        }
    }
}

impl RenameConfig {
    /// `$SGFRENAME_CONFIG`, else `~/.sgfrename/config.json`
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        BaseDirs::new().map(|d| d.home_dir().join(".sgfrename").join("config.json"))
    }

    /// Load from an explicit path (must exist) or the default location (may be absent)
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SgfRenameError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let mut config: RenameConfig = serde_json::from_str(&content).map_err(|e| {
            SgfRenameError::Config(format!("invalid {}: {}", path.display(), e))
        })?;
        config.extension = normalize_extension(&config.extension);
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }
}

/// Drop surrounding whitespace and a leading dot. Case is kept, since globs are case-sensitive.
pub fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_string()
}
