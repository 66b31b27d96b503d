//! Tool configuration and the fixed file layout next to the executable.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{DriveError, Result};

pub const CONFIG_FILE: &str = "config.json";
pub const CREDENTIALS_FILE: &str = "credentials.json";
pub const TOKEN_FILE: &str = "token.json";

/// Settings read once at startup from `config.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Local directory mirroring the root of the user's Drive.
    pub gdrive_path: PathBuf,
    /// Recipient of restricted (writer) shares.
    pub email: String,
}

impl Config {
    /// Load the config from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| DriveError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| DriveError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The Drive root with a leading `~` expanded.
    pub fn drive_root(&self) -> PathBuf {
        expand_tilde(&self.gdrive_path)
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// Locations of the config, client secret and token cache files.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config: PathBuf,
    pub credentials: PathBuf,
    pub token: PathBuf,
}

impl AppPaths {
    /// All three files inside `dir`.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            config: dir.join(CONFIG_FILE),
            credentials: dir.join(CREDENTIALS_FILE),
            token: dir.join(TOKEN_FILE),
        }
    }

    /// All three files in the directory holding the running executable.
    pub fn beside_executable() -> Result<Self> {
        let exe = std::env::current_exe()?;
        let dir = exe.parent().unwrap_or_else(|| Path::new("."));
        Ok(Self::new(dir))
    }
}
