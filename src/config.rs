//! Application settings, read from an optional YAML file.
//!
//! ```yaml
//! store-dir: /home/piper/.local/share/reel
//! recent-sessions: 5
//! headers:
//!   meter: 6/8
//!   tempo: "100"
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::ReelError;
use crate::tunebook::HeaderDefaults;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Directory holding the tune and session collections.
    pub store_dir: PathBuf,
    /// How many sessions `show` lists for a tune.
    pub recent_sessions: usize,
    pub headers: HeaderDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from(".reel"),
            recent_sessions: 5,
            headers: HeaderDefaults::default(),
        }
    }
}

impl Config {
    pub fn from_yaml_str(content: &str) -> Result<Self, ReelError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| ReelError::Config(e.to_string()))
    }

    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ReelError> {
        match fs::read_to_string(path) {
            Ok(content) => {
                debug!(path = %path.display(), "reading config");
                Self::from_yaml_str(&content)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }
}
