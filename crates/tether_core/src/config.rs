//! Bridge configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Where the script side finds its well-known module, and how scripts reach the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Module whose exports are callable from the host.
    pub module: String,
    /// Global object through which scripts call host functions (`host.call(...)`).
    pub host_object: String,
    /// Directories searched, in order, for `<module>.js`.
    pub search_paths: Vec<PathBuf>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            module: "call".to_string(),
            host_object: "host".to_string(),
            search_paths: Vec::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl BridgeConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// File name looked up in each search path.
    pub fn module_file_name(&self) -> String {
        format!("{}.js", self.module)
    }

    /// First search path that holds the module file, if any.
    pub fn locate_module(&self) -> Option<PathBuf> {
        let file_name = self.module_file_name();
        self.search_paths
            .iter()
            .map(|dir| dir.join(&file_name))
            .find(|candidate| candidate.is_file())
    }
}
