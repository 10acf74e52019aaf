//! Repository configuration loading (`repository.toml`).
//!
//! ```toml
//! [repository]
//! type = "local"
//! seed_file = "directory.json"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::db::factory::RepositoryType;
use crate::db::repository::{RepositoryError, RepositoryResult};

const DEFAULT_CONFIG_FILE: &str = "repository.toml";
const CONFIG_PATH_ENV: &str = "CLASSTABLE_CONFIG";

#[derive(Debug, Clone, Deserialize)]
struct RepositorySection {
    #[serde(rename = "type", default = "default_repository_type")]
    kind: String,
    #[serde(default)]
    seed_file: Option<PathBuf>,
}

impl Default for RepositorySection {
    fn default() -> Self {
        Self {
            kind: default_repository_type(),
            seed_file: None,
        }
    }
}

fn default_repository_type() -> String {
    "local".to_string()
}

/// Parsed repository configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepositoryConfig {
    #[serde(default)]
    repository: RepositorySection,
}

impl RepositoryConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> RepositoryResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            RepositoryError::configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> RepositoryResult<Self> {
        toml::from_str(raw)
            .map_err(|e| RepositoryError::configuration(format!("Invalid repository config: {}", e)))
    }

    /// Search the standard locations: `$CLASSTABLE_CONFIG`, then
    /// `./repository.toml`. Falls back to defaults when neither exists.
    pub fn from_default_location() -> RepositoryResult<Self> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Self::from_file(path);
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::from_file(local);
        }
        Ok(Self::default())
    }

    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        self.repository.kind.parse()
    }

    /// Optional directory seed file for the local backend.
    pub fn seed_file(&self) -> Option<&Path> {
        self.repository.seed_file.as_deref()
    }
}
