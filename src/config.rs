//! Scan configuration
//!
//! Loaded from `depguess.toml` in the scan root, or from a file named on
//! the command line. Every field is optional.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File looked up in the scan root when no config is given explicitly
pub const CONFIG_FILE_NAME: &str = "depguess.toml";

/// Directory names never descended into
///
/// Dependency caches, build output and VCS metadata.
pub const DEFAULT_IGNORED_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    ".cache",
    ".config",
    ".next",
    ".nuxt",
    ".yarn",
    ".pnpm-store",
    ".venv",
    "__pycache__",
    "bower_components",
    "build",
    "coverage",
    "dist",
    "node_modules",
    "target",
    "vendor",
    "venv",
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Options for one scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Extra directory names to skip, on top of [`DEFAULT_IGNORED_DIRS`]
    pub ignored_dirs: Vec<String>,
    /// Upper bound on files extracted at once (defaults to available cores)
    ///
    /// A file that hits `task_timeout_secs` frees its slot while its parser
    /// thread runs on, so repeated timeouts can exceed this bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrency: Option<usize>,
    /// Give up on a single file after this many seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_timeout_secs: Option<u64>,
}

impl ScanConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `depguess.toml` from the scan root, falling back to defaults
    pub fn discover(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(Self::default());
        }
        tracing::debug!("Loading config from {}", path.display());
        Self::load(&path)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrency == Some(0) {
            return Err(ConfigError::Invalid(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.task_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "task_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Override file values with command-line flags
    pub fn with_overrides(
        mut self,
        max_concurrency: Option<usize>,
        task_timeout_secs: Option<u64>,
    ) -> Result<Self, ConfigError> {
        if max_concurrency.is_some() {
            self.max_concurrency = max_concurrency;
        }
        if task_timeout_secs.is_some() {
            self.task_timeout_secs = task_timeout_secs;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check whether a directory's base name is excluded from the walk
    pub fn is_ignored_directory(&self, name: &str) -> bool {
        DEFAULT_IGNORED_DIRS.contains(&name) || self.ignored_dirs.iter().any(|d| d == name)
    }

    /// Resolved concurrency cap
    ///
    /// Bounds scheduled extractions, not threads: timed-out parses keep
    /// their blocking thread and open file until they finish.
    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        })
    }

    pub fn task_timeout(&self) -> Option<Duration> {
        self.task_timeout_secs.map(Duration::from_secs)
    }
}
