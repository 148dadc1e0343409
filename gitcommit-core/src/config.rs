//! Configuration management for gitcommit
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (GITCOMMIT_*)
//! 3. Config file (~/.config/gitcommit/config.toml)
//! 4. Default values

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::git::{DEFAULT_GIT, DEFAULT_REMOTE};
use crate::request::DEFAULT_COMMIT_MESSAGE;
use crate::{Error, Result};

/// Environment variable overriding the git executable
pub const ENV_GIT_PATH: &str = "GITCOMMIT_GIT_PATH";

/// Environment variable overriding the push remote
pub const ENV_REMOTE: &str = "GITCOMMIT_REMOTE";

/// Git-related configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GitConfig {
    /// Path to the git executable
    pub executable: String,

    /// Remote used by the push step
    pub remote: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            executable: DEFAULT_GIT.to_string(),
            remote: DEFAULT_REMOTE.to_string(),
        }
    }
}

/// Request defaults
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Defaults {
    /// Commit message used when a request does not give one
    pub commit_message: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Git configuration
    pub git: GitConfig,

    /// Request defaults
    pub defaults: Defaults,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
            tracing::debug!(path = %path.display(), "No config file, using defaults");
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        toml::from_str(&contents).map_err(|e| {
            Error::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/gitcommit/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gitcommit").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - GITCOMMIT_GIT_PATH: Path to git executable
    /// - GITCOMMIT_REMOTE: Remote to push to
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(git_path) = lookup(ENV_GIT_PATH) {
            self.git.executable = git_path;
        }

        if let Some(remote) = lookup(ENV_REMOTE) {
            self.git.remote = remote;
        }

        self
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, git_path: Option<String>, remote: Option<String>) -> Self {
        if let Some(path) = git_path {
            self.git.executable = path;
        }

        if let Some(r) = remote {
            self.git.remote = r;
        }

        self
    }

    /// Reject values that cannot produce a working invocation
    pub fn validate(self) -> Result<Self> {
        if self.git.executable.trim().is_empty() {
            return Err(Error::Config("git.executable must not be empty".to_string()));
        }
        if self.git.remote.trim().is_empty() {
            return Err(Error::Config("git.remote must not be empty".to_string()));
        }
        Ok(self)
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults. An explicit
    /// `config_path` must exist.
    pub fn load_with_overrides(
        config_path: Option<&Path>,
        git_path: Option<String>,
        remote: Option<String>,
    ) -> Result<Self> {
        let base = match config_path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load()?,
        };

        base.with_env_overrides()
            .with_cli_overrides(git_path, remote)
            .validate()
    }
}
