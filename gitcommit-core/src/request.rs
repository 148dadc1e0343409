//! The operation request

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Commit message used when none is given
pub const DEFAULT_COMMIT_MESSAGE: &str = "Commit from git_commit module";

/// What a single run should do
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OperationRequest {
    /// Path to the git working tree
    pub repo: PathBuf,

    /// Branch name template; may contain `${VAR}` placeholders
    pub branch: String,

    /// Stage all new, modified and deleted files
    #[serde(default)]
    pub add_files: bool,

    /// Commit tracked modifications
    #[serde(default)]
    pub commit: bool,

    /// Push the branch to the remote
    #[serde(default)]
    pub push: bool,

    /// Commit message
    #[serde(default = "default_commit_message")]
    pub commit_msg: String,

    /// Predict outcomes without mutating anything
    #[serde(default, alias = "check_mode")]
    pub simulate: bool,
}

fn default_commit_message() -> String {
    DEFAULT_COMMIT_MESSAGE.to_string()
}

impl OperationRequest {
    /// A request that only checks out (or creates) `branch`
    pub fn new(repo: impl Into<PathBuf>, branch: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            branch: branch.into(),
            add_files: false,
            commit: false,
            push: false,
            commit_msg: default_commit_message(),
            simulate: false,
        }
    }

    /// Also stage files
    pub fn with_add_files(mut self, add_files: bool) -> Self {
        self.add_files = add_files;
        self
    }

    /// Also commit
    pub fn with_commit(mut self, commit: bool) -> Self {
        self.commit = commit;
        self
    }

    /// Also push
    pub fn with_push(mut self, push: bool) -> Self {
        self.push = push;
        self
    }

    /// Set the commit message
    pub fn with_commit_msg(mut self, message: impl Into<String>) -> Self {
        self.commit_msg = message.into();
        self
    }

    /// Run in simulate mode
    pub fn with_simulate(mut self, simulate: bool) -> Self {
        self.simulate = simulate;
        self
    }

    /// Parse a request from a JSON object
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
