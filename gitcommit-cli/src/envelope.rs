//! JSON request and failure envelopes exchanged with the orchestration engine

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Request fields as read from an `--args-file`; every field is optional so
/// command-line flags can fill the gaps
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct RequestEnvelope {
    pub repo: Option<PathBuf>,
    pub branch: Option<String>,
    pub add_files: Option<bool>,
    pub commit: Option<bool>,
    pub push: Option<bool>,
    pub commit_msg: Option<String>,
    #[serde(alias = "check_mode")]
    pub simulate: Option<bool>,
}

impl RequestEnvelope {
    /// Read an envelope from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read args file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse args file {}", path.display()))
    }
}

/// Printed on stdout when a run fails
#[derive(Debug, Serialize)]
pub struct FailureEnvelope {
    pub failed: bool,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rc: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmd: Option<String>,
}

impl FailureEnvelope {
    /// Build the envelope, pulling exit status and command line out of a tool error
    pub fn from_error(err: &anyhow::Error) -> Self {
        let core = err.downcast_ref::<gitcommit_core::Error>();
        Self {
            failed: true,
            msg: format!("{err:#}"),
            rc: core.and_then(gitcommit_core::Error::exit_status),
            cmd: core.and_then(|e| e.command()).map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_envelope() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("args.json");
        std::fs::write(
            &path,
            r#"{"repo": "/srv/app", "branch": "feature/x", "push": true, "check_mode": true}"#,
        )
        .unwrap();

        let envelope = RequestEnvelope::load(&path).unwrap();
        assert_eq!(envelope.repo, Some(PathBuf::from("/srv/app")));
        assert_eq!(envelope.branch.as_deref(), Some("feature/x"));
        assert_eq!(envelope.push, Some(true));
        assert_eq!(envelope.simulate, Some(true));
        assert_eq!(envelope.commit, None);
    }

    #[test]
    fn test_load_invalid_envelope() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("args.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = RequestEnvelope::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse args file"));
    }

    #[test]
    fn test_failure_from_tool_error() {
        let err = anyhow::Error::new(gitcommit_core::Error::Tool {
            context: "Can't push changes".to_string(),
            command: "git push --set-upstream origin feature/x".to_string(),
            status: 128,
            stderr: "fatal: could not read from remote".to_string(),
        });

        let failure = FailureEnvelope::from_error(&err);
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["failed"], true);
        assert_eq!(json["rc"], 128);
        assert_eq!(json["cmd"], "git push --set-upstream origin feature/x");
        assert_eq!(
            json["msg"],
            "Can't push changes: fatal: could not read from remote"
        );
    }

    #[test]
    fn test_failure_from_other_error() {
        let err = anyhow::anyhow!("missing required argument: branch");
        let json = serde_json::to_value(FailureEnvelope::from_error(&err)).unwrap();

        assert_eq!(json["msg"], "missing required argument: branch");
        assert!(json.get("rc").is_none());
        assert!(json.get("cmd").is_none());
    }
}
