//! Run result assembly

use serde::{Deserialize, Serialize};

use crate::git::StepOutcome;
use crate::request::OperationRequest;

/// Before/after block shown by the orchestration engine's diff view.
///
/// `before` is always a single blank line; `after` is the commit step's
/// output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DiffSummary {
    /// Always empty
    pub before_header: String,
    /// Always a single newline
    pub before: String,
    /// Fixed `Commit changes:` label
    pub after_header: String,
    /// Commit stdout plus a trailing newline; `"\n"` when commit did not run
    pub after: String,
}

impl DiffSummary {
    /// Build the summary from the commit step's stdout, if commit ran
    pub fn from_commit_output(output: Option<&str>) -> Self {
        Self {
            before_header: String::new(),
            before: "\n".to_string(),
            after_header: "Commit changes:".to_string(),
            after: format!("{}\n", output.unwrap_or_default()),
        }
    }
}

/// Outcomes of the steps that ran, in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutcomes {
    /// Checkout always runs
    pub checkout: StepOutcome,
    /// `None` when staging was not requested
    pub add: Option<StepOutcome>,
    /// `None` when commit was not requested
    pub commit: Option<StepOutcome>,
    /// `None` when push was not requested
    pub push: Option<StepOutcome>,
}

impl RunOutcomes {
    /// The run-level verdict.
    ///
    /// Each requested step supersedes the ones before it, so this is the
    /// `changed` flag of the last step that ran. Steps that were not
    /// requested contribute nothing.
    pub fn changed(&self) -> bool {
        self.push
            .as_ref()
            .or(self.commit.as_ref())
            .or(self.add.as_ref())
            .unwrap_or(&self.checkout)
            .changed
    }
}

/// Final result of a successful run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RunResult {
    /// Verdict of the last step that ran (see [`RunOutcomes::changed`])
    pub changed: bool,
    /// Always `Success`; failures are reported as errors instead
    pub msg: String,
    /// Echo of the request's `push` flag
    pub pushed: bool,
    /// Echo of the request's `commit` flag
    pub committed: bool,
    /// Echo of the request's `add_files` flag
    pub files_added: bool,
    /// Branch name after template substitution
    pub branch: String,
    /// Working tree path as given in the request
    pub repo: String,
    /// Commit message as given in the request
    pub commit_message: String,
    /// Before/after view of the commit step
    pub diff: DiffSummary,
}

impl RunResult {
    /// Assemble the result for `request` from the outcomes of its steps
    pub fn from_outcomes(request: &OperationRequest, branch: &str, outcomes: &RunOutcomes) -> Self {
        Self {
            changed: outcomes.changed(),
            msg: "Success".to_string(),
            pushed: request.push,
            committed: request.commit,
            files_added: request.add_files,
            branch: branch.to_string(),
            repo: request.repo.display().to_string(),
            commit_message: request.commit_msg.clone(),
            diff: DiffSummary::from_commit_output(
                outcomes.commit.as_ref().map(|c| c.detail.as_str()),
            ),
        }
    }
}
