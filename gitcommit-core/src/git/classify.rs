//! Exit-status classification for commit and push
//!
//! `git commit` and `git push` use their exit status and output together to
//! say "nothing to do". These functions turn that into a [`StepStatus`].

use super::predicates::{indicates_clean_tree, indicates_remote_current};
use crate::runner::ToolOutput;

/// How a step's tool invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// The command made (or would make) a change
    Success,
    /// The command had nothing to do
    NoOpClean,
    /// The command failed with the given exit status
    Failure(i32),
}

impl StepStatus {
    /// Whether the step changed state
    pub fn changed(self) -> bool {
        matches!(self, StepStatus::Success)
    }
}

/// Classify the result of `git commit -a`.
///
/// - status 1 with "nothing to commit" on stdout: [`StepStatus::NoOpClean`]
/// - status 2 and above, or a signal: [`StepStatus::Failure`]
/// - anything else, including status 1 without the clean-tree message:
///   [`StepStatus::Success`]
pub fn classify_commit(output: &ToolOutput) -> StepStatus {
    match output.status {
        1 if indicates_clean_tree(&output.stdout) => StepStatus::NoOpClean,
        status if status >= 2 || status < 0 => StepStatus::Failure(status),
        _ => StepStatus::Success,
    }
}

/// Classify the result of `git push`.
///
/// - status 0 with "Everything up-to-date" on stderr: [`StepStatus::NoOpClean`]
/// - any non-zero status: [`StepStatus::Failure`]
/// - otherwise: [`StepStatus::Success`]
pub fn classify_push(output: &ToolOutput) -> StepStatus {
    match output.status {
        0 if indicates_remote_current(&output.stderr) => StepStatus::NoOpClean,
        0 => StepStatus::Success,
        status => StepStatus::Failure(status),
    }
}
