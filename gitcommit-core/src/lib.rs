//! gitcommit core - idempotent branch, stage, commit and push for git working trees
//!
//! Given an [`OperationRequest`], [`execute`] checks out (or creates) a branch,
//! optionally stages everything, commits, and pushes, and reports whether
//! anything changed. Simulate mode predicts the same verdict without touching
//! the tree.

pub mod config;
pub mod error;
pub mod git;
pub mod report;
pub mod request;
pub mod run;
pub mod runner;
pub mod template;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Config;
pub use error::{Error, Result, SubstitutionError};
pub use git::{RepositoryEngine, StepOutcome, WorkingTree};
pub use report::{DiffSummary, RunOutcomes, RunResult};
pub use request::{OperationRequest, DEFAULT_COMMIT_MESSAGE};
pub use run::{execute, execute_with, run_steps};
pub use runner::{ProcessRunner, ToolInvocation, ToolOutput, ToolRunner};
pub use template::resolve_branch_name;
