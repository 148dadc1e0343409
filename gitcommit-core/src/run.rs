//! Run sequencing
//!
//! Resolves the branch name, then runs checkout and whichever of add, commit
//! and push were requested, in that order. The first failing step ends the
//! run; earlier steps are not undone.

use std::collections::HashMap;

use crate::config::Config;
use crate::git::{RepositoryEngine, WorkingTree};
use crate::report::{RunOutcomes, RunResult};
use crate::request::OperationRequest;
use crate::runner::{ProcessRunner, ToolRunner};
use crate::template::resolve_branch_name;
use crate::Result;

/// Run the requested steps on an already-configured engine
pub fn run_steps<R: ToolRunner>(
    engine: &RepositoryEngine<R>,
    request: &OperationRequest,
    branch: &str,
) -> Result<RunOutcomes> {
    let checkout = engine.checkout_branch(branch)?;

    let add = if request.add_files {
        Some(engine.stage_all()?)
    } else {
        None
    };

    let commit = if request.commit {
        Some(engine.commit_changes(&request.commit_msg)?)
    } else {
        None
    };

    let push = if request.push {
        Some(engine.push_changes(branch)?)
    } else {
        None
    };

    Ok(RunOutcomes {
        checkout,
        add,
        commit,
        push,
    })
}

/// Run `request` against a real working tree.
///
/// `vars` supplies the values for placeholders in the branch template,
/// typically the process environment.
pub fn execute(
    request: &OperationRequest,
    vars: &HashMap<String, String>,
    config: &Config,
) -> Result<RunResult> {
    let branch = resolve_branch_name(&request.branch, vars)?;

    let tree = WorkingTree::open(&request.repo)?;
    tracing::info!(
        repo = %tree.root().display(),
        branch = %branch,
        current = ?tree.current_branch(),
        simulate = request.simulate,
        "Starting run"
    );

    run_resolved(ProcessRunner::new(), request, branch, config)
}

/// Run `request` with a caller-supplied runner.
///
/// Skips working-tree validation; the runner is the only thing that touches
/// the repository.
pub fn execute_with<R: ToolRunner>(
    runner: R,
    request: &OperationRequest,
    vars: &HashMap<String, String>,
    config: &Config,
) -> Result<RunResult> {
    let branch = resolve_branch_name(&request.branch, vars)?;
    run_resolved(runner, request, branch, config)
}

fn run_resolved<R: ToolRunner>(
    runner: R,
    request: &OperationRequest,
    branch: String,
    config: &Config,
) -> Result<RunResult> {
    let engine = RepositoryEngine::new(runner, &request.repo, request.simulate)
        .with_git_path(config.git.executable.as_str())
        .with_remote(config.git.remote.as_str());

    let outcomes = run_steps(&engine, request, &branch)?;
    let result = RunResult::from_outcomes(request, &branch, &outcomes);

    tracing::info!(changed = result.changed, branch = %result.branch, "Run finished");
    Ok(result)
}
