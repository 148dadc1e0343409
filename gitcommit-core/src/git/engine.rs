//! Branch, stage, commit and push steps against one working tree
//!
//! Each step reports whether it changed state. In simulate mode no step
//! mutates the tree: checkout is answered from the branch listing alone and
//! the other steps run git with `--dry-run`. Any unexpected exit status is
//! returned as [`Error::Tool`] and nothing is rolled back.

use std::path::PathBuf;

use super::classify::{classify_commit, classify_push, StepStatus};
use super::predicates::branch_listing_contains;
use crate::runner::{ToolInvocation, ToolOutput, ToolRunner};
use crate::{Error, Result};

/// Default git executable
pub const DEFAULT_GIT: &str = "git";

/// Default remote for the push step
pub const DEFAULT_REMOTE: &str = "origin";

/// Result of a single step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// Whether the step changed (or in simulate mode, would change) state
    pub changed: bool,
    /// Human-readable detail; for commit this is git's stdout verbatim
    pub detail: String,
}

impl StepOutcome {
    fn new(changed: bool, detail: impl Into<String>) -> Self {
        Self {
            changed,
            detail: detail.into(),
        }
    }
}

/// Runs the four steps against a working tree
#[derive(Debug)]
pub struct RepositoryEngine<R> {
    runner: R,
    workdir: PathBuf,
    simulate: bool,
    git_path: String,
    remote: String,
}

impl<R: ToolRunner> RepositoryEngine<R> {
    /// Create an engine for `workdir` using `git` from PATH and the `origin` remote
    pub fn new(runner: R, workdir: impl Into<PathBuf>, simulate: bool) -> Self {
        Self {
            runner,
            workdir: workdir.into(),
            simulate,
            git_path: DEFAULT_GIT.to_string(),
            remote: DEFAULT_REMOTE.to_string(),
        }
    }

    /// Use a specific git executable
    pub fn with_git_path(mut self, path: impl Into<String>) -> Self {
        self.git_path = path.into();
        self
    }

    /// Push to a remote other than `origin`
    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    /// Whether a local branch named `name` appears in `git branch --list`
    pub fn branch_exists(&self, name: &str) -> Result<bool> {
        let (_, output) = self.run_checked(["branch", "--list"], "Failed to check branch")?;
        Ok(branch_listing_contains(&output.stdout, name))
    }

    /// Switch to `name`, creating it when it does not exist.
    ///
    /// Reports `changed` only when the branch is created. In simulate mode
    /// git is consulted for the listing but no checkout runs.
    pub fn checkout_branch(&self, name: &str) -> Result<StepOutcome> {
        let outcome = if self.branch_exists(name)? {
            if self.simulate {
                StepOutcome::new(false, format!("branch '{name}' exists"))
            } else {
                self.run_checked(["checkout", name], "Failed to checkout existent branch")?;
                StepOutcome::new(false, format!("switched to existing branch '{name}'"))
            }
        } else if self.simulate {
            StepOutcome::new(true, format!("branch '{name}' would be created"))
        } else {
            self.run_checked(["checkout", "-b", name], "Failed to create branch")?;
            StepOutcome::new(true, format!("created branch '{name}'"))
        };

        tracing::info!(branch = name, changed = outcome.changed, simulate = self.simulate, "checkout");
        Ok(outcome)
    }

    /// Stage every new, modified and deleted path.
    ///
    /// `git add -v` lists each path it stages, so any stdout means a change.
    pub fn stage_all(&self) -> Result<StepOutcome> {
        let mut args = vec!["add", "--all", "-v"];
        if self.simulate {
            args.push("--dry-run");
        }

        let (_, output) = self.run_checked(args, "Can't add file(s)")?;
        let outcome = StepOutcome::new(!output.stdout.is_empty(), output.stdout);

        tracing::info!(changed = outcome.changed, simulate = self.simulate, "add");
        Ok(outcome)
    }

    /// Commit all tracked modifications with `message`.
    ///
    /// A clean tree is not an error; see [`classify_commit`].
    pub fn commit_changes(&self, message: &str) -> Result<StepOutcome> {
        let mut args = vec!["commit", "-a", "-m", message];
        if self.simulate {
            args.push("--dry-run");
        }

        let (invocation, output) = self.run(args)?;
        let status = classify_commit(&output);
        if let StepStatus::Failure(_) = status {
            return Err(tool_error("Failed to commit changes", &invocation, output));
        }

        let outcome = StepOutcome::new(status.changed(), output.stdout);
        tracing::info!(changed = outcome.changed, simulate = self.simulate, "commit");
        Ok(outcome)
    }

    /// Push `branch` to the configured remote and set it as upstream
    pub fn push_changes(&self, branch: &str) -> Result<StepOutcome> {
        let mut args = vec!["push", "--set-upstream", self.remote.as_str(), branch];
        if self.simulate {
            args.push("--dry-run");
        }

        let (invocation, output) = self.run(args)?;
        let status = classify_push(&output);
        if let StepStatus::Failure(_) = status {
            return Err(tool_error("Can't push changes", &invocation, output));
        }

        let outcome = StepOutcome::new(status.changed(), output.stderr);
        tracing::info!(
            branch,
            remote = %self.remote,
            changed = outcome.changed,
            simulate = self.simulate,
            "push"
        );
        Ok(outcome)
    }

    fn invocation<I, S>(&self, args: I) -> ToolInvocation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ToolInvocation::new(self.git_path.as_str(), args, &self.workdir)
    }

    fn run<I, S>(&self, args: I) -> Result<(ToolInvocation, ToolOutput)>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let invocation = self.invocation(args);
        let output = self.runner.run(&invocation)?;
        Ok((invocation, output))
    }

    /// Run and treat any non-zero exit status as fatal
    fn run_checked<I, S>(&self, args: I, context: &str) -> Result<(ToolInvocation, ToolOutput)>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (invocation, output) = self.run(args)?;
        if !output.success() {
            return Err(tool_error(context, &invocation, output));
        }
        Ok((invocation, output))
    }
}

fn tool_error(context: &str, invocation: &ToolInvocation, output: ToolOutput) -> Error {
    tracing::debug!(
        command = %invocation.command_line(),
        status = output.status,
        "{}",
        context
    );
    Error::Tool {
        context: context.to_string(),
        command: invocation.command_line(),
        status: output.status,
        stderr: output.stderr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedRunner;

    const LISTING: &str = "  develop\n* main\n";

    fn engine(runner: &ScriptedRunner, simulate: bool) -> RepositoryEngine<&ScriptedRunner> {
        RepositoryEngine::new(runner, "/work/tree", simulate)
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_branch_exists() {
        let runner = ScriptedRunner::new()
            .respond(0, LISTING, "")
            .respond(0, LISTING, "");
        let engine = engine(&runner, false);

        assert!(engine.branch_exists("develop").unwrap());
        assert!(!engine.branch_exists("feature/x").unwrap());
        assert_eq!(runner.args(), vec![args(&["branch", "--list"]); 2]);
    }

    #[test]
    fn test_branch_exists_listing_failure() {
        let runner = ScriptedRunner::new().respond(128, "", "fatal: not a git repository");
        let err = engine(&runner, false).branch_exists("main").unwrap_err();

        match err {
            Error::Tool { command, status, stderr, .. } => {
                assert_eq!(command, "git branch --list");
                assert_eq!(status, 128);
                assert!(stderr.contains("not a git repository"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_checkout_existing_branch() {
        let runner = ScriptedRunner::new()
            .respond(0, LISTING, "")
            .respond(0, "", "Switched to branch 'develop'\n");
        let outcome = engine(&runner, false).checkout_branch("develop").unwrap();

        assert!(!outcome.changed);
        assert_eq!(runner.args()[1], args(&["checkout", "develop"]));
    }

    #[test]
    fn test_checkout_creates_branch() {
        let runner = ScriptedRunner::new()
            .respond(0, LISTING, "")
            .respond(0, "", "Switched to a new branch 'feature/x'\n");
        let outcome = engine(&runner, false).checkout_branch("feature/x").unwrap();

        assert!(outcome.changed);
        assert_eq!(runner.args()[1], args(&["checkout", "-b", "feature/x"]));
    }

    #[test]
    fn test_checkout_simulate_matches_real_verdict_without_checkout() {
        for (branch, expected) in [("develop", false), ("feature/x", true)] {
            let runner = ScriptedRunner::new().respond(0, LISTING, "");
            let outcome = engine(&runner, true).checkout_branch(branch).unwrap();

            assert_eq!(outcome.changed, expected, "branch {branch}");
            assert_eq!(runner.args(), vec![args(&["branch", "--list"])]);
        }
    }

    #[test]
    fn test_checkout_failures() {
        let runner = ScriptedRunner::new()
            .respond(0, LISTING, "")
            .respond(1, "", "error: Your local changes would be overwritten");
        let err = engine(&runner, false).checkout_branch("develop").unwrap_err();
        assert_eq!(err.exit_status(), Some(1));
        assert_eq!(err.command(), Some("git checkout develop"));

        let runner = ScriptedRunner::new()
            .respond(0, LISTING, "")
            .respond(128, "", "fatal: 'bad..name' is not a valid branch name");
        let err = engine(&runner, false).checkout_branch("bad..name").unwrap_err();
        assert_eq!(err.command(), Some("git checkout -b bad..name"));
        assert!(err.to_string().starts_with("Failed to create branch"));
    }

    #[test]
    fn test_stage_all() {
        let runner = ScriptedRunner::new()
            .respond(0, "add 'new.txt'\n", "")
            .respond(0, "", "");
        let engine = engine(&runner, false);

        let staged = engine.stage_all().unwrap();
        assert!(staged.changed);
        assert_eq!(staged.detail, "add 'new.txt'\n");

        assert!(!engine.stage_all().unwrap().changed);
        assert_eq!(runner.args()[0], args(&["add", "--all", "-v"]));
    }

    #[test]
    fn test_stage_all_simulate_uses_dry_run() {
        let runner = ScriptedRunner::new().respond(0, "add 'new.txt'\n", "");
        assert!(engine(&runner, true).stage_all().unwrap().changed);
        assert_eq!(runner.args()[0], args(&["add", "--all", "-v", "--dry-run"]));
    }

    #[test]
    fn test_stage_all_failure() {
        let runner = ScriptedRunner::new().respond(128, "", "fatal: Unable to create index.lock");
        let err = engine(&runner, false).stage_all().unwrap_err();
        assert_eq!(err.exit_status(), Some(128));
    }

    #[test]
    fn test_commit_tiers() {
        let runner = ScriptedRunner::new()
            .respond(0, "[feature/x 1a2b3c4] Test commit\n", "")
            .respond(1, "On branch feature/x\nnothing to commit, working tree clean\n", "")
            .respond(2, "", "usage: git commit");
        let engine = engine(&runner, false);

        let created = engine.commit_changes("Test commit").unwrap();
        assert!(created.changed);
        assert_eq!(created.detail, "[feature/x 1a2b3c4] Test commit\n");

        let clean = engine.commit_changes("Test commit").unwrap();
        assert!(!clean.changed);
        assert!(clean.detail.contains("nothing to commit"));

        let err = engine.commit_changes("Test commit").unwrap_err();
        assert_eq!(err.exit_status(), Some(2));

        assert_eq!(runner.args()[0], args(&["commit", "-a", "-m", "Test commit"]));
    }

    #[test]
    fn test_commit_message_is_a_single_argument() {
        let runner = ScriptedRunner::new().respond(0, "", "");
        engine(&runner, true)
            .commit_changes("Fix: handle spaces & quotes \"here\"")
            .unwrap();
        assert_eq!(
            runner.args()[0],
            args(&["commit", "-a", "-m", "Fix: handle spaces & quotes \"here\"", "--dry-run"])
        );
    }

    #[test]
    fn test_push() {
        let runner = ScriptedRunner::new()
            .respond(0, "", " * [new branch]      feature/x -> feature/x\n")
            .respond(0, "", "Everything up-to-date\n")
            .respond(1, "", "! [rejected] feature/x -> feature/x (non-fast-forward)\n");
        let engine = engine(&runner, false);

        assert!(engine.push_changes("feature/x").unwrap().changed);
        assert!(!engine.push_changes("feature/x").unwrap().changed);

        let err = engine.push_changes("feature/x").unwrap_err();
        assert_eq!(err.exit_status(), Some(1));
        assert_eq!(
            err.command(),
            Some("git push --set-upstream origin feature/x")
        );
    }

    #[test]
    fn test_push_simulate_and_custom_remote() {
        let runner = ScriptedRunner::new().respond(0, "", "Everything up-to-date\n");
        let engine = RepositoryEngine::new(&runner, "/work/tree", true)
            .with_remote("upstream")
            .with_git_path("/opt/git/bin/git");

        assert!(!engine.push_changes("main").unwrap().changed);

        let call = &runner.calls()[0];
        assert_eq!(call.program, "/opt/git/bin/git");
        assert_eq!(
            call.args,
            args(&["push", "--set-upstream", "upstream", "main", "--dry-run"])
        );
    }

    #[test]
    fn test_invocations_run_in_workdir_with_fixed_locale() {
        let runner = ScriptedRunner::new().respond(0, "", "");
        engine(&runner, false).branch_exists("main").unwrap();

        let call = &runner.calls()[0];
        assert_eq!(call.cwd, PathBuf::from("/work/tree"));
        assert!(call.env.contains(&("LC_ALL".to_string(), "C".to_string())));
    }
}
