//! Run command - check out, stage, commit and push in one step

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::Args;
use gitcommit_core::{Config, OperationRequest};

use crate::envelope::RequestEnvelope;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the git working tree
    #[arg(long)]
    pub repo: Option<PathBuf>,

    /// Branch to check out or create; `${VAR}` placeholders are filled from
    /// the environment and `--var`
    #[arg(long)]
    pub branch: Option<String>,

    /// Stage all new, modified and deleted files
    #[arg(long, overrides_with = "no_add_files")]
    pub add_files: bool,

    /// Do not stage files, even if the args file asks to
    #[arg(long, overrides_with = "add_files")]
    pub no_add_files: bool,

    /// Commit tracked modifications
    #[arg(long, overrides_with = "no_commit")]
    pub commit: bool,

    /// Do not commit, even if the args file asks to
    #[arg(long, overrides_with = "commit")]
    pub no_commit: bool,

    /// Push the branch and set its upstream
    #[arg(long, overrides_with = "no_push")]
    pub push: bool,

    /// Do not push, even if the args file asks to
    #[arg(long, overrides_with = "push")]
    pub no_push: bool,

    /// Commit message (defaults to the configured message)
    #[arg(short = 'm', long)]
    pub commit_msg: Option<String>,

    /// Report what would change without touching the repository
    #[arg(long, visible_alias = "simulate", overrides_with = "no_check")]
    pub check: bool,

    /// Make real changes, even if the args file asks for simulate mode
    #[arg(long, overrides_with = "check")]
    pub no_check: bool,

    /// Extra template variable, overriding the environment
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,

    /// Read the request from a JSON file; flags override its fields
    #[arg(long, value_name = "FILE")]
    pub args_file: Option<PathBuf>,

    /// Pretty-print the JSON result
    #[arg(long)]
    pub pretty: bool,
}

fn parse_var(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}

/// Resolve a `--flag`/`--no-flag` pair over the args-file value
fn merge_flag(on: bool, off: bool, from_file: Option<bool>) -> bool {
    match (on, off) {
        (true, _) => true,
        (_, true) => false,
        _ => from_file.unwrap_or(false),
    }
}

impl RunArgs {
    /// Merge the args file, flags and configured defaults into a request
    pub fn to_request(&self, config: &Config) -> anyhow::Result<OperationRequest> {
        let envelope = match &self.args_file {
            Some(path) => RequestEnvelope::load(path)?,
            None => RequestEnvelope::default(),
        };

        let repo = self
            .repo
            .clone()
            .or(envelope.repo)
            .ok_or_else(|| anyhow!("missing required argument: repo"))?;
        let repo = if repo.is_absolute() {
            repo
        } else {
            std::env::current_dir()
                .context("Failed to determine current directory")?
                .join(repo)
        };

        let branch = self
            .branch
            .clone()
            .or(envelope.branch)
            .ok_or_else(|| anyhow!("missing required argument: branch"))?;

        let commit_msg = self
            .commit_msg
            .clone()
            .or(envelope.commit_msg)
            .unwrap_or_else(|| config.defaults.commit_message.clone());

        Ok(OperationRequest::new(repo, branch)
            .with_add_files(merge_flag(self.add_files, self.no_add_files, envelope.add_files))
            .with_commit(merge_flag(self.commit, self.no_commit, envelope.commit))
            .with_push(merge_flag(self.push, self.no_push, envelope.push))
            .with_commit_msg(commit_msg)
            .with_simulate(merge_flag(self.check, self.no_check, envelope.simulate)))
    }

    /// Template variables: the process environment overlaid with `--var`
    pub fn template_vars(&self) -> HashMap<String, String> {
        let mut vars: HashMap<String, String> = std::env::vars().collect();
        vars.extend(self.vars.iter().cloned());
        vars
    }

    /// Execute the run command and print the result as JSON
    pub fn execute(&self, verbose: bool, config: &Config) -> anyhow::Result<()> {
        let request = self.to_request(config)?;

        if verbose {
            tracing::info!(
                repo = %request.repo.display(),
                branch = %request.branch,
                add_files = request.add_files,
                commit = request.commit,
                push = request.push,
                simulate = request.simulate,
                "Starting gitcommit run"
            );
        }

        let result = gitcommit_core::execute(&request, &self.template_vars(), config)?;

        let json = if self.pretty {
            serde_json::to_string_pretty(&result)?
        } else {
            serde_json::to_string(&result)?
        };
        println!("{json}");

        Ok(())
    }
}
