//! Process execution for git invocations
//!
//! A [`ToolRunner`] executes one command and hands back its exit status and
//! captured output. It never fails because of a non-zero exit status; the
//! caller decides what a status means.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::{Error, Result};

/// Locale overlay applied to every git invocation.
///
/// Step classification matches on English message text, so git must never
/// answer in the user's locale.
pub const FIXED_LOCALE_ENV: [(&str, &str); 4] = [
    ("LANG", "C"),
    ("LC_ALL", "C"),
    ("LC_MESSAGES", "C"),
    ("LC_CTYPE", "C"),
];

/// A single command to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    /// Executable name or path
    pub program: String,
    /// Ordered argument list
    pub args: Vec<String>,
    /// Working directory
    pub cwd: PathBuf,
    /// Environment variables set for this invocation only
    pub env: Vec<(String, String)>,
}

impl ToolInvocation {
    /// Create an invocation with the fixed locale overlay
    pub fn new<I, S>(program: impl Into<String>, args: I, cwd: impl AsRef<Path>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: cwd.as_ref().to_path_buf(),
            env: FIXED_LOCALE_ENV
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Space-joined command line, used in logs and error reports
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Exit status and captured output of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit status, or -1 when the process was terminated by a signal
    pub status: i32,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl ToolOutput {
    /// Whether the command exited with status 0
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Executes tool invocations
pub trait ToolRunner {
    /// Run the invocation to completion.
    ///
    /// Only failures to start or wait on the process are errors; a non-zero
    /// exit status is reported through [`ToolOutput::status`].
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput>;
}

impl<R: ToolRunner + ?Sized> ToolRunner for &R {
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput> {
        (**self).run(invocation)
    }
}

/// Runner backed by real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl ProcessRunner {
    /// Create a new process runner
    pub fn new() -> Self {
        Self
    }
}

impl ToolRunner for ProcessRunner {
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput> {
        tracing::debug!(
            command = %invocation.command_line(),
            cwd = %invocation.cwd.display(),
            "Running tool"
        );

        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::ToolNotFound(format!(
                        "'{}' could not be executed. Is git installed and on PATH?",
                        invocation.program
                    ))
                } else {
                    Error::Io(e)
                }
            })?;

        let result = ToolOutput {
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        tracing::debug!(status = result.status, "Tool finished");
        Ok(result)
    }
}
