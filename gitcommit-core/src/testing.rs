//! Scripted runner for unit tests

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::runner::{ToolInvocation, ToolOutput, ToolRunner};
use crate::Result;

/// Replays canned outputs in order and records every invocation
#[derive(Debug, Default)]
pub(crate) struct ScriptedRunner {
    responses: RefCell<VecDeque<ToolOutput>>,
    calls: RefCell<Vec<ToolInvocation>>,
}

impl ScriptedRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue the output for the next invocation
    pub(crate) fn respond(self, status: i32, stdout: &str, stderr: &str) -> Self {
        self.responses.borrow_mut().push_back(ToolOutput {
            status,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        });
        self
    }

    /// Argument lists of every invocation so far
    pub(crate) fn args(&self) -> Vec<Vec<String>> {
        self.calls.borrow().iter().map(|c| c.args.clone()).collect()
    }

    pub(crate) fn calls(&self) -> Vec<ToolInvocation> {
        self.calls.borrow().clone()
    }
}

impl ToolRunner for ScriptedRunner {
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput> {
        self.calls.borrow_mut().push(invocation.clone());
        let next = self.responses.borrow_mut().pop_front();
        Ok(next.unwrap_or_else(|| {
            panic!("unexpected invocation: {}", invocation.command_line())
        }))
    }
}
