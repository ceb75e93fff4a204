//! Orchestration runtime seam
//!
//! Everything this tool does to a cluster goes through `ClusterRuntime::run`
//! as a `RuntimeCall`: one blocking invocation of kubectl, helm, minikube,
//! openssl or curl. The process-backed implementation lives in the engine;
//! `RecordingRuntime` here records calls for tests.

use crate::errors::{KdevError, Result};
use std::fmt;
use std::sync::Mutex;

/// External tool a call is issued to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Kubectl,
    Helm,
    Minikube,
    Openssl,
    Curl,
}

impl Tool {
    /// Executable name looked up on PATH
    pub fn program(&self) -> &'static str {
        match self {
            Tool::Kubectl => "kubectl",
            Tool::Helm => "helm",
            Tool::Minikube => "minikube",
            Tool::Openssl => "openssl",
            Tool::Curl => "curl",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

/// One blocking call against the orchestration runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeCall {
    pub tool: Tool,
    pub args: Vec<String>,
    /// Payload written to the child's stdin (rendered manifests)
    pub stdin: Option<String>,
    /// Inherit the terminal instead of capturing output (exec, logs -f, port-forward)
    pub interactive: bool,
}

impl RuntimeCall {
    pub fn new<I, S>(tool: Tool, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tool,
            args: args.into_iter().map(Into::into).collect(),
            stdin: None,
            interactive: false,
        }
    }

    pub fn kubectl<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Tool::Kubectl, args)
    }

    pub fn helm<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Tool::Helm, args)
    }

    pub fn minikube<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Tool::Minikube, args)
    }

    pub fn with_stdin(mut self, payload: impl Into<String>) -> Self {
        self.stdin = Some(payload.into());
        self
    }

    pub fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }

    /// Shell-like rendering used in log lines and error messages
    pub fn command_line(&self) -> String {
        let mut line = self.tool.program().to_string();
        for arg in &self.args {
            line.push(' ');
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                line.push('\'');
                line.push_str(arg);
                line.push('\'');
            } else {
                line.push_str(arg);
            }
        }
        line
    }

    /// Build the failure error for this call
    pub fn failed(&self, exit_code: Option<i32>, stderr: impl Into<String>) -> KdevError {
        KdevError::RuntimeCallFailed {
            tool: self.tool.program().to_string(),
            command: self.command_line(),
            exit_code,
            stderr: stderr.into(),
        }
    }
}

impl fmt::Display for RuntimeCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Blocking access to the orchestration runtime's control plane
pub trait ClusterRuntime {
    /// Run one call and return its captured stdout
    ///
    /// # Errors
    ///
    /// Returns `RuntimeCallFailed` when the tool cannot be spawned or exits
    /// non-zero.
    fn run(&self, call: &RuntimeCall) -> Result<String>;
}

struct Rule {
    needle: String,
    response: std::result::Result<String, String>,
}

/// Runtime double that records every call
///
/// Responses are chosen by the first rule whose needle is a substring of the
/// call's command line; unmatched calls succeed with empty output.
#[derive(Default)]
pub struct RecordingRuntime {
    calls: Mutex<Vec<RuntimeCall>>,
    rules: Vec<Rule>,
}

impl RecordingRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail calls whose command line contains `needle` with the given stderr
    pub fn fail_when(mut self, needle: impl Into<String>, stderr: impl Into<String>) -> Self {
        self.rules.push(Rule {
            needle: needle.into(),
            response: Err(stderr.into()),
        });
        self
    }

    /// Answer calls whose command line contains `needle` with canned stdout
    pub fn respond_when(mut self, needle: impl Into<String>, stdout: impl Into<String>) -> Self {
        self.rules.push(Rule {
            needle: needle.into(),
            response: Ok(stdout.into()),
        });
        self
    }

    pub fn calls(&self) -> Vec<RuntimeCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(RuntimeCall::command_line).collect()
    }

    /// Stdin payloads of all calls that had one, in call order
    pub fn submitted_manifests(&self) -> Vec<String> {
        self.calls().into_iter().filter_map(|c| c.stdin).collect()
    }
}

impl ClusterRuntime for RecordingRuntime {
    fn run(&self, call: &RuntimeCall) -> Result<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call.clone());
        }
        let line = call.command_line();
        match self.rules.iter().find(|r| line.contains(&r.needle)) {
            Some(Rule {
                response: Ok(stdout),
                ..
            }) => Ok(stdout.clone()),
            Some(Rule {
                response: Err(stderr),
                ..
            }) => Err(call.failed(Some(1), stderr.clone())),
            None => Ok(String::new()),
        }
    }
}
