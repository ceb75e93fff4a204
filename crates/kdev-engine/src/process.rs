//! Process-backed runtime
//!
//! Each call is one blocking child process. Captured calls pipe the manifest
//! payload to stdin and collect stdout; interactive calls inherit the
//! terminal.

use kdev_core::errors::Result;
use kdev_core::runtime::{ClusterRuntime, RuntimeCall};
use std::io::Write;
use std::process::{Command, Stdio};

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRuntime;

impl ProcessRuntime {
    pub fn new() -> Self {
        Self
    }

    fn command(call: &RuntimeCall) -> Command {
        let mut command = Command::new(call.tool.program());
        command.args(&call.args);
        command
    }

    fn run_interactive(call: &RuntimeCall) -> Result<String> {
        let status = Self::command(call)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| call.failed(None, format!("failed to start {}: {}", call.tool, e)))?;
        if status.success() {
            Ok(String::new())
        } else {
            Err(call.failed(status.code(), "see output above"))
        }
    }

    fn run_captured(call: &RuntimeCall) -> Result<String> {
        let mut child = Self::command(call)
            .stdin(if call.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| call.failed(None, format!("failed to start {}: {}", call.tool, e)))?;

        if let (Some(payload), Some(mut stdin)) = (&call.stdin, child.stdin.take()) {
            stdin
                .write_all(payload.as_bytes())
                .map_err(|e| call.failed(None, format!("failed to write stdin: {}", e)))?;
            // dropping stdin closes the pipe so the child sees EOF
        }

        let output = child
            .wait_with_output()
            .map_err(|e| call.failed(None, format!("failed to wait for {}: {}", call.tool, e)))?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(call.failed(
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ))
        }
    }
}

impl ClusterRuntime for ProcessRuntime {
    fn run(&self, call: &RuntimeCall) -> Result<String> {
        tracing::debug!(tool = %call.tool, command = %call, interactive = call.interactive, "spawn");
        if call.interactive {
            Self::run_interactive(call)
        } else {
            Self::run_captured(call)
        }
    }
}
