//! `--dry-run` runtime: prints calls instead of running them

use kdev_core::errors::Result;
use kdev_core::runtime::{ClusterRuntime, RuntimeCall};
use std::io::{Stdout, Write};
use std::sync::Mutex;

pub struct DryRunRuntime<W: Write = Stdout> {
    out: Mutex<W>,
}

impl DryRunRuntime<Stdout> {
    pub fn new() -> Self {
        Self::with_writer(std::io::stdout())
    }
}

impl Default for DryRunRuntime<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> DryRunRuntime<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> Option<W> {
        self.out.into_inner().ok()
    }
}

impl<W: Write> ClusterRuntime for DryRunRuntime<W> {
    /// Always succeeds with empty output
    fn run(&self, call: &RuntimeCall) -> Result<String> {
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "+ {}", call);
            if let Some(payload) = &call.stdin {
                let _ = writeln!(
                    out,
                    "  <<< {} line(s), {} byte(s) on stdin",
                    payload.lines().count(),
                    payload.len()
                );
            }
        }
        Ok(String::new())
    }
}
