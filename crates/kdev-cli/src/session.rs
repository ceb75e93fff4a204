//! Shared execution path for both front ends

use crate::prompt::StdinPrompt;
use kdev_core::commands::Command;
use kdev_core::errors::Result;
use kdev_core::report::Reporter;
use kdev_core::router::Router;
use kdev_core::runtime::ClusterRuntime;
use kdev_core::{Catalog, KdevConfig};
use kdev_engine::{apply_command, CommandOutcome, EngineContext, Prompt, StopSignal};
use std::io::BufRead;

pub struct Session<'a> {
    router: Router<'a>,
    runtime: &'a dyn ClusterRuntime,
    catalog: &'a Catalog,
    config: &'a KdevConfig,
    reporter: &'a dyn Reporter,
}

impl<'a> Session<'a> {
    pub fn new(
        runtime: &'a dyn ClusterRuntime,
        catalog: &'a Catalog,
        config: &'a KdevConfig,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            router: Router::new(catalog),
            runtime,
            catalog,
            config,
            reporter,
        }
    }

    pub fn router(&self) -> &Router<'a> {
        &self.router
    }

    pub fn reporter(&self) -> &dyn Reporter {
        self.reporter
    }

    pub fn execute_with_stdin_prompt(&self, verb: &str, args: &[String]) -> Result<CommandOutcome> {
        self.execute(verb, args, &StdinPrompt)
    }

    /// Route and run one verb
    ///
    /// # Errors
    ///
    /// Routing errors before any runtime call, then handler errors.
    pub fn execute(&self, verb: &str, args: &[String], prompt: &dyn Prompt) -> Result<CommandOutcome> {
        let (request, command) = self.router.route(verb, args)?;
        tracing::info!(request_id = %request.request_id, verb = %request.verb, "dispatch");

        let stop = StopSignal::new();
        if matches!(command, Command::Monitor { .. }) {
            watch_for_quit(stop.clone());
        }

        let ctx = EngineContext::new(self.runtime, self.catalog, self.config, self.reporter, prompt)
            .with_stop_signal(stop);
        apply_command(command, &ctx, &request.request_id)
    }
}

/// Raise `stop` when a line reading `q` (or EOF) arrives on stdin
fn watch_for_quit(stop: StopSignal) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        let mut line = String::new();
        loop {
            line.clear();
            match stdin.lock().read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) if line.trim().eq_ignore_ascii_case("q") => break,
                Ok(_) => {}
            }
        }
        stop.raise();
    });
}
