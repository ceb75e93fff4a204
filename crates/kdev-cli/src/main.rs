//! kdev CLI
//!
//! `kdev <verb> [args...]` runs one command; `kdev` alone opens the menu.

use clap::Parser;
use kdev_core::errors::KdevError;
use kdev_core::logging_facility::{self, Profile};
use kdev_core::report::{ConsoleReporter, Reporter};
use kdev_core::runtime::ClusterRuntime;
use kdev_core::{Catalog, KdevConfig};
use kdev_engine::{CommandOutcome, DryRunRuntime, ProcessRuntime};
use std::io::IsTerminal;
use std::path::PathBuf;

mod menu;
mod prompt;
mod session;

use session::Session;

#[derive(Debug, Parser)]
#[command(name = "kdev")]
#[command(about = "Local Kubernetes development environments", long_about = None)]
#[command(disable_help_subcommand = true)]
struct Cli {
    /// Configuration file (default: $KDEV_CONFIG, then ./kdev.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print runtime calls instead of executing them
    #[arg(long)]
    dry_run: bool,

    /// Debug-level diagnostics on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Diagnostics as JSON lines on stderr
    #[arg(long)]
    log_json: bool,

    /// Verb to run; omit for the interactive menu
    verb: Option<String>,

    /// Positional arguments for the verb
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

impl Cli {
    fn profile(&self) -> Profile {
        if self.log_json {
            Profile::Json
        } else if self.verbose {
            Profile::Verbose
        } else {
            Profile::Interactive
        }
    }
}

fn run(cli: Cli, reporter: &ConsoleReporter) -> Result<(), KdevError> {
    let config = KdevConfig::load(cli.config.as_deref())?;
    let catalog = Catalog::with_config(&config)?;

    let dry_run;
    let process;
    let runtime: &dyn ClusterRuntime = if cli.dry_run {
        dry_run = DryRunRuntime::new();
        &dry_run
    } else {
        process = ProcessRuntime::new();
        &process
    };

    let session = Session::new(runtime, &catalog, &config, reporter);

    let Some(verb) = cli.verb else {
        return menu::run_stdio(&session);
    };

    let result = session.execute_with_stdin_prompt(&verb, &cli.args);
    match result {
        Ok(CommandOutcome::MenuRequested) => menu::run_stdio(&session),
        Ok(_) => Ok(()),
        Err(e) if e.is_usage_error() => {
            match session.router().lookup(&verb) {
                Some(entry) => eprintln!("Usage: kdev {}", entry.usage()),
                None => eprintln!("{}", session.router().usage()),
            }
            Err(e)
        }
        Err(e) => Err(e),
    }
}

fn main() {
    let cli = Cli::parse();
    logging_facility::init(cli.profile());

    let reporter = ConsoleReporter::new(std::io::stdout().is_terminal());
    if let Err(e) = run(cli, &reporter) {
        reporter.error(&e.to_string());
        std::process::exit(1);
    }
}
