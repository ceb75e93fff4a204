//! kdev Engine - process orchestration layer
//!
//! Executes typed commands against a `ClusterRuntime`: the process-backed
//! runtime for real clusters, the dry-run runtime for `--dry-run`, or a
//! recording runtime in tests.

pub mod atomic;
pub mod commands;
pub mod context;
pub mod dry_run;
pub mod monitor;
pub mod process;
pub mod prompt;

pub use commands::{apply_command, CommandOutcome};
pub use context::EngineContext;
pub use dry_run::DryRunRuntime;
pub use monitor::StopSignal;
pub use process::ProcessRuntime;
pub use prompt::{Prompt, StaticPrompt};
