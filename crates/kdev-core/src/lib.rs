//! kdev Core - catalog, rendering and dispatch for the local cluster tool
//!
//! This crate holds everything that does not spawn processes:
//! - Component, environment and wizard catalog with an injectable defaults registry
//! - `{{placeholder}}` template rendering for components, ingresses and scaffolds
//! - The command router shared by the argv and menu front ends
//! - The environment composer, driven through the `ClusterRuntime` seam
//! - Error, logging, configuration and reporting facilities

pub mod catalog;
pub mod commands;
pub mod compose;
pub mod config;
pub mod errors;
pub mod features;
pub mod kube;
pub mod logging_facility;
pub mod render;
pub mod report;
pub mod router;
pub mod runtime;

pub use kdev_core_types;

// Re-export commonly used types
pub use catalog::Catalog;
pub use commands::Command;
pub use compose::{Composer, CompositionReport, Plan};
pub use config::KdevConfig;
pub use errors::{ExError, ExErrorKind, KdevError, Result};
pub use features::Feature;
pub use report::{ConsoleReporter, MemoryReporter, Reporter};
pub use router::{InvocationRequest, Router};
pub use runtime::{ClusterRuntime, RecordingRuntime, RuntimeCall, Tool};
