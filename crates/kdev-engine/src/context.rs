//! Everything a command handler needs, borrowed from the front end

use crate::monitor::StopSignal;
use crate::prompt::Prompt;
use kdev_core::catalog::Catalog;
use kdev_core::config::KdevConfig;
use kdev_core::report::Reporter;
use kdev_core::runtime::ClusterRuntime;
use std::path::PathBuf;

pub struct EngineContext<'a> {
    pub runtime: &'a dyn ClusterRuntime,
    pub catalog: &'a Catalog,
    pub config: &'a KdevConfig,
    pub reporter: &'a dyn Reporter,
    pub prompt: &'a dyn Prompt,
    /// Base for `manifests-<app>/` unless `[paths] manifests_root` is set
    pub work_dir: PathBuf,
    pub backup_root: PathBuf,
    pub stop: StopSignal,
    /// Bound for the monitor loop; `None` runs until stopped
    pub monitor_iterations: Option<u64>,
}

impl<'a> EngineContext<'a> {
    pub fn new(
        runtime: &'a dyn ClusterRuntime,
        catalog: &'a Catalog,
        config: &'a KdevConfig,
        reporter: &'a dyn Reporter,
        prompt: &'a dyn Prompt,
    ) -> Self {
        let home = std::env::var_os("HOME").map(PathBuf::from);
        Self {
            runtime,
            catalog,
            config,
            reporter,
            prompt,
            work_dir: PathBuf::from("."),
            backup_root: config.backup_root(home.as_deref()),
            stop: StopSignal::new(),
            monitor_iterations: None,
        }
    }

    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    pub fn with_backup_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.backup_root = dir.into();
        self
    }

    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    pub fn with_monitor_iterations(mut self, max: u64) -> Self {
        self.monitor_iterations = Some(max);
        self
    }

    /// Minikube profile used for every `minikube` call
    pub fn profile(&self) -> &str {
        &self.config.cluster.profile
    }
}
