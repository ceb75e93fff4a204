//! `kdev.toml` configuration
//!
//! Lookup order: explicit `--config` path, `$KDEV_CONFIG`, `./kdev.toml`,
//! then built-in defaults. Missing optional files are not an error; an
//! explicitly named file that does not exist is.

use crate::errors::{KdevError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV_VAR: &str = "KDEV_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "kdev.toml";
const DEFAULT_BACKUP_DIR: &str = "k8s-backups";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KdevConfig {
    pub cluster: ClusterConfig,
    pub paths: PathsConfig,
    pub components: BTreeMap<String, ComponentOverride>,
}

/// Minikube start parameters
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClusterConfig {
    pub profile: String,
    pub driver: String,
    pub cpus: u32,
    /// Memory in MiB
    pub memory: u32,
    pub kubernetes_version: Option<String>,
    pub node_ready_timeout_secs: u64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            profile: "minikube".to_string(),
            driver: "docker".to_string(),
            cpus: 4,
            memory: 8192,
            kubernetes_version: None,
            node_ready_timeout_secs: 300,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Defaults to `~/k8s-backups`
    pub backup_root: Option<PathBuf>,
    /// Parent of generated `manifests-<app>/` directories; defaults to the working directory
    pub manifests_root: Option<PathBuf>,
}

/// `[components.<key>]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComponentOverride {
    pub namespace: Option<String>,
    pub params: BTreeMap<String, String>,
}

impl KdevConfig {
    /// # Errors
    ///
    /// `Config` on malformed TOML or unknown keys.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// # Errors
    ///
    /// `Io` if the file cannot be read, `Config` if it does not parse.
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| KdevError::io(format!("read {}", path.display()), e))?;
        Self::from_toml_str(&source).map_err(|e| match e {
            KdevError::Config { reason } => KdevError::Config {
                reason: format!("{}: {}", path.display(), reason),
            },
            other => other,
        })
    }

    /// Resolve and load the effective configuration
    ///
    /// # Errors
    ///
    /// Fails if an explicitly named file (flag or environment variable) is
    /// missing or invalid, or if `./kdev.toml` exists but is invalid.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|v| !v.is_empty()) {
            return Self::from_file(Path::new(&path));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            return Self::from_file(local);
        }
        tracing::debug!("no configuration file, using built-in defaults");
        Ok(Self::default())
    }

    /// Backup root, falling back to `<home>/k8s-backups`
    pub fn backup_root(&self, home: Option<&Path>) -> PathBuf {
        match (&self.paths.backup_root, home) {
            (Some(root), _) => root.clone(),
            (None, Some(home)) => home.join(DEFAULT_BACKUP_DIR),
            (None, None) => PathBuf::from(DEFAULT_BACKUP_DIR),
        }
    }

    /// Directory that receives `manifests-<app>/`
    pub fn manifests_root(&self, work_dir: &Path) -> PathBuf {
        self.paths
            .manifests_root
            .clone()
            .unwrap_or_else(|| work_dir.to_path_buf())
    }
}
