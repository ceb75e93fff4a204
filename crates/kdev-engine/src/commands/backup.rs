//! Resource backups as YAML
//!
//! Layout: `<backup_root>/<context>-<YYYYmmdd-HHMMSS>/<ns>/<kind>.yaml`, plus
//! `cluster/<kind>.yaml` for cluster-scoped kinds in a full backup. A kind
//! that cannot be exported, or exports nothing (dry run), is reported and
//! skipped, so no file or directory is created for it.

use super::CommandOutcome;
use crate::atomic::atomic_write;
use crate::context::EngineContext;
use kdev_core::errors::{KdevError, Result};
use kdev_core::runtime::RuntimeCall;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub const NAMESPACED_KINDS: [&str; 10] = [
    "deployments",
    "statefulsets",
    "daemonsets",
    "services",
    "configmaps",
    "secrets",
    "ingresses",
    "persistentvolumeclaims",
    "cronjobs",
    "jobs",
];

pub const CLUSTER_KINDS: [&str; 6] = [
    "namespaces",
    "persistentvolumes",
    "storageclasses",
    "clusterroles",
    "clusterrolebindings",
    "customresourcedefinitions",
];

const CLUSTER_DIR: &str = "cluster";

/// Context names may contain `/` or `:` (cloud ARNs); keep them path-safe
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "cluster".to_string()
    } else {
        cleaned
    }
}

fn backup_dir(ctx: &EngineContext) -> Result<PathBuf> {
    let context = ctx
        .runtime
        .run(&RuntimeCall::kubectl(["config", "current-context"]))?;
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    Ok(ctx
        .backup_root
        .join(format!("{}-{}", sanitize(&context), stamp)))
}

/// Export one kind; returns whether a file was written
fn export_kind(ctx: &EngineContext, dir: &Path, kind: &str, namespace: Option<&str>) -> Result<bool> {
    let mut args = vec!["get", kind];
    if let Some(ns) = namespace {
        args.extend(["-n", ns]);
    }
    args.extend(["-o", "yaml"]);

    match ctx.runtime.run(&RuntimeCall::kubectl(args)) {
        Ok(yaml) if yaml.trim().is_empty() => {
            ctx.reporter.warn(&format!("Skipped {}: no output", kind));
            Ok(false)
        }
        Ok(yaml) => {
            atomic_write(&dir.join(format!("{}.yaml", kind)), yaml.as_bytes())?;
            Ok(true)
        }
        Err(e @ KdevError::RuntimeCallFailed { .. }) => {
            ctx.reporter.warn(&format!("Skipped {}: {}", kind, e));
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

fn export_namespace(ctx: &EngineContext, root: &Path, namespace: &str) -> Result<usize> {
    let dir = root.join(namespace);
    let mut written = 0;
    for kind in NAMESPACED_KINDS {
        if export_kind(ctx, &dir, kind, Some(namespace))? {
            written += 1;
        }
    }
    Ok(written)
}

/// Names from `kubectl get namespaces -o json`
///
/// # Errors
///
/// `Io` if the output is not JSON.
pub fn parse_namespace_list(json: &str) -> Result<Vec<String>> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    let value: Value = serde_json::from_str(json).map_err(|e| KdevError::Io {
        op: "parse_namespace_list".to_string(),
        message: e.to_string(),
    })?;
    Ok(value["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item["metadata"]["name"].as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default())
}

/// # Errors
///
/// Failure to read the current context, or `Io` while writing.
pub fn namespace(ctx: &EngineContext, namespace: &str) -> Result<CommandOutcome> {
    let root = backup_dir(ctx)?;
    let written = export_namespace(ctx, &root, namespace)?;
    ctx.reporter.success(&format!(
        "Backed up {} resource kind(s) from {} to {}",
        written,
        namespace,
        root.display()
    ));
    Ok(CommandOutcome::BackedUp(root))
}

/// # Errors
///
/// Failure to read the current context or list namespaces, or `Io` while writing.
pub fn cluster(ctx: &EngineContext) -> Result<CommandOutcome> {
    let root = backup_dir(ctx)?;

    let cluster_dir = root.join(CLUSTER_DIR);
    let mut written = 0;
    for kind in CLUSTER_KINDS {
        if export_kind(ctx, &cluster_dir, kind, None)? {
            written += 1;
        }
    }

    let listing = ctx
        .runtime
        .run(&RuntimeCall::kubectl(["get", "namespaces", "-o", "json"]))?;
    let namespaces = parse_namespace_list(&listing)?;
    for ns in &namespaces {
        written += export_namespace(ctx, &root, ns)?;
    }

    ctx.reporter.success(&format!(
        "Backed up {} namespace(s), {} file(s) to {}",
        namespaces.len(),
        written,
        root.display()
    ));
    Ok(CommandOutcome::BackedUp(root))
}
