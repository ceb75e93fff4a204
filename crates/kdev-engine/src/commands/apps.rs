//! Application verbs that map onto single kubectl calls

use super::{show_output, CommandOutcome};
use crate::context::EngineContext;
use kdev_core::errors::{KdevError, Result};
use kdev_core::runtime::RuntimeCall;
use std::path::Path;

fn require_file(path: &Path) -> Result<String> {
    if path.is_file() {
        Ok(path.display().to_string())
    } else {
        Err(KdevError::FileNotFound {
            path: path.display().to_string(),
        })
    }
}

/// # Errors
///
/// `FileNotFound` before any runtime call, or `RuntimeCallFailed`.
pub fn deploy_file(ctx: &EngineContext, path: &Path) -> Result<CommandOutcome> {
    let file = require_file(path)?;
    let output = ctx
        .runtime
        .run(&RuntimeCall::kubectl(["apply", "-f", file.as_str()]))?;
    show_output(ctx, &output);
    ctx.reporter.success(&format!("Applied {}", file));
    Ok(CommandOutcome::Done)
}

/// # Errors
///
/// `FileNotFound` before any runtime call, or `RuntimeCallFailed`.
pub fn delete_file(ctx: &EngineContext, path: &Path) -> Result<CommandOutcome> {
    let file = require_file(path)?;
    let output = ctx
        .runtime
        .run(&RuntimeCall::kubectl(["delete", "-f", file.as_str()]))?;
    show_output(ctx, &output);
    ctx.reporter.success(&format!("Deleted resources from {}", file));
    Ok(CommandOutcome::Done)
}

/// # Errors
///
/// `RuntimeCallFailed` if kubectl fails.
pub fn scale(
    ctx: &EngineContext,
    deployment: &str,
    replicas: u32,
    namespace: &str,
) -> Result<CommandOutcome> {
    ctx.runtime.run(&RuntimeCall::kubectl([
        "scale".to_string(),
        format!("deployment/{}", deployment),
        format!("--replicas={}", replicas),
        "-n".to_string(),
        namespace.to_string(),
    ]))?;
    ctx.reporter.success(&format!(
        "Scaled {} in {} to {} replica(s)",
        deployment, namespace, replicas
    ));
    Ok(CommandOutcome::Done)
}

/// # Errors
///
/// `RuntimeCallFailed` if kubectl exits non-zero.
pub fn logs(ctx: &EngineContext, pod: &str, namespace: &str) -> Result<CommandOutcome> {
    ctx.runtime
        .run(&RuntimeCall::kubectl(["logs", "-f", pod, "-n", namespace]).interactive())?;
    Ok(CommandOutcome::Done)
}

/// # Errors
///
/// `RuntimeCallFailed` if kubectl exits non-zero.
pub fn exec(
    ctx: &EngineContext,
    pod: &str,
    namespace: &str,
    command: &[String],
) -> Result<CommandOutcome> {
    let mut args: Vec<String> = ["exec", "-it", pod, "-n", namespace, "--"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    args.extend(command.iter().cloned());
    ctx.runtime.run(&RuntimeCall::kubectl(args).interactive())?;
    Ok(CommandOutcome::Done)
}

/// # Errors
///
/// `RuntimeCallFailed` if kubectl exits non-zero.
pub fn port_forward(
    ctx: &EngineContext,
    resource: &str,
    ports: &str,
    namespace: &str,
) -> Result<CommandOutcome> {
    ctx.reporter.info(&format!(
        "Forwarding {} -> {} (Ctrl-C to stop)",
        ports, resource
    ));
    ctx.runtime.run(
        &RuntimeCall::kubectl(["port-forward", resource, ports, "-n", namespace]).interactive(),
    )?;
    Ok(CommandOutcome::Done)
}

/// # Errors
///
/// `RuntimeCallFailed` if kubectl fails.
pub fn get_all(ctx: &EngineContext, namespace: &str) -> Result<CommandOutcome> {
    let output = ctx
        .runtime
        .run(&RuntimeCall::kubectl(["get", "all", "-n", namespace]))?;
    show_output(ctx, &output);
    Ok(CommandOutcome::Done)
}
