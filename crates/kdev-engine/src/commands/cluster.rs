//! Cluster lifecycle: minikube start/stop/delete/status

use super::{show_output, CommandOutcome};
use crate::context::EngineContext;
use kdev_core::errors::Result;
use kdev_core::runtime::RuntimeCall;

pub fn start_call(ctx: &EngineContext) -> RuntimeCall {
    let cluster = &ctx.config.cluster;
    let mut args = vec![
        "start".to_string(),
        "-p".to_string(),
        cluster.profile.clone(),
        format!("--driver={}", cluster.driver),
        format!("--cpus={}", cluster.cpus),
        format!("--memory={}mb", cluster.memory),
    ];
    if let Some(version) = &cluster.kubernetes_version {
        args.push(format!("--kubernetes-version={}", version));
    }
    RuntimeCall::minikube(args).interactive()
}

pub fn wait_for_nodes_call(ctx: &EngineContext) -> RuntimeCall {
    RuntimeCall::kubectl([
        "wait".to_string(),
        "--for=condition=Ready".to_string(),
        "nodes".to_string(),
        "--all".to_string(),
        format!("--timeout={}s", ctx.config.cluster.node_ready_timeout_secs),
    ])
}

/// # Errors
///
/// `RuntimeCallFailed` if minikube fails or nodes do not become ready in time.
pub fn start(ctx: &EngineContext) -> Result<CommandOutcome> {
    ctx.reporter
        .info(&format!("Starting cluster '{}'", ctx.profile()));
    ctx.runtime.run(&start_call(ctx))?;
    ctx.reporter.info("Waiting for nodes to become ready");
    ctx.runtime.run(&wait_for_nodes_call(ctx))?;
    ctx.reporter.success("Cluster is ready");
    Ok(CommandOutcome::Done)
}

/// # Errors
///
/// `RuntimeCallFailed` if minikube fails.
pub fn stop(ctx: &EngineContext) -> Result<CommandOutcome> {
    ctx.runtime
        .run(&RuntimeCall::minikube(["stop", "-p", ctx.profile()]))?;
    ctx.reporter.success("Cluster stopped");
    Ok(CommandOutcome::Done)
}

/// # Errors
///
/// See [`stop`] and [`start`].
pub fn restart(ctx: &EngineContext) -> Result<CommandOutcome> {
    stop(ctx)?;
    start(ctx)
}

/// Caller has already confirmed
///
/// # Errors
///
/// `RuntimeCallFailed` if minikube fails.
pub fn delete(ctx: &EngineContext) -> Result<CommandOutcome> {
    ctx.runtime
        .run(&RuntimeCall::minikube(["delete", "-p", ctx.profile()]))?;
    ctx.reporter.success("Cluster deleted");
    Ok(CommandOutcome::Done)
}

/// A stopped cluster is reported as a warning, not an error
///
/// # Errors
///
/// `RuntimeCallFailed` if nodes cannot be listed on a running cluster.
pub fn status(ctx: &EngineContext) -> Result<CommandOutcome> {
    match ctx
        .runtime
        .run(&RuntimeCall::minikube(["status", "-p", ctx.profile()]))
    {
        Ok(output) => show_output(ctx, &output),
        Err(e) => {
            ctx.reporter
                .warn(&format!("Cluster '{}' is not running: {}", ctx.profile(), e));
            return Ok(CommandOutcome::Done);
        }
    }
    let nodes = ctx
        .runtime
        .run(&RuntimeCall::kubectl(["get", "nodes", "-o", "wide"]))?;
    show_output(ctx, &nodes);
    Ok(CommandOutcome::Done)
}
