//! Command execution
//!
//! `apply_command` is the single entry point: it gates destructive commands
//! behind confirmation, brackets every command with operation log events and
//! hands off to the per-family handler.

pub mod apps;
pub mod backup;
pub mod cluster;
pub mod components;
pub mod compose;
pub mod ingress;
pub mod manifests;
pub mod namespace;

use crate::context::EngineContext;
use crate::monitor::{run_monitor, MonitorOptions};
use kdev_core::commands::Command;
use kdev_core::compose::CompositionReport;
use kdev_core::errors::Result;
use kdev_core::router::Router;
use kdev_core::{log_op_end, log_op_error, log_op_start};
use kdev_core_types::RequestId;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// What a command produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Done,
    /// Destructive command declined at the confirmation prompt
    Declined,
    Composition(CompositionReport),
    Rendered(String),
    Generated(Vec<PathBuf>),
    BackedUp(PathBuf),
    Monitored { iterations: u64 },
    /// The front end should open the interactive menu
    MenuRequested,
}

/// Execute one command
///
/// # Errors
///
/// Any fatal error from the handler. Composition step failures are not
/// fatal; they are reported in the returned `CompositionReport`.
pub fn apply_command(
    cmd: Command,
    ctx: &EngineContext,
    request_id: &RequestId,
) -> Result<CommandOutcome> {
    let op = cmd.op_name();

    if let Some(question) = cmd.confirmation_prompt() {
        if !ctx.prompt.confirm(&question) {
            ctx.reporter.warn("Cancelled, nothing was changed");
            tracing::info!(op, request_id = %request_id, "declined");
            return Ok(CommandOutcome::Declined);
        }
    }

    let start = Instant::now();
    log_op_start!(op, request_id = %request_id);
    let result = dispatch(cmd, ctx);
    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => {
            log_op_end!(op, duration_ms = duration_ms, request_id = %request_id);
        }
        Err(e) => {
            log_op_error!(op, e.clone(), duration_ms = duration_ms, request_id = %request_id);
        }
    }
    result
}

fn dispatch(cmd: Command, ctx: &EngineContext) -> Result<CommandOutcome> {
    match cmd {
        Command::ClusterStart => cluster::start(ctx),
        Command::ClusterStop => cluster::stop(ctx),
        Command::ClusterRestart => cluster::restart(ctx),
        Command::ClusterDelete => cluster::delete(ctx),
        Command::ClusterStatus => cluster::status(ctx),

        Command::CreateNamespace { name } => namespace::create(ctx, &name),
        Command::DeleteNamespace { name } => namespace::delete(ctx, &name),

        Command::DeployFile { path } => apps::deploy_file(ctx, &path),
        Command::DeleteFile { path } => apps::delete_file(ctx, &path),
        Command::Scale {
            deployment,
            replicas,
            namespace,
        } => apps::scale(ctx, &deployment, replicas, &namespace),
        Command::Logs { pod, namespace } => apps::logs(ctx, &pod, &namespace),
        Command::Exec {
            pod,
            namespace,
            command,
        } => apps::exec(ctx, &pod, &namespace, &command),
        Command::PortForward {
            resource,
            ports,
            namespace,
        } => apps::port_forward(ctx, &resource, &ports, &namespace),
        Command::GetAll { namespace } => apps::get_all(ctx, &namespace),

        Command::DeployComponent { key, namespace } => {
            components::deploy(ctx, &key, namespace.as_deref())
        }
        Command::RemoveComponent { key, namespace } => {
            components::remove(ctx, &key, namespace.as_deref())
        }
        Command::RenderComponent { key, namespace } => {
            components::render(ctx, &key, namespace.as_deref())
        }
        Command::ListComponents => components::list(ctx),

        Command::CreateEnvironment { name, namespace } => {
            compose::environment(ctx, &name, namespace.as_deref())
        }
        Command::RunWizard { name, namespace } => {
            compose::wizard(ctx, &name, namespace.as_deref())
        }
        Command::EnableFeature(feature) => compose::feature(ctx, feature),

        Command::CreateIngress { spec, tls: false } => ingress::create(ctx, &spec),
        Command::CreateIngress { spec, tls: true } => ingress::create_tls(ctx, &spec),
        Command::DeleteIngress { name, namespace } => ingress::delete(ctx, &name, &namespace),
        Command::ListIngress { namespace } => ingress::list(ctx, &namespace),
        Command::DescribeIngress { name, namespace } => {
            ingress::describe(ctx, &name, &namespace)
        }
        Command::TestIngress { host, path } => ingress::test(ctx, &host, &path),

        Command::GenerateManifests {
            app,
            namespace,
            host,
        } => manifests::generate(ctx, &app, &namespace, host.as_deref()),

        Command::BackupNamespace { namespace } => backup::namespace(ctx, &namespace),
        Command::BackupCluster => backup::cluster(ctx),

        Command::Monitor {
            namespace,
            interval_secs,
        } => {
            let options = MonitorOptions {
                namespace,
                interval: Duration::from_secs(interval_secs),
                max_iterations: ctx.monitor_iterations,
            };
            let iterations = run_monitor(ctx.runtime, ctx.reporter, &options, &ctx.stop)?;
            Ok(CommandOutcome::Monitored { iterations })
        }

        Command::Help => {
            ctx.reporter.raw(&Router::new(ctx.catalog).usage());
            Ok(CommandOutcome::Done)
        }
        Command::Menu => Ok(CommandOutcome::MenuRequested),
    }
}

/// Print captured tool output, skipping empty results
fn show_output(ctx: &EngineContext, output: &str) {
    let trimmed = output.trim_end();
    if !trimmed.is_empty() {
        ctx.reporter.raw(trimmed);
    }
}
