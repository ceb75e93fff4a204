use super::CommandOutcome;
use crate::context::EngineContext;
use kdev_core::errors::Result;
use kdev_core::kube::{ensure_namespace, NamespaceOutcome};
use kdev_core::runtime::RuntimeCall;

/// # Errors
///
/// Runtime failures other than AlreadyExists.
pub fn create(ctx: &EngineContext, name: &str) -> Result<CommandOutcome> {
    match ensure_namespace(ctx.runtime, name)? {
        NamespaceOutcome::Created => ctx.reporter.success(&format!("Namespace {} created", name)),
        NamespaceOutcome::AlreadyExisted => ctx
            .reporter
            .warn(&format!("Namespace {} already exists", name)),
    }
    Ok(CommandOutcome::Done)
}

/// Caller has already confirmed
///
/// # Errors
///
/// `RuntimeCallFailed` if kubectl fails.
pub fn delete(ctx: &EngineContext, name: &str) -> Result<CommandOutcome> {
    ctx.runtime
        .run(&RuntimeCall::kubectl(["delete", "namespace", name]))?;
    ctx.reporter.success(&format!("Namespace {} deleted", name));
    Ok(CommandOutcome::Done)
}
