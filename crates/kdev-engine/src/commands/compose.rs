//! Environments, wizards and feature toggles

use super::CommandOutcome;
use crate::context::EngineContext;
use kdev_core::compose::{Composer, Plan};
use kdev_core::errors::Result;
use kdev_core::features::{enable_feature, Feature};

/// Partial failures are reported, never fatal
///
/// # Errors
///
/// `UnknownEnvironment` before any runtime call.
pub fn environment(
    ctx: &EngineContext,
    name: &str,
    namespace: Option<&str>,
) -> Result<CommandOutcome> {
    let plan = Plan::for_environment(ctx.catalog.environment(name)?, namespace);
    let report = Composer::new(ctx.runtime, ctx.catalog, ctx.reporter).execute(&plan);
    Ok(CommandOutcome::Composition(report))
}

/// # Errors
///
/// `UnknownWizard` or `UnknownEnvironment` before any runtime call.
pub fn wizard(ctx: &EngineContext, name: &str, namespace: Option<&str>) -> Result<CommandOutcome> {
    let plan = Plan::for_wizard(ctx.catalog, ctx.catalog.wizard(name)?, namespace)?;
    let report = Composer::new(ctx.runtime, ctx.catalog, ctx.reporter).execute(&plan);
    Ok(CommandOutcome::Composition(report))
}

/// # Errors
///
/// The first runtime failure that is not benign.
pub fn feature(ctx: &EngineContext, feature: Feature) -> Result<CommandOutcome> {
    ctx.reporter
        .info(&format!("Enabling {}: {}", feature, feature.description()));
    for warning in enable_feature(ctx.runtime, feature)? {
        ctx.reporter.warn(&warning);
    }
    ctx.reporter.success(&format!("{} enabled", feature));
    Ok(CommandOutcome::Done)
}
