//! Single-component verbs: deploy, remove, render, list

use super::CommandOutcome;
use crate::context::EngineContext;
use kdev_core::errors::Result;
use kdev_core::kube::{apply_manifest, delete_manifest, ensure_namespace};
use kdev_core::render::render_component;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Render, ensure the namespace, then apply
///
/// # Errors
///
/// Rendering errors before any runtime call, then runtime failures.
pub fn deploy(ctx: &EngineContext, key: &str, namespace: Option<&str>) -> Result<CommandOutcome> {
    let manifest = render_component(ctx.catalog, key, namespace, &BTreeMap::new())?;
    ensure_namespace(ctx.runtime, &manifest.namespace)?;
    apply_manifest(ctx.runtime, &manifest.body)?;
    ctx.reporter.success(&format!(
        "{} deployed to namespace {}",
        manifest.name, manifest.namespace
    ));
    Ok(CommandOutcome::Done)
}

/// # Errors
///
/// Rendering errors before any runtime call, then runtime failures.
pub fn remove(ctx: &EngineContext, key: &str, namespace: Option<&str>) -> Result<CommandOutcome> {
    let manifest = render_component(ctx.catalog, key, namespace, &BTreeMap::new())?;
    delete_manifest(ctx.runtime, &manifest.body)?;
    ctx.reporter.success(&format!(
        "{} removed from namespace {}",
        manifest.name, manifest.namespace
    ));
    Ok(CommandOutcome::Done)
}

/// # Errors
///
/// `UnknownComponent` or `InvalidParameter`.
pub fn render(ctx: &EngineContext, key: &str, namespace: Option<&str>) -> Result<CommandOutcome> {
    let manifest = render_component(ctx.catalog, key, namespace, &BTreeMap::new())?;
    ctx.reporter.raw(&manifest.body);
    Ok(CommandOutcome::Rendered(manifest.body))
}

/// # Errors
///
/// `UnknownComponent` if the catalog is inconsistent.
pub fn list(ctx: &EngineContext) -> Result<CommandOutcome> {
    let mut out = String::from("Components:\n");
    for spec in ctx.catalog.components() {
        let _ = writeln!(
            out,
            "  {:<15} {:<45} [{}]",
            spec.key,
            spec.description,
            ctx.catalog.component_namespace(spec.key)?
        );
    }
    out.push_str("\nEnvironments:\n");
    for env in ctx.catalog.environments() {
        let _ = writeln!(
            out,
            "  {:<22} {} -> {}",
            env.verb,
            env.components.join(", "),
            env.namespace
        );
    }
    out.push_str("\nWizards:\n");
    for wizard in ctx.catalog.wizards() {
        let _ = writeln!(out, "  {:<15} {}", wizard.name, wizard.description);
    }
    ctx.reporter.raw(out.trim_end());
    Ok(CommandOutcome::Done)
}
